//! Widget markup discovery
//!
//! Finds the recognized custom elements of a page in document order and
//! snapshots their attributes.

use std::collections::BTreeMap;
use std::fmt;

use iw_dom::{Document, NodeId};

use crate::error::{CompileError, Result};
use crate::page::PageUrl;

/// Closed set of widget kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidgetKind {
    Button,
    Epilogue,
    ImageViewer,
    Prologue,
    Terminal,
    TextEditor,
    TextViewer,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 7] = [
        WidgetKind::Button,
        WidgetKind::Epilogue,
        WidgetKind::ImageViewer,
        WidgetKind::Prologue,
        WidgetKind::Terminal,
        WidgetKind::TextEditor,
        WidgetKind::TextViewer,
    ];

    /// Markup tag
    pub fn tag(self) -> &'static str {
        match self {
            WidgetKind::Button => "x-button",
            WidgetKind::Epilogue => "x-epilogue",
            WidgetKind::ImageViewer => "x-image-viewer",
            WidgetKind::Prologue => "x-prologue",
            WidgetKind::Terminal => "x-terminal",
            WidgetKind::TextEditor => "x-text-editor",
            WidgetKind::TextViewer => "x-text-viewer",
        }
    }

    /// Kind name used in element ids and identity hashes
    pub fn name(self) -> &'static str {
        &self.tag()[2..]
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Attribute carrying an author-chosen widget name
pub const NAME_ATTRIBUTE: &str = "name";

/// One recognized element found on a page
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetMarkup {
    pub kind: WidgetKind,
    pub page_url: PageUrl,
    /// 0-based discovery order on the page
    pub position: usize,
    pub attributes: BTreeMap<String, String>,
    pub explicit_name: Option<String>,
    /// The element in the page tree
    pub node: NodeId,
}

impl WidgetMarkup {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Presence flag (`hidden`)
    pub fn has_flag(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Value of an attribute the variant cannot do without
    pub fn require(&self, attribute: &'static str) -> Result<&str> {
        self.attribute(attribute)
            .ok_or_else(|| CompileError::MissingAttribute {
                kind: self.kind,
                page: self.page_url.to_string(),
                position: self.position,
                attribute,
            })
    }

    /// Build an `InvalidAttribute` error for this markup
    pub fn invalid(&self, attribute: &'static str, value: &str) -> CompileError {
        CompileError::InvalidAttribute {
            kind: self.kind,
            page: self.page_url.to_string(),
            position: self.position,
            attribute,
            value: value.to_string(),
        }
    }
}

/// All widget markup of `document`, in document order
pub fn scan(document: &Document, page_url: &PageUrl) -> Vec<WidgetMarkup> {
    let tree = document.tree();
    let tags = WidgetKind::ALL.map(WidgetKind::tag);

    tree.elements_by_tag_names(tree.root(), &tags)
        .into_iter()
        .enumerate()
        .filter_map(|(position, node)| {
            let kind = WidgetKind::from_tag(tree.tag_name(node)?)?;
            let attributes: BTreeMap<String, String> = tree
                .attributes(node)
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            let explicit_name = attributes.get(NAME_ATTRIBUTE).cloned();

            Some(WidgetMarkup {
                kind,
                page_url: page_url.clone(),
                position,
                attributes,
                explicit_name,
                node,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for kind in WidgetKind::ALL {
            assert_eq!(WidgetKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(WidgetKind::TextEditor.name(), "text-editor");
        assert_eq!(WidgetKind::from_tag("x-unknown"), None);
    }

    #[test]
    fn test_scan_document_order() {
        let html = concat!(
            "<p><x-terminal image=\"alpine\" command=\"sh\"></x-terminal></p>",
            "<p><x-button image=\"alpine\" command=\"ls\" label=\"List\" name=\"list\"></x-button></p>",
            "<x-unknown></x-unknown>",
        );
        let doc = iw_html::parse(html).unwrap();
        let url = PageUrl::new("guide/");
        let found = scan(&doc, &url);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].kind, WidgetKind::Terminal);
        assert_eq!(found[0].position, 0);
        assert_eq!(found[0].explicit_name, None);
        assert_eq!(found[1].kind, WidgetKind::Button);
        assert_eq!(found[1].position, 1);
        assert_eq!(found[1].explicit_name.as_deref(), Some("list"));
        assert_eq!(found[1].attribute("label"), Some("List"));
    }

    #[test]
    fn test_require_reports_context() {
        let doc = iw_html::parse("<p><x-text-viewer></x-text-viewer></p>").unwrap();
        let found = scan(&doc, &PageUrl::new("docs/"));
        let err = found[0].require("file").unwrap_err();
        match err {
            CompileError::MissingAttribute {
                kind,
                page,
                position,
                attribute,
            } => {
                assert_eq!(kind, WidgetKind::TextViewer);
                assert_eq!(page, "/docs");
                assert_eq!(position, 0);
                assert_eq!(attribute, "file");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
