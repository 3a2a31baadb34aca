//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into our arena DOM.
//! Unlike a rendering parser, every text node is kept verbatim
//! (whitespace included) so that an unmodified page serializes back
//! to equivalent markup.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use iw_dom::{Document, DomTree, NodeData, NodeId};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::HtmlError;

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with the URL it will be published under
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(|source| HtmlError::Read {
                url: url.to_string(),
                source,
            })?;

        let mut document = Document::empty(url);
        let root = document.tree().root();
        self.convert_node(&dom.document, document.tree_mut(), root);
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Convert an RcDom node (and its subtree) into our DOM under `parent`
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent);
                }
            }
            RcNodeData::Doctype {
                name,
                public_id,
                system_id,
            } => {
                let id = tree.create_node(NodeData::Doctype {
                    name: name.to_string(),
                    public_id: public_id.to_string(),
                    system_id: system_id.to_string(),
                });
                tree.append_child(parent, id);
            }
            RcNodeData::Text { contents } => {
                let id = tree.create_text(&contents.borrow());
                tree.append_child(parent, id);
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id);
            }
            RcNodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let id = tree.create_element(&name.local);

                for attr in attrs.borrow().iter() {
                    match &attr.name.prefix {
                        Some(prefix) => {
                            let qualified = format!("{}:{}", prefix, attr.name.local);
                            tree.set_attribute(id, &qualified, &attr.value);
                        }
                        None => tree.set_attribute(id, &attr.name.local, &attr.value),
                    }
                }
                tree.append_child(parent, id);

                // <template> keeps its content in a separate fragment
                if let Some(contents) = template_contents.borrow().as_ref() {
                    for child in contents.children.borrow().iter() {
                        self.convert_node(child, tree, id);
                    }
                }
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id);
                }
            }
            RcNodeData::ProcessingInstruction { target, contents } => {
                let id = tree.create_node(NodeData::ProcessingInstruction {
                    target: target.to_string(),
                    data: contents.to_string(),
                });
                tree.append_child(parent, id);
            }
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}
