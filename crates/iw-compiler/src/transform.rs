//! Document transform engine
//!
//! Rewrites one page for its widgets. The head keeps two insertion
//! cursors: a prepend partition at the front of the head, and a running
//! cursor after the session bootstrap that widget scripts and stylesheets
//! follow in order. Each widget's markup is replaced
//! by its container (or removed if hidden) and its instantiation script
//! follows immediately, so scripts keep document order. The session-ready
//! script closes the body after all of them.

use iw_dom::{Document, DomTree, ElementTemplate, NodeId};

use crate::assets::StaticAssetSet;
use crate::config::SiteConfig;
use crate::error::{CompileError, Result};
use crate::markup::{WidgetKind, WidgetMarkup, scan};
use crate::page::PageUrl;
use crate::session;
use crate::widget::WidgetDescriptor;

/// Outcome of compiling one page
#[derive(Debug)]
pub struct PageCompilationResult {
    pub url: PageUrl,
    /// Widgets in discovery order
    pub widgets: Vec<WidgetDescriptor>,
    pub document: Document,
    /// Assets this page needs; empty for static pages
    pub assets: StaticAssetSet,
}

impl PageCompilationResult {
    pub fn is_interactive(&self) -> bool {
        !self.widgets.is_empty()
    }

    /// Serialized page
    pub fn html(&self) -> String {
        iw_html::serialize(&self.document)
    }
}

/// Compile the widgets of an already parsed page.
///
/// Every widget is validated before the tree is touched, so a failing page
/// is never half-transformed.
pub fn compile_document(
    mut document: Document,
    url: &PageUrl,
    config: &SiteConfig,
) -> Result<PageCompilationResult> {
    let markups = scan(&document, url);
    if markups.is_empty() {
        return Ok(PageCompilationResult {
            url: url.clone(),
            widgets: Vec::new(),
            document,
            assets: StaticAssetSet::new(),
        });
    }

    for markup in &markups {
        reject_nested(document.tree(), markup)?;
    }
    let widgets = markups
        .iter()
        .map(|markup| WidgetDescriptor::from_markup(markup, config))
        .collect::<Result<Vec<_>>>()?;

    let (head, body) = document.ensure_structure();

    let mut assets = StaticAssetSet::new();
    let mut engine = Transform::new(document.tree_mut(), head, body);
    engine.install_session(url);
    assets.insert(session::ROOM_CONNECTION_ASSET);

    for widget in &widgets {
        engine.place(widget);
        assets.extend(widget.static_assets().iter().copied());
    }
    engine.finish();

    Ok(PageCompilationResult {
        url: url.clone(),
        widgets,
        document,
        assets,
    })
}

/// Insertion state for one page
struct Transform<'a> {
    tree: &'a mut DomTree,
    head: NodeId,
    body: NodeId,
    /// Last node of the head's prepend partition
    head_prepend: Option<NodeId>,
    /// Running head insertion point for scripts
    head_append: Option<NodeId>,
    /// Last node of the body's prepend partition
    body_prepend: Option<NodeId>,
}

impl<'a> Transform<'a> {
    fn new(tree: &'a mut DomTree, head: NodeId, body: NodeId) -> Self {
        Self {
            tree,
            head,
            body,
            head_prepend: None,
            head_append: None,
            body_prepend: None,
        }
    }

    /// Room-name negotiation and connection library in the head, connection
    /// construction at the start of the body
    fn install_session(&mut self, url: &PageUrl) {
        self.head_append = self.tree.find_comment(self.head, session::is_marker);

        for template in session::head_scripts(url) {
            let cursor = self.head_append;
            if let Some(node) = self.insert_in_head_after(cursor, &template) {
                self.head_append = Some(node);
            }
        }

        let construction = self.existing_or_new(self.body, &session::construction_script());
        self.tree.prepend_child(self.body, construction);
        self.body_prepend = Some(construction);
    }

    /// Widgets never nest, so every anchor is still attached when its
    /// turn comes
    fn place(&mut self, widget: &WidgetDescriptor) {
        let anchor = anchor_of(self.tree, widget.node);
        let body = widget.body_insertions();
        let script = self.tree.instantiate(&body.instantiation);
        match widget.replacement_node() {
            Some(template) => {
                let container = self.tree.instantiate(&template);
                self.tree.replace(anchor, container);
                self.tree.insert_after(container, script);
            }
            None => {
                self.tree.insert_after(anchor, script);
                self.tree.detach(anchor);
            }
        }

        let head = widget.head_insertions();
        for template in &head.prepend {
            if self.tree.contains_template(self.head, template) {
                continue;
            }
            let node = self.tree.instantiate(template);
            match self.head_prepend {
                Some(cursor) => self.tree.insert_after(cursor, node),
                None => self.tree.prepend_child(self.head, node),
            }
            self.head_prepend = Some(node);
        }
        for template in &head.append {
            let cursor = self.head_append;
            if let Some(node) = self.insert_in_head_after(cursor, template) {
                self.head_append = Some(node);
            }
        }

        for template in &body.prepend {
            if self.tree.contains_template(self.body, template) {
                continue;
            }
            let node = self.tree.instantiate(template);
            match self.body_prepend {
                Some(cursor) => self.tree.insert_after(cursor, node),
                None => self.tree.prepend_child(self.body, node),
            }
            self.body_prepend = Some(node);
        }
        for template in &body.append {
            if !self.tree.contains_template(self.body, template) {
                let node = self.tree.instantiate(template);
                self.tree.append_child(self.body, node);
            }
        }

        tracing::debug!("Placed {} as {}", widget.kind, widget.element_id());
    }

    /// Session-ready script as the last child of the body
    fn finish(&mut self) {
        let ready = self.existing_or_new(self.body, &session::ready_script());
        self.tree.append_child(self.body, ready);
    }

    /// Insert `template` after `cursor` (or at the end of the head) unless
    /// the head already has an equal child
    fn insert_in_head_after(
        &mut self,
        cursor: Option<NodeId>,
        template: &ElementTemplate,
    ) -> Option<NodeId> {
        if self.tree.contains_template(self.head, template) {
            return None;
        }
        let node = self.tree.instantiate(template);
        match cursor {
            Some(cursor) => self.tree.insert_after(cursor, node),
            None => self.tree.append_child(self.head, node),
        }
        Some(node)
    }

    fn existing_or_new(&mut self, parent: NodeId, template: &ElementTemplate) -> NodeId {
        let existing = self
            .tree
            .element_children(parent)
            .into_iter()
            .find(|&id| self.tree.matches_template(id, template));
        existing.unwrap_or_else(|| self.tree.instantiate(template))
    }
}

/// Markup inside another widget's markup would be detached together with
/// the outer widget and never reach the page
fn reject_nested(tree: &DomTree, markup: &WidgetMarkup) -> Result<()> {
    let mut current = tree.parent(markup.node);
    while let Some(id) = current {
        if let Some(outer) = tree.tag_name(id).and_then(WidgetKind::from_tag) {
            return Err(CompileError::NestedWidget {
                kind: markup.kind,
                page: markup.page_url.to_string(),
                position: markup.position,
                outer,
            });
        }
        current = tree.parent(id);
    }
    Ok(())
}

/// Node replaced for a widget: its `<p>` wrapper when the markup is the
/// paragraph's only content, the markup element otherwise
fn anchor_of(tree: &DomTree, node: NodeId) -> NodeId {
    match tree.parent(node) {
        Some(parent) if tree.is_element_named(parent, "p") && is_sole_content(tree, parent, node) => {
            parent
        }
        _ => node,
    }
}

fn is_sole_content(tree: &DomTree, parent: NodeId, node: NodeId) -> bool {
    tree.children(parent).all(|(id, child)| {
        id == node || child.as_text().is_some_and(|text| text.trim().is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(html: &str, url: &str) -> PageCompilationResult {
        let doc = iw_html::parse(html).unwrap();
        compile_document(doc, &PageUrl::new(url), &SiteConfig::default()).unwrap()
    }

    fn head_sources(result: &PageCompilationResult) -> Vec<String> {
        let tree = result.document.tree();
        let head = result.document.head().unwrap();
        tree.element_children(head)
            .into_iter()
            .filter_map(|id| {
                tree.attribute(id, "src")
                    .or_else(|| tree.attribute(id, "href"))
                    .map(str::to_string)
            })
            .collect()
    }

    #[test]
    fn test_static_page_untouched() {
        let html = "<html><head><title>T</title></head><body><p>Hi</p></body></html>";
        let result = compile(html, "");
        assert!(!result.is_interactive());
        assert!(result.assets.is_empty());
        assert_eq!(result.html(), html);
    }

    #[test]
    fn test_anchor_is_paragraph_when_sole_content() {
        let result = compile(
            "<body><p> <x-text-viewer file=\"/a\"></x-text-viewer> </p></body>",
            "",
        );
        let html = result.html();
        assert!(!html.contains("<p>"));
        assert!(html.contains("class=\"interactive-widgets-container\""));
    }

    #[test]
    fn test_anchor_is_markup_with_sibling_text() {
        let result = compile(
            "<body><p>Output: <x-text-viewer file=\"/a\"></x-text-viewer></p></body>",
            "",
        );
        let html = result.html();
        assert!(html.contains("<p>Output: <div id=\"widget-text-viewer-"));
    }

    #[test]
    fn test_marker_comment_anchors_bootstrap() {
        let result = compile(
            concat!(
                "<html><head><meta charset=\"utf-8\"><!-- interactive-widgets -->",
                "<title>T</title></head>",
                "<body><p><x-text-viewer file=\"/a\"></x-text-viewer></p></body></html>"
            ),
            "",
        );
        let tree = result.document.tree();
        let head = result.document.head().unwrap();
        let tags: Vec<_> = tree
            .element_children(head)
            .into_iter()
            .filter_map(|id| tree.tag_name(id).map(str::to_string))
            .collect();
        // meta, bootstrap (2), widget scripts (2), then the existing title
        assert_eq!(tags, ["meta", "script", "script", "script", "script", "title"]);
    }

    #[test]
    fn test_head_order_without_marker() {
        let result = compile(
            "<html><head><title>T</title></head><body><p><x-terminal image=\"alpine\" command=\"sh\"></x-terminal></p></body></html>",
            "guide/",
        );
        assert_eq!(
            head_sources(&result),
            [
                "../RoomConnection.js",
                "../Widget.js",
                "../TerminalWidget.js",
                "../node_modules/xterm/lib/xterm.js",
                "../node_modules/xterm-addon-fit/lib/xterm-addon-fit.js",
                "../node_modules/xterm/css/xterm.css",
            ]
        );
    }

    #[test]
    fn test_stylesheet_follows_existing_head_and_bootstrap() {
        let result = compile(
            concat!(
                "<html><head><meta charset=\"utf-8\"><title>T</title></head>",
                "<body><p><x-text-editor file=\"/a.py\"></x-text-editor></p></body></html>"
            ),
            "",
        );
        let tree = result.document.tree();
        let head = result.document.head().unwrap();
        let children = tree.element_children(head);
        assert!(tree.is_element_named(children[0], "meta"));
        assert!(tree.is_element_named(children[1], "title"));

        let html = result.html();
        let meta = html.find("<meta charset").unwrap();
        let bootstrap = html.find("RoomConnection.js").unwrap();
        let stylesheet = html.find("codemirror.css").unwrap();
        assert!(meta < bootstrap && bootstrap < stylesheet);
    }

    #[test]
    fn test_nested_widget_rejected() {
        let doc = iw_html::parse(concat!(
            "<body><x-button image=\"alpine\" command=\"ls\" label=\"L\">",
            "<x-terminal image=\"alpine\" command=\"sh\"></x-terminal>",
            "</x-button></body>"
        ))
        .unwrap();
        let err = compile_document(doc, &PageUrl::new("nested/"), &SiteConfig::default())
            .unwrap_err();
        match err {
            CompileError::NestedWidget {
                kind,
                page,
                position,
                outer,
            } => {
                assert_eq!(kind, WidgetKind::Terminal);
                assert_eq!(page, "/nested");
                assert_eq!(position, 1);
                assert_eq!(outer, WidgetKind::Button);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_body_bookends() {
        let result = compile(
            "<body><p><x-button image=\"alpine\" command=\"ls\" label=\"List\"></x-button></p><footer></footer></body>",
            "",
        );
        let tree = result.document.tree();
        let body = result.document.body().unwrap();
        let children = tree.element_children(body);
        assert_eq!(
            tree.text_content(children[0]),
            "const roomConnection = new RoomConnection(currentRoomName);"
        );
        assert_eq!(
            tree.text_content(*children.last().unwrap()),
            "roomConnection.readyForConnecting();"
        );
    }

    #[test]
    fn test_hidden_widget_removed_with_wrapper() {
        let result = compile(
            "<body><h1>A</h1><p><x-prologue image=\"alpine\" command=\"init\" hidden></x-prologue></p><h2>B</h2></body>",
            "",
        );
        let html = result.html();
        assert!(!html.contains("x-prologue"));
        assert!(!html.contains("interactive-widgets-container"));
        let a = html.find("<h1>A</h1>").unwrap();
        let script = html.find("new PrologueWidget(").unwrap();
        let b = html.find("<h2>B</h2>").unwrap();
        assert!(a < script && script < b);
    }

    #[test]
    fn test_assets_include_connection() {
        let result = compile(
            "<body><p><x-button image=\"alpine\" command=\"ls\" label=\"List\"></x-button></p></body>",
            "",
        );
        let assets: Vec<_> = result.assets.iter().collect();
        assert_eq!(assets, ["ButtonWidget.js", "RoomConnection.js", "Widget.js"]);
    }
}
