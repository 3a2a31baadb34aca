//! Document - High-level document API

use crate::{DomTree, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a document with an empty html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure); call [`Document::finalize`]
    /// after populating it
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate and cache the <html>, <head> and <body> elements
    pub fn finalize(&mut self) {
        let root = self.tree.root();
        self.html_element = self
            .tree
            .element_children(root)
            .into_iter()
            .find(|&id| self.tree.is_element_named(id, "html"))
            .unwrap_or(NodeId::NONE);

        let (mut head, mut body) = (NodeId::NONE, NodeId::NONE);
        if self.html_element.is_valid() {
            for id in self.tree.element_children(self.html_element) {
                if !head.is_valid() && self.tree.is_element_named(id, "head") {
                    head = id;
                } else if !body.is_valid() && self.tree.is_element_named(id, "body") {
                    body = id;
                }
            }
        }
        self.head_element = head;
        self.body_element = body;
    }

    /// Create whichever of <html>, <head> and <body> is missing and
    /// return the head and body
    pub fn ensure_structure(&mut self) -> (NodeId, NodeId) {
        if !self.html_element.is_valid() {
            let html = self.tree.create_element("html");
            let root = self.tree.root();
            self.tree.append_child(root, html);
            self.html_element = html;
        }
        if !self.head_element.is_valid() {
            let head = self.tree.create_element("head");
            self.tree.prepend_child(self.html_element, head);
            self.head_element = head;
        }
        if !self.body_element.is_valid() {
            let body = self.tree.create_element("body");
            self.tree.append_child(self.html_element, body);
            self.body_element = body;
        }
        (self.head_element, self.body_element)
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.to_option()
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element.to_option()
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.to_option()
    }

    /// Get document title
    pub fn title(&self) -> String {
        let Some(head) = self.head() else {
            return String::new();
        };
        self.tree
            .element_children(head)
            .into_iter()
            .find(|&id| self.tree.is_element_named(id, "title"))
            .map(|id| self.tree.text_content(id))
            .unwrap_or_default()
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_structure() {
        let doc = Document::new("/guide");
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
        assert_eq!(doc.url(), "/guide");
    }

    #[test]
    fn test_finalize_finds_sections() {
        let mut doc = Document::empty("/");
        let tree = doc.tree_mut();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let title = tree.create_element("title");
        let text = tree.create_text("Widgets");
        let body = tree.create_element("body");
        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(head, title);
        tree.append_child(title, text);
        tree.append_child(html, body);

        doc.finalize();
        assert_eq!(doc.head(), Some(head));
        assert_eq!(doc.body(), Some(body));
        assert_eq!(doc.title(), "Widgets");
    }

    #[test]
    fn test_ensure_structure_fills_gaps() {
        let mut doc = Document::empty("/");
        let (head, body) = doc.ensure_structure();
        assert_eq!(doc.head(), Some(head));
        assert_eq!(doc.body(), Some(body));
        let html = doc.document_element().unwrap();
        assert_eq!(
            doc.tree().element_children(html),
            vec![doc.head().unwrap(), doc.body().unwrap()]
        );

        // Idempotent once complete
        let before = doc.tree().len();
        doc.ensure_structure();
        assert_eq!(doc.tree().len(), before);
    }
}
