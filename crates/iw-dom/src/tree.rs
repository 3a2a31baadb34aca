//! DOM Tree (arena-based allocation)
//!
//! All structural edits keep the five link fields of every touched node
//! consistent: a node is either fully linked under one parent or fully
//! detached.

use crate::{ElementData, InternedString, Node, NodeData, NodeId, StringInterner};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    pub(crate) nodes: Vec<Node>,
    interner: StringInterner,
}

impl DomTree {
    /// Create a tree containing only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            interner: StringInterner::new(),
        }
    }

    /// Document root
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes ever allocated (detached nodes included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn interner_mut(&mut self) -> &mut StringInterner {
        &mut self.interner
    }

    /// Resolve an interned name
    #[inline]
    pub fn resolve(&self, id: InternedString) -> &str {
        self.interner.get(id)
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Allocate an unlinked node
    pub fn create_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    /// Allocate an unlinked element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = self.interner.intern(tag);
        self.create_node(NodeData::Element(ElementData::new(name)))
    }

    /// Allocate an unlinked text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.create_node(NodeData::Text(text.to_string()))
    }

    /// Allocate an unlinked comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.create_node(NodeData::Comment(text.to_string()))
    }

    // ------------------------------------------------------------------
    // Element accessors
    // ------------------------------------------------------------------

    /// Tag name of an element, `None` for other node kinds
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        let elem = self.get(id)?.as_element()?;
        Some(self.interner.get(elem.name))
    }

    /// Check whether `id` is an element with the given tag
    pub fn is_element_named(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id) == Some(tag)
    }

    /// Read an attribute value
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let key = self.interner.lookup(name)?;
        self.get(id)?.as_element()?.get_attr(key)
    }

    /// Test attribute presence (boolean attributes have empty values)
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// All attributes of an element in source order
    pub fn attributes(&self, id: NodeId) -> Vec<(&str, &str)> {
        self.get(id)
            .and_then(Node::as_element)
            .map(|elem| {
                elem.attrs
                    .iter()
                    .map(|attr| (self.interner.get(attr.name), attr.value.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Set an attribute on an element; no-op for other node kinds
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let key = self.interner.intern(name);
        if let Some(elem) = self.get_mut(id).and_then(Node::as_element_mut) {
            elem.set_attr(key, value.to_string());
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent.to_option()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.first_child.to_option()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.last_child.to_option()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.next_sibling.to_option()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.prev_sibling.to_option()
    }

    /// Iterate over the direct children of `parent`
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(parent).map_or(NodeId::NONE, |node| node.first_child),
        }
    }

    /// All descendants of `root` in document (pre-)order, `root` excluded
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.first_child(root);
        while let Some(id) = current {
            out.push(id);
            current = self
                .first_child(id)
                .or_else(|| self.following_outside(id, root));
        }
        out
    }

    /// Next node in pre-order once the subtree of `id` is exhausted
    fn following_outside(&self, mut id: NodeId, root: NodeId) -> Option<NodeId> {
        loop {
            if id == root {
                return None;
            }
            if let Some(next) = self.next_sibling(id) {
                return Some(next);
            }
            id = self.parent(id)?;
        }
    }

    /// Elements under `root` whose tag is one of `tags`, in document order
    pub fn elements_by_tag_names(&self, root: NodeId, tags: &[&str]) -> Vec<NodeId> {
        let wanted: Vec<InternedString> = tags
            .iter()
            .filter_map(|tag| self.interner.lookup(tag))
            .collect();
        if wanted.is_empty() {
            return Vec::new();
        }

        self.descendants(root)
            .into_iter()
            .filter(|&id| {
                self.get(id)
                    .and_then(Node::as_element)
                    .is_some_and(|elem| wanted.contains(&elem.name))
            })
            .collect()
    }

    /// First comment under `root` whose content satisfies `predicate`
    pub fn find_comment(&self, root: NodeId, predicate: impl Fn(&str) -> bool) -> Option<NodeId> {
        self.descendants(root).into_iter().find(|&id| {
            self.get(id)
                .and_then(Node::as_comment)
                .is_some_and(&predicate)
        })
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|child| self.get(child).and_then(Node::as_text))
            .collect()
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Unlink `id` from its parent; its subtree stays attached to it
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
    }

    /// Insert `child` as the first child of `parent`
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        match self.first_child(parent) {
            Some(first) => self.insert_before(first, child),
            None => self.append_child(parent, child),
        }
    }

    /// Insert `new` immediately before `reference`
    pub fn insert_before(&mut self, reference: NodeId, new: NodeId) {
        if reference == new || self.get(new).is_none() {
            return;
        }
        let Some(parent) = self.parent(reference) else {
            return;
        };
        self.detach(new);

        let prev = self.nodes[reference.index()].prev_sibling;
        {
            let node = &mut self.nodes[new.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        self.nodes[reference.index()].prev_sibling = new;
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = new;
        } else {
            self.nodes[parent.index()].first_child = new;
        }
    }

    /// Insert `new` immediately after `reference`
    pub fn insert_after(&mut self, reference: NodeId, new: NodeId) {
        if reference == new {
            return;
        }
        match self.next_sibling(reference) {
            Some(next) if next == new => {}
            Some(next) => self.insert_before(next, new),
            None => {
                if let Some(parent) = self.parent(reference) {
                    self.append_child(parent, new);
                }
            }
        }
    }

    /// Put `new` where `old` is and detach `old`
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        if old == new || self.parent(old).is_none() {
            return;
        }
        self.insert_before(old, new);
        self.detach(old);
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the direct children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_tags(tree: &DomTree, parent: NodeId) -> Vec<String> {
        tree.children(parent)
            .filter_map(|(id, _)| tree.tag_name(id).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_append_and_children_order() {
        let mut tree = DomTree::new();
        let body = tree.create_element("body");
        tree.append_child(tree.root(), body);
        for tag in ["h1", "p", "ul"] {
            let el = tree.create_element(tag);
            tree.append_child(body, el);
        }
        assert_eq!(child_tags(&tree, body), ["h1", "p", "ul"]);
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut tree = DomTree::new();
        let body = tree.create_element("body");
        tree.append_child(tree.root(), body);
        let middle = tree.create_element("p");
        tree.append_child(body, middle);

        let first = tree.create_element("h1");
        tree.insert_before(middle, first);
        let last = tree.create_element("footer");
        tree.insert_after(middle, last);
        let between = tree.create_element("hr");
        tree.insert_after(first, between);

        assert_eq!(child_tags(&tree, body), ["h1", "hr", "p", "footer"]);
        assert_eq!(tree.last_child(body), Some(last));
        assert_eq!(tree.first_child(body), Some(first));
    }

    #[test]
    fn test_replace_keeps_siblings() {
        let mut tree = DomTree::new();
        let body = tree.create_element("body");
        tree.append_child(tree.root(), body);
        let a = tree.create_element("h1");
        let b = tree.create_element("p");
        let c = tree.create_element("h2");
        for id in [a, b, c] {
            tree.append_child(body, id);
        }

        let div = tree.create_element("div");
        tree.replace(b, div);

        assert_eq!(child_tags(&tree, body), ["h1", "div", "h2"]);
        assert_eq!(tree.parent(b), None);
    }

    #[test]
    fn test_detach_only_child() {
        let mut tree = DomTree::new();
        let body = tree.create_element("body");
        tree.append_child(tree.root(), body);
        let p = tree.create_element("p");
        tree.append_child(body, p);
        tree.detach(p);

        assert_eq!(tree.first_child(body), None);
        assert_eq!(tree.last_child(body), None);
    }

    #[test]
    fn test_descendants_document_order() {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");
        let p = tree.create_element("p");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);
        tree.append_child(body, p);
        tree.append_child(p, span);

        assert_eq!(tree.descendants(tree.root()), vec![html, head, body, p, span]);
        assert_eq!(tree.descendants(p), vec![span]);
    }

    #[test]
    fn test_attributes() {
        let mut tree = DomTree::new();
        let el = tree.create_element("x-terminal");
        tree.set_attribute(el, "image", "alpine");
        tree.set_attribute(el, "hidden", "");
        tree.set_attribute(el, "image", "debian");

        assert_eq!(tree.attribute(el, "image"), Some("debian"));
        assert!(tree.has_attribute(el, "hidden"));
        assert!(!tree.has_attribute(el, "command"));
        assert_eq!(tree.attributes(el), vec![("image", "debian"), ("hidden", "")]);
    }
}
