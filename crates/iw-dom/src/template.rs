//! Element templates
//!
//! A detached description of a small element (`<script src>`, inline
//! `<script>`, `<link rel=stylesheet>`, a container `<div>`). Templates are
//! compared against existing nodes before insertion so the same asset
//! reference is never placed twice in one section.

use crate::{DomTree, NodeId};

/// Detached element description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTemplate {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
}

impl ElementTemplate {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            text: None,
        }
    }

    /// Add an attribute (builder style)
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.push((name.to_string(), value.into()));
        self
    }

    /// Set the text content (builder style)
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// `<script src="...">`
    pub fn script_src(src: impl Into<String>) -> Self {
        Self::new("script").attr("src", src)
    }

    /// `<script>code</script>`
    pub fn inline_script(code: impl Into<String>) -> Self {
        Self::new("script").text(code)
    }

    /// `<link rel="stylesheet" href="...">`
    pub fn stylesheet(href: impl Into<String>) -> Self {
        Self::new("link").attr("rel", "stylesheet").attr("href", href)
    }

    /// Value of a template attribute
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl DomTree {
    /// Materialize a template as a new, unlinked subtree
    pub fn instantiate(&mut self, template: &ElementTemplate) -> NodeId {
        let id = self.create_element(&template.tag);
        for (name, value) in &template.attributes {
            self.set_attribute(id, name, value);
        }
        if let Some(text) = &template.text {
            let text_id = self.create_text(text);
            self.append_child(id, text_id);
        }
        id
    }

    /// Structural equality between an existing node and a template.
    ///
    /// Attribute order is irrelevant; the node must contain only text.
    pub fn matches_template(&self, id: NodeId, template: &ElementTemplate) -> bool {
        if self.tag_name(id) != Some(template.tag.as_str()) {
            return false;
        }

        let mut existing = self.attributes(id);
        let mut expected: Vec<(&str, &str)> = template
            .attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        existing.sort_unstable();
        expected.sort_unstable();
        if existing != expected {
            return false;
        }

        let mut text = String::new();
        for (_, child) in self.children(id) {
            match child.as_text() {
                Some(content) => text.push_str(content),
                None => return false,
            }
        }
        text == template.text.as_deref().unwrap_or_default()
    }

    /// Whether any direct child of `parent` equals `template`
    pub fn contains_template(&self, parent: NodeId, template: &ElementTemplate) -> bool {
        self.children(parent)
            .filter(|(_, node)| node.is_element())
            .any(|(id, _)| self.matches_template(id, template))
    }

    /// Children that are elements, for callers that ignore whitespace text
    pub fn element_children(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent)
            .filter(|(_, node)| node.is_element())
            .map(|(id, _)| id)
            .collect()
    }
}
