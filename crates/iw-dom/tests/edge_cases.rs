//! Edge case tests for iw-dom
//!
//! Structural edits on unusual positions: moving attached nodes,
//! self-references, and lookups of names that were never interned.

use iw_dom::{Document, DomTree, ElementTemplate, NodeId};

fn tags(tree: &DomTree, parent: NodeId) -> Vec<String> {
    tree.element_children(parent)
        .into_iter()
        .filter_map(|id| tree.tag_name(id).map(str::to_string))
        .collect()
}

#[test]
fn test_append_moves_attached_node() {
    let mut doc = Document::new("/");
    let head = doc.head().unwrap();
    let body = doc.body().unwrap();
    let tree = doc.tree_mut();

    let script = tree.create_element("script");
    tree.append_child(head, script);
    tree.append_child(body, script);

    assert!(tags(tree, head).is_empty());
    assert_eq!(tags(tree, body), ["script"]);
    assert_eq!(tree.parent(script), Some(body));
}

#[test]
fn test_self_insertion_is_ignored() {
    let mut doc = Document::new("/");
    let body = doc.body().unwrap();
    let tree = doc.tree_mut();
    let p = tree.create_element("p");
    tree.append_child(body, p);

    tree.insert_after(p, p);
    tree.insert_before(p, p);
    tree.append_child(p, p);

    assert_eq!(tags(tree, body), ["p"]);
}

#[test]
fn test_insert_after_next_sibling_is_noop() {
    let mut doc = Document::new("/");
    let body = doc.body().unwrap();
    let tree = doc.tree_mut();
    let a = tree.create_element("h1");
    let b = tree.create_element("p");
    tree.append_child(body, a);
    tree.append_child(body, b);

    tree.insert_after(a, b);
    assert_eq!(tags(tree, body), ["h1", "p"]);
}

#[test]
fn test_lookup_unknown_tag_returns_nothing() {
    let doc = Document::new("/");
    let found = doc
        .tree()
        .elements_by_tag_names(doc.tree().root(), &["x-never-seen"]);
    assert!(found.is_empty());
}

#[test]
fn test_elements_by_tag_names_document_order() {
    let mut doc = Document::new("/");
    let body = doc.body().unwrap();
    let tree = doc.tree_mut();
    let p1 = tree.create_element("p");
    let button = tree.create_element("x-button");
    let p2 = tree.create_element("p");
    let terminal = tree.create_element("x-terminal");
    let viewer = tree.create_element("x-text-viewer");
    tree.append_child(body, p1);
    tree.append_child(p1, button);
    tree.append_child(body, p2);
    tree.append_child(p2, terminal);
    tree.append_child(p2, viewer);

    let found = tree.elements_by_tag_names(tree.root(), &["x-text-viewer", "x-button", "x-terminal"]);
    assert_eq!(found, vec![button, terminal, viewer]);
}

#[test]
fn test_contains_template_checks_direct_children_only() {
    let mut doc = Document::new("/");
    let head = doc.head().unwrap();
    let body = doc.body().unwrap();
    let tree = doc.tree_mut();
    let template = ElementTemplate::script_src("Widget.js");
    let script = tree.instantiate(&template);
    tree.append_child(body, script);

    assert!(tree.contains_template(body, &template));
    assert!(!tree.contains_template(head, &template));
}

#[test]
fn test_find_comment() {
    let mut doc = Document::new("/");
    let head = doc.head().unwrap();
    let tree = doc.tree_mut();
    let comment = tree.create_comment(" interactive-widgets ");
    tree.append_child(head, comment);

    let root = tree.root();
    assert_eq!(tree.find_comment(root, |text| text.trim() == "interactive-widgets"), Some(comment));
    assert_eq!(tree.find_comment(root, |text| text == "other"), None);
}
