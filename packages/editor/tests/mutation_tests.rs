//! End-to-end mutation behavior through an edit session.

use std::sync::Arc;

use pagecraft_common::IdGenerator;
use pagecraft_document::{
    Component, ComponentKind, ComponentRegistry, Page, PropValue, PropsPatch, Project,
    StylePatch, TreeError,
};
use pagecraft_editor::{Document, EditSession, EditorError, Mutation};

fn session() -> EditSession {
    let registry = Arc::new(ComponentRegistry::new());
    let document = Document::from_project(Project::new("Test Site"));
    EditSession::new("test-session", document, registry)
}

fn content_patch(text: &str) -> PropsPatch {
    let mut patch = PropsPatch::new();
    patch.insert(
        "content".to_string(),
        Some(PropValue::Text(text.to_string())),
    );
    patch
}

#[test]
fn add_component_assigns_fresh_ids() {
    let mut session = session();
    let section = session
        .add_component(ComponentKind::Section, "Hero", None, None)
        .unwrap();
    let heading = session
        .add_component(ComponentKind::Heading, "Title", Some(&section), None)
        .unwrap();

    assert_ne!(section, heading);
    assert!(session.tree().contains(&section));
    assert_eq!(
        session.tree().get(&heading).unwrap().parent_id.as_deref(),
        Some(section.as_str())
    );
}

#[test]
fn remove_unknown_id_is_noop() {
    let mut session = session();
    let removed = session.remove_component("nope").unwrap();
    assert!(!removed);
    assert_eq!(session.document.version, 0);
    assert!(!session.history().can_undo());
}

#[test]
fn remove_deletes_whole_subtree() {
    let mut session = session();
    let section = session
        .add_component(ComponentKind::Section, "Hero", None, None)
        .unwrap();
    let heading = session
        .add_component(ComponentKind::Heading, "Title", Some(&section), None)
        .unwrap();
    let text = session
        .add_component(ComponentKind::Text, "Copy", Some(&section), None)
        .unwrap();

    assert!(session.remove_component(&section).unwrap());
    assert!(!session.tree().contains(&section));
    assert!(!session.tree().contains(&heading));
    assert!(!session.tree().contains(&text));
}

#[test]
fn leaf_kinds_reject_children() {
    let mut session = session();
    let heading = session
        .add_component(ComponentKind::Heading, "Title", None, None)
        .unwrap();

    let result = session.add_component(ComponentKind::Text, "Copy", Some(&heading), None);
    assert!(matches!(
        result,
        Err(EditorError::Mutation(TreeError::InvalidChild { .. }))
    ));
}

#[test]
fn form_accepts_only_form_controls() {
    let mut session = session();
    let form = session
        .add_component(ComponentKind::Form, "Signup", None, None)
        .unwrap();

    session
        .add_component(ComponentKind::Input, "Email", Some(&form), None)
        .unwrap();
    session
        .add_component(ComponentKind::Button, "Submit", Some(&form), None)
        .unwrap();

    let rejected = session.add_component(ComponentKind::Image, "Logo", Some(&form), None);
    assert!(matches!(
        rejected,
        Err(EditorError::Mutation(TreeError::InvalidChild { .. }))
    ));
}

#[test]
fn reparent_into_descendant_fails_and_leaves_tree_intact() {
    let mut session = session();
    let outer = session
        .add_component(ComponentKind::Container, "Outer", None, None)
        .unwrap();
    let inner = session
        .add_component(ComponentKind::Container, "Inner", Some(&outer), None)
        .unwrap();

    let result = session.reparent(&outer, Some(&inner), None);
    assert!(matches!(
        result,
        Err(EditorError::Mutation(TreeError::CycleDetected))
    ));

    // Unchanged
    assert_eq!(session.tree().get(&outer).unwrap().parent_id, None);
    assert_eq!(
        session.tree().get(&inner).unwrap().parent_id.as_deref(),
        Some(outer.as_str())
    );
}

#[test]
fn reorder_moves_within_siblings() {
    let mut session = session();
    let section = session
        .add_component(ComponentKind::Section, "Hero", None, None)
        .unwrap();
    let a = session
        .add_component(ComponentKind::Text, "A", Some(&section), None)
        .unwrap();
    let b = session
        .add_component(ComponentKind::Text, "B", Some(&section), None)
        .unwrap();
    let c = session
        .add_component(ComponentKind::Text, "C", Some(&section), None)
        .unwrap();

    session.reorder(&c, 0).unwrap();
    assert_eq!(session.tree().children_of(&section), vec![c, a, b]);
}

#[test]
fn duplicate_creates_fresh_ids_next_to_source() {
    let mut session = session();
    let section = session
        .add_component(ComponentKind::Section, "Hero", None, None)
        .unwrap();
    let heading = session
        .add_component(ComponentKind::Heading, "Title", Some(&section), None)
        .unwrap();

    let copy = session.duplicate(&section).unwrap();
    assert_ne!(copy, section);
    assert!(session.tree().contains(&copy));

    let copied_children = session.tree().children_of(&copy);
    assert_eq!(copied_children.len(), 1);
    assert_ne!(copied_children[0], heading);

    // Clone lands right after the source among the roots
    let roots = session.tree().root_ids();
    let src_index = roots.iter().position(|id| *id == section).unwrap();
    assert_eq!(roots.get(src_index + 1), Some(&copy));
}

#[test]
fn duplicate_redo_reuses_same_ids() {
    let mut session = session();
    let section = session
        .add_component(ComponentKind::Section, "Hero", None, None)
        .unwrap();

    let copy = session.duplicate(&section).unwrap();
    session.undo().unwrap();
    assert!(!session.tree().contains(&copy));

    session.redo().unwrap();
    assert!(session.tree().contains(&copy));
}

#[test]
fn update_props_deletes_keys_with_none() {
    let mut session = session();
    let heading = session
        .add_component(ComponentKind::Heading, "Title", None, None)
        .unwrap();
    session.update_props(&heading, content_patch("Hello")).unwrap();

    let mut delete = PropsPatch::new();
    delete.insert("content".to_string(), None);
    session.update_props(&heading, delete).unwrap();

    assert!(!session
        .tree()
        .get(&heading)
        .unwrap()
        .props
        .contains_key("content"));
}

#[test]
fn update_styles_and_position() {
    let mut session = session();
    let button = session
        .add_component(ComponentKind::Button, "CTA", None, None)
        .unwrap();

    session
        .update_styles(&button, StylePatch::base_set(&[("color", "#fff")]))
        .unwrap();
    session.move_component(&button, 120.0, 48.0).unwrap();

    let styles = &session.tree().get(&button).unwrap().styles;
    assert_eq!(styles.base.get("color").map(String::as_str), Some("#fff"));
    assert_eq!(styles.base.get("left").map(String::as_str), Some("120px"));
    assert_eq!(styles.base.get("top").map(String::as_str), Some("48px"));
}

#[test]
fn invalid_style_values_are_rejected() {
    let mut session = session();
    let button = session
        .add_component(ComponentKind::Button, "CTA", None, None)
        .unwrap();
    let version_before = session.document.version;

    let result = session.update_styles(
        &button,
        StylePatch::base_set(&[("behavior", "url(evil.htc)"), ("color", "#zzz")]),
    );
    assert!(matches!(
        result,
        Err(EditorError::Mutation(TreeError::InvalidStyle(_)))
    ));

    // Nothing reached the style tree, no undo step was recorded
    let styles = &session.tree().get(&button).unwrap().styles;
    assert!(!styles.base.contains_key("behavior"));
    assert!(!styles.base.contains_key("color"));
    assert_eq!(session.document.version, version_before);
}

#[test]
fn add_component_avoids_ids_used_on_other_pages() {
    let mut session = session();
    let project_id = session.document.project().id.clone();
    // The id a freshly reseeded generator would mint first
    let taken = IdGenerator::new(&project_id).new_id();

    let mut about = Page::new("p2", "About", "about");
    about
        .tree
        .insert(
            Component::new(taken.clone(), ComponentKind::Text, "Copy"),
            None,
            None,
        )
        .unwrap();
    session.document.project_mut().pages.push(about);

    let id = session
        .add_component(ComponentKind::Heading, "Title", None, None)
        .unwrap();
    assert_ne!(id, taken);
    assert!(session.tree().contains(&id));
}

#[test]
fn mutation_on_missing_component_errors() {
    let mut session = session();
    let result = session.update_props("ghost", content_patch("x"));
    assert!(matches!(
        result,
        Err(EditorError::Mutation(TreeError::ComponentNotFound(_)))
    ));
}

#[test]
fn selection_pruned_when_component_removed() {
    let mut session = session();
    let section = session
        .add_component(ComponentKind::Section, "Hero", None, None)
        .unwrap();
    let heading = session
        .add_component(ComponentKind::Heading, "Title", Some(&section), None)
        .unwrap();

    session.select(&heading).unwrap();
    session.set_hover(Some(&heading));
    session.remove_component(&section).unwrap();

    assert!(session.selection().is_empty());
    assert_eq!(session.hovered(), None);
}

#[test]
fn select_unknown_id_errors() {
    let mut session = session();
    assert!(session.select("ghost").is_err());
}

#[test]
fn version_bumps_on_every_commit() {
    let mut session = session();
    assert_eq!(session.document.version, 0);

    let id = session
        .add_component(ComponentKind::Text, "Copy", None, None)
        .unwrap();
    assert_eq!(session.document.version, 1);

    session.update_props(&id, content_patch("hi")).unwrap();
    assert_eq!(session.document.version, 2);

    session.undo().unwrap();
    assert_eq!(session.document.version, 3);
}

#[test]
fn mutations_serialize_round_trip() {
    let mutation = Mutation::SetPosition {
        node_id: "node-1".to_string(),
        x: 10.0,
        y: 20.0,
    };
    let json = serde_json::to_string(&mutation).unwrap();
    let back: Mutation = serde_json::from_str(&json).unwrap();
    assert_eq!(back, mutation);
}
