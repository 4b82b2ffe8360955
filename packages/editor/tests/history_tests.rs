//! Undo/redo behavior through an edit session: batching, inverse law,
//! and history bounds.

use std::sync::Arc;

use pagecraft_document::{
    Component, ComponentKind, ComponentRegistry, ComponentTree, PropValue, PropsPatch, Project,
    StylePatch,
};
use pagecraft_editor::{Document, EditSession, Mutation, UndoStack};

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

fn content_of(session: &EditSession, id: &str) -> Option<String> {
    match session.tree().get(id).unwrap().props.get("content") {
        Some(PropValue::Text(text)) => Some(text.clone()),
        _ => None,
    }
}

#[test]
fn undo_redo_restores_exact_state() {
    let mut session = session();
    let section = session
        .add_component(ComponentKind::Section, "Hero", None, None)
        .unwrap();
    let heading = session
        .add_component(ComponentKind::Heading, "Title", Some(&section), None)
        .unwrap();
    session
        .update_props(&heading, content_patch("Welcome"))
        .unwrap();

    let snapshot: Vec<Component> = session.tree().iter().cloned().collect();

    assert!(session.undo().unwrap());
    assert_ne!(content_of(&session, &heading), Some("Welcome".to_string()));

    assert!(session.redo().unwrap());
    let mut after: Vec<Component> = session.tree().iter().cloned().collect();
    let mut before = snapshot;
    before.sort_by(|a, b| a.id.cmp(&b.id));
    after.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(before, after);
}

#[test]
fn undo_remove_restores_subtree_in_place() {
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

    session.remove_component(&b).unwrap();
    assert_eq!(
        session.tree().children_of(&section),
        vec![a.clone(), c.clone()]
    );

    session.undo().unwrap();
    assert_eq!(session.tree().children_of(&section), vec![a, b, c]);
}

#[test]
fn batch_is_one_undo_step() {
    let mut session = session();
    let button = session
        .add_component(ComponentKind::Button, "CTA", None, None)
        .unwrap();

    session
        .begin_batch(Some("Restyle button".to_string()))
        .unwrap();
    session
        .update_styles(&button, StylePatch::base_set(&[("color", "#fff")]))
        .unwrap();
    session
        .update_styles(&button, StylePatch::base_set(&[("background", "#3366ff")]))
        .unwrap();
    session.move_component(&button, 10.0, 10.0).unwrap();
    session.end_batch().unwrap();

    assert_eq!(session.history().undo_description(), Some("Restyle button"));

    session.undo().unwrap();
    let styles = &session.tree().get(&button).unwrap().styles;
    assert!(!styles.base.contains_key("color"));
    assert!(!styles.base.contains_key("background"));
    assert!(!styles.base.contains_key("left"));
}

#[test]
fn cancel_batch_leaves_no_trace() {
    let mut session = session();
    let section = session
        .add_component(ComponentKind::Section, "Hero", None, None)
        .unwrap();
    let levels_before = session.history().undo_levels();

    session.begin_batch(None).unwrap();
    let temp = session
        .add_component(ComponentKind::Text, "Temp", Some(&section), None)
        .unwrap();
    session
        .update_props(&temp, content_patch("scratch"))
        .unwrap();
    session.cancel_batch().unwrap();

    assert!(!session.tree().contains(&temp));
    assert_eq!(session.history().undo_levels(), levels_before);
}

#[test]
fn new_edit_truncates_redo_branch() {
    let mut session = session();
    let heading = session
        .add_component(ComponentKind::Heading, "Title", None, None)
        .unwrap();
    session.update_props(&heading, content_patch("One")).unwrap();
    session.update_props(&heading, content_patch("Two")).unwrap();

    session.undo().unwrap();
    assert!(session.history().can_redo());

    session
        .update_props(&heading, content_patch("Three"))
        .unwrap();
    assert!(!session.history().can_redo());
    assert!(!session.redo().unwrap());
    assert_eq!(content_of(&session, &heading), Some("Three".to_string()));
}

#[test]
fn undo_past_the_beginning_is_a_noop() {
    let mut session = session();
    let id = session
        .add_component(ComponentKind::Text, "Copy", None, None)
        .unwrap();

    while session.undo().unwrap() {}
    assert!(!session.tree().contains(&id));
    assert!(!session.undo().unwrap());
}

#[test]
fn history_is_bounded() {
    let mut tree = ComponentTree::new();
    tree.insert(
        Component::new("head-1", ComponentKind::Heading, "Title"),
        None,
        None,
    )
    .unwrap();

    let mut stack = UndoStack::with_max_levels(100);
    for i in 0..150u64 {
        let mutation = Mutation::UpdateProps {
            node_id: "head-1".to_string(),
            patch: content_patch(&format!("v{i}")),
        };
        // Spread timestamps so the merge window never coalesces
        stack
            .apply_at(&mutation, &mut tree, None, i * 10_000)
            .unwrap();
    }

    assert_eq!(stack.undo_levels(), 100);

    let mut undone = 0;
    while stack.undo(&mut tree).unwrap() {
        undone += 1;
    }
    assert_eq!(undone, 100);
}

#[test]
fn per_page_trees_share_one_history() {
    let mut session = session();
    let heading = session
        .add_component(ComponentKind::Heading, "Title", None, None)
        .unwrap();

    // Add a second page and switch to it
    {
        let project = session.document.project_mut();
        let page_id = format!("{}-about", project.id);
        project
            .pages
            .push(pagecraft_document::Page::new(page_id, "About", "about"));
    }
    session.set_active_page(1).unwrap();
    assert!(session.tree().is_empty());

    // The first page's component is untouched by the switch
    session.set_active_page(0).unwrap();
    assert!(session.tree().contains(&heading));
}

#[test]
fn failed_cross_page_undo_preserves_history() {
    let mut session = session();
    let heading = session
        .add_component(ComponentKind::Heading, "Title", None, None)
        .unwrap();

    {
        let project = session.document.project_mut();
        let page_id = format!("{}-about", project.id);
        project
            .pages
            .push(pagecraft_document::Page::new(page_id, "About", "about"));
    }
    session.set_active_page(1).unwrap();

    // The undo targets a component on page 0, so it fails here, but the
    // history entry must survive the failure
    assert!(session.undo().is_err());
    assert_eq!(session.history().undo_levels(), 1);
    assert_eq!(session.history().redo_levels(), 0);

    session.set_active_page(0).unwrap();
    assert!(session.undo().unwrap());
    assert!(!session.tree().contains(&heading));
}

#[test]
fn switching_pages_clears_selection() {
    let mut session = session();
    let heading = session
        .add_component(ComponentKind::Heading, "Title", None, None)
        .unwrap();
    session.select(&heading).unwrap();

    {
        let project = session.document.project_mut();
        let page_id = format!("{}-about", project.id);
        project
            .pages
            .push(pagecraft_document::Page::new(page_id, "About", "about"));
    }
    session.set_active_page(1).unwrap();
    assert!(session.selection().is_empty());
}
