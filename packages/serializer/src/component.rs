//! Component (de)serialization between the live tree and the storage-safe
//! wire shape.
//!
//! The wire shape carries both nested `children` and each node's own
//! `parentId`/`order`, so either representation can be rebuilt from it.
//! Deserialization is forgiving: unknown component types degrade to a
//! placeholder container instead of failing the whole load, and the
//! hierarchy rebuild promotes orphans to root rather than dropping them.

use serde::{Deserialize, Serialize};
use tracing::warn;

use pagecraft_document::{
    Component, ComponentKind, ComponentRegistry, ComponentTree, Metadata, Props,
    StyleLayers, TreeFix, ORIGINAL_TYPE_KEY, PLACEHOLDER_KEY,
};
use pagecraft_validator::ValidationReport;

use crate::error::SerializeError;

/// Storage-safe component shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedComponent {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub props: Props,

    #[serde(default, skip_serializing_if = "StyleLayers::is_empty")]
    pub styles: StyleLayers,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SerializedComponent>,

    #[serde(default)]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub order: i32,

    #[serde(default)]
    pub is_hidden: bool,

    #[serde(default)]
    pub is_locked: bool,

    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

fn to_serialized(component: &Component) -> SerializedComponent {
    SerializedComponent {
        id: component.id.clone(),
        kind: component.kind.as_str().to_string(),
        name: component.name.clone(),
        props: component.props.clone(),
        styles: component.styles.clone(),
        children: Vec::new(),
        parent_id: component.parent_id.clone(),
        order: component.order,
        is_hidden: component.is_hidden,
        is_locked: component.is_locked,
        metadata: component.metadata.clone(),
    }
}

/// Serialize the subtree rooted at `id` into the nested wire shape
pub fn serialize_component(
    tree: &ComponentTree,
    id: &str,
) -> Result<SerializedComponent, SerializeError> {
    let component = tree
        .get(id)
        .ok_or_else(|| SerializeError::ComponentNotFound(id.to_string()))?;

    let mut serialized = to_serialized(component);
    for child_id in tree.children_of(id) {
        serialized.children.push(serialize_component(tree, &child_id)?);
    }
    Ok(serialized)
}

/// Serialize a whole tree as a flat list (preorder, roots first)
pub fn serialize_flat(tree: &ComponentTree) -> Vec<SerializedComponent> {
    let mut out = Vec::with_capacity(tree.len());
    for root in tree.root_ids() {
        for id in tree.descendant_ids(&root) {
            if let Some(component) = tree.get(&id) {
                out.push(to_serialized(component));
            }
        }
    }
    out
}

/// Convert one serialized node into a live component.
///
/// Unknown types produce a placeholder container flagged in metadata, with
/// the original type retained so nothing is lost on a later save.
pub fn deserialize_component(
    serialized: &SerializedComponent,
    registry: &ComponentRegistry,
) -> Component {
    let (kind, metadata) = match registry.kind_for(&serialized.kind) {
        Some(kind) => (kind, serialized.metadata.clone()),
        None => {
            warn!(
                component_id = %serialized.id,
                kind = %serialized.kind,
                "Unknown component type, substituting placeholder"
            );
            let mut metadata = serialized.metadata.clone();
            metadata.insert(PLACEHOLDER_KEY.to_string(), serde_json::Value::Bool(true));
            metadata.insert(
                ORIGINAL_TYPE_KEY.to_string(),
                serde_json::Value::String(serialized.kind.clone()),
            );
            (ComponentKind::Container, metadata)
        }
    };

    Component {
        id: serialized.id.clone(),
        kind,
        name: serialized.name.clone(),
        props: serialized.props.clone(),
        styles: serialized.styles.clone(),
        parent_id: serialized.parent_id.clone(),
        order: serialized.order,
        is_hidden: serialized.is_hidden,
        is_locked: serialized.is_locked,
        metadata,
    }
}

/// Flatten a nested serialized subtree into preorder, wiring `parentId`
pub fn flatten_serialized(serialized: &SerializedComponent) -> Vec<SerializedComponent> {
    fn walk(
        node: &SerializedComponent,
        parent_id: Option<&str>,
        out: &mut Vec<SerializedComponent>,
    ) {
        let mut flat = node.clone();
        flat.children = Vec::new();
        if flat.parent_id.is_none() {
            flat.parent_id = parent_id.map(|s| s.to_string());
        }
        let id = flat.id.clone();
        out.push(flat);
        for child in &node.children {
            walk(child, Some(&id), out);
        }
    }

    let mut out = Vec::new();
    walk(serialized, None, &mut out);
    out
}

/// Rebuild a component tree from a flat serialized list.
///
/// Groups nodes by `parentId` and sorts each group by `order`; orphans are
/// promoted to root and reported as warnings, missing orders are assigned
/// sequentially.
pub fn build_component_hierarchy(
    flat: &[SerializedComponent],
    registry: &ComponentRegistry,
) -> (ComponentTree, ValidationReport) {
    let components: Vec<Component> = flat
        .iter()
        .flat_map(flatten_serialized)
        .map(|sc| deserialize_component(&sc, registry))
        .collect();

    let report = pagecraft_validator::validate_flat_components(&components);
    let (tree, fixes) = ComponentTree::from_components(components);

    for fix in &fixes {
        match fix {
            TreeFix::OrphanPromoted { id, missing_parent } => {
                warn!(component_id = %id, missing_parent = %missing_parent, "Promoted orphan to root");
            }
            TreeFix::DuplicateIdDropped { id } => {
                warn!(component_id = %id, "Dropped component with duplicate id");
            }
            TreeFix::OrderResequenced { .. } => {}
        }
    }

    (tree, report)
}
