//! # Component Model
//!
//! A Component is a single node in the document tree: a heading, a button,
//! a container holding other components. Components store their own
//! `parent_id` and sibling `order`; the tree itself is an id-indexed map
//! (see [`crate::tree::ComponentTree`]) and nested views are derived on
//! demand, never stored.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::styles::StyleLayers;

/// Sentinel prefix for date values embedded in JSON props
pub const DATE_SENTINEL: &str = "__DATE__:";

/// Sentinel prefix for named action references embedded in JSON props
pub const ACTION_SENTINEL: &str = "__ACTION__:";

/// Legacy sentinel emitted by older exports; decoded as an action id,
/// never evaluated as code.
pub const LEGACY_FUNCTION_SENTINEL: &str = "__FUNCTION__:";

/// Closed set of component kinds understood by the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    Container,
    Section,
    Grid,
    Column,
    Heading,
    Text,
    Button,
    Image,
    Link,
    Divider,
    Form,
    Input,
    Textarea,
    Select,
    Checkbox,
    ProductList,
    Video,
    Embed,
}

/// Whether (and which) children a component kind accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildPolicy {
    /// Leaf kind, no children allowed
    None,
    /// Any child kind allowed
    Any,
    /// Only the listed kinds allowed
    Only(&'static [ComponentKind]),
}

impl ChildPolicy {
    pub fn accepts(&self, child: ComponentKind) -> bool {
        match self {
            ChildPolicy::None => false,
            ChildPolicy::Any => true,
            ChildPolicy::Only(kinds) => kinds.contains(&child),
        }
    }
}

const FORM_CONTROLS: &[ComponentKind] = &[
    ComponentKind::Input,
    ComponentKind::Textarea,
    ComponentKind::Select,
    ComponentKind::Checkbox,
    ComponentKind::Button,
];

impl ComponentKind {
    pub const ALL: &'static [ComponentKind] = &[
        ComponentKind::Container,
        ComponentKind::Section,
        ComponentKind::Grid,
        ComponentKind::Column,
        ComponentKind::Heading,
        ComponentKind::Text,
        ComponentKind::Button,
        ComponentKind::Image,
        ComponentKind::Link,
        ComponentKind::Divider,
        ComponentKind::Form,
        ComponentKind::Input,
        ComponentKind::Textarea,
        ComponentKind::Select,
        ComponentKind::Checkbox,
        ComponentKind::ProductList,
        ComponentKind::Video,
        ComponentKind::Embed,
    ];

    /// Serialized name of this kind (matches the wire `type` field)
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Container => "container",
            ComponentKind::Section => "section",
            ComponentKind::Grid => "grid",
            ComponentKind::Column => "column",
            ComponentKind::Heading => "heading",
            ComponentKind::Text => "text",
            ComponentKind::Button => "button",
            ComponentKind::Image => "image",
            ComponentKind::Link => "link",
            ComponentKind::Divider => "divider",
            ComponentKind::Form => "form",
            ComponentKind::Input => "input",
            ComponentKind::Textarea => "textarea",
            ComponentKind::Select => "select",
            ComponentKind::Checkbox => "checkbox",
            ComponentKind::ProductList => "product-list",
            ComponentKind::Video => "video",
            ComponentKind::Embed => "embed",
        }
    }

    /// Child-acceptance rule for this kind
    pub fn child_policy(&self) -> ChildPolicy {
        match self {
            ComponentKind::Container
            | ComponentKind::Section
            | ComponentKind::Grid
            | ComponentKind::Column => ChildPolicy::Any,
            ComponentKind::Form => ChildPolicy::Only(FORM_CONTROLS),
            _ => ChildPolicy::None,
        }
    }

    pub fn accepts_children(&self) -> bool {
        !matches!(self.child_policy(), ChildPolicy::None)
    }

    pub fn is_form_control(&self) -> bool {
        FORM_CONTROLS.contains(self)
    }

    /// Props that must be present (and non-empty) for a valid component
    pub fn required_props(&self) -> &'static [&'static str] {
        match self {
            ComponentKind::Heading | ComponentKind::Text => &["content"],
            ComponentKind::Button => &["label"],
            ComponentKind::Image | ComponentKind::Video => &["src"],
            ComponentKind::Link => &["href"],
            ComponentKind::Input
            | ComponentKind::Textarea
            | ComponentKind::Select
            | ComponentKind::Checkbox => &["name"],
            ComponentKind::Embed => &["code"],
            _ => &[],
        }
    }

    /// Starting props for a freshly created component
    pub fn default_props(&self) -> Props {
        let mut props = Props::new();
        match self {
            ComponentKind::Heading => {
                props.insert("content".to_string(), PropValue::Text("Heading".to_string()));
                props.insert("level".to_string(), PropValue::Number(2.0));
            }
            ComponentKind::Text => {
                props.insert("content".to_string(), PropValue::Text("Text".to_string()));
            }
            ComponentKind::Button => {
                props.insert("label".to_string(), PropValue::Text("Button".to_string()));
            }
            ComponentKind::Image => {
                props.insert("src".to_string(), PropValue::Text(String::new()));
                props.insert("alt".to_string(), PropValue::Text(String::new()));
            }
            ComponentKind::Link => {
                props.insert("href".to_string(), PropValue::Text(String::new()));
                props.insert("label".to_string(), PropValue::Text("Link".to_string()));
            }
            ComponentKind::Form => {
                props.insert("action".to_string(), PropValue::Text(String::new()));
                props.insert("method".to_string(), PropValue::Text("post".to_string()));
            }
            ComponentKind::Input => {
                props.insert("name".to_string(), PropValue::Text("field".to_string()));
                props.insert("input-type".to_string(), PropValue::Text("text".to_string()));
            }
            ComponentKind::ProductList => {
                props.insert("limit".to_string(), PropValue::Number(12.0));
            }
            _ => {}
        }
        props
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single prop value
///
/// Serializes to plain JSON: text/number/bool/list/map map directly, dates
/// and action references are encoded as sentinel-prefixed strings so they
/// round-trip through a plain JSON document.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Text(String),
    Number(f64),
    Bool(bool),
    List(Vec<PropValue>),
    Map(BTreeMap<String, PropValue>),
    Date(DateTime<Utc>),
    /// Named behavior id, resolved against an action registry. Serialized
    /// actions are identifiers only; no code is ever deserialized.
    Action(String),
}

impl PropValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Convert a plain JSON value into a prop value, decoding sentinels
    pub fn from_json(value: serde_json::Value) -> Result<Self, String> {
        match value {
            serde_json::Value::String(s) => {
                if let Some(raw) = s.strip_prefix(DATE_SENTINEL) {
                    match DateTime::parse_from_rfc3339(raw) {
                        Ok(dt) => Ok(PropValue::Date(dt.with_timezone(&Utc))),
                        Err(_) => Err(format!("invalid date value: {raw}")),
                    }
                } else if let Some(id) = s.strip_prefix(ACTION_SENTINEL) {
                    Ok(PropValue::Action(id.to_string()))
                } else if let Some(id) = s.strip_prefix(LEGACY_FUNCTION_SENTINEL) {
                    // Legacy exports stored serialized behaviors; they are
                    // mapped to an action id and never executed.
                    Ok(PropValue::Action(id.to_string()))
                } else {
                    Ok(PropValue::Text(s))
                }
            }
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(PropValue::Number)
                .ok_or_else(|| "number out of range".to_string()),
            serde_json::Value::Bool(b) => Ok(PropValue::Bool(b)),
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(PropValue::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(PropValue::List),
            serde_json::Value::Object(entries) => entries
                .into_iter()
                .map(|(k, v)| PropValue::from_json(v).map(|v| (k, v)))
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(PropValue::Map),
            serde_json::Value::Null => Err("null is not a valid prop value".to_string()),
        }
    }

    /// Convert to a plain JSON value, encoding sentinels
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            PropValue::Text(s) => serde_json::Value::String(s.clone()),
            PropValue::Number(n) => serde_json::json!(n),
            PropValue::Bool(b) => serde_json::Value::Bool(*b),
            PropValue::List(items) => {
                serde_json::Value::Array(items.iter().map(PropValue::to_json).collect())
            }
            PropValue::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            PropValue::Date(dt) => {
                serde_json::Value::String(format!("{}{}", DATE_SENTINEL, dt.to_rfc3339()))
            }
            PropValue::Action(id) => {
                serde_json::Value::String(format!("{}{}", ACTION_SENTINEL, id))
            }
        }
    }
}

impl Serialize for PropValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PropValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        PropValue::from_json(value).map_err(D::Error::custom)
    }
}

/// Ordered key→value prop map
pub type Props = BTreeMap<String, PropValue>;

/// A props patch: `Some(value)` sets a key, `None` deletes it
pub type PropsPatch = BTreeMap<String, Option<PropValue>>;

/// Free-form metadata bag (author, tags, placeholder markers)
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Metadata key marking a placeholder substituted for an unknown kind
pub const PLACEHOLDER_KEY: &str = "placeholder";

/// Metadata key retaining the original type of a placeholder component
pub const ORIGINAL_TYPE_KEY: &str = "originalType";

/// A single node in the document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Opaque unique id, stable for the node's lifetime
    pub id: String,

    /// Kind tag, determines prop schema and child acceptance
    pub kind: ComponentKind,

    /// Human-readable label, not used for identity
    pub name: String,

    #[serde(default)]
    pub props: Props,

    #[serde(default)]
    pub styles: StyleLayers,

    /// Containing component, or None for a root-level node
    pub parent_id: Option<String>,

    /// Sibling rank; siblings iterate in ascending order
    pub order: i32,

    #[serde(default)]
    pub is_hidden: bool,

    #[serde(default)]
    pub is_locked: bool,

    #[serde(default)]
    pub metadata: Metadata,
}

impl Component {
    /// Create a component with the kind's default props
    pub fn new(id: impl Into<String>, kind: ComponentKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            props: kind.default_props(),
            styles: StyleLayers::default(),
            parent_id: None,
            order: 0,
            is_hidden: false,
            is_locked: false,
            metadata: Metadata::new(),
        }
    }

    /// Whether this component was substituted for an unrecognized kind
    pub fn is_placeholder(&self) -> bool {
        self.metadata
            .get(PLACEHOLDER_KEY)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Apply a shallow props patch, returning the inverse patch
    pub fn apply_props_patch(&mut self, patch: &PropsPatch) -> PropsPatch {
        let mut inverse = PropsPatch::new();
        for (key, value) in patch {
            inverse.insert(key.clone(), self.props.get(key).cloned());
            match value {
                Some(v) => {
                    self.props.insert(key.clone(), v.clone());
                }
                None => {
                    self.props.remove(key);
                }
            }
        }
        inverse
    }
}
