//! Component and action registries.
//!
//! The registry is a constructor-injected service passed through the editor
//! session: deserialization consults it to decide whether a serialized
//! `type` is known (unknown kinds degrade to a placeholder), and prop
//! actions are resolved against its named action table rather than being
//! deserialized as code.

use std::collections::HashMap;

use crate::component::ComponentKind;

/// A named behavior that `PropValue::Action` ids resolve against
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDescriptor {
    pub id: String,
    pub description: String,
}

/// Registry of known component kinds and named actions
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    kinds: HashMap<String, ComponentKind>,
    actions: HashMap<String, ActionDescriptor>,
}

impl ComponentRegistry {
    /// Registry with every built-in kind and no actions
    pub fn new() -> Self {
        let mut kinds = HashMap::new();
        for kind in ComponentKind::ALL {
            kinds.insert(kind.as_str().to_string(), *kind);
        }
        Self {
            kinds,
            actions: HashMap::new(),
        }
    }

    pub fn is_known(&self, type_name: &str) -> bool {
        self.kinds.contains_key(type_name)
    }

    pub fn kind_for(&self, type_name: &str) -> Option<ComponentKind> {
        self.kinds.get(type_name).copied()
    }

    /// Register a named action handler id
    pub fn register_action(&mut self, id: impl Into<String>, description: impl Into<String>) {
        let id = id.into();
        self.actions.insert(
            id.clone(),
            ActionDescriptor {
                id,
                description: description.into(),
            },
        );
    }

    pub fn has_action(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    pub fn action(&self, id: &str) -> Option<&ActionDescriptor> {
        self.actions.get(id)
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
