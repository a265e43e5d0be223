//! Influence type identifiers and the name registry.
//!
//! Built-in types and user-registered types share one identifier space,
//! [`LayerId`]. [`InfluenceType`] converts into it, so every engine
//! operation accepts either.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of an influence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Built-in influence types, pre-registered by every engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum InfluenceType {
    /// Where the tracked target has been seen
    Player = 0,
    /// Predicted target location after sight was lost
    Search = 1,
    /// Heard disturbances
    Noise = 2,
    /// Friendly presence, refreshed by the caller every frame
    Ally = 3,
}

impl InfluenceType {
    /// All built-in types in registration order.
    pub const ALL: [InfluenceType; 4] = [
        InfluenceType::Player,
        InfluenceType::Search,
        InfluenceType::Noise,
        InfluenceType::Ally,
    ];

    /// First identifier handed out to user-defined types.
    pub const USER_DEFINED_START: LayerId = LayerId(Self::ALL.len() as u32);

    pub fn id(self) -> LayerId {
        LayerId(self as u32)
    }

    pub fn name(self) -> &'static str {
        match self {
            InfluenceType::Player => "Player",
            InfluenceType::Search => "Search",
            InfluenceType::Noise => "Noise",
            InfluenceType::Ally => "Ally",
        }
    }

    /// Static layers persist, propagate, and decay; dynamic ones are caller-managed.
    pub fn is_static(self) -> bool {
        !matches!(self, InfluenceType::Ally)
    }
}

impl From<InfluenceType> for LayerId {
    fn from(kind: InfluenceType) -> Self {
        kind.id()
    }
}

impl fmt::Display for InfluenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registration record for one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: String,
    pub is_static: bool,
}

/// Allocates identifiers and remembers their names.
///
/// Entries are never removed; identifiers are stable for the registry's lifetime.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    next_user_id: u32,
    types: BTreeMap<LayerId, TypeInfo>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry with every built-in type already registered.
    pub fn new() -> Self {
        let types = InfluenceType::ALL
            .iter()
            .map(|kind| {
                (
                    kind.id(),
                    TypeInfo {
                        name: kind.name().to_string(),
                        is_static: kind.is_static(),
                    },
                )
            })
            .collect();

        Self {
            next_user_id: InfluenceType::USER_DEFINED_START.0,
            types,
        }
    }

    /// Register a new type and return its identifier
    pub fn register(&mut self, name: impl Into<String>, is_static: bool) -> LayerId {
        let id = LayerId(self.next_user_id);
        self.next_user_id += 1;
        self.types.insert(
            id,
            TypeInfo {
                name: name.into(),
                is_static,
            },
        );
        id
    }

    pub fn get(&self, id: LayerId) -> Option<&TypeInfo> {
        self.types.get(&id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.types.contains_key(&id)
    }

    pub fn name(&self, id: LayerId) -> Option<&str> {
        self.get(id).map(|info| info.name.as_str())
    }

    /// All registered types ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = (LayerId, &TypeInfo)> {
        self.types.iter().map(|(id, info)| (*id, info))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
