//! Action registry: user-defined actions plus the implicit fallback.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::{ModelError, validate_name};
use super::ids::ActionId;

/// Color painted for a hand with no decision.
pub const EMPTY_HAND_COLOR: &str = "#111111";

/// A `#rrggbb` color, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}', expected #rgb or #rrggbb")]
pub struct ParseColorError(pub String);

impl Color {
    /// For literals already in normalized `#rrggbb` form.
    pub(crate) fn from_hex_unchecked(hex: &str) -> Color {
        Color(hex.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Accepts `#rgb` (expanded) and `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let expanded = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => hex.to_string(),
            _ => return Err(err()),
        };
        Ok(Color(format!("#{}", expanded.to_ascii_lowercase())))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A named, colored decision outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    pub name: String,
    pub color: Color,
}

/// Partial update for an action.
///
/// There is no `id` field: an action's identity is never reassigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionPatch {
    pub name: Option<String>,
    pub color: Option<Color>,
}

impl ActionPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            color: None,
        }
    }

    pub fn color(color: Color) -> Self {
        Self {
            name: None,
            color: Some(color),
        }
    }
}

/// Ordered action list. The fallback action is always at position 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRegistry {
    actions: Vec<Action>,
}

impl ActionRegistry {
    /// A registry holding only the fallback action.
    pub fn new(fallback_name: impl Into<String>, fallback_color: Color) -> Self {
        Self {
            actions: vec![Action {
                id: ActionId::FALLBACK,
                name: fallback_name.into(),
                color: fallback_color,
            }],
        }
    }

    /// Rebuilds a registry from a stored list.
    ///
    /// The fallback is moved to the front if present and re-created from
    /// `template` if missing; duplicate ids keep their first occurrence.
    pub fn from_actions(actions: Vec<Action>, template: &ActionRegistry) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut actions: Vec<Action> = actions
            .into_iter()
            .filter(|action| seen.insert(action.id))
            .collect();
        let fallback = match actions.iter().position(|a| a.id.is_fallback()) {
            Some(index) => actions.remove(index),
            None => template.fallback().clone(),
        };
        actions.insert(0, fallback);
        Self { actions }
    }

    pub fn fallback(&self) -> &Action {
        &self.actions[0]
    }

    /// Appends a new action and returns its id.
    pub fn add(&mut self, id: ActionId, name: impl Into<String>, color: Color) -> ActionId {
        self.actions.push(Action {
            id,
            name: name.into(),
            color,
        });
        id
    }

    /// Merges `patch` into the action. Validates before touching anything.
    pub fn update(&mut self, id: ActionId, patch: ActionPatch) -> Result<(), ModelError> {
        let name = patch.name.as_deref().map(validate_name).transpose()?;
        let action = self
            .actions
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ModelError::action_not_found(id))?;
        if let Some(name) = name {
            action.name = name;
        }
        if let Some(color) = patch.color {
            action.color = color;
        }
        Ok(())
    }

    /// Removes the action from the list only; callers purge references.
    pub fn remove(&mut self, id: ActionId) -> Result<Action, ModelError> {
        if id.is_fallback() {
            return Err(ModelError::FallbackAction);
        }
        let index = self
            .actions
            .iter()
            .position(|a| a.id == id)
            .ok_or(ModelError::action_not_found(id))?;
        Ok(self.actions.remove(index))
    }

    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    pub fn contains(&self, id: ActionId) -> bool {
        self.get(id).is_some()
    }

    /// Case-insensitive lookup by display name (first match).
    pub fn find_by_name(&self, name: &str) -> Option<&Action> {
        let name = name.trim();
        self.actions
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Color for rendering an entry; dangling ids render as an empty hand.
    pub fn color_of(&self, id: ActionId) -> &str {
        self.get(id)
            .map(|a| a.color.as_str())
            .unwrap_or(EMPTY_HAND_COLOR)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Deep copy of the list, for snapshots and persistence.
    pub fn to_vec(&self) -> Vec<Action> {
        self.actions.clone()
    }
}
