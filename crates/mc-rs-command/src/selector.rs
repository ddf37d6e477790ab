//! Entity identity markers and the target selectors derived from them.
//!
//! The server hands out no durable entity handle, so an entity is tagged at
//! summon time with a generated [`Marker`] embedded in its `CustomName`.
//! Every later command that addresses that entity re-derives a selector
//! here; nothing else in the workspace builds marker selectors by hand.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Coord;

/// Opaque identifier embedded in an entity's display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marker(String);

impl Marker {
    /// Generate a fresh random (version 4) UUID marker.
    pub fn generate() -> Self {
        let mut b: [u8; 16] = rand::random();
        b[6] = (b[6] & 0x0f) | 0x40;
        b[8] = (b[8] & 0x3f) | 0x80;
        Self(format!(
            "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            b[0], b[1], b[2], b[3],
            b[4], b[5],
            b[6], b[7],
            b[8], b[9],
            b[10], b[11], b[12], b[13], b[14], b[15],
        ))
    }

    /// Rebuild a marker from persisted state.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape double quotes for embedding inside a JSON string literal.
pub fn escape_quotes(s: &str) -> String {
    s.replace('"', "\\\"")
}

/// A plain JSON text component: `{"text":"..."}`.
pub fn text_component(s: &str) -> String {
    format!("{{\"text\":\"{}\"}}", escape_quotes(s))
}

/// The SNBT `CustomName` entry used both at summon time and for matching.
pub(crate) fn custom_name_nbt(marker: &Marker) -> String {
    format!("CustomName:'{}'", text_component(marker.as_str()))
}

/// Entities whose display name is exactly `marker`.
pub fn selector_by_marker(marker: &Marker) -> String {
    format!("@e[nbt={{{}}}]", custom_name_nbt(marker))
}

/// Entities of `entity_type` whose display name is exactly `marker`.
pub fn selector_by_marker_of_type(entity_type: &str, marker: &Marker) -> String {
    format!("@e[type={entity_type},nbt={{{}}}]", custom_name_nbt(marker))
}

/// Entities carrying the scoreboard tag `tag`.
///
/// Cheaper and less fragile than marker matching, which depends on the
/// exact text-component serialization used at summon time.
pub fn selector_by_tag(tag: &str) -> String {
    format!("@e[tag={tag}]")
}

/// Entities of `entity_type` within one block of `at`.
pub fn selector_at(entity_type: &str, at: Coord) -> String {
    format!(
        "@e[type={entity_type},x={},y={},z={},distance=..1]",
        at.x, at.y, at.z
    )
}

// ===========================================================================
// Tests
// ===========================================================================
