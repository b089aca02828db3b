// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Raw design structures mirroring the on-disk JSON layout.
//!
//! Everything here is plain data: no identity state is touched while a raw
//! design is decoded. Required fields are modelled as `Option` so the loader
//! can report precise `missing property` errors instead of opaque decode
//! failures.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Raw reference value: a resolved numeric id or a string.
///
/// Strings holding decimal numbers denote ids; any other string is a name
/// that resolves to one allocated id for the duration of a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawReference {
    /// Already-numeric id.
    Id(u64),
    /// Numeric string or name.
    Name(String),
}

impl From<u64> for RawReference {
    fn from(value: u64) -> Self {
        Self::Id(value)
    }
}

impl core::fmt::Display for RawReference {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Raw form of one object snapshot.
///
/// Children are not stored; the loader derives them from the `parent`
/// references of the snapshots sharing a frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSnapshot {
    /// Object id reference. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RawReference>,
    /// Snapshot id reference. Required and unique across the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<RawReference>,
    /// Object type name. Required.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Structural type spelling; must match the object type when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structural_type: Option<String>,
    /// Edge origin reference; required for edge-structured snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<RawReference>,
    /// Edge target reference; required for edge-structured snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<RawReference>,
    /// Parent object reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<RawReference>,
    /// Attribute values in any accepted variant encoding.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, JsonValue>,
}

/// Raw form of one frame: its id and the snapshot ids it contains.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFrame {
    /// Frame id reference. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RawReference>,
    /// Snapshot id references, in frame insertion order.
    #[serde(default)]
    pub snapshots: Vec<RawReference>,
}

/// Raw form of the design's history state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDesignState {
    /// Current frame reference, when history is non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_frame: Option<RawReference>,
    /// Undoable frames, oldest first.
    #[serde(default)]
    pub undoable_frames: Vec<RawReference>,
    /// Redoable frames, nearest first.
    #[serde(default)]
    pub redoable_frames: Vec<RawReference>,
}

/// Raw form of a whole stored design.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDesign {
    /// Mandatory format version; the reader rejects files without it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_format_version: Option<String>,
    /// Name of the metamodel the design was created for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metamodel: Option<String>,
    /// Every stored snapshot.
    #[serde(default)]
    pub snapshots: Vec<RawSnapshot>,
    /// Every stored frame.
    #[serde(default)]
    pub frames: Vec<RawFrame>,
    /// History state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<RawDesignState>,
    /// Named frames.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub named_frames: IndexMap<String, RawReference>,
}
