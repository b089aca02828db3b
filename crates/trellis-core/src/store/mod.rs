// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persistent store: the raw JSON design format.
//!
//! The on-disk layout is a single JSON document:
//!
//! ```json
//! {
//!   "store_format_version": "0.0.4",
//!   "metamodel": "flows",
//!   "snapshots": [
//!     {"id": 1, "snapshot_id": 2, "type": "Stock",
//!      "structural_type": "node", "attributes": {...}}
//!   ],
//!   "frames": [{"id": 100, "snapshots": [2]}],
//!   "state": {"current_frame": 100, "undoable_frames": [], "redoable_frames": []},
//!   "named_frames": {"baseline": 100}
//! }
//! ```
//!
//! Reading happens in two stages: the [`DesignReader`] decodes bytes into a
//! [`RawDesign`] without touching any identity state, then the
//! [`DesignLoader`] funnels every raw reference through the identity manager
//! and rebuilds snapshots, frames, and the design state, validating each
//! frame on the way in. The [`DesignWriter`] is the inverse and always emits
//! the current format version with dictionary-encoded attribute values.
//!
//! Reference values in the raw form may be JSON integers (resolved ids),
//! numeric strings, or arbitrary strings acting as names that resolve to the
//! same allocated id throughout one load.

mod loader;
mod raw;
mod reader;
mod writer;

pub use loader::DesignLoader;
pub use raw::{RawDesign, RawDesignState, RawFrame, RawReference, RawSnapshot};
pub use reader::DesignReader;
pub use writer::DesignWriter;

use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::checker::FrameValidationError;
use crate::design::Design;
use crate::ident::FrameId;
use crate::identity::IdentityError;
use crate::metamodel::{Metamodel, StructuralType};

/// Format version written by this implementation.
pub const CURRENT_FORMAT_VERSION: &str = "0.0.4";

/// Parsed `store_format_version` value (`major.minor[.patch]`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct StoreFormatVersion {
    /// Major version component.
    pub major: u32,
    /// Minor version component.
    pub minor: u32,
    /// Patch version component; `0` when omitted.
    pub patch: u32,
}

impl StoreFormatVersion {
    /// Returns `true` when this implementation can load the version.
    ///
    /// Versions `0.0.2` through `0.0.4` share the current raw layout; there
    /// is no older layout left to support.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        self.major == 0 && self.minor == 0 && self.patch >= 2 && self.patch <= 4
    }
}

impl core::fmt::Display for StoreFormatVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for StoreFormatVersion {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let mut component = |required: bool| -> Result<Option<u32>, StoreError> {
            match parts.next() {
                Some(part) => part
                    .parse::<u32>()
                    .map(Some)
                    .map_err(|_| StoreError::UnsupportedFormatVersion(s.to_owned())),
                None if required => Err(StoreError::UnsupportedFormatVersion(s.to_owned())),
                None => Ok(None),
            }
        };
        let major = component(true)?.unwrap_or(0);
        let minor = component(true)?.unwrap_or(0);
        let patch = component(false)?.unwrap_or(0);
        if parts.next().is_some() {
            return Err(StoreError::UnsupportedFormatVersion(s.to_owned()));
        }
        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

/// Error raised while reading, loading, or writing a stored design.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file does not exist.
    #[error("store is missing")]
    StoreMissing,
    /// The store file exists but cannot be opened or read.
    #[error("cannot open store {path:?}: {source}")]
    CannotOpenStore {
        /// Path of the store file.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The store file cannot be written.
    #[error("unable to write store {path:?}: {source}")]
    UnableToWrite {
        /// Path of the store file.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The data is not a JSON document of the expected shape.
    #[error("store data is corrupted")]
    DataCorrupted,
    /// The `store_format_version` value is unknown to this implementation.
    #[error("unsupported store format version: {0:?}")]
    UnsupportedFormatVersion(String),
    /// A required property is absent.
    #[error("missing property {name:?} at {path}")]
    MissingProperty {
        /// Property name.
        name: String,
        /// JSON path of the enclosing value.
        path: String,
    },
    /// A property holds a value of the wrong type.
    #[error("type mismatch at {path}")]
    TypeMismatch {
        /// JSON path of the offending value.
        path: String,
    },
    /// A snapshot names an object type absent from the metamodel.
    #[error("unknown object type: {0:?}")]
    UnknownObjectType(String),
    /// A snapshot's structural type is not a recognized spelling.
    #[error("unknown structural type: {0:?}")]
    UnknownStructuralType(String),
    /// A snapshot's structural type disagrees with its object type.
    #[error("structural type mismatch: expected {expected}, found {actual}")]
    StructuralTypeMismatch {
        /// Role declared by the object type.
        expected: StructuralType,
        /// Role spelled in the file.
        actual: StructuralType,
    },
    /// Two snapshots share a snapshot id.
    #[error("duplicate snapshot: {0}")]
    DuplicateSnapshot(u64),
    /// Two frames share a frame id.
    #[error("duplicate frame: {0}")]
    DuplicateFrame(FrameId),
    /// A frame lists a snapshot id that no snapshot defines.
    #[error("unknown snapshot reference: {0}")]
    UnknownSnapshotReference(u64),
    /// The design state references a frame the file does not define.
    #[error("unknown frame reference: {0}")]
    UnknownFrameReference(FrameId),
    /// A frame id appears more than once across the history lists.
    #[error("duplicate history entry: {0}")]
    DuplicateHistoryEntry(FrameId),
    /// A named frame also appears in history.
    #[error("frame {0} is both named and in history")]
    HistoryNameOverlap(FrameId),
    /// The store was written for a different metamodel.
    #[error("metamodel mismatch: store was created for {0:?}")]
    MetamodelMismatch(String),
    /// A loaded frame failed constraint validation.
    #[error("frame {0} failed validation: {1}")]
    FrameValidationFailed(FrameId, FrameValidationError),
    /// Identity bookkeeping rejected a reference.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl Design {
    /// Reads and loads a design from raw JSON bytes.
    ///
    /// # Errors
    /// Any [`StoreError`] from reading or loading.
    pub fn load_from_bytes(metamodel: Metamodel, data: &[u8]) -> Result<Self, StoreError> {
        let raw = DesignReader::read_bytes(data)?;
        let mut design = Self::new(metamodel);
        DesignLoader::new(&mut design).load(&raw)?;
        Ok(design)
    }

    /// Reads and loads a design from a store file.
    ///
    /// # Errors
    /// [`StoreError::StoreMissing`] when the file does not exist,
    /// [`StoreError::CannotOpenStore`] on other I/O failures, and any
    /// reading/loading error.
    pub fn load_from_path(metamodel: Metamodel, path: &Path) -> Result<Self, StoreError> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::StoreMissing)
            }
            Err(error) => {
                return Err(StoreError::CannotOpenStore {
                    path: path.display().to_string(),
                    source: error,
                })
            }
        };
        Self::load_from_bytes(metamodel, &data)
    }

    /// Serializes the design to pretty-printed JSON bytes.
    ///
    /// # Errors
    /// [`StoreError::DataCorrupted`] when serialization fails (it should
    /// not for well-formed designs).
    pub fn save_to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        DesignWriter::new(self).to_bytes()
    }

    /// Writes the design to a store file.
    ///
    /// # Errors
    /// [`StoreError::UnableToWrite`] on I/O failure.
    pub fn save_to_path(&self, path: &Path) -> Result<(), StoreError> {
        let data = self.save_to_bytes()?;
        std::fs::write(path, data).map_err(|error| StoreError::UnableToWrite {
            path: path.display().to_string(),
            source: error,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn version_parsing_accepts_two_and_three_components() {
        let v: StoreFormatVersion = "0.0.4".parse().unwrap();
        assert_eq!((v.major, v.minor, v.patch), (0, 0, 4));
        let v: StoreFormatVersion = "1.2".parse().unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 0));
        assert!("".parse::<StoreFormatVersion>().is_err());
        assert!("0".parse::<StoreFormatVersion>().is_err());
        assert!("0.0.4.1".parse::<StoreFormatVersion>().is_err());
        assert!("a.b".parse::<StoreFormatVersion>().is_err());
    }

    #[test]
    fn supported_versions_are_the_current_lineage() {
        for spelling in ["0.0.2", "0.0.3", "0.0.4"] {
            let v: StoreFormatVersion = spelling.parse().unwrap();
            assert!(v.is_supported(), "{spelling}");
        }
        for spelling in ["0.0.1", "0.1.0", "1.0.0"] {
            let v: StoreFormatVersion = spelling.parse().unwrap();
            assert!(!v.is_supported(), "{spelling}");
        }
    }
}
