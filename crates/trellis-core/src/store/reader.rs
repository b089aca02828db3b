// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Raw design reader: bytes to [`RawDesign`], with version dispatch.

use std::path::Path;

use serde_json::Value as JsonValue;

use crate::store::{RawDesign, StoreError, StoreFormatVersion};

/// Decodes store bytes into a [`RawDesign`] without touching any identity
/// state.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesignReader;

impl DesignReader {
    /// Reads a raw design from JSON bytes.
    ///
    /// The `store_format_version` property is mandatory; its value selects
    /// the per-version decoding (all supported versions currently share one
    /// layout).
    ///
    /// # Errors
    /// [`StoreError::DataCorrupted`] for malformed JSON,
    /// [`StoreError::MissingProperty`] / [`StoreError::TypeMismatch`] for a
    /// missing or non-string version, and
    /// [`StoreError::UnsupportedFormatVersion`] for unknown versions.
    pub fn read_bytes(data: &[u8]) -> Result<RawDesign, StoreError> {
        let value: JsonValue =
            serde_json::from_slice(data).map_err(|_| StoreError::DataCorrupted)?;
        let Some(document) = value.as_object() else {
            return Err(StoreError::DataCorrupted);
        };
        let Some(version_value) = document.get("store_format_version") else {
            return Err(StoreError::MissingProperty {
                name: "store_format_version".to_owned(),
                path: "$".to_owned(),
            });
        };
        let Some(version_text) = version_value.as_str() else {
            return Err(StoreError::TypeMismatch {
                path: "$.store_format_version".to_owned(),
            });
        };
        let version: StoreFormatVersion = version_text.parse()?;
        if version.is_supported() {
            Self::read_current(value)
        } else {
            Err(StoreError::UnsupportedFormatVersion(version_text.to_owned()))
        }
    }

    /// Reads a raw design from a store file.
    ///
    /// # Errors
    /// [`StoreError::StoreMissing`] when the file does not exist,
    /// [`StoreError::CannotOpenStore`] on other I/O failures, plus any
    /// decoding error.
    pub fn read_path(path: &Path) -> Result<RawDesign, StoreError> {
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
        Self::read_bytes(&data)
    }

    // Decoder for the 0.0.x layout lineage.
    fn read_current(value: JsonValue) -> Result<RawDesign, StoreError> {
        serde_json::from_value(value).map_err(|_| StoreError::DataCorrupted)
    }
}
