// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runtime options consumed once when a device is created.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Default size of a pooled staging buffer, in bytes.
pub const DEFAULT_STAGING_BUFFER_SIZE: u64 = 4 * 1024 * 1024;

/// Errors raised while loading [`RuntimeOptions`].
#[derive(Debug, Error)]
pub enum OptionsError {
    /// The options file could not be read.
    #[error("failed to read options file: {0}")]
    Io(#[from] std::io::Error),
    /// The options text is not valid RON or contains unknown fields.
    #[error("failed to parse options: {0}")]
    Parse(String),
    /// A value is outside of its accepted range.
    #[error("invalid option `{field}`: {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// A collection of global settings that shape pooling and submission behaviour.
///
/// Every field is optional in the RON source; missing fields keep their default.
///
/// ```text
/// (
///     staging_buffer_size: 1048576,
///     max_recycled_command_lists: 32,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeOptions {
    /// Size of a standard staging buffer. Requests up to this size are served from the pool.
    pub staging_buffer_size: u64,
    /// How many standard staging buffers the device keeps around for reuse.
    pub max_recycled_staging_buffers: usize,
    /// How many retired command lists the device keeps around for reuse.
    pub max_recycled_command_lists: usize,
    /// How many descriptor pools the device keeps around for reuse.
    pub max_recycled_descriptor_pools: usize,
    /// Number of descriptor sets a single descriptor pool can hold.
    pub descriptor_pool_max_sets: u32,
    /// Length of one fence wait performed by the retirement worker, in milliseconds.
    pub retirement_timeout_ms: u64,
    /// Size of the dummy buffer bound to empty resource slots.
    pub unbound_buffer_size: u64,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            staging_buffer_size: DEFAULT_STAGING_BUFFER_SIZE,
            max_recycled_staging_buffers: 4,
            max_recycled_command_lists: 16,
            max_recycled_descriptor_pools: 16,
            descriptor_pool_max_sets: 8192,
            retirement_timeout_ms: 1000,
            unbound_buffer_size: 256,
        }
    }
}

impl RuntimeOptions {
    /// Parses options from RON text and validates them.
    pub fn from_ron_str(source: &str) -> Result<Self, OptionsError> {
        let options: Self =
            ron::from_str(source).map_err(|e| OptionsError::Parse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Reads and parses an options file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let options = Self::from_ron_str(&source)?;
        log::info!("Loaded runtime options from '{}'", path.display());
        Ok(options)
    }

    /// Loads options from `path` if the file exists, falling back to defaults otherwise.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!(
                "No options file at '{}', using defaults.",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Checks the invariants the device relies on.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.staging_buffer_size == 0 {
            return Err(OptionsError::Invalid {
                field: "staging_buffer_size",
                reason: "must be greater than zero".to_owned(),
            });
        }
        if self.descriptor_pool_max_sets == 0 {
            return Err(OptionsError::Invalid {
                field: "descriptor_pool_max_sets",
                reason: "must be greater than zero".to_owned(),
            });
        }
        if self.retirement_timeout_ms == 0 {
            return Err(OptionsError::Invalid {
                field: "retirement_timeout_ms",
                reason: "must be greater than zero".to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_source_yields_defaults() {
        let options = RuntimeOptions::from_ron_str("()").unwrap();
        assert_eq!(options, RuntimeOptions::default());
    }

    #[test]
    fn partial_source_overrides_only_named_fields() {
        let options = RuntimeOptions::from_ron_str(
            "(staging_buffer_size: 1048576, max_recycled_command_lists: 32)",
        )
        .unwrap();
        assert_eq!(options.staging_buffer_size, 1_048_576);
        assert_eq!(options.max_recycled_command_lists, 32);
        assert_eq!(
            options.max_recycled_descriptor_pools,
            RuntimeOptions::default().max_recycled_descriptor_pools
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = RuntimeOptions::from_ron_str("(frobnicate: true)").unwrap_err();
        assert!(matches!(err, OptionsError::Parse(_)));
    }

    #[test]
    fn zero_staging_size_is_invalid() {
        let err = RuntimeOptions::from_ron_str("(staging_buffer_size: 0)").unwrap_err();
        assert!(matches!(
            err,
            OptionsError::Invalid {
                field: "staging_buffer_size",
                ..
            }
        ));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(retirement_timeout_ms: 250)").unwrap();

        let options = RuntimeOptions::load(file.path()).unwrap();
        assert_eq!(options.retirement_timeout_ms, 250);
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let options = RuntimeOptions::load_or_default(dir.path().join("missing.ron")).unwrap();
        assert_eq!(options, RuntimeOptions::default());
    }
}
