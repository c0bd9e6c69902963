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

use anyhow::{Context, Result};
use env_logger::{Builder, Env};
use parking_lot::Mutex;

static INSTALLED: Mutex<bool> = parking_lot::const_mutex(false);

/// Initializes the global logger, honoring `RUST_LOG` and defaulting to `info`.
///
/// Idempotent: once this crate has installed its logger, later calls return
/// `Ok` and change nothing.
///
/// ## Errors
/// Fails if a different logger was installed by someone else.
pub fn init_logging() -> Result<()> {
    init_logging_with_filter("info")
}

/// Initializes the global logger with `default_filter` when `RUST_LOG` is unset.
///
/// The filter of the first successful call wins.
pub fn init_logging_with_filter(default_filter: &str) -> Result<()> {
    let mut installed = INSTALLED.lock();
    if *installed {
        return Ok(());
    }

    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
        .context("failed to install the global logger")?;
    *installed = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_initialization_is_a_no_op() {
        init_logging_with_filter("debug").unwrap();
        init_logging().unwrap();
        init_logging_with_filter("trace").unwrap();
        assert!(*INSTALLED.lock());
    }
}
