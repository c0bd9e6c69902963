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

//! The injected sink that receives human-readable failure reports.
//!
//! Queue-level failures (a rejected submission, a failed idle wait) are not
//! returned to callers. They are reported here instead, so a host can decide
//! whether to forward them to a logger, an overlay, or a test recorder.

use std::fmt::{self, Debug};

/// Severity of a diagnostic report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Something unexpected happened but the runtime carried on unchanged.
    Warning,
    /// An operation failed and its effect was dropped.
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// Receives diagnostic messages. Purely observational: implementations must not
/// block for long and must never call back into the device.
pub trait DiagnosticsSink: Send + Sync + Debug + 'static {
    /// Records one message.
    fn report(&self, level: DiagnosticLevel, message: &str);

    /// Shorthand for an [`DiagnosticLevel::Error`] report.
    fn error(&self, message: &str) {
        self.report(DiagnosticLevel::Error, message);
    }

    /// Shorthand for a [`DiagnosticLevel::Warning`] report.
    fn warn(&self, message: &str) {
        self.report(DiagnosticLevel::Warning, message);
    }
}
