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

//! [`DiagnosticsSink`] implementations.

use parking_lot::Mutex;
use vkbridge_core::telemetry::{DiagnosticLevel, DiagnosticsSink};

/// Log target diagnostics are emitted under.
pub const DIAGNOSTICS_TARGET: &str = "vkbridge::device";

/// Forwards every report to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl DiagnosticsSink for LogDiagnostics {
    fn report(&self, level: DiagnosticLevel, message: &str) {
        match level {
            DiagnosticLevel::Warning => log::warn!(target: DIAGNOSTICS_TARGET, "{message}"),
            DiagnosticLevel::Error => log::error!(target: DIAGNOSTICS_TARGET, "{message}"),
        }
    }
}

/// Keeps every report in memory, for tests and on-screen overlays.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    records: Mutex<Vec<(DiagnosticLevel, String)>>,
}

impl RecordingDiagnostics {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every report received so far, oldest first.
    pub fn records(&self) -> Vec<(DiagnosticLevel, String)> {
        self.records.lock().clone()
    }

    /// Messages reported at `level`.
    pub fn messages(&self, level: DiagnosticLevel) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Number of error reports.
    pub fn error_count(&self) -> usize {
        self.messages(DiagnosticLevel::Error).len()
    }

    /// Removes and returns every report.
    pub fn take(&self) -> Vec<(DiagnosticLevel, String)> {
        std::mem::take(&mut *self.records.lock())
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn report(&self, level: DiagnosticLevel, message: &str) {
        log::debug!(target: DIAGNOSTICS_TARGET, "recorded {level}: {message}");
        self.records.lock().push((level, message.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_order_and_levels() {
        let sink = RecordingDiagnostics::new();
        sink.warn("first");
        sink.error("second");

        assert_eq!(
            sink.records(),
            vec![
                (DiagnosticLevel::Warning, "first".to_owned()),
                (DiagnosticLevel::Error, "second".to_owned()),
            ]
        );
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn take_empties_the_recorder() {
        let sink = RecordingDiagnostics::new();
        sink.error("boom");
        assert_eq!(sink.take().len(), 1);
        assert!(sink.records().is_empty());
    }

    #[test]
    fn log_sink_accepts_both_levels() {
        let sink = LogDiagnostics;
        sink.warn("a warning");
        sink.error("an error");
    }
}
