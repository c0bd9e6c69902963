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

//! Detects completion of submitted command lists and recycles them.

use super::recycler::ObjectRecycler;
use ash::vk;
use crossbeam_channel::{Receiver, Sender};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use vkbridge_core::device::CommandList;
use vkbridge_core::telemetry::DiagnosticsSink;

#[derive(Debug, Default)]
struct InFlight {
    count: Mutex<usize>,
    idle: Condvar,
}

impl InFlight {
    fn begin(&self) {
        *self.count.lock() += 1;
    }

    fn finish(&self) {
        let mut count = self.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }
}

/// Owns every submitted command list until its fence signals.
///
/// A worker thread takes lists in submission order, waits on each fence in
/// slices of `timeout` so that shutdown is noticed, then hands the list to the
/// recycler.
#[derive(Debug)]
pub struct SubmissionTracker {
    sender: Option<Sender<Arc<CommandList>>>,
    in_flight: Arc<InFlight>,
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
    recycler: Arc<ObjectRecycler>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl SubmissionTracker {
    /// Starts the retirement worker.
    pub fn new(
        recycler: Arc<ObjectRecycler>,
        diagnostics: Arc<dyn DiagnosticsSink>,
        timeout: Duration,
    ) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let in_flight = Arc::new(InFlight::default());
        let running = Arc::new(AtomicBool::new(true));

        let worker = RetirementWorker {
            receiver,
            in_flight: Arc::clone(&in_flight),
            running: Arc::clone(&running),
            recycler: Arc::clone(&recycler),
            diagnostics: Arc::clone(&diagnostics),
            timeout_ns: u64::try_from(timeout.as_nanos()).unwrap_or(u64::MAX),
        };

        let handle = thread::Builder::new()
            .name("vkbridge-retire".to_owned())
            .spawn(move || worker.run());

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("SubmissionTracker: failed to spawn retirement thread: {e}");
                None
            }
        };

        Self {
            sender: Some(sender),
            in_flight,
            running,
            handle,
            recycler,
            diagnostics,
        }
    }

    /// Takes ownership of a list that was just submitted.
    pub fn track(&self, list: Arc<CommandList>) {
        self.in_flight.begin();

        let list = match (&self.sender, &self.handle) {
            (Some(sender), Some(_)) => match sender.send(list) {
                Ok(()) => return,
                Err(e) => e.into_inner(),
            },
            _ => list,
        };

        // No worker to hand the list to: retire it on the calling thread.
        if let Err(e) = list.synchronize(u64::MAX) {
            self.diagnostics
                .error(&format!("Failed to wait for command list: {e}"));
        } else {
            self.recycler.retire(list);
        }
        self.in_flight.finish();
    }

    /// Number of submitted lists that have not retired yet.
    pub fn pending(&self) -> usize {
        *self.in_flight.count.lock()
    }

    /// Blocks until every tracked list has retired.
    pub fn wait_for_submissions(&self) {
        let mut count = self.in_flight.count.lock();
        while *count > 0 {
            self.in_flight.idle.wait(&mut count);
        }
    }
}

impl Drop for SubmissionTracker {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        // Closing the channel lets the worker drain what is left and exit.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("SubmissionTracker: retirement thread panicked");
            }
        }
    }
}

struct RetirementWorker {
    receiver: Receiver<Arc<CommandList>>,
    in_flight: Arc<InFlight>,
    running: Arc<AtomicBool>,
    recycler: Arc<ObjectRecycler>,
    diagnostics: Arc<dyn DiagnosticsSink>,
    timeout_ns: u64,
}

impl RetirementWorker {
    fn run(self) {
        log::debug!("Retirement thread started.");

        while let Ok(list) = self.receiver.recv() {
            if self.wait_for(&list) {
                self.recycler.retire(list);
            }
            self.in_flight.finish();
        }

        log::debug!("Retirement thread stopped.");
    }

    /// Returns `true` once the list's fence has signaled.
    fn wait_for(&self, list: &CommandList) -> bool {
        loop {
            match list.synchronize(self.timeout_ns) {
                Ok(()) => return true,
                Err(vk::Result::TIMEOUT) => {
                    if !self.running.load(Ordering::Relaxed) {
                        log::warn!(
                            "Retirement thread: abandoning command list {:?} at shutdown",
                            list.handle()
                        );
                        return false;
                    }
                }
                Err(e) => {
                    self.diagnostics
                        .error(&format!("Failed to wait for command list: {e}"));
                    return false;
                }
            }
        }
    }
}
