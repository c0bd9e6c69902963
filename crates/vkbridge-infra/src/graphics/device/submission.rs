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

use super::recycler::ObjectRecycler;
use super::tracker::SubmissionTracker;
use ash::vk;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use vkbridge_core::device::{CommandList, DeviceFn, DeviceQueue, Presenter, StatCounter, StatCounters};
use vkbridge_core::telemetry::DiagnosticsSink;

/// Serializes everything that touches a device queue and keeps the
/// device-wide statistics.
///
/// Two locks are involved. The submission lock is held for the whole of a
/// submit or present, because queues must not be used from several threads
/// at once. The stat lock only guards the counter store and is never held
/// across a device call.
#[derive(Debug)]
pub struct SubmissionCoordinator {
    vkd: Arc<dyn DeviceFn>,
    queue: DeviceQueue,
    submission_lock: Mutex<()>,
    stats: Mutex<StatCounters>,
    tracker: SubmissionTracker,
    recycler: Arc<ObjectRecycler>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl SubmissionCoordinator {
    /// Creates a coordinator submitting to `queue`.
    pub fn new(
        vkd: Arc<dyn DeviceFn>,
        queue: DeviceQueue,
        recycler: Arc<ObjectRecycler>,
        diagnostics: Arc<dyn DiagnosticsSink>,
        retirement_timeout: Duration,
    ) -> Self {
        let tracker = SubmissionTracker::new(
            Arc::clone(&recycler),
            Arc::clone(&diagnostics),
            retirement_timeout,
        );
        Self {
            vkd,
            queue,
            submission_lock: Mutex::new(()),
            stats: Mutex::new(StatCounters::new()),
            tracker,
            recycler,
            diagnostics,
        }
    }

    /// Submits a command list.
    ///
    /// The list's statistics are merged and the submit counter is incremented
    /// before the queue call, atomically with it. A list the queue accepts is
    /// tracked until it retires. A rejected list is reported, reset and
    /// returned to its pool.
    pub fn submit_command_list(
        &self,
        list: Arc<CommandList>,
        wait_sync: vk::Semaphore,
        wake_sync: vk::Semaphore,
    ) {
        let result = {
            let _queue = self.submission_lock.lock();

            {
                let mut stats = self.stats.lock();
                stats.merge(&list.stat_counters());
                stats.add(StatCounter::QueueSubmitCount, 1);
            }

            let result = list.submit(self.queue.queue_handle, wait_sync, wake_sync);
            if result.is_ok() {
                self.tracker.track(Arc::clone(&list));
            }
            result
        };

        if let Err(e) = result {
            self.diagnostics
                .error(&format!("Failed to submit command list: {e}"));
            self.recycler.retire(list);
        }
    }

    /// Presents through `presenter` while holding the submission lock.
    ///
    /// The present counter is only incremented if the presenter reports
    /// `vk::Result::SUCCESS`. Its status is returned unchanged.
    pub fn present_image(&self, presenter: &dyn Presenter, semaphore: vk::Semaphore) -> vk::Result {
        let _queue = self.submission_lock.lock();

        let status = presenter.present_image(semaphore);
        if status == vk::Result::SUCCESS {
            self.stats.lock().add(StatCounter::QueuePresentCount, 1);
        }
        status
    }

    /// Waits until the device is idle. Failures are reported, not returned.
    pub fn wait_for_idle(&self) {
        let _queue = self.submission_lock.lock();
        if let Err(e) = self.vkd.device_wait_idle() {
            self.diagnostics
                .error(&format!("Failed to wait for device idle: {e}"));
        }
    }

    /// Snapshot of the accumulated counters.
    pub fn accumulated(&self) -> StatCounters {
        *self.stats.lock()
    }

    /// Reads one accumulated counter.
    pub fn counter(&self, counter: StatCounter) -> u64 {
        self.stats.lock().get(counter)
    }

    /// Number of submitted lists that have not retired yet.
    pub fn pending_submissions(&self) -> usize {
        self.tracker.pending()
    }

    /// Blocks until every submitted list has retired.
    pub fn wait_for_submissions(&self) {
        self.tracker.wait_for_submissions();
    }
}
