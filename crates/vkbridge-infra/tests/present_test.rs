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

mod common;

use ash::vk;
use common::{create_device, test_options, MockPresenter};
use std::sync::atomic::Ordering;
use std::thread;
use vkbridge_core::device::StatCounter;

#[test]
fn test_successful_present_counts_one_frame() {
    let test = create_device(test_options());
    let presenter = MockPresenter::returning(vk::Result::SUCCESS);

    let status = test
        .device
        .present_image(&presenter, vk::Semaphore::null());

    assert_eq!(status, vk::Result::SUCCESS);
    assert_eq!(
        test.device
            .stat_counters()
            .get(StatCounter::QueuePresentCount),
        1
    );
    assert_eq!(test.device.current_frame_id(), 1);
    assert_eq!(presenter.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failed_present_returns_status_unchanged() {
    let test = create_device(test_options());
    let presenter = MockPresenter::returning(vk::Result::ERROR_SURFACE_LOST_KHR);

    let status = test
        .device
        .present_image(&presenter, vk::Semaphore::null());

    assert_eq!(status, vk::Result::ERROR_SURFACE_LOST_KHR);
    assert_eq!(
        test.device
            .stat_counters()
            .get(StatCounter::QueuePresentCount),
        0
    );
    assert_eq!(test.device.current_frame_id(), 0);
    assert!(
        test.diagnostics.records().is_empty(),
        "Present failures are left to the caller"
    );
}

#[test]
fn test_suboptimal_present_is_not_counted() {
    let test = create_device(test_options());
    let presenter = MockPresenter::returning(vk::Result::SUBOPTIMAL_KHR);

    let status = test
        .device
        .present_image(&presenter, vk::Semaphore::null());

    assert_eq!(status, vk::Result::SUBOPTIMAL_KHR);
    assert_eq!(test.device.current_frame_id(), 0);
}

#[test]
fn test_frame_id_follows_presents_across_threads() {
    const PER_THREAD: u64 = 100;
    let test = create_device(test_options());
    let presenter = MockPresenter::returning(vk::Result::SUCCESS);
    let device = &test.device;

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..PER_THREAD {
                    device.present_image(&presenter, vk::Semaphore::null());
                }
            });
        }
    });

    assert_eq!(device.current_frame_id(), 4 * PER_THREAD);
    assert_eq!(
        device.stat_counters().get(StatCounter::QueueSubmitCount),
        0
    );
}
