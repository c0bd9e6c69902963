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
use common::{create_device, test_options};
use std::sync::Arc;
use vkbridge_core::device::{CommandListPhase, ResourceError, StatCounter};

#[test]
fn test_context_receives_device_collaborators() {
    let test = create_device(test_options());
    let context = test.device.create_context();

    assert!(context.command_list().is_none());
    assert!(Arc::ptr_eq(context.device(), &test.device));

    let meta = format!("{:?}", context.meta_objects());
    assert!(meta.contains("MockMetaObject(\"resolve\")"));
}

#[test]
fn test_flush_submits_and_starts_a_new_list() {
    let test = create_device(test_options());
    // Keep the flushed list pending so the fresh list cannot be the same one.
    test.vkd.set(&test.vkd.fences_signaled, false);
    let mut context = test.device.create_context();

    let list = test.device.create_command_list().unwrap();
    context.begin_recording(Arc::clone(&list)).unwrap();
    context.add_stat(StatCounter::CmdDrawCalls, 4);

    context
        .flush_command_list(vk::Semaphore::null(), vk::Semaphore::null())
        .unwrap();

    let current = context.command_list().unwrap();
    assert!(!Arc::ptr_eq(current, &list));
    assert_eq!(current.phase(), CommandListPhase::Recording);
    assert_eq!(test.vkd.submitted(), vec![list.handle()]);
    assert_eq!(
        test.device
            .stat_counters()
            .get(StatCounter::CmdDrawCalls),
        4
    );
}

#[test]
fn test_staged_uploads_share_a_buffer_and_retire_with_the_list() {
    let test = create_device(test_options());
    let mut context = test.device.create_context();
    context
        .begin_recording(test.device.create_command_list().unwrap())
        .unwrap();

    let a = context.stage_upload(1000, 16).unwrap();
    let b = context.stage_upload(1000, 16).unwrap();
    assert!(Arc::ptr_eq(&a.buffer, &b.buffer));
    assert_eq!(b.offset, 1008);
    assert_eq!(context.command_list().unwrap().tracked_count(), 1);

    context
        .flush_command_list(vk::Semaphore::null(), vk::Semaphore::null())
        .unwrap();
    test.device.wait_for_submissions();

    assert_eq!(test.device.recycler().staging().pooled(), 1);
}

#[test]
fn test_large_upload_gets_a_dedicated_buffer() {
    let test = create_device(test_options());
    let mut context = test.device.create_context();
    context
        .begin_recording(test.device.create_command_list().unwrap())
        .unwrap();

    let slice = context.stage_upload(4 * 1_048_576, 4).unwrap();
    assert_eq!(slice.buffer.size(), 4 * 1_048_576);
}

#[test]
fn test_descriptor_pool_is_tracked_by_the_current_list() {
    let test = create_device(test_options());
    let mut context = test.device.create_context();
    context
        .begin_recording(test.device.create_command_list().unwrap())
        .unwrap();

    context.descriptor_pool().unwrap();
    context
        .flush_command_list(vk::Semaphore::null(), vk::Semaphore::null())
        .unwrap();
    test.device.wait_for_submissions();

    assert_eq!(test.device.recycler().pooled_descriptor_pools(), 1);
}

#[test]
fn test_uploads_require_a_recording_list() {
    let test = create_device(test_options());
    let mut context = test.device.create_context();

    assert!(matches!(
        context.stage_upload(16, 4),
        Err(ResourceError::InvalidArgument(_))
    ));
    assert!(context.end_recording().unwrap().is_none());
}

#[test]
fn test_dropped_context_recycles_its_list() {
    let test = create_device(test_options());
    {
        let mut context = test.device.create_context();
        context
            .begin_recording(test.device.create_command_list().unwrap())
            .unwrap();
    }
    assert_eq!(test.device.recycler().pooled_command_lists(), 1);
}
