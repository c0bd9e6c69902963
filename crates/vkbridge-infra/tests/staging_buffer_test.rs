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
use vkbridge_core::RuntimeOptions;

const DEFAULT_SIZE: vk::DeviceSize = 1_048_576;

#[test]
fn test_small_then_oversized_allocation_scenario() {
    let test = create_device(test_options());
    let device = &test.device;
    let staging = device.recycler().staging();

    let small = device.alloc_staging_buffer(1000).unwrap();
    assert_eq!(small.size(), DEFAULT_SIZE);
    device.recycle_staging_buffer(small);
    assert_eq!(staging.pooled(), 1);

    let created_before = test.vkd.buffers_created();
    let large = device.alloc_staging_buffer(2_000_000).unwrap();
    assert_eq!(large.size(), 2_000_000);
    assert_eq!(
        test.vkd.buffers_created(),
        created_before + 1,
        "Oversized requests never come from the pool"
    );
    assert_eq!(staging.pooled(), 1);

    device.recycle_staging_buffer(large);
    assert_eq!(staging.pooled(), 1, "Oversized buffer must be discarded");
}

#[test]
fn test_requests_up_to_default_size_get_default_sized_buffers() {
    let test = create_device(test_options());

    for size in [1, 256, 4096, DEFAULT_SIZE - 1, DEFAULT_SIZE] {
        let buffer = test.device.alloc_staging_buffer(size).unwrap();
        assert_eq!(buffer.size(), DEFAULT_SIZE, "request of {size} bytes");
    }

    let buffer = test.device.alloc_staging_buffer(DEFAULT_SIZE + 1).unwrap();
    assert_eq!(buffer.size(), DEFAULT_SIZE + 1);
}

#[test]
fn test_staging_buffers_are_host_visible_transfer_sources() {
    let test = create_device(test_options());
    let staging = test.device.alloc_staging_buffer(64).unwrap();
    let buffer = staging.buffer();

    assert_eq!(buffer.info().usage, vk::BufferUsageFlags::TRANSFER_SRC);
    assert_eq!(
        buffer.info().stages,
        vk::PipelineStageFlags::TRANSFER | vk::PipelineStageFlags::HOST
    );
    assert_eq!(
        buffer.info().access,
        vk::AccessFlags::TRANSFER_READ | vk::AccessFlags::HOST_WRITE
    );
    assert_eq!(
        buffer.memory_flags(),
        vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT
    );
    assert!(buffer.memory().is_host_visible());
}

#[test]
fn test_oversized_buffer_is_freed_and_never_pooled() {
    // --- 1. ARRANGE ---
    let test = create_device(test_options());
    let device = &test.device;
    let live_before = test.vkd.live_objects();

    let large = device.alloc_staging_buffer(3 * DEFAULT_SIZE).unwrap();
    let weak = Arc::downgrade(large.buffer());

    // --- 2. ACT ---
    device.recycle_staging_buffer(large);

    // --- 3. ASSERT ---
    assert!(weak.upgrade().is_none(), "Discarded buffer must not stay reachable");
    assert_eq!(test.vkd.live_objects(), live_before, "Buffer and memory must be freed");

    let created_before = test.vkd.buffers_created();
    let small = device.alloc_staging_buffer(16).unwrap();
    assert_eq!(small.size(), DEFAULT_SIZE);
    assert_eq!(
        test.vkd.buffers_created(),
        created_before + 1,
        "Default-size request must miss the pool"
    );
}

#[test]
fn test_recycled_buffer_is_returned_and_cleared() {
    let test = create_device(test_options());
    let device = &test.device;

    let first = device.alloc_staging_buffer(512).unwrap();
    first.alloc(16, 512).unwrap();
    assert_eq!(first.free_bytes(), DEFAULT_SIZE - 512);
    let first_ptr = Arc::as_ptr(&first);

    device.recycle_staging_buffer(first);
    let second = device.alloc_staging_buffer(512).unwrap();

    assert_eq!(Arc::as_ptr(&second), first_ptr, "Pool round-trip yields the same buffer");
    assert_eq!(second.free_bytes(), DEFAULT_SIZE, "Recycled buffer starts empty");
}

#[test]
fn test_pool_capacity_bounds_retention() {
    let options = RuntimeOptions {
        max_recycled_staging_buffers: 2,
        ..test_options()
    };
    let test = create_device(options);
    let device = &test.device;

    let buffers: Vec<_> = (0..4)
        .map(|_| device.alloc_staging_buffer(128).unwrap())
        .collect();
    for buffer in buffers {
        device.recycle_staging_buffer(buffer);
    }

    assert_eq!(device.recycler().staging().pooled(), 2);
}

#[test]
fn test_slices_are_aligned_and_bounded() {
    let test = create_device(test_options());
    let staging = test.device.alloc_staging_buffer(1).unwrap();

    let a = staging.alloc(1, 10).unwrap();
    let b = staging.alloc(256, 100).unwrap();
    assert_eq!(a.offset, 0);
    assert_eq!(b.offset, 256);
    assert_eq!(b.length, 100);

    assert!(staging.alloc(1, DEFAULT_SIZE).is_none());
    staging.reset();
    assert!(staging.alloc(1, DEFAULT_SIZE).is_some());
}

#[test]
fn test_allocation_failure_propagates() {
    let test = create_device(test_options());
    test.vkd.set(&test.vkd.fail_allocations, true);

    let err = test.device.alloc_staging_buffer(64).unwrap_err();
    assert!(err.is_out_of_memory());
}
