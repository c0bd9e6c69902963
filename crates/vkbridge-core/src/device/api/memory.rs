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

//! Backing storage handed out by a [`MemoryAllocator`](crate::device::MemoryAllocator).

use ash::vk;

/// A range of device memory bound to exactly one buffer or image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySlice {
    /// The device memory object the range lives in.
    pub memory: vk::DeviceMemory,
    /// Offset of the range within `memory`, in bytes.
    pub offset: vk::DeviceSize,
    /// Length of the range, in bytes.
    pub length: vk::DeviceSize,
    /// Index of the memory type `memory` was allocated from.
    pub memory_type: u32,
    /// Properties of that memory type.
    pub property_flags: vk::MemoryPropertyFlags,
}

impl MemorySlice {
    /// Returns `true` if the host can map this memory.
    pub fn is_host_visible(&self) -> bool {
        self.property_flags
            .contains(vk::MemoryPropertyFlags::HOST_VISIBLE)
    }
}

/// Allocation totals reported by a memory allocator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Bytes of device memory currently allocated from the driver.
    pub allocated: vk::DeviceSize,
    /// Bytes of that memory currently bound to live objects.
    pub used: vk::DeviceSize,
}
