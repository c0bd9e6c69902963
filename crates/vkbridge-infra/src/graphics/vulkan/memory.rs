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

use ash::vk;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use vkbridge_core::device::{DeviceFn, MemoryAllocator, MemorySlice, MemoryStats, ResourceError};

/// A [`MemoryAllocator`] that performs one device allocation per request.
///
/// Simple and predictable, at the cost of one driver call per buffer or image.
/// Memory types are tried in index order; the first one that satisfies both the
/// requirement mask and the requested properties and has room wins.
#[derive(Debug)]
pub struct DedicatedMemoryAllocator {
    vkd: Arc<dyn DeviceFn>,
    memory_properties: vk::PhysicalDeviceMemoryProperties,
    allocated: AtomicU64,
    used: AtomicU64,
}

impl DedicatedMemoryAllocator {
    /// Creates an allocator for a device with the given memory layout.
    pub fn new(vkd: Arc<dyn DeviceFn>, memory_properties: vk::PhysicalDeviceMemoryProperties) -> Self {
        Self {
            vkd,
            memory_properties,
            allocated: AtomicU64::new(0),
            used: AtomicU64::new(0),
        }
    }

    fn memory_types(&self) -> &[vk::MemoryType] {
        let count = (self.memory_properties.memory_type_count as usize).min(vk::MAX_MEMORY_TYPES);
        &self.memory_properties.memory_types[..count]
    }

    /// Indices of the memory types compatible with `type_bits` that have every property in `flags`.
    fn candidate_types(
        &self,
        type_bits: u32,
        flags: vk::MemoryPropertyFlags,
    ) -> impl Iterator<Item = (u32, vk::MemoryPropertyFlags)> + '_ {
        self.memory_types()
            .iter()
            .enumerate()
            .filter(move |&(index, ty)| {
                type_bits & (1 << index) != 0 && ty.property_flags.contains(flags)
            })
            .map(|(index, ty)| (index as u32, ty.property_flags))
    }
}

impl MemoryAllocator for DedicatedMemoryAllocator {
    fn alloc(
        &self,
        requirements: &vk::MemoryRequirements,
        flags: vk::MemoryPropertyFlags,
    ) -> Result<MemorySlice, ResourceError> {
        for (memory_type, property_flags) in
            self.candidate_types(requirements.memory_type_bits, flags)
        {
            match self.vkd.allocate_memory(memory_type, requirements.size) {
                Ok(memory) => {
                    self.allocated.fetch_add(requirements.size, Ordering::Relaxed);
                    self.used.fetch_add(requirements.size, Ordering::Relaxed);
                    log::trace!(
                        "DedicatedMemoryAllocator: allocated {} bytes from memory type {}",
                        requirements.size,
                        memory_type
                    );
                    return Ok(MemorySlice {
                        memory,
                        offset: 0,
                        length: requirements.size,
                        memory_type,
                        property_flags,
                    });
                }
                Err(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY)
                | Err(vk::Result::ERROR_OUT_OF_HOST_MEMORY) => {
                    log::debug!(
                        "DedicatedMemoryAllocator: memory type {} exhausted, trying next",
                        memory_type
                    );
                }
                Err(e) => return Err(ResourceError::vulkan("vkAllocateMemory", e)),
            }
        }

        Err(ResourceError::OutOfMemory {
            size: requirements.size,
            flags,
        })
    }

    fn free(&self, slice: &MemorySlice) {
        self.vkd.free_memory(slice.memory);
        self.allocated.fetch_sub(slice.length, Ordering::Relaxed);
        self.used.fetch_sub(slice.length, Ordering::Relaxed);
    }

    fn memory_stats(&self) -> MemoryStats {
        MemoryStats {
            allocated: self.allocated.load(Ordering::Relaxed),
            used: self.used.load(Ordering::Relaxed),
        }
    }
}
