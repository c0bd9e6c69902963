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

//! Descriptor pools.

use crate::device::error::ResourceError;
use crate::device::traits::DeviceFn;
use ash::vk;
use std::sync::Arc;

/// A descriptor pool. Pooled by the device and recycled once the command list
/// that used it has retired.
#[derive(Debug)]
pub struct DescriptorPool {
    vkd: Arc<dyn DeviceFn>,
    handle: vk::DescriptorPool,
    max_sets: u32,
}

impl DescriptorPool {
    /// Creates a pool able to hold `max_sets` descriptor sets.
    pub fn new(vkd: Arc<dyn DeviceFn>, max_sets: u32) -> Result<Self, ResourceError> {
        let handle = vkd
            .create_descriptor_pool(max_sets)
            .map_err(|e| ResourceError::vulkan("vkCreateDescriptorPool", e))?;
        Ok(Self {
            vkd,
            handle,
            max_sets,
        })
    }

    /// The raw pool handle.
    pub fn handle(&self) -> vk::DescriptorPool {
        self.handle
    }

    /// Capacity of the pool, in sets.
    pub fn max_sets(&self) -> u32 {
        self.max_sets
    }

    /// Frees every set allocated from the pool.
    pub fn reset(&self) -> Result<(), ResourceError> {
        self.vkd
            .reset_descriptor_pool(self.handle)
            .map_err(|e| ResourceError::vulkan("vkResetDescriptorPool", e))
    }
}

impl Drop for DescriptorPool {
    fn drop(&mut self) {
        self.vkd.destroy_descriptor_pool(self.handle);
    }
}
