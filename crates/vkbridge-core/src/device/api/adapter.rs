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

//! Information supplied by the adapter layer when a device is created.

use super::framebuffer::FramebufferSize;
use ash::vk;

/// Properties, features and queue families of the physical device a logical
/// device is created on. Consumed once at device construction.
#[derive(Debug, Clone, Default)]
pub struct AdapterInfo {
    /// Core device properties, including limits.
    pub properties: vk::PhysicalDeviceProperties,
    /// Core features that were enabled on the logical device.
    pub features: vk::PhysicalDeviceFeatures,
    /// Memory heaps and memory types of the physical device.
    pub memory_properties: vk::PhysicalDeviceMemoryProperties,
    /// Names of the device extensions that were enabled.
    pub extensions: Vec<String>,
    /// Queue family used for graphics and transfer work.
    pub graphics_queue_family: u32,
    /// Queue family able to present to the target surface.
    pub present_queue_family: u32,
}

impl AdapterInfo {
    /// The device name reported by the driver.
    pub fn device_name(&self) -> String {
        let bytes: Vec<u8> = self
            .properties
            .device_name
            .iter()
            .take_while(|&&c| c != 0)
            .map(|&c| c as u8)
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Returns `true` if the extension `name` was enabled.
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| e == name)
    }

    /// The largest framebuffer the device supports.
    pub fn framebuffer_limits(&self) -> FramebufferSize {
        let limits = &self.properties.limits;
        FramebufferSize {
            width: limits.max_framebuffer_width,
            height: limits.max_framebuffer_height,
            layers: limits.max_framebuffer_layers,
        }
    }
}

/// One logical queue of the device. Immutable after device construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceQueue {
    /// Queue family index the queue was retrieved from.
    pub queue_family: u32,
    /// The queue handle work is submitted to.
    pub queue_handle: vk::Queue,
}

/// Descriptor-related limits derived from the adapter's properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceOptions {
    /// Maximum number of dynamic uniform buffers in a descriptor set layout.
    pub max_num_dynamic_uniform_buffers: u32,
    /// Maximum number of dynamic storage buffers in a descriptor set layout.
    pub max_num_dynamic_storage_buffers: u32,
}

impl DeviceOptions {
    /// Reads the options from the adapter's limits.
    pub fn from_adapter(adapter: &AdapterInfo) -> Self {
        let limits = &adapter.properties.limits;
        Self {
            max_num_dynamic_uniform_buffers: limits.max_descriptor_set_uniform_buffers_dynamic,
            max_num_dynamic_storage_buffers: limits.max_descriptor_set_storage_buffers_dynamic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_name_stops_at_nul() {
        let mut adapter = AdapterInfo::default();
        for (dst, src) in adapter.properties.device_name.iter_mut().zip(b"Test GPU\0junk") {
            *dst = *src as _;
        }
        assert_eq!(adapter.device_name(), "Test GPU");
    }

    #[test]
    fn options_mirror_descriptor_limits() {
        let mut adapter = AdapterInfo::default();
        adapter.properties.limits.max_descriptor_set_uniform_buffers_dynamic = 8;
        adapter.properties.limits.max_descriptor_set_storage_buffers_dynamic = 4;

        let options = DeviceOptions::from_adapter(&adapter);
        assert_eq!(options.max_num_dynamic_uniform_buffers, 8);
        assert_eq!(options.max_num_dynamic_storage_buffers, 4);
    }
}
