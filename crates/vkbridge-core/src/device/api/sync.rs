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

//! GPU events and queries.

use crate::device::error::ResourceError;
use crate::device::traits::DeviceFn;
use ash::vk;
use std::sync::Arc;

/// An event that can be signaled by the GPU and polled by the host.
#[derive(Debug)]
pub struct GpuEvent {
    vkd: Arc<dyn DeviceFn>,
    handle: vk::Event,
}

impl GpuEvent {
    /// Creates an unsignaled event.
    pub fn new(vkd: Arc<dyn DeviceFn>) -> Result<Self, ResourceError> {
        let handle = vkd
            .create_event()
            .map_err(|e| ResourceError::vulkan("vkCreateEvent", e))?;
        Ok(Self { vkd, handle })
    }

    /// The raw event handle.
    pub fn handle(&self) -> vk::Event {
        self.handle
    }
}

impl Drop for GpuEvent {
    fn drop(&mut self) {
        self.vkd.destroy_event(self.handle);
    }
}

/// A query object. Query pool slots are assigned when the query is first
/// recorded, so creating one does not touch the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuQuery {
    query_type: vk::QueryType,
    flags: vk::QueryControlFlags,
    index: u32,
}

impl GpuQuery {
    /// Creates a query of `query_type`. `index` selects the stream for indexed queries.
    pub fn new(query_type: vk::QueryType, flags: vk::QueryControlFlags, index: u32) -> Self {
        Self {
            query_type,
            flags,
            index,
        }
    }

    /// The query type.
    pub fn query_type(&self) -> vk::QueryType {
        self.query_type
    }

    /// Query control flags.
    pub fn flags(&self) -> vk::QueryControlFlags {
        self.flags
    }

    /// Query index.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns `true` for queries that are only valid inside a render pass.
    pub fn is_render_pass_query(&self) -> bool {
        self.query_type == vk::QueryType::OCCLUSION
    }
}
