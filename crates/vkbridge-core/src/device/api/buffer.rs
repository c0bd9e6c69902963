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

//! Buffers and typed buffer views.

use crate::device::api::memory::MemorySlice;
use crate::device::error::ResourceError;
use crate::device::traits::{DeviceFn, MemoryAllocator};
use ash::vk;
use std::sync::Arc;

/// Describes a buffer to be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferCreateInfo {
    /// Size of the buffer, in bytes.
    pub size: vk::DeviceSize,
    /// Usages the buffer will be created with.
    pub usage: vk::BufferUsageFlags,
    /// Pipeline stages that may access the buffer. Used for barrier generation.
    pub stages: vk::PipelineStageFlags,
    /// Access types the buffer will be used with. Used for barrier generation.
    pub access: vk::AccessFlags,
}

/// Describes a typed view over a range of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferViewCreateInfo {
    /// Element format of the view.
    pub format: vk::Format,
    /// Offset of the viewed range, in bytes.
    pub range_offset: vk::DeviceSize,
    /// Length of the viewed range, in bytes.
    pub range_length: vk::DeviceSize,
}

/// A buffer with bound device memory.
///
/// The raw handle is destroyed and the memory returned to its allocator when
/// the last reference is dropped.
#[derive(Debug)]
pub struct Buffer {
    vkd: Arc<dyn DeviceFn>,
    allocator: Arc<dyn MemoryAllocator>,
    info: BufferCreateInfo,
    memory_flags: vk::MemoryPropertyFlags,
    handle: vk::Buffer,
    memory: MemorySlice,
}

impl Buffer {
    /// Creates the raw buffer, allocates memory for it and binds the two.
    ///
    /// Nothing is leaked on failure: a raw buffer created before the failing
    /// step is destroyed again.
    pub fn new(
        vkd: Arc<dyn DeviceFn>,
        allocator: Arc<dyn MemoryAllocator>,
        info: BufferCreateInfo,
        memory_flags: vk::MemoryPropertyFlags,
    ) -> Result<Self, ResourceError> {
        if info.size == 0 {
            return Err(ResourceError::InvalidArgument(
                "buffer size must be greater than zero".to_owned(),
            ));
        }

        let handle = vkd
            .create_buffer(&info)
            .map_err(|e| ResourceError::vulkan("vkCreateBuffer", e))?;

        let requirements = vkd.buffer_memory_requirements(handle);
        let memory = match allocator.alloc(&requirements, memory_flags) {
            Ok(memory) => memory,
            Err(e) => {
                vkd.destroy_buffer(handle);
                return Err(e);
            }
        };

        if let Err(result) = vkd.bind_buffer_memory(handle, &memory) {
            allocator.free(&memory);
            vkd.destroy_buffer(handle);
            return Err(ResourceError::vulkan("vkBindBufferMemory", result));
        }

        Ok(Self {
            vkd,
            allocator,
            info,
            memory_flags,
            handle,
            memory,
        })
    }

    /// The raw buffer handle.
    pub fn handle(&self) -> vk::Buffer {
        self.handle
    }

    /// The parameters the buffer was created with.
    pub fn info(&self) -> &BufferCreateInfo {
        &self.info
    }

    /// Size of the buffer, in bytes.
    pub fn size(&self) -> vk::DeviceSize {
        self.info.size
    }

    /// The memory properties that were requested for this buffer.
    pub fn memory_flags(&self) -> vk::MemoryPropertyFlags {
        self.memory_flags
    }

    /// The memory range bound to this buffer.
    pub fn memory(&self) -> &MemorySlice {
        &self.memory
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.vkd.destroy_buffer(self.handle);
        self.allocator.free(&self.memory);
    }
}

/// A typed view over a buffer range. Keeps its buffer alive.
#[derive(Debug)]
pub struct BufferView {
    vkd: Arc<dyn DeviceFn>,
    buffer: Arc<Buffer>,
    info: BufferViewCreateInfo,
    handle: vk::BufferView,
}

impl BufferView {
    /// Creates a view over `buffer`.
    ///
    /// ## Errors
    /// * `ResourceError::InvalidArgument` - If the range does not fit into the buffer.
    pub fn new(
        vkd: Arc<dyn DeviceFn>,
        buffer: Arc<Buffer>,
        info: BufferViewCreateInfo,
    ) -> Result<Self, ResourceError> {
        let end = info.range_offset.checked_add(info.range_length);
        if end.map_or(true, |end| end > buffer.size()) {
            return Err(ResourceError::InvalidArgument(format!(
                "view range {}+{} exceeds buffer size {}",
                info.range_offset,
                info.range_length,
                buffer.size()
            )));
        }

        let handle = vkd
            .create_buffer_view(buffer.handle(), &info)
            .map_err(|e| ResourceError::vulkan("vkCreateBufferView", e))?;

        Ok(Self {
            vkd,
            buffer,
            info,
            handle,
        })
    }

    /// The raw view handle.
    pub fn handle(&self) -> vk::BufferView {
        self.handle
    }

    /// The buffer this view refers to.
    pub fn buffer(&self) -> &Arc<Buffer> {
        &self.buffer
    }

    /// The parameters the view was created with.
    pub fn info(&self) -> &BufferViewCreateInfo {
        &self.info
    }
}

impl Drop for BufferView {
    fn drop(&mut self) {
        self.vkd.destroy_buffer_view(self.handle);
    }
}
