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
use std::sync::Arc;
use vkbridge_core::device::{BufferCreateInfo, ResourceError, ResourceFactory, StagingBuffer};
use vkbridge_core::RecyclablePool;

/// Hands out host-visible staging buffers and recycles standard-sized ones.
///
/// Requests up to `default_size` bytes are served from the pool, or by a fresh
/// buffer of exactly `default_size` bytes on a miss. Larger requests always get
/// a fresh buffer of the requested size, which is freed again on release.
#[derive(Debug)]
pub struct StagingBufferAllocator {
    factory: Arc<dyn ResourceFactory>,
    default_size: vk::DeviceSize,
    pool: RecyclablePool<Arc<StagingBuffer>>,
}

impl StagingBufferAllocator {
    /// Creates an allocator that keeps at most `capacity` standard buffers around.
    pub fn new(
        factory: Arc<dyn ResourceFactory>,
        default_size: vk::DeviceSize,
        capacity: usize,
    ) -> Self {
        Self {
            factory,
            default_size,
            pool: RecyclablePool::new(capacity),
        }
    }

    /// Size of a standard staging buffer.
    pub fn default_size(&self) -> vk::DeviceSize {
        self.default_size
    }

    /// Number of buffers currently waiting for reuse.
    pub fn pooled(&self) -> usize {
        self.pool.len()
    }

    /// Frees every pooled buffer. Returns how many were released.
    pub fn trim(&self) -> usize {
        self.pool.drain().len()
    }

    /// Returns a staging buffer of at least `size` bytes.
    ///
    /// ## Errors
    /// * `ResourceError::OutOfMemory` - If a fresh buffer is needed and cannot be allocated.
    pub fn allocate(&self, size: vk::DeviceSize) -> Result<Arc<StagingBuffer>, ResourceError> {
        if size <= self.default_size {
            if let Some(buffer) = self.pool.retrieve() {
                return Ok(buffer);
            }
            log::trace!("StagingBufferAllocator: pool miss for {} bytes", size);
        }

        let info = BufferCreateInfo {
            size: size.max(self.default_size),
            usage: vk::BufferUsageFlags::TRANSFER_SRC,
            stages: vk::PipelineStageFlags::TRANSFER | vk::PipelineStageFlags::HOST,
            access: vk::AccessFlags::TRANSFER_READ | vk::AccessFlags::HOST_WRITE,
        };
        let buffer = self.factory.create_buffer(
            &info,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        )?;
        Ok(Arc::new(StagingBuffer::new(buffer)))
    }

    /// Releases a buffer obtained from [`allocate`](Self::allocate).
    ///
    /// Standard buffers are cleared and pooled while there is room; any other
    /// buffer is dropped. So is a buffer that is still referenced elsewhere.
    pub fn recycle(&self, mut buffer: Arc<StagingBuffer>) {
        if Arc::get_mut(&mut buffer).is_none() {
            log::trace!("StagingBufferAllocator: staging buffer still referenced, not pooling it");
            return;
        }

        if buffer.size() != self.default_size {
            log::debug!(
                "StagingBufferAllocator: discarding oversized staging buffer ({} bytes)",
                buffer.size()
            );
            return;
        }

        buffer.reset();
        if self.pool.give_back(buffer).is_err() {
            log::trace!("StagingBufferAllocator: pool full, dropping staging buffer");
        }
    }
}
