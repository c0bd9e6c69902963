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

//! Host-visible staging buffers used as transfer sources.

use super::buffer::Buffer;
use ash::vk;
use parking_lot::Mutex;
use std::sync::Arc;

/// A range of a staging buffer handed out to one upload.
#[derive(Debug, Clone)]
pub struct StagingBufferSlice {
    /// The buffer the range lives in.
    pub buffer: Arc<Buffer>,
    /// Offset of the range, in bytes.
    pub offset: vk::DeviceSize,
    /// Length of the range, in bytes.
    pub length: vk::DeviceSize,
}

/// A staging buffer that serves several uploads by bump-allocating slices.
#[derive(Debug)]
pub struct StagingBuffer {
    buffer: Arc<Buffer>,
    offset: Mutex<vk::DeviceSize>,
}

impl StagingBuffer {
    /// Wraps a host-visible buffer.
    pub fn new(buffer: Arc<Buffer>) -> Self {
        Self {
            buffer,
            offset: Mutex::new(0),
        }
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &Arc<Buffer> {
        &self.buffer
    }

    /// Total capacity, in bytes.
    pub fn size(&self) -> vk::DeviceSize {
        self.buffer.size()
    }

    /// Bytes left after the last allocated slice.
    pub fn free_bytes(&self) -> vk::DeviceSize {
        self.size().saturating_sub(*self.offset.lock())
    }

    /// Allocates `size` bytes aligned to `align`. Returns `None` if they do not
    /// fit into the remaining space.
    pub fn alloc(&self, align: vk::DeviceSize, size: vk::DeviceSize) -> Option<StagingBufferSlice> {
        let mut offset = self.offset.lock();
        let start = offset.checked_next_multiple_of(align.max(1))?;
        let end = start.checked_add(size)?;
        if end > self.size() {
            return None;
        }

        *offset = end;
        Some(StagingBufferSlice {
            buffer: Arc::clone(&self.buffer),
            offset: start,
            length: size,
        })
    }

    /// Forgets every slice handed out so far.
    pub fn reset(&self) {
        *self.offset.lock() = 0;
    }
}
