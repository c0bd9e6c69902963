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

use crate::device::api::{MemorySlice, MemoryStats};
use crate::device::error::ResourceError;
use ash::vk;
use std::fmt::Debug;

/// Supplies backing storage for buffers and images.
///
/// Implementations provide their own internal synchronization; the device calls
/// them from whichever thread is creating or dropping an object.
pub trait MemoryAllocator: Send + Sync + Debug + 'static {
    /// Allocates memory that satisfies `requirements` and has every property in `flags`.
    /// ## Errors
    /// * `ResourceError::OutOfMemory` - If no memory type can satisfy the request.
    fn alloc(
        &self,
        requirements: &vk::MemoryRequirements,
        flags: vk::MemoryPropertyFlags,
    ) -> Result<MemorySlice, ResourceError>;

    /// Releases a slice returned by [`alloc`](Self::alloc).
    fn free(&self, slice: &MemorySlice);

    /// Returns the live allocation totals.
    fn memory_stats(&self) -> MemoryStats;
}
