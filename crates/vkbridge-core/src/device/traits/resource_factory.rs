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

use crate::device::api::*;
use crate::device::error::ResourceError;
use ash::vk;
use std::fmt::Debug;
use std::sync::Arc;

/// Creates durable device objects.
///
/// None of these objects are pooled: each call builds a fresh object whose
/// lifetime is that of its longest holder.
pub trait ResourceFactory: Send + Sync + Debug + 'static {
    /// Creates a buffer and binds memory with the requested properties to it.
    /// ## Arguments
    /// * `info` - Size, usage, and the pipeline stages/access types the buffer is used with.
    /// * `memory_flags` - Required memory properties (e.g. device-local, host-visible).
    /// ## Errors
    /// * `ResourceError::OutOfMemory` - If the allocator cannot satisfy the request.
    fn create_buffer(
        &self,
        info: &BufferCreateInfo,
        memory_flags: vk::MemoryPropertyFlags,
    ) -> Result<Arc<Buffer>, ResourceError>;

    /// Creates a typed view over a range of `buffer`.
    fn create_buffer_view(
        &self,
        buffer: &Arc<Buffer>,
        info: &BufferViewCreateInfo,
    ) -> Result<Arc<BufferView>, ResourceError>;

    /// Creates an image and binds memory with the requested properties to it.
    /// ## Errors
    /// * `ResourceError::OutOfMemory` - If the allocator cannot satisfy the request.
    fn create_image(
        &self,
        info: &ImageCreateInfo,
        memory_flags: vk::MemoryPropertyFlags,
    ) -> Result<Arc<Image>, ResourceError>;

    /// Creates a view over a subresource range of `image`.
    fn create_image_view(
        &self,
        image: &Arc<Image>,
        info: &ImageViewCreateInfo,
    ) -> Result<Arc<ImageView>, ResourceError>;

    /// Creates a sampler.
    fn create_sampler(&self, info: &SamplerCreateInfo) -> Result<Arc<Sampler>, ResourceError>;

    /// Wraps SPIR-V code together with its declared binding interface.
    ///
    /// This does not compile anything on the device.
    fn create_shader(
        &self,
        stage: vk::ShaderStageFlags,
        slots: &[ResourceSlot],
        interface: InterfaceSlots,
        code: SpirvCode,
    ) -> Arc<Shader>;

    /// Creates a framebuffer for `targets`, using a cached render pass.
    ///
    /// The framebuffer size never exceeds the device's framebuffer limits.
    fn create_framebuffer(&self, targets: &RenderTargets)
        -> Result<Arc<Framebuffer>, ResourceError>;

    /// Creates a GPU event.
    fn create_gpu_event(&self) -> Result<Arc<GpuEvent>, ResourceError>;

    /// Creates a GPU query object.
    fn create_gpu_query(
        &self,
        query_type: vk::QueryType,
        flags: vk::QueryControlFlags,
        index: u32,
    ) -> Arc<GpuQuery>;
}
