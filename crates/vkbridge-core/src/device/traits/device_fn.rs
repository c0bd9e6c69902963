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
use ash::prelude::VkResult;
use ash::vk;
use std::fmt::Debug;

/// The device-level function table supplied by the adapter/instance layer.
///
/// Every device object keeps an `Arc<dyn DeviceFn>` and destroys its raw handle
/// through it when the last reference goes away. Implementations must be safe
/// to call from any thread, except [`queue_submit`](Self::queue_submit) which
/// the device always serializes behind its submission lock.
pub trait DeviceFn: Send + Sync + Debug + 'static {
    /// Retrieves the queue handle at `index` in `queue_family`.
    fn get_device_queue(&self, queue_family: u32, index: u32) -> vk::Queue;

    /// Blocks until every queue of the device is idle.
    fn device_wait_idle(&self) -> VkResult<()>;

    /// Allocates `size` bytes of device memory from `memory_type`.
    fn allocate_memory(&self, memory_type: u32, size: vk::DeviceSize)
        -> VkResult<vk::DeviceMemory>;

    /// Frees memory returned by [`allocate_memory`](Self::allocate_memory).
    fn free_memory(&self, memory: vk::DeviceMemory);

    /// Creates a buffer without backing memory.
    fn create_buffer(&self, info: &BufferCreateInfo) -> VkResult<vk::Buffer>;

    /// Queries the memory requirements of a buffer.
    fn buffer_memory_requirements(&self, buffer: vk::Buffer) -> vk::MemoryRequirements;

    /// Binds a memory slice to a buffer.
    fn bind_buffer_memory(&self, buffer: vk::Buffer, memory: &MemorySlice) -> VkResult<()>;

    /// Destroys a buffer.
    fn destroy_buffer(&self, buffer: vk::Buffer);

    /// Creates an image without backing memory.
    fn create_image(&self, info: &ImageCreateInfo) -> VkResult<vk::Image>;

    /// Queries the memory requirements of an image.
    fn image_memory_requirements(&self, image: vk::Image) -> vk::MemoryRequirements;

    /// Binds a memory slice to an image.
    fn bind_image_memory(&self, image: vk::Image, memory: &MemorySlice) -> VkResult<()>;

    /// Destroys an image.
    fn destroy_image(&self, image: vk::Image);

    /// Creates a typed view over a buffer range.
    fn create_buffer_view(
        &self,
        buffer: vk::Buffer,
        info: &BufferViewCreateInfo,
    ) -> VkResult<vk::BufferView>;

    /// Destroys a buffer view.
    fn destroy_buffer_view(&self, view: vk::BufferView);

    /// Creates an image view.
    fn create_image_view(
        &self,
        image: vk::Image,
        info: &ImageViewCreateInfo,
    ) -> VkResult<vk::ImageView>;

    /// Destroys an image view.
    fn destroy_image_view(&self, view: vk::ImageView);

    /// Creates a sampler.
    fn create_sampler(&self, info: &SamplerCreateInfo) -> VkResult<vk::Sampler>;

    /// Destroys a sampler.
    fn destroy_sampler(&self, sampler: vk::Sampler);

    /// Creates a render pass compatible with `format`.
    fn create_render_pass(&self, format: &RenderPassFormat) -> VkResult<vk::RenderPass>;

    /// Destroys a render pass.
    fn destroy_render_pass(&self, render_pass: vk::RenderPass);

    /// Creates a framebuffer for `render_pass` with the given attachments.
    fn create_framebuffer(
        &self,
        render_pass: vk::RenderPass,
        attachments: &[vk::ImageView],
        size: FramebufferSize,
    ) -> VkResult<vk::Framebuffer>;

    /// Destroys a framebuffer.
    fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer);

    /// Creates an unsignaled event.
    fn create_event(&self) -> VkResult<vk::Event>;

    /// Destroys an event.
    fn destroy_event(&self, event: vk::Event);

    /// Creates a resettable command pool for `queue_family`.
    fn create_command_pool(&self, queue_family: u32) -> VkResult<vk::CommandPool>;

    /// Allocates one primary command buffer from `pool`.
    fn allocate_command_buffer(&self, pool: vk::CommandPool) -> VkResult<vk::CommandBuffer>;

    /// Resets every command buffer allocated from `pool`.
    fn reset_command_pool(&self, pool: vk::CommandPool) -> VkResult<()>;

    /// Destroys a command pool and its command buffers.
    fn destroy_command_pool(&self, pool: vk::CommandPool);

    /// Puts a command buffer into the recording state.
    fn begin_command_buffer(&self, command_buffer: vk::CommandBuffer) -> VkResult<()>;

    /// Finishes recording a command buffer.
    fn end_command_buffer(&self, command_buffer: vk::CommandBuffer) -> VkResult<()>;

    /// Creates an unsignaled fence.
    fn create_fence(&self) -> VkResult<vk::Fence>;

    /// Waits up to `timeout_ns` for `fence`. Returns `Err(vk::Result::TIMEOUT)`
    /// if the fence is still unsignaled when the timeout elapses.
    fn wait_for_fence(&self, fence: vk::Fence, timeout_ns: u64) -> VkResult<()>;

    /// Returns a fence to the unsignaled state.
    fn reset_fence(&self, fence: vk::Fence) -> VkResult<()>;

    /// Destroys a fence.
    fn destroy_fence(&self, fence: vk::Fence);

    /// Creates a descriptor pool able to hold `max_sets` sets.
    fn create_descriptor_pool(&self, max_sets: u32) -> VkResult<vk::DescriptorPool>;

    /// Frees every set allocated from `pool`.
    fn reset_descriptor_pool(&self, pool: vk::DescriptorPool) -> VkResult<()>;

    /// Destroys a descriptor pool.
    fn destroy_descriptor_pool(&self, pool: vk::DescriptorPool);

    /// Submits one command buffer to `queue`.
    fn queue_submit(&self, queue: vk::Queue, submission: &QueueSubmission) -> VkResult<()>;
}
