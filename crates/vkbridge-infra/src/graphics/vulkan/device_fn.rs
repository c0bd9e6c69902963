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

use super::conversions::{attachment_description, descriptor_pool_sizes, IntoVk};
use ash::prelude::VkResult;
use ash::vk;
use std::fmt;
use vkbridge_core::device::{
    BufferCreateInfo, BufferViewCreateInfo, DeviceFn, FramebufferSize, ImageCreateInfo,
    ImageViewCreateInfo, MemorySlice, QueueSubmission, RenderPassFormat, SamplerCreateInfo,
};

/// The [`DeviceFn`] implementation backed by an `ash` logical device.
///
/// Takes ownership of the logical device and destroys it on drop. Every device
/// object holds a reference to its function table, so this only happens once
/// the last object is gone.
pub struct AshDeviceFn {
    device: ash::Device,
}

impl AshDeviceFn {
    /// Wraps a logical device created by the adapter layer.
    pub fn new(device: ash::Device) -> Self {
        log::info!("AshDeviceFn: wrapping logical device {:?}", device.handle());
        Self { device }
    }

    /// The underlying `ash` device.
    pub fn raw(&self) -> &ash::Device {
        &self.device
    }
}

impl fmt::Debug for AshDeviceFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AshDeviceFn")
            .field("device", &self.device.handle())
            .finish()
    }
}

impl Drop for AshDeviceFn {
    fn drop(&mut self) {
        log::info!("AshDeviceFn: destroying logical device {:?}", self.device.handle());
        // SAFETY: every object created through this table keeps it alive, so none remain.
        unsafe { self.device.destroy_device(None) };
    }
}

// SAFETY (for every block below): handles passed in were created through this
// same device, and callers never destroy a handle twice.
impl DeviceFn for AshDeviceFn {
    fn get_device_queue(&self, queue_family: u32, index: u32) -> vk::Queue {
        unsafe { self.device.get_device_queue(queue_family, index) }
    }

    fn device_wait_idle(&self) -> VkResult<()> {
        unsafe { self.device.device_wait_idle() }
    }

    fn allocate_memory(
        &self,
        memory_type: u32,
        size: vk::DeviceSize,
    ) -> VkResult<vk::DeviceMemory> {
        let info = vk::MemoryAllocateInfo::default()
            .allocation_size(size)
            .memory_type_index(memory_type);
        unsafe { self.device.allocate_memory(&info, None) }
    }

    fn free_memory(&self, memory: vk::DeviceMemory) {
        unsafe { self.device.free_memory(memory, None) }
    }

    fn create_buffer(&self, info: &BufferCreateInfo) -> VkResult<vk::Buffer> {
        let vk_info: vk::BufferCreateInfo = info.into_vk();
        unsafe { self.device.create_buffer(&vk_info, None) }
    }

    fn buffer_memory_requirements(&self, buffer: vk::Buffer) -> vk::MemoryRequirements {
        unsafe { self.device.get_buffer_memory_requirements(buffer) }
    }

    fn bind_buffer_memory(&self, buffer: vk::Buffer, memory: &MemorySlice) -> VkResult<()> {
        unsafe {
            self.device
                .bind_buffer_memory(buffer, memory.memory, memory.offset)
        }
    }

    fn destroy_buffer(&self, buffer: vk::Buffer) {
        unsafe { self.device.destroy_buffer(buffer, None) }
    }

    fn create_image(&self, info: &ImageCreateInfo) -> VkResult<vk::Image> {
        let vk_info: vk::ImageCreateInfo = info.into_vk();
        unsafe { self.device.create_image(&vk_info, None) }
    }

    fn image_memory_requirements(&self, image: vk::Image) -> vk::MemoryRequirements {
        unsafe { self.device.get_image_memory_requirements(image) }
    }

    fn bind_image_memory(&self, image: vk::Image, memory: &MemorySlice) -> VkResult<()> {
        unsafe {
            self.device
                .bind_image_memory(image, memory.memory, memory.offset)
        }
    }

    fn destroy_image(&self, image: vk::Image) {
        unsafe { self.device.destroy_image(image, None) }
    }

    fn create_buffer_view(
        &self,
        buffer: vk::Buffer,
        info: &BufferViewCreateInfo,
    ) -> VkResult<vk::BufferView> {
        let vk_info = vk::BufferViewCreateInfo::default()
            .buffer(buffer)
            .format(info.format)
            .offset(info.range_offset)
            .range(info.range_length);
        unsafe { self.device.create_buffer_view(&vk_info, None) }
    }

    fn destroy_buffer_view(&self, view: vk::BufferView) {
        unsafe { self.device.destroy_buffer_view(view, None) }
    }

    fn create_image_view(
        &self,
        image: vk::Image,
        info: &ImageViewCreateInfo,
    ) -> VkResult<vk::ImageView> {
        let vk_info = vk::ImageViewCreateInfo::default()
            .image(image)
            .view_type(info.view_type)
            .format(info.format)
            .components(info.swizzle)
            .subresource_range(info.into_vk());
        unsafe { self.device.create_image_view(&vk_info, None) }
    }

    fn destroy_image_view(&self, view: vk::ImageView) {
        unsafe { self.device.destroy_image_view(view, None) }
    }

    fn create_sampler(&self, info: &SamplerCreateInfo) -> VkResult<vk::Sampler> {
        let vk_info: vk::SamplerCreateInfo = info.into_vk();
        unsafe { self.device.create_sampler(&vk_info, None) }
    }

    fn destroy_sampler(&self, sampler: vk::Sampler) {
        unsafe { self.device.destroy_sampler(sampler, None) }
    }

    fn create_render_pass(&self, format: &RenderPassFormat) -> VkResult<vk::RenderPass> {
        // Attachment order matches RenderTargets::attachments: depth, then used color slots.
        let mut descriptions = Vec::new();

        let depth_ref = format.has_depth().then(|| {
            descriptions.push(attachment_description(format.depth, format.sample_count));
            vk::AttachmentReference {
                attachment: 0,
                layout: format.depth.layout,
            }
        });

        let color_count = format
            .color
            .iter()
            .rposition(|c| c.is_used())
            .map_or(0, |last| last + 1);

        let color_refs: Vec<vk::AttachmentReference> = format.color[..color_count]
            .iter()
            .map(|color| {
                if !color.is_used() {
                    return vk::AttachmentReference {
                        attachment: vk::ATTACHMENT_UNUSED,
                        layout: vk::ImageLayout::UNDEFINED,
                    };
                }
                let attachment = descriptions.len() as u32;
                descriptions.push(attachment_description(*color, format.sample_count));
                vk::AttachmentReference {
                    attachment,
                    layout: color.layout,
                }
            })
            .collect();

        let mut subpass = vk::SubpassDescription::default()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(&color_refs);
        if let Some(depth_ref) = depth_ref.as_ref() {
            subpass = subpass.depth_stencil_attachment(depth_ref);
        }

        let vk_info = vk::RenderPassCreateInfo::default()
            .attachments(&descriptions)
            .subpasses(std::slice::from_ref(&subpass));
        unsafe { self.device.create_render_pass(&vk_info, None) }
    }

    fn destroy_render_pass(&self, render_pass: vk::RenderPass) {
        unsafe { self.device.destroy_render_pass(render_pass, None) }
    }

    fn create_framebuffer(
        &self,
        render_pass: vk::RenderPass,
        attachments: &[vk::ImageView],
        size: FramebufferSize,
    ) -> VkResult<vk::Framebuffer> {
        let vk_info = vk::FramebufferCreateInfo::default()
            .render_pass(render_pass)
            .attachments(attachments)
            .width(size.width)
            .height(size.height)
            .layers(size.layers);
        unsafe { self.device.create_framebuffer(&vk_info, None) }
    }

    fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer) {
        unsafe { self.device.destroy_framebuffer(framebuffer, None) }
    }

    fn create_event(&self) -> VkResult<vk::Event> {
        unsafe {
            self.device
                .create_event(&vk::EventCreateInfo::default(), None)
        }
    }

    fn destroy_event(&self, event: vk::Event) {
        unsafe { self.device.destroy_event(event, None) }
    }

    fn create_command_pool(&self, queue_family: u32) -> VkResult<vk::CommandPool> {
        let vk_info = vk::CommandPoolCreateInfo::default()
            .flags(vk::CommandPoolCreateFlags::TRANSIENT)
            .queue_family_index(queue_family);
        unsafe { self.device.create_command_pool(&vk_info, None) }
    }

    fn allocate_command_buffer(&self, pool: vk::CommandPool) -> VkResult<vk::CommandBuffer> {
        let vk_info = vk::CommandBufferAllocateInfo::default()
            .command_pool(pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(1);
        let buffers = unsafe { self.device.allocate_command_buffers(&vk_info)? };
        buffers
            .into_iter()
            .next()
            .ok_or(vk::Result::ERROR_UNKNOWN)
    }

    fn reset_command_pool(&self, pool: vk::CommandPool) -> VkResult<()> {
        unsafe {
            self.device
                .reset_command_pool(pool, vk::CommandPoolResetFlags::empty())
        }
    }

    fn destroy_command_pool(&self, pool: vk::CommandPool) {
        unsafe { self.device.destroy_command_pool(pool, None) }
    }

    fn begin_command_buffer(&self, command_buffer: vk::CommandBuffer) -> VkResult<()> {
        let vk_info = vk::CommandBufferBeginInfo::default()
            .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
        unsafe { self.device.begin_command_buffer(command_buffer, &vk_info) }
    }

    fn end_command_buffer(&self, command_buffer: vk::CommandBuffer) -> VkResult<()> {
        unsafe { self.device.end_command_buffer(command_buffer) }
    }

    fn create_fence(&self) -> VkResult<vk::Fence> {
        unsafe {
            self.device
                .create_fence(&vk::FenceCreateInfo::default(), None)
        }
    }

    fn wait_for_fence(&self, fence: vk::Fence, timeout_ns: u64) -> VkResult<()> {
        unsafe { self.device.wait_for_fences(&[fence], true, timeout_ns) }
    }

    fn reset_fence(&self, fence: vk::Fence) -> VkResult<()> {
        unsafe { self.device.reset_fences(&[fence]) }
    }

    fn destroy_fence(&self, fence: vk::Fence) {
        unsafe { self.device.destroy_fence(fence, None) }
    }

    fn create_descriptor_pool(&self, max_sets: u32) -> VkResult<vk::DescriptorPool> {
        let sizes = descriptor_pool_sizes(max_sets);
        let vk_info = vk::DescriptorPoolCreateInfo::default()
            .max_sets(max_sets)
            .pool_sizes(&sizes);
        unsafe { self.device.create_descriptor_pool(&vk_info, None) }
    }

    fn reset_descriptor_pool(&self, pool: vk::DescriptorPool) -> VkResult<()> {
        unsafe {
            self.device
                .reset_descriptor_pool(pool, vk::DescriptorPoolResetFlags::empty())
        }
    }

    fn destroy_descriptor_pool(&self, pool: vk::DescriptorPool) {
        unsafe { self.device.destroy_descriptor_pool(pool, None) }
    }

    fn queue_submit(&self, queue: vk::Queue, submission: &QueueSubmission) -> VkResult<()> {
        let (wait_semaphores, wait_stages) = if submission.wait_semaphore == vk::Semaphore::null() {
            (Vec::new(), Vec::new())
        } else {
            (
                vec![submission.wait_semaphore],
                vec![submission.wait_stages],
            )
        };
        let signal_semaphores = if submission.signal_semaphore == vk::Semaphore::null() {
            Vec::new()
        } else {
            vec![submission.signal_semaphore]
        };
        let command_buffers = [submission.command_buffer];

        let submit_info = vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);

        unsafe {
            self.device
                .queue_submit(queue, &[submit_info], submission.fence)
        }
    }
}
