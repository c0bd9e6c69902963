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
use vkbridge_core::device::{
    Buffer, BufferCreateInfo, BufferView, BufferViewCreateInfo, DeviceFn, Framebuffer,
    FramebufferSize, GpuEvent, GpuQuery, Image, ImageCreateInfo, ImageView, ImageViewCreateInfo,
    InterfaceSlots, MemoryAllocator, RenderPassCache, RenderTargets, ResourceError,
    ResourceFactory, ResourceSlot, Sampler, SamplerCreateInfo, Shader, SpirvCode,
};

/// Creates durable device objects from caller-supplied descriptors, the memory
/// allocator and the render-pass cache.
#[derive(Debug)]
pub struct DeviceResourceFactory {
    vkd: Arc<dyn DeviceFn>,
    memory: Arc<dyn MemoryAllocator>,
    render_passes: Arc<dyn RenderPassCache>,
    framebuffer_limits: FramebufferSize,
}

impl DeviceResourceFactory {
    /// Creates a factory. Framebuffers it builds never exceed `framebuffer_limits`.
    pub fn new(
        vkd: Arc<dyn DeviceFn>,
        memory: Arc<dyn MemoryAllocator>,
        render_passes: Arc<dyn RenderPassCache>,
        framebuffer_limits: FramebufferSize,
    ) -> Self {
        Self {
            vkd,
            memory,
            render_passes,
            framebuffer_limits,
        }
    }

    /// The largest framebuffer this factory will create.
    pub fn framebuffer_limits(&self) -> FramebufferSize {
        self.framebuffer_limits
    }
}

impl ResourceFactory for DeviceResourceFactory {
    fn create_buffer(
        &self,
        info: &BufferCreateInfo,
        memory_flags: vk::MemoryPropertyFlags,
    ) -> Result<Arc<Buffer>, ResourceError> {
        let buffer = Buffer::new(
            Arc::clone(&self.vkd),
            Arc::clone(&self.memory),
            *info,
            memory_flags,
        )?;
        log::trace!(
            "DeviceResourceFactory: created buffer {:?} ({} bytes, {:?})",
            buffer.handle(),
            info.size,
            memory_flags
        );
        Ok(Arc::new(buffer))
    }

    fn create_buffer_view(
        &self,
        buffer: &Arc<Buffer>,
        info: &BufferViewCreateInfo,
    ) -> Result<Arc<BufferView>, ResourceError> {
        BufferView::new(Arc::clone(&self.vkd), Arc::clone(buffer), *info).map(Arc::new)
    }

    fn create_image(
        &self,
        info: &ImageCreateInfo,
        memory_flags: vk::MemoryPropertyFlags,
    ) -> Result<Arc<Image>, ResourceError> {
        let image = Image::new(
            Arc::clone(&self.vkd),
            Arc::clone(&self.memory),
            *info,
            memory_flags,
        )?;
        log::trace!(
            "DeviceResourceFactory: created image {:?} ({:?}, {:?})",
            image.handle(),
            info.format,
            info.extent
        );
        Ok(Arc::new(image))
    }

    fn create_image_view(
        &self,
        image: &Arc<Image>,
        info: &ImageViewCreateInfo,
    ) -> Result<Arc<ImageView>, ResourceError> {
        ImageView::new(Arc::clone(&self.vkd), Arc::clone(image), *info).map(Arc::new)
    }

    fn create_sampler(&self, info: &SamplerCreateInfo) -> Result<Arc<Sampler>, ResourceError> {
        Sampler::new(Arc::clone(&self.vkd), *info).map(Arc::new)
    }

    fn create_shader(
        &self,
        stage: vk::ShaderStageFlags,
        slots: &[ResourceSlot],
        interface: InterfaceSlots,
        code: SpirvCode,
    ) -> Arc<Shader> {
        Arc::new(Shader::new(stage, slots, interface, code))
    }

    fn create_framebuffer(
        &self,
        targets: &RenderTargets,
    ) -> Result<Arc<Framebuffer>, ResourceError> {
        let format = targets.render_pass_format();
        let render_pass = self.render_passes.render_pass(&format)?;
        let size = targets.compute_size(self.framebuffer_limits);

        Framebuffer::new(Arc::clone(&self.vkd), render_pass, targets.clone(), size).map(Arc::new)
    }

    fn create_gpu_event(&self) -> Result<Arc<GpuEvent>, ResourceError> {
        GpuEvent::new(Arc::clone(&self.vkd)).map(Arc::new)
    }

    fn create_gpu_query(
        &self,
        query_type: vk::QueryType,
        flags: vk::QueryControlFlags,
        index: u32,
    ) -> Arc<GpuQuery> {
        Arc::new(GpuQuery::new(query_type, flags, index))
    }
}
