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
    Buffer, BufferCreateInfo, ResourceError, ResourceFactory, Sampler, SamplerCreateInfo,
};

/// Dummy objects bound to resource slots the application left empty.
#[derive(Debug)]
pub struct UnboundResources {
    buffer: Arc<Buffer>,
    sampler: Arc<Sampler>,
}

impl UnboundResources {
    /// Creates a device-local dummy buffer of `buffer_size` bytes and a dummy sampler.
    pub fn new(
        factory: &dyn ResourceFactory,
        buffer_size: vk::DeviceSize,
    ) -> Result<Self, ResourceError> {
        let buffer_info = BufferCreateInfo {
            size: buffer_size,
            usage: vk::BufferUsageFlags::UNIFORM_BUFFER
                | vk::BufferUsageFlags::STORAGE_BUFFER
                | vk::BufferUsageFlags::TRANSFER_DST,
            stages: vk::PipelineStageFlags::TRANSFER
                | vk::PipelineStageFlags::VERTEX_SHADER
                | vk::PipelineStageFlags::FRAGMENT_SHADER
                | vk::PipelineStageFlags::COMPUTE_SHADER,
            access: vk::AccessFlags::TRANSFER_WRITE
                | vk::AccessFlags::UNIFORM_READ
                | vk::AccessFlags::SHADER_READ
                | vk::AccessFlags::SHADER_WRITE,
        };
        let buffer =
            factory.create_buffer(&buffer_info, vk::MemoryPropertyFlags::DEVICE_LOCAL)?;

        let sampler_info = SamplerCreateInfo {
            mag_filter: vk::Filter::LINEAR,
            min_filter: vk::Filter::LINEAR,
            mipmap_mode: vk::SamplerMipmapMode::LINEAR,
            address_mode_u: vk::SamplerAddressMode::CLAMP_TO_BORDER,
            address_mode_v: vk::SamplerAddressMode::CLAMP_TO_BORDER,
            address_mode_w: vk::SamplerAddressMode::CLAMP_TO_BORDER,
            compare_op: vk::CompareOp::NEVER,
            border_color: vk::BorderColor::FLOAT_TRANSPARENT_BLACK,
            ..Default::default()
        };
        let sampler = factory.create_sampler(&sampler_info)?;

        Ok(Self { buffer, sampler })
    }

    /// The dummy buffer.
    pub fn buffer(&self) -> &Arc<Buffer> {
        &self.buffer
    }

    /// The dummy sampler.
    pub fn sampler(&self) -> &Arc<Sampler> {
        &self.sampler
    }

    /// Descriptor covering the whole dummy buffer.
    pub fn buffer_descriptor(&self) -> vk::DescriptorBufferInfo {
        vk::DescriptorBufferInfo::default()
            .buffer(self.buffer.handle())
            .offset(0)
            .range(vk::WHOLE_SIZE)
    }
}
