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

//! Conversions from the runtime's creation descriptors to raw Vulkan structures.

use ash::vk;
use vkbridge_core::device::{
    AttachmentFormat, BufferCreateInfo, ImageCreateInfo, ImageViewCreateInfo, SamplerCreateInfo,
};

/// A local extension trait to convert the runtime's descriptors into Vulkan structures.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_vk()` syntax.
pub trait IntoVk<T> {
    /// Consumes self and converts it into a Vulkan structure.
    fn into_vk(self) -> T;
}

impl IntoVk<vk::BufferCreateInfo<'static>> for BufferCreateInfo {
    fn into_vk(self) -> vk::BufferCreateInfo<'static> {
        vk::BufferCreateInfo::default()
            .size(self.size)
            .usage(self.usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
    }
}

impl IntoVk<vk::ImageCreateInfo<'static>> for ImageCreateInfo {
    fn into_vk(self) -> vk::ImageCreateInfo<'static> {
        vk::ImageCreateInfo::default()
            .flags(self.flags)
            .image_type(self.image_type)
            .format(self.format)
            .extent(self.extent)
            .mip_levels(self.mip_levels)
            .array_layers(self.num_layers)
            .samples(self.sample_count)
            .tiling(self.tiling)
            .usage(self.usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED)
    }
}

impl IntoVk<vk::ImageSubresourceRange> for ImageViewCreateInfo {
    fn into_vk(self) -> vk::ImageSubresourceRange {
        vk::ImageSubresourceRange {
            aspect_mask: self.aspect,
            base_mip_level: self.min_level,
            level_count: self.num_levels,
            base_array_layer: self.min_layer,
            layer_count: self.num_layers,
        }
    }
}

impl IntoVk<vk::SamplerCreateInfo<'static>> for SamplerCreateInfo {
    fn into_vk(self) -> vk::SamplerCreateInfo<'static> {
        vk::SamplerCreateInfo::default()
            .mag_filter(self.mag_filter)
            .min_filter(self.min_filter)
            .mipmap_mode(self.mipmap_mode)
            .address_mode_u(self.address_mode_u)
            .address_mode_v(self.address_mode_v)
            .address_mode_w(self.address_mode_w)
            .mip_lod_bias(self.mip_lod_bias)
            .anisotropy_enable(self.use_anisotropy)
            .max_anisotropy(self.max_anisotropy)
            .compare_enable(self.compare_to_depth)
            .compare_op(self.compare_op)
            .min_lod(self.mip_lod_min)
            .max_lod(self.mip_lod_max)
            .border_color(self.border_color)
            .unnormalized_coordinates(self.use_pixel_coord)
    }
}

/// Describes one render pass attachment. Contents are preserved across the pass.
pub fn attachment_description(
    format: AttachmentFormat,
    samples: vk::SampleCountFlags,
) -> vk::AttachmentDescription {
    vk::AttachmentDescription::default()
        .format(format.format)
        .samples(samples)
        .load_op(vk::AttachmentLoadOp::LOAD)
        .store_op(vk::AttachmentStoreOp::STORE)
        .stencil_load_op(vk::AttachmentLoadOp::LOAD)
        .stencil_store_op(vk::AttachmentStoreOp::STORE)
        .initial_layout(format.layout)
        .final_layout(format.layout)
}

/// Pool sizes of a descriptor pool holding `max_sets` sets.
pub fn descriptor_pool_sizes(max_sets: u32) -> [vk::DescriptorPoolSize; 7] {
    let size = |ty: vk::DescriptorType, per_set: u32| vk::DescriptorPoolSize {
        ty,
        descriptor_count: max_sets.saturating_mul(per_set),
    };

    [
        size(vk::DescriptorType::UNIFORM_BUFFER, 2),
        size(vk::DescriptorType::STORAGE_BUFFER, 2),
        size(vk::DescriptorType::UNIFORM_TEXEL_BUFFER, 1),
        size(vk::DescriptorType::STORAGE_TEXEL_BUFFER, 1),
        size(vk::DescriptorType::SAMPLED_IMAGE, 2),
        size(vk::DescriptorType::STORAGE_IMAGE, 1),
        size(vk::DescriptorType::SAMPLER, 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_info_to_vk() {
        let info = BufferCreateInfo {
            size: 4096,
            usage: vk::BufferUsageFlags::TRANSFER_SRC,
            stages: vk::PipelineStageFlags::TRANSFER,
            access: vk::AccessFlags::TRANSFER_READ,
        };
        let vk_info: vk::BufferCreateInfo = info.into_vk();
        assert_eq!(vk_info.size, 4096);
        assert_eq!(vk_info.usage, vk::BufferUsageFlags::TRANSFER_SRC);
        assert_eq!(vk_info.sharing_mode, vk::SharingMode::EXCLUSIVE);
    }

    #[test]
    fn test_image_info_to_vk() {
        let info = ImageCreateInfo {
            format: vk::Format::R8G8B8A8_UNORM,
            extent: vk::Extent3D {
                width: 64,
                height: 32,
                depth: 1,
            },
            num_layers: 6,
            mip_levels: 4,
            ..Default::default()
        };
        let vk_info: vk::ImageCreateInfo = info.into_vk();
        assert_eq!(vk_info.array_layers, 6);
        assert_eq!(vk_info.mip_levels, 4);
        assert_eq!(vk_info.extent.width, 64);
        assert_eq!(vk_info.initial_layout, vk::ImageLayout::UNDEFINED);
    }

    #[test]
    fn test_view_info_to_subresource_range() {
        let info = ImageViewCreateInfo {
            min_level: 1,
            num_levels: 2,
            min_layer: 3,
            num_layers: 4,
            ..Default::default()
        };
        let range: vk::ImageSubresourceRange = info.into_vk();
        assert_eq!(range.base_mip_level, 1);
        assert_eq!(range.level_count, 2);
        assert_eq!(range.base_array_layer, 3);
        assert_eq!(range.layer_count, 4);
    }

    #[test]
    fn test_sampler_bools_map_to_vk_bools() {
        let info = SamplerCreateInfo {
            use_anisotropy: true,
            max_anisotropy: 16.0,
            ..Default::default()
        };
        let vk_info: vk::SamplerCreateInfo = info.into_vk();
        assert_eq!(vk_info.anisotropy_enable, vk::TRUE);
        assert_eq!(vk_info.compare_enable, vk::FALSE);
        assert_eq!(vk_info.max_anisotropy, 16.0);
    }

    #[test]
    fn test_descriptor_pool_sizes_scale_with_sets() {
        let sizes = descriptor_pool_sizes(100);
        assert_eq!(sizes[0].ty, vk::DescriptorType::UNIFORM_BUFFER);
        assert_eq!(sizes[0].descriptor_count, 200);
        assert!(sizes.iter().all(|s| s.descriptor_count >= 100));
    }
}
