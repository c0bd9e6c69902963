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

//! Images and image views.

use crate::device::api::memory::MemorySlice;
use crate::device::error::ResourceError;
use crate::device::traits::{DeviceFn, MemoryAllocator};
use ash::vk;
use std::sync::Arc;

/// Describes an image to be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageCreateInfo {
    /// Dimensionality of the image.
    pub image_type: vk::ImageType,
    /// Pixel format.
    pub format: vk::Format,
    /// Additional creation flags (e.g. cube-compatible).
    pub flags: vk::ImageCreateFlags,
    /// Number of samples per pixel.
    pub sample_count: vk::SampleCountFlags,
    /// Size of the top mip level.
    pub extent: vk::Extent3D,
    /// Number of array layers.
    pub num_layers: u32,
    /// Number of mip levels.
    pub mip_levels: u32,
    /// Usages the image will be created with.
    pub usage: vk::ImageUsageFlags,
    /// Pipeline stages that may access the image.
    pub stages: vk::PipelineStageFlags,
    /// Access types the image will be used with.
    pub access: vk::AccessFlags,
    /// Memory tiling.
    pub tiling: vk::ImageTiling,
    /// Layout the image is kept in between uses.
    pub layout: vk::ImageLayout,
}

impl Default for ImageCreateInfo {
    fn default() -> Self {
        Self {
            image_type: vk::ImageType::TYPE_2D,
            format: vk::Format::UNDEFINED,
            flags: vk::ImageCreateFlags::empty(),
            sample_count: vk::SampleCountFlags::TYPE_1,
            extent: vk::Extent3D {
                width: 1,
                height: 1,
                depth: 1,
            },
            num_layers: 1,
            mip_levels: 1,
            usage: vk::ImageUsageFlags::empty(),
            stages: vk::PipelineStageFlags::empty(),
            access: vk::AccessFlags::empty(),
            tiling: vk::ImageTiling::OPTIMAL,
            layout: vk::ImageLayout::GENERAL,
        }
    }
}

/// Describes a view over a subresource range of an image.
#[derive(Debug, Clone, Copy)]
pub struct ImageViewCreateInfo {
    /// Type of the view.
    pub view_type: vk::ImageViewType,
    /// Format the view interprets the image data with.
    pub format: vk::Format,
    /// Aspects (color, depth, stencil) covered by the view.
    pub aspect: vk::ImageAspectFlags,
    /// First mip level visible through the view.
    pub min_level: u32,
    /// Number of visible mip levels.
    pub num_levels: u32,
    /// First array layer visible through the view.
    pub min_layer: u32,
    /// Number of visible array layers.
    pub num_layers: u32,
    /// Component swizzle.
    pub swizzle: vk::ComponentMapping,
}

impl Default for ImageViewCreateInfo {
    fn default() -> Self {
        Self {
            view_type: vk::ImageViewType::TYPE_2D,
            format: vk::Format::UNDEFINED,
            aspect: vk::ImageAspectFlags::COLOR,
            min_level: 0,
            num_levels: 1,
            min_layer: 0,
            num_layers: 1,
            swizzle: vk::ComponentMapping::default(),
        }
    }
}

/// An image with bound device memory.
#[derive(Debug)]
pub struct Image {
    vkd: Arc<dyn DeviceFn>,
    allocator: Arc<dyn MemoryAllocator>,
    info: ImageCreateInfo,
    memory_flags: vk::MemoryPropertyFlags,
    handle: vk::Image,
    memory: MemorySlice,
}

impl Image {
    /// Creates the raw image, allocates memory for it and binds the two.
    pub fn new(
        vkd: Arc<dyn DeviceFn>,
        allocator: Arc<dyn MemoryAllocator>,
        info: ImageCreateInfo,
        memory_flags: vk::MemoryPropertyFlags,
    ) -> Result<Self, ResourceError> {
        if info.mip_levels == 0 || info.num_layers == 0 {
            return Err(ResourceError::InvalidArgument(
                "image needs at least one mip level and one layer".to_owned(),
            ));
        }

        let handle = vkd
            .create_image(&info)
            .map_err(|e| ResourceError::vulkan("vkCreateImage", e))?;

        let requirements = vkd.image_memory_requirements(handle);
        let memory = match allocator.alloc(&requirements, memory_flags) {
            Ok(memory) => memory,
            Err(e) => {
                vkd.destroy_image(handle);
                return Err(e);
            }
        };

        if let Err(result) = vkd.bind_image_memory(handle, &memory) {
            allocator.free(&memory);
            vkd.destroy_image(handle);
            return Err(ResourceError::vulkan("vkBindImageMemory", result));
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

    /// The raw image handle.
    pub fn handle(&self) -> vk::Image {
        self.handle
    }

    /// The parameters the image was created with.
    pub fn info(&self) -> &ImageCreateInfo {
        &self.info
    }

    /// The memory properties that were requested for this image.
    pub fn memory_flags(&self) -> vk::MemoryPropertyFlags {
        self.memory_flags
    }

    /// The memory range bound to this image.
    pub fn memory(&self) -> &MemorySlice {
        &self.memory
    }

    /// Size of mip level `level`. No dimension ever drops below one.
    pub fn mip_level_extent(&self, level: u32) -> vk::Extent3D {
        let shrink = |size: u32| size.checked_shr(level).unwrap_or(0).max(1);
        vk::Extent3D {
            width: shrink(self.info.extent.width),
            height: shrink(self.info.extent.height),
            depth: shrink(self.info.extent.depth),
        }
    }
}

impl Drop for Image {
    fn drop(&mut self) {
        self.vkd.destroy_image(self.handle);
        self.allocator.free(&self.memory);
    }
}

/// A view over a subresource range of an image. Keeps its image alive.
#[derive(Debug)]
pub struct ImageView {
    vkd: Arc<dyn DeviceFn>,
    image: Arc<Image>,
    info: ImageViewCreateInfo,
    handle: vk::ImageView,
}

impl ImageView {
    /// Creates a view over `image`.
    ///
    /// ## Errors
    /// * `ResourceError::InvalidArgument` - If the range lies outside the image.
    pub fn new(
        vkd: Arc<dyn DeviceFn>,
        image: Arc<Image>,
        info: ImageViewCreateInfo,
    ) -> Result<Self, ResourceError> {
        let image_info = image.info();
        let levels_ok = info.num_levels > 0
            && info
                .min_level
                .checked_add(info.num_levels)
                .is_some_and(|end| end <= image_info.mip_levels);
        let layers_ok = info.num_layers > 0
            && info
                .min_layer
                .checked_add(info.num_layers)
                .is_some_and(|end| end <= image_info.num_layers);

        if !levels_ok || !layers_ok {
            return Err(ResourceError::InvalidArgument(format!(
                "view range (levels {}+{}, layers {}+{}) outside of image ({} levels, {} layers)",
                info.min_level,
                info.num_levels,
                info.min_layer,
                info.num_layers,
                image_info.mip_levels,
                image_info.num_layers
            )));
        }

        let handle = vkd
            .create_image_view(image.handle(), &info)
            .map_err(|e| ResourceError::vulkan("vkCreateImageView", e))?;

        Ok(Self {
            vkd,
            image,
            info,
            handle,
        })
    }

    /// The raw view handle.
    pub fn handle(&self) -> vk::ImageView {
        self.handle
    }

    /// The image this view refers to.
    pub fn image(&self) -> &Arc<Image> {
        &self.image
    }

    /// The parameters the view was created with.
    pub fn info(&self) -> &ImageViewCreateInfo {
        &self.info
    }

    /// Size of mip level `level`, relative to the first level of the view.
    pub fn mip_level_extent(&self, level: u32) -> vk::Extent3D {
        self.image
            .mip_level_extent(self.info.min_level.saturating_add(level))
    }
}

impl Drop for ImageView {
    fn drop(&mut self) {
        self.vkd.destroy_image_view(self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_covers_one_color_subresource() {
        let info = ImageViewCreateInfo::default();
        let copy = info;

        assert_eq!(copy.view_type, vk::ImageViewType::TYPE_2D);
        assert_eq!(copy.aspect, vk::ImageAspectFlags::COLOR);
        assert_eq!((copy.num_levels, copy.num_layers), (1, 1));
        assert_eq!(copy.swizzle.r, vk::ComponentSwizzle::IDENTITY);
        assert_eq!(info.swizzle.a, vk::ComponentSwizzle::IDENTITY);
    }

    #[test]
    fn default_image_is_a_single_texel() {
        let info = ImageCreateInfo::default();
        assert_eq!(info.image_type, vk::ImageType::TYPE_2D);
        assert_eq!(
            (info.extent.width, info.extent.height, info.extent.depth),
            (1, 1, 1)
        );
        assert_eq!((info.mip_levels, info.num_layers), (1, 1));
    }
}
