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

//! Samplers.

use crate::device::error::ResourceError;
use crate::device::traits::DeviceFn;
use ash::vk;
use std::sync::Arc;

/// Describes a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SamplerCreateInfo {
    /// Magnification filter.
    pub mag_filter: vk::Filter,
    /// Minification filter.
    pub min_filter: vk::Filter,
    /// Filter used between mip levels.
    pub mipmap_mode: vk::SamplerMipmapMode,
    /// Bias added to the computed level of detail.
    pub mip_lod_bias: f32,
    /// Lower clamp of the level of detail.
    pub mip_lod_min: f32,
    /// Upper clamp of the level of detail.
    pub mip_lod_max: f32,
    /// Enables anisotropic filtering.
    pub use_anisotropy: bool,
    /// Maximum anisotropy, only read if `use_anisotropy` is set.
    pub max_anisotropy: f32,
    /// Addressing mode along U.
    pub address_mode_u: vk::SamplerAddressMode,
    /// Addressing mode along V.
    pub address_mode_v: vk::SamplerAddressMode,
    /// Addressing mode along W.
    pub address_mode_w: vk::SamplerAddressMode,
    /// Turns the sampler into a depth-compare sampler.
    pub compare_to_depth: bool,
    /// Comparison used if `compare_to_depth` is set.
    pub compare_op: vk::CompareOp,
    /// Border color for clamp-to-border addressing.
    pub border_color: vk::BorderColor,
    /// Use unnormalized texel coordinates.
    pub use_pixel_coord: bool,
}

/// A sampler object.
#[derive(Debug)]
pub struct Sampler {
    vkd: Arc<dyn DeviceFn>,
    info: SamplerCreateInfo,
    handle: vk::Sampler,
}

impl Sampler {
    /// Creates a sampler from `info`.
    pub fn new(vkd: Arc<dyn DeviceFn>, info: SamplerCreateInfo) -> Result<Self, ResourceError> {
        if info.mip_lod_min > info.mip_lod_max {
            return Err(ResourceError::InvalidArgument(format!(
                "sampler lod range {}..{} is inverted",
                info.mip_lod_min, info.mip_lod_max
            )));
        }

        let handle = vkd
            .create_sampler(&info)
            .map_err(|e| ResourceError::vulkan("vkCreateSampler", e))?;
        Ok(Self { vkd, info, handle })
    }

    /// The raw sampler handle.
    pub fn handle(&self) -> vk::Sampler {
        self.handle
    }

    /// The parameters the sampler was created with.
    pub fn info(&self) -> &SamplerCreateInfo {
        &self.info
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.vkd.destroy_sampler(self.handle);
    }
}
