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

//! Render targets and the framebuffers built from them.

use super::image::ImageView;
use super::render_pass::{AttachmentFormat, RenderPass, RenderPassFormat, MAX_NUM_RENDER_TARGETS};
use crate::device::error::ResourceError;
use crate::device::traits::DeviceFn;
use ash::vk;
use std::sync::Arc;

/// Width, height and layer count of a framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FramebufferSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Number of layers.
    pub layers: u32,
}

impl FramebufferSize {
    /// Elementwise minimum of two sizes.
    pub fn min(self, other: FramebufferSize) -> FramebufferSize {
        FramebufferSize {
            width: self.width.min(other.width),
            height: self.height.min(other.height),
            layers: self.layers.min(other.layers),
        }
    }
}

/// One bound attachment.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// The view rendered to.
    pub view: Arc<ImageView>,
    /// Layout of the view while rendering.
    pub layout: vk::ImageLayout,
}

impl Attachment {
    fn format(&self) -> AttachmentFormat {
        AttachmentFormat {
            format: self.view.info().format,
            layout: self.layout,
        }
    }

    fn size(&self) -> FramebufferSize {
        let extent = self.view.mip_level_extent(0);
        FramebufferSize {
            width: extent.width,
            height: extent.height,
            layers: self.view.info().num_layers,
        }
    }
}

/// The set of attachments a framebuffer is created from.
#[derive(Debug, Clone, Default)]
pub struct RenderTargets {
    /// Color attachments, indexed by render target slot.
    pub color: [Option<Attachment>; MAX_NUM_RENDER_TARGETS],
    /// Depth-stencil attachment.
    pub depth: Option<Attachment>,
}

impl RenderTargets {
    /// Iterates over the bound attachments, depth first.
    pub fn attachments(&self) -> impl Iterator<Item = &Attachment> + '_ {
        self.depth.iter().chain(self.color.iter().flatten())
    }

    /// Derives the render-pass compatibility key of these targets.
    ///
    /// The sample count is taken from the first bound attachment; with no
    /// attachments bound the pass is single-sampled.
    pub fn render_pass_format(&self) -> RenderPassFormat {
        let mut format = RenderPassFormat::default();

        if let Some(depth) = &self.depth {
            format.depth = depth.format();
        }
        for (dst, src) in format.color.iter_mut().zip(self.color.iter()) {
            if let Some(attachment) = src {
                *dst = attachment.format();
            }
        }
        if let Some(first) = self.attachments().next() {
            format.sample_count = first.view.image().info().sample_count;
        }
        format.layers = self
            .attachments()
            .map(|a| a.view.info().num_layers)
            .min()
            .unwrap_or(1);
        format
    }

    /// Computes the framebuffer size: the smallest attachment in every
    /// dimension, never larger than `limits`.
    pub fn compute_size(&self, limits: FramebufferSize) -> FramebufferSize {
        self.attachments()
            .fold(limits, |size, attachment| size.min(attachment.size()))
    }
}

/// A framebuffer. Keeps its render pass and every attachment alive.
#[derive(Debug)]
pub struct Framebuffer {
    vkd: Arc<dyn DeviceFn>,
    render_pass: Arc<RenderPass>,
    targets: RenderTargets,
    size: FramebufferSize,
    handle: vk::Framebuffer,
}

impl Framebuffer {
    /// Creates a framebuffer of `size` for `targets`.
    pub fn new(
        vkd: Arc<dyn DeviceFn>,
        render_pass: Arc<RenderPass>,
        targets: RenderTargets,
        size: FramebufferSize,
    ) -> Result<Self, ResourceError> {
        let views: Vec<vk::ImageView> = targets.attachments().map(|a| a.view.handle()).collect();

        let handle = vkd
            .create_framebuffer(render_pass.handle(), &views, size)
            .map_err(|e| ResourceError::vulkan("vkCreateFramebuffer", e))?;

        Ok(Self {
            vkd,
            render_pass,
            targets,
            size,
            handle,
        })
    }

    /// The raw framebuffer handle.
    pub fn handle(&self) -> vk::Framebuffer {
        self.handle
    }

    /// The render pass the framebuffer is compatible with.
    pub fn render_pass(&self) -> &Arc<RenderPass> {
        &self.render_pass
    }

    /// The attachments bound to the framebuffer.
    pub fn targets(&self) -> &RenderTargets {
        &self.targets
    }

    /// The declared framebuffer size.
    pub fn size(&self) -> FramebufferSize {
        self.size
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        self.vkd.destroy_framebuffer(self.handle);
    }
}
