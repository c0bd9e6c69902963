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

//! Render passes and their compatibility key.

use crate::device::error::ResourceError;
use crate::device::traits::DeviceFn;
use ash::vk;
use std::sync::Arc;

/// Maximum number of color attachments of a render pass.
pub const MAX_NUM_RENDER_TARGETS: usize = 8;

/// Format and layout of one attachment. `vk::Format::UNDEFINED` marks an unused slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttachmentFormat {
    /// Attachment format.
    pub format: vk::Format,
    /// Layout the attachment is in while the render pass is active.
    pub layout: vk::ImageLayout,
}

impl AttachmentFormat {
    /// Returns `true` if the slot is in use.
    pub fn is_used(&self) -> bool {
        self.format != vk::Format::UNDEFINED
    }
}

/// The canonical render-pass compatibility key.
///
/// Two sets of render targets with equal formats share the same render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderPassFormat {
    /// Samples per pixel of every attachment.
    pub sample_count: vk::SampleCountFlags,
    /// Depth-stencil attachment.
    pub depth: AttachmentFormat,
    /// Color attachments, indexed by render target slot.
    pub color: [AttachmentFormat; MAX_NUM_RENDER_TARGETS],
    /// Number of layers rendered to.
    pub layers: u32,
}

impl Default for RenderPassFormat {
    fn default() -> Self {
        Self {
            sample_count: vk::SampleCountFlags::TYPE_1,
            depth: AttachmentFormat::default(),
            color: [AttachmentFormat::default(); MAX_NUM_RENDER_TARGETS],
            layers: 1,
        }
    }
}

impl RenderPassFormat {
    /// Number of color slots in use.
    pub fn color_count(&self) -> usize {
        self.color.iter().filter(|c| c.is_used()).count()
    }

    /// Returns `true` if a depth-stencil attachment is present.
    pub fn has_depth(&self) -> bool {
        self.depth.is_used()
    }
}

/// A render pass object, shared by every framebuffer with a compatible format.
#[derive(Debug)]
pub struct RenderPass {
    vkd: Arc<dyn DeviceFn>,
    format: RenderPassFormat,
    handle: vk::RenderPass,
}

impl RenderPass {
    /// Creates a render pass for `format`.
    pub fn new(vkd: Arc<dyn DeviceFn>, format: RenderPassFormat) -> Result<Self, ResourceError> {
        let handle = vkd
            .create_render_pass(&format)
            .map_err(|e| ResourceError::vulkan("vkCreateRenderPass", e))?;
        Ok(Self {
            vkd,
            format,
            handle,
        })
    }

    /// The raw render pass handle.
    pub fn handle(&self) -> vk::RenderPass {
        self.handle
    }

    /// The format the render pass was created for.
    pub fn format(&self) -> &RenderPassFormat {
        &self.format
    }
}

impl Drop for RenderPass {
    fn drop(&mut self) {
        self.vkd.destroy_render_pass(self.handle);
    }
}
