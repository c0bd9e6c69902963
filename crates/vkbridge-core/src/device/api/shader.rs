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

//! Shader modules and their declared binding interface.
//!
//! A [`Shader`] is pure data. Nothing is compiled on the device when one is
//! created; the pipeline manager picks it up later.

use crate::device::error::ResourceError;
use ash::vk;

/// The magic number every SPIR-V module starts with.
pub const SPIRV_MAGIC: u32 = 0x0723_0203;

/// One resource binding a shader reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceSlot {
    /// Binding slot index.
    pub slot: u32,
    /// Kind of descriptor expected at the slot.
    pub descriptor_type: vk::DescriptorType,
    /// Image view type for image descriptors.
    pub view_type: vk::ImageViewType,
    /// How the shader accesses the resource.
    pub access: vk::AccessFlags,
}

/// Stage input/output locations and the push constant range of a shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InterfaceSlots {
    /// Bit mask of consumed input locations.
    pub input_slots: u32,
    /// Bit mask of written output locations.
    pub output_slots: u32,
    /// Offset of the push constant block, in bytes.
    pub push_const_offset: u32,
    /// Size of the push constant block, in bytes.
    pub push_const_size: u32,
}

/// A SPIR-V binary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpirvCode(Vec<u32>);

impl SpirvCode {
    /// Wraps already decoded SPIR-V words.
    pub fn new(words: Vec<u32>) -> Self {
        Self(words)
    }

    /// Decodes a little-endian byte stream.
    ///
    /// ## Errors
    /// * `ResourceError::InvalidArgument` - If the length is not a multiple of
    ///   four or the stream does not start with the SPIR-V magic number.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ResourceError> {
        if bytes.len() % 4 != 0 {
            return Err(ResourceError::InvalidArgument(format!(
                "SPIR-V length {} is not a multiple of 4",
                bytes.len()
            )));
        }

        let words: Vec<u32> = bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        if words.first() != Some(&SPIRV_MAGIC) {
            return Err(ResourceError::InvalidArgument(
                "missing SPIR-V magic number".to_owned(),
            ));
        }
        Ok(Self(words))
    }

    /// The code as 32-bit words.
    pub fn words(&self) -> &[u32] {
        &self.0
    }

    /// Size of the code, in bytes.
    pub fn byte_len(&self) -> usize {
        self.0.len() * 4
    }
}

/// A shader module together with its declared resource interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    stage: vk::ShaderStageFlags,
    slots: Vec<ResourceSlot>,
    interface: InterfaceSlots,
    code: SpirvCode,
}

impl Shader {
    /// Creates a shader for a single `stage`.
    pub fn new(
        stage: vk::ShaderStageFlags,
        slots: &[ResourceSlot],
        interface: InterfaceSlots,
        code: SpirvCode,
    ) -> Self {
        Self {
            stage,
            slots: slots.to_vec(),
            interface,
            code,
        }
    }

    /// The pipeline stage the shader runs in.
    pub fn stage(&self) -> vk::ShaderStageFlags {
        self.stage
    }

    /// The resource bindings used by the shader.
    pub fn slots(&self) -> &[ResourceSlot] {
        &self.slots
    }

    /// Returns the binding declared for `slot`, if any.
    pub fn slot(&self, slot: u32) -> Option<&ResourceSlot> {
        self.slots.iter().find(|s| s.slot == slot)
    }

    /// Stage inputs, outputs and push constants.
    pub fn interface(&self) -> &InterfaceSlots {
        &self.interface
    }

    /// The SPIR-V code.
    pub fn code(&self) -> &SpirvCode {
        &self.code
    }
}

/// Number of compiled pipelines, as reported by the pipeline manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineCount {
    /// Compiled graphics pipelines.
    pub graphics: u32,
    /// Compiled compute pipelines.
    pub compute: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian_words() {
        let mut bytes = SPIRV_MAGIC.to_le_bytes().to_vec();
        bytes.extend_from_slice(&0x0001_0000u32.to_le_bytes());

        let code = SpirvCode::from_bytes(&bytes).unwrap();
        assert_eq!(code.words(), &[SPIRV_MAGIC, 0x0001_0000]);
        assert_eq!(code.byte_len(), 8);
    }

    #[test]
    fn rejects_truncated_or_foreign_code() {
        assert!(SpirvCode::from_bytes(&[0x03, 0x02, 0x23]).is_err());
        assert!(SpirvCode::from_bytes(&[0, 0, 0, 0]).is_err());
    }

    #[test]
    fn slot_lookup() {
        let slot = ResourceSlot {
            slot: 3,
            descriptor_type: vk::DescriptorType::UNIFORM_BUFFER,
            view_type: vk::ImageViewType::default(),
            access: vk::AccessFlags::UNIFORM_READ,
        };
        let shader = Shader::new(
            vk::ShaderStageFlags::VERTEX,
            &[slot],
            InterfaceSlots::default(),
            SpirvCode::new(vec![SPIRV_MAGIC]),
        );

        assert_eq!(shader.slot(3), Some(&slot));
        assert!(shader.slot(0).is_none());
    }
}
