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

//! Defines the error type returned by object creation.

use ash::vk;
use thiserror::Error;

/// An error related to the creation of a device object (buffers, images, views, etc.).
///
/// Creation failures are surfaced to the immediate caller and never retried by
/// the device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    /// The memory allocator could not satisfy the request.
    #[error("out of memory: cannot allocate {size} bytes with properties {flags:?}")]
    OutOfMemory {
        /// Number of bytes that were requested.
        size: vk::DeviceSize,
        /// Memory properties that were requested.
        flags: vk::MemoryPropertyFlags,
    },
    /// A device function returned an error code.
    #[error("{operation} failed: {result}")]
    Vulkan {
        /// The device function that failed (e.g. `vkCreateBuffer`).
        operation: &'static str,
        /// The raw result code.
        #[source]
        result: vk::Result,
    },
    /// The request itself was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ResourceError {
    /// Wraps a raw result code returned by `operation`.
    pub fn vulkan(operation: &'static str, result: vk::Result) -> Self {
        ResourceError::Vulkan { operation, result }
    }

    /// Returns `true` if the error signals resource exhaustion, either from the
    /// allocator or from the driver.
    pub fn is_out_of_memory(&self) -> bool {
        match self {
            ResourceError::OutOfMemory { .. } => true,
            ResourceError::Vulkan { result, .. } => matches!(
                *result,
                vk::Result::ERROR_OUT_OF_DEVICE_MEMORY | vk::Result::ERROR_OUT_OF_HOST_MEMORY
            ),
            ResourceError::InvalidArgument(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn driver_oom_counts_as_exhaustion() {
        let err = ResourceError::vulkan("vkCreateImage", vk::Result::ERROR_OUT_OF_DEVICE_MEMORY);
        assert!(err.is_out_of_memory());
        assert!(err.source().is_some());
    }

    #[test]
    fn invalid_argument_is_not_exhaustion() {
        let err = ResourceError::InvalidArgument("zero-sized buffer".to_owned());
        assert!(!err.is_out_of_memory());
        assert_eq!(err.to_string(), "invalid argument: zero-sized buffer");
    }
}
