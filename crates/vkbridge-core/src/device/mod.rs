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

//! Provides the backend-facing device contracts of the runtime.
//!
//! This module defines the "common language" spoken between the device
//! coordinator and its collaborators. It contains the collaborator `traits`
//! (like [`DeviceFn`] or [`MemoryAllocator`]), the device objects built on top
//! of them (like [`Buffer`] or [`CommandList`]), the [`StatCounters`] store and
//! the error types.
//!
//! The coordinator itself lives in `vkbridge-infra`, which composes these
//! pieces into a single device.

pub mod api;
pub mod error;
pub mod stats;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::ResourceError;
pub use self::stats::{StatCounter, StatCounters};
pub use self::traits::{
    DeviceFn, MemoryAllocator, PipelineManager, Presenter, RenderPassCache, ResourceFactory,
};
