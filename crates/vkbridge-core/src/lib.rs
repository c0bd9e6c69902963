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

//! # vkbridge Core
//!
//! Foundational crate containing the device object types, collaborator traits
//! and plain-data contracts of the translation runtime.
//!
//! Concrete services (the device coordinator, the Vulkan function table, the
//! memory allocator) live in `vkbridge-infra`; this crate only defines the
//! vocabulary they share.

#![warn(missing_docs)]

pub mod config;
pub mod device;
pub mod pool;
pub mod telemetry;

pub use config::{OptionsError, RuntimeOptions};
pub use pool::RecyclablePool;
