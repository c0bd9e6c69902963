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

//! Opaque helper objects for meta operations (clears, copies, mip generation,
//! packing and resolves).
//!
//! The device does not use these objects itself. It only hands them to every
//! recording context it creates.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// Marker trait for meta-operation helpers.
pub trait MetaObject: Any + Send + Sync + Debug {}

/// The set of meta-operation helpers shared by all contexts of a device.
#[derive(Debug, Clone)]
pub struct MetaObjects {
    /// Pipelines used to clear images outside of render passes.
    pub clear: Arc<dyn MetaObject>,
    /// Pipelines used for image-to-image copies that need a shader.
    pub copy: Arc<dyn MetaObject>,
    /// Render passes and pipelines used to generate mip maps.
    pub mip_gen: Arc<dyn MetaObject>,
    /// Pipelines that pack image data into buffers.
    pub pack: Arc<dyn MetaObject>,
    /// Pipelines used to resolve multisampled images.
    pub resolve: Arc<dyn MetaObject>,
}
