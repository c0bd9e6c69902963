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

use crate::device::api::{RenderPass, RenderPassFormat};
use crate::device::error::ResourceError;
use std::fmt::Debug;
use std::sync::Arc;

/// Looks up render passes by their compatibility format.
pub trait RenderPassCache: Send + Sync + Debug + 'static {
    /// Returns the cached render pass for `format`, creating and caching one on a miss.
    fn render_pass(&self, format: &RenderPassFormat) -> Result<Arc<RenderPass>, ResourceError>;
}
