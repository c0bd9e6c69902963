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

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use vkbridge_core::device::{
    DeviceFn, RenderPass, RenderPassCache, RenderPassFormat, ResourceError,
};

/// A [`RenderPassCache`] that keeps every render pass it ever created.
///
/// The number of distinct formats an application uses is small, so entries
/// are never evicted.
#[derive(Debug)]
pub struct RenderPassPool {
    vkd: Arc<dyn DeviceFn>,
    passes: Mutex<HashMap<RenderPassFormat, Arc<RenderPass>>>,
}

impl RenderPassPool {
    /// Creates an empty cache.
    pub fn new(vkd: Arc<dyn DeviceFn>) -> Self {
        Self {
            vkd,
            passes: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached render passes.
    pub fn len(&self) -> usize {
        self.passes.lock().len()
    }

    /// Returns `true` if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.passes.lock().is_empty()
    }
}

impl RenderPassCache for RenderPassPool {
    fn render_pass(&self, format: &RenderPassFormat) -> Result<Arc<RenderPass>, ResourceError> {
        let mut passes = self.passes.lock();
        if let Some(pass) = passes.get(format) {
            return Ok(Arc::clone(pass));
        }

        let pass = Arc::new(RenderPass::new(Arc::clone(&self.vkd), *format)?);
        log::debug!(
            "RenderPassPool: created render pass {:?} ({} color, depth: {})",
            pass.handle(),
            format.color_count(),
            format.has_depth()
        );
        passes.insert(*format, Arc::clone(&pass));
        Ok(pass)
    }
}
