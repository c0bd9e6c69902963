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

use crate::device::api::{PipelineCount, Shader};
use std::fmt::Debug;
use std::sync::Arc;

/// Compiles and caches pipelines. Only the parts the device coordinator needs
/// are exposed here.
pub trait PipelineManager: Send + Sync + Debug + 'static {
    /// Makes a shader known to the manager so pipelines using it can be
    /// compiled ahead of their first use.
    fn register_shader(&self, shader: Arc<Shader>);

    /// Returns the number of compiled pipelines.
    fn pipeline_count(&self) -> PipelineCount;
}
