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

//! Collaborator contracts consumed by the device coordinator.

mod device_fn;
mod memory_allocator;
mod pipeline_manager;
mod presenter;
mod render_pass_cache;
mod resource_factory;

pub use self::device_fn::DeviceFn;
pub use self::memory_allocator::MemoryAllocator;
pub use self::pipeline_manager::PipelineManager;
pub use self::presenter::Presenter;
pub use self::render_pass_cache::RenderPassCache;
pub use self::resource_factory::ResourceFactory;
