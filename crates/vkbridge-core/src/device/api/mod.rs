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

//! Device object types and the plain data used to create them.

pub mod adapter;
pub mod buffer;
pub mod command_list;
pub mod descriptor;
pub mod framebuffer;
pub mod image;
pub mod memory;
pub mod meta;
pub mod render_pass;
pub mod sampler;
pub mod shader;
pub mod staging;
pub mod sync;

pub use self::adapter::*;
pub use self::buffer::*;
pub use self::command_list::*;
pub use self::descriptor::*;
pub use self::framebuffer::*;
pub use self::image::*;
pub use self::memory::*;
pub use self::meta::*;
pub use self::render_pass::*;
pub use self::sampler::*;
pub use self::shader::*;
pub use self::staging::*;
pub use self::sync::*;
