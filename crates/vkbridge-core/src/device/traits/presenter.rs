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

use ash::vk;
use std::fmt::Debug;

/// Owns the swap chain and performs the actual present.
pub trait Presenter: Send + Sync + Debug {
    /// Presents the current image once `semaphore` is signaled.
    ///
    /// The returned status is passed through to the caller of
    /// `Device::present_image` unchanged.
    fn present_image(&self, semaphore: vk::Semaphore) -> vk::Result;
}
