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

use super::staging::StagingBufferAllocator;
use std::sync::Arc;
use vkbridge_core::device::{CommandList, DescriptorPool};
use vkbridge_core::telemetry::DiagnosticsSink;
use vkbridge_core::RecyclablePool;

/// The three recyclable pools of a device and the rules for refilling them.
///
/// Shared between the device (which retrieves from the pools) and the
/// retirement worker (which refills them).
#[derive(Debug)]
pub struct ObjectRecycler {
    command_lists: RecyclablePool<Arc<CommandList>>,
    descriptor_pools: RecyclablePool<Arc<DescriptorPool>>,
    staging: StagingBufferAllocator,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl ObjectRecycler {
    /// Creates empty pools.
    pub fn new(
        staging: StagingBufferAllocator,
        max_command_lists: usize,
        max_descriptor_pools: usize,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        Self {
            command_lists: RecyclablePool::new(max_command_lists),
            descriptor_pools: RecyclablePool::new(max_descriptor_pools),
            staging,
            diagnostics,
        }
    }

    /// The staging buffer allocator.
    pub fn staging(&self) -> &StagingBufferAllocator {
        &self.staging
    }

    /// Takes a ready-to-record command list, if one is pooled.
    pub fn retrieve_command_list(&self) -> Option<Arc<CommandList>> {
        self.command_lists.retrieve()
    }

    /// Takes a reset descriptor pool, if one is pooled.
    pub fn retrieve_descriptor_pool(&self) -> Option<Arc<DescriptorPool>> {
        self.descriptor_pools.retrieve()
    }

    /// Number of pooled command lists.
    pub fn pooled_command_lists(&self) -> usize {
        self.command_lists.len()
    }

    /// Number of pooled descriptor pools.
    pub fn pooled_descriptor_pools(&self) -> usize {
        self.descriptor_pools.len()
    }

    /// Drops every pooled command list, descriptor pool and staging buffer.
    /// Returns how many objects were released.
    pub fn trim(&self) -> usize {
        let released = self.command_lists.drain().len()
            + self.descriptor_pools.drain().len()
            + self.staging.trim();
        log::debug!("ObjectRecycler: released {} pooled objects", released);
        released
    }

    /// Returns a command list to its pool.
    ///
    /// A list that is still pending is refused: the retirement worker owns it
    /// until its fence signals. A list someone else still holds is refused as
    /// well, so a pooled list is never in use elsewhere.
    pub fn recycle_command_list(&self, mut list: Arc<CommandList>) {
        if list.is_pending() {
            self.diagnostics
                .warn("Refusing to recycle a command list that is still pending");
            return;
        }
        if Arc::get_mut(&mut list).is_none() {
            self.diagnostics
                .warn("Refusing to recycle a command list that is still referenced elsewhere");
            return;
        }
        self.retire(list);
    }

    /// Resets a command list, hands the objects it used back to their pools
    /// and pools the list itself.
    ///
    /// A list that is still referenced elsewhere is left untouched. Its last
    /// holder recycles it or drops it.
    pub fn retire(&self, mut list: Arc<CommandList>) {
        if Arc::get_mut(&mut list).is_none() {
            log::trace!(
                "ObjectRecycler: command list {:?} still referenced, leaving it to its holder",
                list.handle()
            );
            return;
        }

        let retired = match list.reset() {
            Ok(retired) => retired,
            Err(e) => {
                self.diagnostics
                    .error(&format!("Failed to reset command list: {e}"));
                return;
            }
        };

        for pool in retired.descriptor_pools {
            self.recycle_descriptor_pool(pool);
        }
        for buffer in retired.staging_buffers {
            self.staging.recycle(buffer);
        }

        if self.command_lists.give_back(list).is_err() {
            log::trace!("ObjectRecycler: command list pool full, dropping list");
        }
    }

    /// Resets a descriptor pool and returns it to its pool.
    ///
    /// A pool that is still referenced elsewhere is dropped instead.
    pub fn recycle_descriptor_pool(&self, mut pool: Arc<DescriptorPool>) {
        if Arc::get_mut(&mut pool).is_none() {
            log::trace!("ObjectRecycler: descriptor pool still referenced, not pooling it");
            return;
        }
        if let Err(e) = pool.reset() {
            self.diagnostics
                .error(&format!("Failed to reset descriptor pool: {e}"));
            return;
        }
        if self.descriptor_pools.give_back(pool).is_err() {
            log::trace!("ObjectRecycler: descriptor pool pool full, dropping pool");
        }
    }
}
