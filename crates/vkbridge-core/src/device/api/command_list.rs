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

//! The recorded, submittable unit of GPU work.

use super::descriptor::DescriptorPool;
use super::staging::StagingBuffer;
use crate::device::error::ResourceError;
use crate::device::stats::{StatCounter, StatCounters};
use crate::device::traits::DeviceFn;
use ash::prelude::VkResult;
use ash::vk;
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Everything a queue needs to execute one command list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSubmission {
    /// The command buffer to execute.
    pub command_buffer: vk::CommandBuffer,
    /// Semaphore to wait on before execution, or null.
    pub wait_semaphore: vk::Semaphore,
    /// Stages that wait on `wait_semaphore`.
    pub wait_stages: vk::PipelineStageFlags,
    /// Semaphore signaled when execution completes, or null.
    pub signal_semaphore: vk::Semaphore,
    /// Fence signaled when execution completes.
    pub fence: vk::Fence,
}

/// Lifecycle phase of a command list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandListPhase {
    /// Reset and ready to record.
    Initial,
    /// Commands are being recorded.
    Recording,
    /// Recording finished, not yet submitted.
    Executable,
    /// Handed to the queue, completion not yet observed.
    Pending,
    /// The fence was observed signaled.
    Completed,
}

/// Transient objects released by [`CommandList::reset`] that can go back to their pools.
#[derive(Debug, Default)]
pub struct RetiredObjects {
    /// Descriptor pools used while recording.
    pub descriptor_pools: Vec<Arc<DescriptorPool>>,
    /// Staging buffers used while recording.
    pub staging_buffers: Vec<Arc<StagingBuffer>>,
}

struct CommandListState {
    phase: CommandListPhase,
    stats: StatCounters,
    resources: Vec<Arc<dyn Any + Send + Sync>>,
    descriptor_pools: Vec<Arc<DescriptorPool>>,
    staging_buffers: Vec<Arc<StagingBuffer>>,
}

/// A command buffer with its own pool and fence, plus every object the
/// recorded work references.
///
/// Tracked objects stay alive until [`reset`](Self::reset), which the device
/// only calls once the list has retired.
pub struct CommandList {
    vkd: Arc<dyn DeviceFn>,
    queue_family: u32,
    pool: vk::CommandPool,
    buffer: vk::CommandBuffer,
    fence: vk::Fence,
    state: Mutex<CommandListState>,
}

impl CommandList {
    /// Creates a command list for `queue_family`.
    pub fn new(vkd: Arc<dyn DeviceFn>, queue_family: u32) -> Result<Self, ResourceError> {
        let pool = vkd
            .create_command_pool(queue_family)
            .map_err(|e| ResourceError::vulkan("vkCreateCommandPool", e))?;

        let buffer = match vkd.allocate_command_buffer(pool) {
            Ok(buffer) => buffer,
            Err(e) => {
                vkd.destroy_command_pool(pool);
                return Err(ResourceError::vulkan("vkAllocateCommandBuffers", e));
            }
        };

        let fence = match vkd.create_fence() {
            Ok(fence) => fence,
            Err(e) => {
                vkd.destroy_command_pool(pool);
                return Err(ResourceError::vulkan("vkCreateFence", e));
            }
        };

        Ok(Self {
            vkd,
            queue_family,
            pool,
            buffer,
            fence,
            state: Mutex::new(CommandListState {
                phase: CommandListPhase::Initial,
                stats: StatCounters::new(),
                resources: Vec::new(),
                descriptor_pools: Vec::new(),
                staging_buffers: Vec::new(),
            }),
        })
    }

    /// The raw command buffer.
    pub fn handle(&self) -> vk::CommandBuffer {
        self.buffer
    }

    /// The fence signaled when the list's work completes.
    pub fn fence(&self) -> vk::Fence {
        self.fence
    }

    /// Queue family the list records for.
    pub fn queue_family(&self) -> u32 {
        self.queue_family
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> CommandListPhase {
        self.state.lock().phase
    }

    /// Returns `true` while the list is submitted and not yet seen completed.
    pub fn is_pending(&self) -> bool {
        self.phase() == CommandListPhase::Pending
    }

    /// Starts recording.
    /// ## Errors
    /// * `ResourceError::InvalidArgument` - If the list is not in its initial phase.
    pub fn begin_recording(&self) -> Result<(), ResourceError> {
        let mut state = self.state.lock();
        if state.phase != CommandListPhase::Initial {
            return Err(ResourceError::InvalidArgument(format!(
                "cannot begin recording a command list in phase {:?}",
                state.phase
            )));
        }
        self.vkd
            .begin_command_buffer(self.buffer)
            .map_err(|e| ResourceError::vulkan("vkBeginCommandBuffer", e))?;
        state.phase = CommandListPhase::Recording;
        Ok(())
    }

    /// Finishes recording.
    pub fn end_recording(&self) -> Result<(), ResourceError> {
        let mut state = self.state.lock();
        if state.phase != CommandListPhase::Recording {
            return Err(ResourceError::InvalidArgument(format!(
                "cannot end recording a command list in phase {:?}",
                state.phase
            )));
        }
        self.vkd
            .end_command_buffer(self.buffer)
            .map_err(|e| ResourceError::vulkan("vkEndCommandBuffer", e))?;
        state.phase = CommandListPhase::Executable;
        Ok(())
    }

    /// Adds `amount` to one of the list's statistics.
    pub fn add_stat(&self, counter: StatCounter, amount: u64) {
        self.state.lock().stats.add(counter, amount);
    }

    /// Snapshot of the statistics accumulated while recording.
    pub fn stat_counters(&self) -> StatCounters {
        self.state.lock().stats
    }

    /// Keeps `resource` alive until the list retires.
    pub fn track_resource(&self, resource: Arc<dyn Any + Send + Sync>) {
        self.state.lock().resources.push(resource);
    }

    /// Keeps a descriptor pool alive until the list retires, then hands it back.
    pub fn track_descriptor_pool(&self, pool: Arc<DescriptorPool>) {
        self.state.lock().descriptor_pools.push(pool);
    }

    /// Keeps a staging buffer alive until the list retires, then hands it back.
    pub fn track_staging_buffer(&self, buffer: Arc<StagingBuffer>) {
        self.state.lock().staging_buffers.push(buffer);
    }

    /// Number of objects currently tracked, of any kind.
    pub fn tracked_count(&self) -> usize {
        let state = self.state.lock();
        state.resources.len() + state.descriptor_pools.len() + state.staging_buffers.len()
    }

    /// Issues the list to `queue`.
    ///
    /// The caller must serialize access to `queue`. On success the list is
    /// pending until its fence is observed signaled. Only a list whose
    /// recording has ended can be submitted; any other phase fails with
    /// `vk::Result::ERROR_VALIDATION_FAILED_EXT` without touching the queue.
    pub fn submit(
        &self,
        queue: vk::Queue,
        wait_sync: vk::Semaphore,
        wake_sync: vk::Semaphore,
    ) -> VkResult<()> {
        let wait_stages = if wait_sync == vk::Semaphore::null() {
            vk::PipelineStageFlags::empty()
        } else {
            vk::PipelineStageFlags::ALL_COMMANDS
        };

        let submission = QueueSubmission {
            command_buffer: self.buffer,
            wait_semaphore: wait_sync,
            wait_stages,
            signal_semaphore: wake_sync,
            fence: self.fence,
        };

        let mut state = self.state.lock();
        if state.phase != CommandListPhase::Executable {
            log::warn!(
                "CommandList: refusing to submit {:?} in phase {:?}",
                self.buffer,
                state.phase
            );
            return Err(vk::Result::ERROR_VALIDATION_FAILED_EXT);
        }
        self.vkd.queue_submit(queue, &submission)?;
        state.phase = CommandListPhase::Pending;
        Ok(())
    }

    /// Waits up to `timeout_ns` for the submitted work to complete.
    ///
    /// Returns `Err(vk::Result::TIMEOUT)` if it is still running. A list that
    /// is not pending completes immediately.
    pub fn synchronize(&self, timeout_ns: u64) -> VkResult<()> {
        if !self.is_pending() {
            return Ok(());
        }
        self.vkd.wait_for_fence(self.fence, timeout_ns)?;

        let mut state = self.state.lock();
        if state.phase == CommandListPhase::Pending {
            state.phase = CommandListPhase::Completed;
        }
        Ok(())
    }

    /// Makes the list ready to record again.
    ///
    /// Drops every tracked resource and returns the descriptor pools and
    /// staging buffers so the caller can recycle them.
    ///
    /// ## Errors
    /// * `ResourceError::InvalidArgument` - If the list is still pending.
    /// * `ResourceError::Vulkan` - If the fence or the command pool cannot be reset.
    pub fn reset(&self) -> Result<RetiredObjects, ResourceError> {
        let mut state = self.state.lock();
        if state.phase == CommandListPhase::Pending {
            return Err(ResourceError::InvalidArgument(
                "cannot reset a pending command list".to_owned(),
            ));
        }

        self.vkd
            .reset_fence(self.fence)
            .map_err(|e| ResourceError::vulkan("vkResetFences", e))?;
        self.vkd
            .reset_command_pool(self.pool)
            .map_err(|e| ResourceError::vulkan("vkResetCommandPool", e))?;

        state.phase = CommandListPhase::Initial;
        state.stats.reset();
        state.resources.clear();
        Ok(RetiredObjects {
            descriptor_pools: std::mem::take(&mut state.descriptor_pools),
            staging_buffers: std::mem::take(&mut state.staging_buffers),
        })
    }
}

impl fmt::Debug for CommandList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CommandList")
            .field("buffer", &self.buffer)
            .field("fence", &self.fence)
            .field("queue_family", &self.queue_family)
            .field("phase", &state.phase)
            .field("stats", &state.stats)
            .field("resources", &state.resources.len())
            .field("descriptor_pools", &state.descriptor_pools.len())
            .field("staging_buffers", &state.staging_buffers.len())
            .finish()
    }
}

impl Drop for CommandList {
    fn drop(&mut self) {
        self.vkd.destroy_fence(self.fence);
        self.vkd.destroy_command_pool(self.pool);
    }
}
