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

//! A recording context bound to one device.

use super::Device;
use ash::vk;
use std::any::Any;
use std::sync::Arc;
use vkbridge_core::device::{
    CommandList, DescriptorPool, MetaObjects, PipelineManager, RenderPassCache, ResourceError,
    StagingBuffer, StagingBufferSlice, StatCounter,
};

/// Records work into command lists obtained from its device.
///
/// Command recording itself is done by whoever drives the context. The context
/// only manages which list is current and attaches transient objects to it.
#[derive(Debug)]
pub struct Context {
    device: Arc<Device>,
    pipelines: Arc<dyn PipelineManager>,
    render_passes: Arc<dyn RenderPassCache>,
    meta: MetaObjects,
    current: Option<Arc<CommandList>>,
    staging: Option<Arc<StagingBuffer>>,
}

impl Context {
    pub(crate) fn new(
        device: Arc<Device>,
        pipelines: Arc<dyn PipelineManager>,
        render_passes: Arc<dyn RenderPassCache>,
        meta: MetaObjects,
    ) -> Self {
        Self {
            device,
            pipelines,
            render_passes,
            meta,
            current: None,
            staging: None,
        }
    }

    /// The device this context records for.
    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    /// The pipeline manager of the device.
    pub fn pipeline_manager(&self) -> &Arc<dyn PipelineManager> {
        &self.pipelines
    }

    /// The render-pass cache of the device.
    pub fn render_pass_cache(&self) -> &Arc<dyn RenderPassCache> {
        &self.render_passes
    }

    /// The meta-operation helpers of the device.
    pub fn meta_objects(&self) -> &MetaObjects {
        &self.meta
    }

    /// The list currently being recorded, if any.
    pub fn command_list(&self) -> Option<&Arc<CommandList>> {
        self.current.as_ref()
    }

    /// Starts recording into `list`.
    ///
    /// A list that was still current is dropped from the context and recycled
    /// without being submitted.
    pub fn begin_recording(&mut self, list: Arc<CommandList>) -> Result<(), ResourceError> {
        list.begin_recording()?;
        if let Some(previous) = self.current.replace(list) {
            log::warn!("Context: discarding unsubmitted command list {:?}", previous.handle());
            self.device.recycle_command_list(previous);
        }
        self.staging = None;
        Ok(())
    }

    /// Finishes the current list and hands it back to the caller.
    pub fn end_recording(&mut self) -> Result<Option<Arc<CommandList>>, ResourceError> {
        self.staging = None;
        match self.current.take() {
            Some(list) => {
                list.end_recording()?;
                Ok(Some(list))
            }
            None => Ok(None),
        }
    }

    /// Submits the current list and starts recording into a fresh one.
    pub fn flush_command_list(
        &mut self,
        wait_sync: vk::Semaphore,
        wake_sync: vk::Semaphore,
    ) -> Result<(), ResourceError> {
        if let Some(list) = self.end_recording()? {
            self.device.submit_command_list(list, wait_sync, wake_sync);
        }
        let next = self.device.create_command_list()?;
        self.begin_recording(next)
    }

    /// Reserves `size` bytes of staging memory for an upload recorded into the current list.
    ///
    /// The staging buffer backing the slice is tracked by the list and recycled
    /// when the list retires.
    ///
    /// ## Errors
    /// * `ResourceError::InvalidArgument` - If no list is being recorded.
    pub fn stage_upload(
        &mut self,
        size: vk::DeviceSize,
        align: vk::DeviceSize,
    ) -> Result<StagingBufferSlice, ResourceError> {
        let list = self.recording_list()?;

        if let Some(slice) = self.staging.as_ref().and_then(|s| s.alloc(align, size)) {
            return Ok(slice);
        }

        let buffer = self.device.alloc_staging_buffer(size)?;
        list.track_staging_buffer(Arc::clone(&buffer));
        let slice = buffer.alloc(align, size).ok_or_else(|| {
            ResourceError::InvalidArgument(format!(
                "{size} bytes with alignment {align} do not fit a fresh staging buffer"
            ))
        })?;
        self.staging = Some(buffer);
        Ok(slice)
    }

    /// Gets a descriptor pool whose lifetime is tied to the current list.
    pub fn descriptor_pool(&mut self) -> Result<Arc<DescriptorPool>, ResourceError> {
        let list = self.recording_list()?;
        let pool = self.device.create_descriptor_pool()?;
        list.track_descriptor_pool(Arc::clone(&pool));
        Ok(pool)
    }

    /// Keeps `resource` alive until the current list retires.
    pub fn track_resource(&self, resource: Arc<dyn Any + Send + Sync>) -> Result<(), ResourceError> {
        self.recording_list()?.track_resource(resource);
        Ok(())
    }

    /// Adds to a statistic of the current list. Ignored if nothing is being recorded.
    pub fn add_stat(&self, counter: StatCounter, amount: u64) {
        if let Some(list) = &self.current {
            list.add_stat(counter, amount);
        }
    }

    fn recording_list(&self) -> Result<Arc<CommandList>, ResourceError> {
        self.current.clone().ok_or_else(|| {
            ResourceError::InvalidArgument("no command list is being recorded".to_owned())
        })
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if let Some(list) = self.current.take() {
            self.device.recycle_command_list(list);
        }
    }
}
