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

//! The device coordinator.
//!
//! [`Device`] is composed of independent services: a [`DeviceResourceFactory`]
//! for durable objects, an [`ObjectRecycler`] holding the recyclable pools, and
//! a [`SubmissionCoordinator`] that serializes queue access. Each can be built
//! and tested on its own.

mod context;
mod factory;
mod recycler;
mod staging;
mod submission;
mod tracker;
mod unbound;

pub use self::context::Context;
pub use self::factory::DeviceResourceFactory;
pub use self::recycler::ObjectRecycler;
pub use self::staging::StagingBufferAllocator;
pub use self::submission::SubmissionCoordinator;
pub use self::tracker::SubmissionTracker;
pub use self::unbound::UnboundResources;

use ash::vk;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use vkbridge_core::device::{
    AdapterInfo, Buffer, BufferCreateInfo, BufferView, BufferViewCreateInfo, CommandList,
    DescriptorPool, DeviceFn, DeviceOptions, DeviceQueue, Framebuffer, GpuEvent, GpuQuery, Image,
    ImageCreateInfo, ImageView, ImageViewCreateInfo, InterfaceSlots, MemoryAllocator, MetaObjects,
    PipelineManager, Presenter, RenderPassCache, RenderTargets, ResourceError, ResourceFactory,
    ResourceSlot, Sampler, SamplerCreateInfo, Shader, SpirvCode, StagingBuffer, StatCounter,
    StatCounters,
};
use vkbridge_core::telemetry::DiagnosticsSink;
use vkbridge_core::{OptionsError, RuntimeOptions};

/// Everything a [`Device`] is built from.
#[derive(Debug, Clone)]
pub struct DeviceCreateInfo {
    /// Name of the API being translated (e.g. `"D3D11"`), for logs and overlays.
    pub client_api: String,
    /// Physical device description.
    pub adapter: AdapterInfo,
    /// Device-level function table.
    pub vkd: Arc<dyn DeviceFn>,
    /// Pooling and submission settings.
    pub options: RuntimeOptions,
    /// Backing storage for buffers and images.
    pub memory: Arc<dyn MemoryAllocator>,
    /// Render pass lookup used by framebuffer creation.
    pub render_passes: Arc<dyn RenderPassCache>,
    /// Pipeline compilation and caching.
    pub pipelines: Arc<dyn PipelineManager>,
    /// Meta-operation helpers forwarded to contexts.
    pub meta: MetaObjects,
    /// Receives submission and idle-wait failures.
    pub diagnostics: Arc<dyn DiagnosticsSink>,
}

/// The aggregate root owning queues, pools, collaborators and statistics.
///
/// Dropping the device blocks until the GPU is idle.
#[derive(Debug)]
pub struct Device {
    client_api: String,
    adapter: AdapterInfo,
    vkd: Arc<dyn DeviceFn>,
    options: RuntimeOptions,
    device_options: DeviceOptions,
    graphics_queue: DeviceQueue,
    present_queue: DeviceQueue,
    memory: Arc<dyn MemoryAllocator>,
    render_passes: Arc<dyn RenderPassCache>,
    pipelines: Arc<dyn PipelineManager>,
    meta: MetaObjects,
    diagnostics: Arc<dyn DiagnosticsSink>,
    factory: Arc<DeviceResourceFactory>,
    recycler: Arc<ObjectRecycler>,
    submission: SubmissionCoordinator,
    unbound: Mutex<Option<Arc<UnboundResources>>>,
}

impl Device {
    /// Builds a device and starts its retirement worker.
    ///
    /// ## Errors
    /// * `OptionsError::Invalid` - If `info.options` fails validation.
    pub fn new(info: DeviceCreateInfo) -> Result<Self, OptionsError> {
        let DeviceCreateInfo {
            client_api,
            adapter,
            vkd,
            options,
            memory,
            render_passes,
            pipelines,
            meta,
            diagnostics,
        } = info;

        options.validate()?;

        let graphics_queue = DeviceQueue {
            queue_family: adapter.graphics_queue_family,
            queue_handle: vkd.get_device_queue(adapter.graphics_queue_family, 0),
        };
        let present_queue = DeviceQueue {
            queue_family: adapter.present_queue_family,
            queue_handle: vkd.get_device_queue(adapter.present_queue_family, 0),
        };

        let factory = Arc::new(DeviceResourceFactory::new(
            Arc::clone(&vkd),
            Arc::clone(&memory),
            Arc::clone(&render_passes),
            adapter.framebuffer_limits(),
        ));

        let staging = StagingBufferAllocator::new(
            Arc::clone(&factory) as Arc<dyn ResourceFactory>,
            options.staging_buffer_size,
            options.max_recycled_staging_buffers,
        );
        let recycler = Arc::new(ObjectRecycler::new(
            staging,
            options.max_recycled_command_lists,
            options.max_recycled_descriptor_pools,
            Arc::clone(&diagnostics),
        ));

        let submission = SubmissionCoordinator::new(
            Arc::clone(&vkd),
            graphics_queue,
            Arc::clone(&recycler),
            Arc::clone(&diagnostics),
            Duration::from_millis(options.retirement_timeout_ms),
        );

        log::info!(
            "Created {} device on '{}' (graphics family {}, present family {})",
            client_api,
            adapter.device_name(),
            graphics_queue.queue_family,
            present_queue.queue_family
        );

        Ok(Self {
            client_api,
            device_options: DeviceOptions::from_adapter(&adapter),
            adapter,
            vkd,
            options,
            graphics_queue,
            present_queue,
            memory,
            render_passes,
            pipelines,
            meta,
            diagnostics,
            factory,
            recycler,
            submission,
            unbound: Mutex::new(None),
        })
    }

    /// Name of the API being translated.
    pub fn client_api(&self) -> &str {
        &self.client_api
    }

    /// The physical device this device runs on.
    pub fn adapter(&self) -> &AdapterInfo {
        &self.adapter
    }

    /// Enabled core features.
    pub fn features(&self) -> &vk::PhysicalDeviceFeatures {
        &self.adapter.features
    }

    /// Core properties, including limits.
    pub fn properties(&self) -> &vk::PhysicalDeviceProperties {
        &self.adapter.properties
    }

    /// Enabled device extensions.
    pub fn extensions(&self) -> &[String] {
        &self.adapter.extensions
    }

    /// The device-level function table.
    pub fn vkd(&self) -> &Arc<dyn DeviceFn> {
        &self.vkd
    }

    /// Queue used for graphics, compute and transfer work.
    pub fn graphics_queue(&self) -> DeviceQueue {
        self.graphics_queue
    }

    /// Queue used for presentation. May alias the graphics queue.
    pub fn present_queue(&self) -> DeviceQueue {
        self.present_queue
    }

    /// Descriptor limits derived from the adapter.
    pub fn options(&self) -> DeviceOptions {
        self.device_options
    }

    /// The runtime options the device was built with.
    pub fn runtime_options(&self) -> &RuntimeOptions {
        &self.options
    }

    /// The diagnostics sink failures are reported to.
    pub fn diagnostics(&self) -> &Arc<dyn DiagnosticsSink> {
        &self.diagnostics
    }

    /// The pools recycled objects are kept in.
    pub fn recycler(&self) -> &ObjectRecycler {
        &self.recycler
    }

    /// Pipeline stages that can run shaders on this device.
    pub fn shader_pipeline_stages(&self) -> vk::PipelineStageFlags {
        let mut stages = vk::PipelineStageFlags::COMPUTE_SHADER
            | vk::PipelineStageFlags::VERTEX_SHADER
            | vk::PipelineStageFlags::FRAGMENT_SHADER;

        let features = &self.adapter.features;
        if features.geometry_shader == vk::TRUE {
            stages |= vk::PipelineStageFlags::GEOMETRY_SHADER;
        }
        if features.tessellation_shader == vk::TRUE {
            stages |= vk::PipelineStageFlags::TESSELLATION_CONTROL_SHADER
                | vk::PipelineStageFlags::TESSELLATION_EVALUATION_SHADER;
        }
        stages
    }

    /// Creates the dummy objects bound to empty resource slots. Does nothing
    /// if they already exist.
    pub fn init_resources(&self) -> Result<(), ResourceError> {
        let mut unbound = self.unbound.lock();
        if unbound.is_none() {
            let resources =
                UnboundResources::new(self.factory.as_ref(), self.options.unbound_buffer_size)?;
            *unbound = Some(Arc::new(resources));
            log::debug!("Initialized unbound resources");
        }
        Ok(())
    }

    /// The dummy objects, once [`init_resources`](Self::init_resources) has run.
    pub fn unbound_resources(&self) -> Option<Arc<UnboundResources>> {
        self.unbound.lock().clone()
    }

    /// Returns a staging buffer able to hold at least `size` bytes.
    pub fn alloc_staging_buffer(
        &self,
        size: vk::DeviceSize,
    ) -> Result<Arc<StagingBuffer>, ResourceError> {
        self.recycler.staging().allocate(size)
    }

    /// Releases a staging buffer. Only standard-sized buffers are kept for reuse.
    pub fn recycle_staging_buffer(&self, buffer: Arc<StagingBuffer>) {
        self.recycler.staging().recycle(buffer);
    }

    /// Returns a ready-to-record command list, reusing a retired one if possible.
    pub fn create_command_list(&self) -> Result<Arc<CommandList>, ResourceError> {
        if let Some(list) = self.recycler.retrieve_command_list() {
            return Ok(list);
        }
        let list = CommandList::new(Arc::clone(&self.vkd), self.graphics_queue.queue_family)?;
        log::trace!("Created command list {:?}", list.handle());
        Ok(Arc::new(list))
    }

    /// Returns a descriptor pool, reusing a recycled one if possible.
    pub fn create_descriptor_pool(&self) -> Result<Arc<DescriptorPool>, ResourceError> {
        if let Some(pool) = self.recycler.retrieve_descriptor_pool() {
            return Ok(pool);
        }
        let pool = DescriptorPool::new(Arc::clone(&self.vkd), self.options.descriptor_pool_max_sets)?;
        Ok(Arc::new(pool))
    }

    /// Returns a command list to its pool.
    ///
    /// Pending lists are refused, and so are lists that are still referenced
    /// elsewhere. A submitted list is recycled by the retirement worker once
    /// it completes, unless the caller kept a reference. In that case the
    /// caller recycles it after completion.
    pub fn recycle_command_list(&self, list: Arc<CommandList>) {
        self.recycler.recycle_command_list(list);
    }

    /// Resets a descriptor pool and returns it to its pool.
    pub fn recycle_descriptor_pool(&self, pool: Arc<DescriptorPool>) {
        self.recycler.recycle_descriptor_pool(pool);
    }

    /// Frees every object waiting in the recycling pools and returns how many
    /// were released. Objects still in use are not affected.
    pub fn trim_pools(&self) -> usize {
        self.recycler.trim()
    }

    /// Creates a recording context wired to this device's collaborators.
    pub fn create_context(self: &Arc<Self>) -> Context {
        Context::new(
            Arc::clone(self),
            Arc::clone(&self.pipelines),
            Arc::clone(&self.render_passes),
            self.meta.clone(),
        )
    }

    /// Makes a shader known to the pipeline manager.
    pub fn register_shader(&self, shader: Arc<Shader>) {
        self.pipelines.register_shader(shader);
    }

    /// Submits a command list to the graphics queue.
    ///
    /// Failures are reported to the diagnostics sink and the list is recycled.
    pub fn submit_command_list(
        &self,
        list: Arc<CommandList>,
        wait_sync: vk::Semaphore,
        wake_sync: vk::Semaphore,
    ) {
        self.submission.submit_command_list(list, wait_sync, wake_sync);
    }

    /// Presents through `presenter`, serialized with submissions.
    pub fn present_image(&self, presenter: &dyn Presenter, semaphore: vk::Semaphore) -> vk::Result {
        self.submission.present_image(presenter, semaphore)
    }

    /// Blocks until the device is idle. Failures are reported, not returned.
    pub fn wait_for_idle(&self) {
        self.submission.wait_for_idle();
    }

    /// Number of submitted lists that have not retired yet.
    pub fn pending_submissions(&self) -> usize {
        self.submission.pending_submissions()
    }

    /// Blocks until every submitted list has retired and been recycled.
    pub fn wait_for_submissions(&self) {
        self.submission.wait_for_submissions();
    }

    /// Snapshot of all statistics: live memory and pipeline figures merged
    /// with the accumulated queue counters.
    pub fn stat_counters(&self) -> StatCounters {
        let memory = self.memory.memory_stats();
        let pipelines = self.pipelines.pipeline_count();

        let mut result = StatCounters::new();
        result.set(StatCounter::MemoryAllocated, memory.allocated);
        result.set(StatCounter::MemoryUsed, memory.used);
        result.set(StatCounter::PipeCountGraphics, u64::from(pipelines.graphics));
        result.set(StatCounter::PipeCountCompute, u64::from(pipelines.compute));
        result.merge(&self.submission.accumulated());
        result
    }

    /// The number of presents observed so far. Never resets.
    pub fn current_frame_id(&self) -> u64 {
        self.submission.counter(StatCounter::QueuePresentCount)
    }
}

impl ResourceFactory for Device {
    fn create_buffer(
        &self,
        info: &BufferCreateInfo,
        memory_flags: vk::MemoryPropertyFlags,
    ) -> Result<Arc<Buffer>, ResourceError> {
        self.factory.create_buffer(info, memory_flags)
    }

    fn create_buffer_view(
        &self,
        buffer: &Arc<Buffer>,
        info: &BufferViewCreateInfo,
    ) -> Result<Arc<BufferView>, ResourceError> {
        self.factory.create_buffer_view(buffer, info)
    }

    fn create_image(
        &self,
        info: &ImageCreateInfo,
        memory_flags: vk::MemoryPropertyFlags,
    ) -> Result<Arc<Image>, ResourceError> {
        self.factory.create_image(info, memory_flags)
    }

    fn create_image_view(
        &self,
        image: &Arc<Image>,
        info: &ImageViewCreateInfo,
    ) -> Result<Arc<ImageView>, ResourceError> {
        self.factory.create_image_view(image, info)
    }

    fn create_sampler(&self, info: &SamplerCreateInfo) -> Result<Arc<Sampler>, ResourceError> {
        self.factory.create_sampler(info)
    }

    fn create_shader(
        &self,
        stage: vk::ShaderStageFlags,
        slots: &[ResourceSlot],
        interface: InterfaceSlots,
        code: SpirvCode,
    ) -> Arc<Shader> {
        self.factory.create_shader(stage, slots, interface, code)
    }

    fn create_framebuffer(
        &self,
        targets: &RenderTargets,
    ) -> Result<Arc<Framebuffer>, ResourceError> {
        self.factory.create_framebuffer(targets)
    }

    fn create_gpu_event(&self) -> Result<Arc<GpuEvent>, ResourceError> {
        self.factory.create_gpu_event()
    }

    fn create_gpu_query(
        &self,
        query_type: vk::QueryType,
        flags: vk::QueryControlFlags,
        index: u32,
    ) -> Arc<GpuQuery> {
        self.factory.create_gpu_query(query_type, flags, index)
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.wait_for_idle();
        self.trim_pools();
        log::debug!("Destroying {} device", self.client_api);
    }
}
