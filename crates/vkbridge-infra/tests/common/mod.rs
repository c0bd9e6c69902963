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

//! Mock collaborators shared by the integration tests.

#![allow(dead_code)]

use ash::prelude::VkResult;
use ash::vk::{self, Handle};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use vkbridge_core::device::{
    AdapterInfo, BufferCreateInfo, BufferViewCreateInfo, DeviceFn, FramebufferSize,
    ImageCreateInfo, ImageViewCreateInfo, MemorySlice, MetaObject, MetaObjects, PipelineCount,
    PipelineManager, Presenter, QueueSubmission, RenderPassFormat, SamplerCreateInfo, Shader,
};
use vkbridge_core::RuntimeOptions;
use vkbridge_infra::{DedicatedMemoryAllocator, Device, DeviceCreateInfo, RenderPassPool};
use vkbridge_telemetry::RecordingDiagnostics;

pub const MAX_FRAMEBUFFER_WIDTH: u32 = 4096;
pub const MAX_FRAMEBUFFER_HEIGHT: u32 = 2048;
pub const MAX_FRAMEBUFFER_LAYERS: u32 = 16;

/// A device function table that hands out fake handles and counts calls.
#[derive(Debug)]
pub struct MockDeviceFn {
    next_handle: AtomicU64,
    live_objects: AtomicUsize,
    buffers_created: AtomicUsize,
    buffer_sizes: Mutex<HashMap<u64, vk::DeviceSize>>,
    render_passes_created: AtomicUsize,
    wait_idle_calls: AtomicUsize,
    submitted: Mutex<Vec<vk::CommandBuffer>>,
    pub fail_submissions: AtomicBool,
    pub fail_wait_idle: AtomicBool,
    pub fail_allocations: AtomicBool,
    pub fences_signaled: AtomicBool,
}

impl Default for MockDeviceFn {
    fn default() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
            live_objects: AtomicUsize::new(0),
            buffers_created: AtomicUsize::new(0),
            buffer_sizes: Mutex::new(HashMap::new()),
            render_passes_created: AtomicUsize::new(0),
            wait_idle_calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
            fail_submissions: AtomicBool::new(false),
            fail_wait_idle: AtomicBool::new(false),
            fail_allocations: AtomicBool::new(false),
            fences_signaled: AtomicBool::new(true),
        }
    }
}

impl MockDeviceFn {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn create<T: Handle>(&self) -> T {
        self.live_objects.fetch_add(1, Ordering::SeqCst);
        T::from_raw(self.next_handle.fetch_add(1, Ordering::SeqCst))
    }

    fn destroy(&self) {
        self.live_objects.fetch_sub(1, Ordering::SeqCst);
    }

    /// Objects created and not yet destroyed, including memory allocations.
    pub fn live_objects(&self) -> usize {
        self.live_objects.load(Ordering::SeqCst)
    }

    pub fn buffers_created(&self) -> usize {
        self.buffers_created.load(Ordering::SeqCst)
    }

    pub fn render_passes_created(&self) -> usize {
        self.render_passes_created.load(Ordering::SeqCst)
    }

    pub fn wait_idle_calls(&self) -> usize {
        self.wait_idle_calls.load(Ordering::SeqCst)
    }

    /// Command buffers accepted by the queue, in submission order.
    pub fn submitted(&self) -> Vec<vk::CommandBuffer> {
        self.submitted.lock().clone()
    }

    pub fn set(&self, flag: &AtomicBool, value: bool) {
        flag.store(value, Ordering::SeqCst);
    }

    fn requirements(size: vk::DeviceSize) -> vk::MemoryRequirements {
        vk::MemoryRequirements {
            size: size.next_multiple_of(256),
            alignment: 256,
            memory_type_bits: 0b11,
        }
    }
}

impl DeviceFn for MockDeviceFn {
    fn get_device_queue(&self, queue_family: u32, index: u32) -> vk::Queue {
        vk::Queue::from_raw(0x1000 + u64::from(queue_family) * 16 + u64::from(index))
    }

    fn device_wait_idle(&self) -> VkResult<()> {
        self.wait_idle_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_wait_idle.load(Ordering::SeqCst) {
            Err(vk::Result::ERROR_DEVICE_LOST)
        } else {
            Ok(())
        }
    }

    fn allocate_memory(&self, _memory_type: u32, _size: vk::DeviceSize) -> VkResult<vk::DeviceMemory> {
        if self.fail_allocations.load(Ordering::SeqCst) {
            return Err(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY);
        }
        Ok(self.create())
    }

    fn free_memory(&self, _memory: vk::DeviceMemory) {
        self.destroy();
    }

    fn create_buffer(&self, info: &BufferCreateInfo) -> VkResult<vk::Buffer> {
        self.buffers_created.fetch_add(1, Ordering::SeqCst);
        let buffer: vk::Buffer = self.create();
        self.buffer_sizes.lock().insert(buffer.as_raw(), info.size);
        Ok(buffer)
    }

    fn buffer_memory_requirements(&self, buffer: vk::Buffer) -> vk::MemoryRequirements {
        let size = self
            .buffer_sizes
            .lock()
            .get(&buffer.as_raw())
            .copied()
            .unwrap_or(0);
        Self::requirements(size)
    }

    fn bind_buffer_memory(&self, _buffer: vk::Buffer, _memory: &MemorySlice) -> VkResult<()> {
        Ok(())
    }

    fn destroy_buffer(&self, buffer: vk::Buffer) {
        self.buffer_sizes.lock().remove(&buffer.as_raw());
        self.destroy();
    }

    fn create_image(&self, _info: &ImageCreateInfo) -> VkResult<vk::Image> {
        Ok(self.create())
    }

    fn image_memory_requirements(&self, _image: vk::Image) -> vk::MemoryRequirements {
        Self::requirements(65536)
    }

    fn bind_image_memory(&self, _image: vk::Image, _memory: &MemorySlice) -> VkResult<()> {
        Ok(())
    }

    fn destroy_image(&self, _image: vk::Image) {
        self.destroy();
    }

    fn create_buffer_view(
        &self,
        _buffer: vk::Buffer,
        _info: &BufferViewCreateInfo,
    ) -> VkResult<vk::BufferView> {
        Ok(self.create())
    }

    fn destroy_buffer_view(&self, _view: vk::BufferView) {
        self.destroy();
    }

    fn create_image_view(
        &self,
        _image: vk::Image,
        _info: &ImageViewCreateInfo,
    ) -> VkResult<vk::ImageView> {
        Ok(self.create())
    }

    fn destroy_image_view(&self, _view: vk::ImageView) {
        self.destroy();
    }

    fn create_sampler(&self, _info: &SamplerCreateInfo) -> VkResult<vk::Sampler> {
        Ok(self.create())
    }

    fn destroy_sampler(&self, _sampler: vk::Sampler) {
        self.destroy();
    }

    fn create_render_pass(&self, _format: &RenderPassFormat) -> VkResult<vk::RenderPass> {
        self.render_passes_created.fetch_add(1, Ordering::SeqCst);
        Ok(self.create())
    }

    fn destroy_render_pass(&self, _render_pass: vk::RenderPass) {
        self.destroy();
    }

    fn create_framebuffer(
        &self,
        _render_pass: vk::RenderPass,
        _attachments: &[vk::ImageView],
        _size: FramebufferSize,
    ) -> VkResult<vk::Framebuffer> {
        Ok(self.create())
    }

    fn destroy_framebuffer(&self, _framebuffer: vk::Framebuffer) {
        self.destroy();
    }

    fn create_event(&self) -> VkResult<vk::Event> {
        Ok(self.create())
    }

    fn destroy_event(&self, _event: vk::Event) {
        self.destroy();
    }

    fn create_command_pool(&self, _queue_family: u32) -> VkResult<vk::CommandPool> {
        Ok(self.create())
    }

    fn allocate_command_buffer(&self, _pool: vk::CommandPool) -> VkResult<vk::CommandBuffer> {
        // Freed together with its pool, so not counted as a live object.
        Ok(vk::CommandBuffer::from_raw(
            self.next_handle.fetch_add(1, Ordering::SeqCst),
        ))
    }

    fn reset_command_pool(&self, _pool: vk::CommandPool) -> VkResult<()> {
        Ok(())
    }

    fn destroy_command_pool(&self, _pool: vk::CommandPool) {
        self.destroy();
    }

    fn begin_command_buffer(&self, _command_buffer: vk::CommandBuffer) -> VkResult<()> {
        Ok(())
    }

    fn end_command_buffer(&self, _command_buffer: vk::CommandBuffer) -> VkResult<()> {
        Ok(())
    }

    fn create_fence(&self) -> VkResult<vk::Fence> {
        Ok(self.create())
    }

    fn wait_for_fence(&self, _fence: vk::Fence, timeout_ns: u64) -> VkResult<()> {
        if self.fences_signaled.load(Ordering::SeqCst) {
            return Ok(());
        }
        std::thread::sleep(Duration::from_nanos(timeout_ns).min(Duration::from_millis(1)));
        Err(vk::Result::TIMEOUT)
    }

    fn reset_fence(&self, _fence: vk::Fence) -> VkResult<()> {
        Ok(())
    }

    fn destroy_fence(&self, _fence: vk::Fence) {
        self.destroy();
    }

    fn create_descriptor_pool(&self, _max_sets: u32) -> VkResult<vk::DescriptorPool> {
        Ok(self.create())
    }

    fn reset_descriptor_pool(&self, _pool: vk::DescriptorPool) -> VkResult<()> {
        Ok(())
    }

    fn destroy_descriptor_pool(&self, _pool: vk::DescriptorPool) {
        self.destroy();
    }

    fn queue_submit(&self, _queue: vk::Queue, submission: &QueueSubmission) -> VkResult<()> {
        if self.fail_submissions.load(Ordering::SeqCst) {
            return Err(vk::Result::ERROR_DEVICE_LOST);
        }
        self.submitted.lock().push(submission.command_buffer);
        Ok(())
    }
}

/// A pipeline manager that only records registrations.
#[derive(Debug, Default)]
pub struct MockPipelineManager {
    pub shaders: Mutex<Vec<Arc<Shader>>>,
    pub count: Mutex<PipelineCount>,
}

impl PipelineManager for MockPipelineManager {
    fn register_shader(&self, shader: Arc<Shader>) {
        self.shaders.lock().push(shader);
    }

    fn pipeline_count(&self) -> PipelineCount {
        *self.count.lock()
    }
}

/// A presenter returning a fixed status.
#[derive(Debug)]
pub struct MockPresenter {
    pub status: vk::Result,
    pub calls: AtomicUsize,
}

impl MockPresenter {
    pub fn returning(status: vk::Result) -> Self {
        Self {
            status,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Presenter for MockPresenter {
    fn present_image(&self, _semaphore: vk::Semaphore) -> vk::Result {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.status
    }
}

#[derive(Debug)]
pub struct MockMetaObject(pub &'static str);

impl MetaObject for MockMetaObject {}

pub fn meta_objects() -> MetaObjects {
    MetaObjects {
        clear: Arc::new(MockMetaObject("clear")),
        copy: Arc::new(MockMetaObject("copy")),
        mip_gen: Arc::new(MockMetaObject("mip_gen")),
        pack: Arc::new(MockMetaObject("pack")),
        resolve: Arc::new(MockMetaObject("resolve")),
    }
}

/// An adapter with one device-local and one host-visible memory type.
pub fn adapter() -> AdapterInfo {
    let mut adapter = AdapterInfo {
        extensions: vec!["VK_KHR_swapchain".to_owned()],
        graphics_queue_family: 0,
        present_queue_family: 0,
        ..Default::default()
    };

    let limits = &mut adapter.properties.limits;
    limits.max_framebuffer_width = MAX_FRAMEBUFFER_WIDTH;
    limits.max_framebuffer_height = MAX_FRAMEBUFFER_HEIGHT;
    limits.max_framebuffer_layers = MAX_FRAMEBUFFER_LAYERS;
    limits.max_descriptor_set_uniform_buffers_dynamic = 8;
    limits.max_descriptor_set_storage_buffers_dynamic = 4;

    let memory = &mut adapter.memory_properties;
    memory.memory_type_count = 2;
    memory.memory_types[0] = vk::MemoryType {
        property_flags: vk::MemoryPropertyFlags::DEVICE_LOCAL,
        heap_index: 0,
    };
    memory.memory_types[1] = vk::MemoryType {
        property_flags: vk::MemoryPropertyFlags::HOST_VISIBLE
            | vk::MemoryPropertyFlags::HOST_COHERENT,
        heap_index: 1,
    };
    memory.memory_heap_count = 2;

    adapter
}

/// A device wired to mock collaborators, plus handles to inspect them.
pub struct TestDevice {
    pub device: Arc<Device>,
    pub vkd: Arc<MockDeviceFn>,
    pub pipelines: Arc<MockPipelineManager>,
    pub diagnostics: Arc<RecordingDiagnostics>,
}

pub fn create_device(options: RuntimeOptions) -> TestDevice {
    create_device_with_adapter(adapter(), options)
}

pub fn create_device_with_adapter(adapter: AdapterInfo, options: RuntimeOptions) -> TestDevice {
    let _ = vkbridge_telemetry::init_logging_with_filter("debug");

    let vkd = MockDeviceFn::new();
    let pipelines = Arc::new(MockPipelineManager::default());
    let diagnostics = Arc::new(RecordingDiagnostics::new());

    let vkd_dyn: Arc<dyn DeviceFn> = vkd.clone();
    let memory = Arc::new(DedicatedMemoryAllocator::new(
        Arc::clone(&vkd_dyn),
        adapter.memory_properties,
    ));
    let render_passes = Arc::new(RenderPassPool::new(Arc::clone(&vkd_dyn)));

    let device = Device::new(DeviceCreateInfo {
        client_api: "D3D11".to_owned(),
        adapter,
        vkd: vkd_dyn,
        options,
        memory,
        render_passes,
        pipelines: pipelines.clone(),
        meta: meta_objects(),
        diagnostics: diagnostics.clone(),
    })
    .expect("valid test options");

    TestDevice {
        device: Arc::new(device),
        vkd,
        pipelines,
        diagnostics,
    }
}

/// Options with the standard staging size used throughout the tests.
pub fn test_options() -> RuntimeOptions {
    RuntimeOptions {
        staging_buffer_size: 1_048_576,
        retirement_timeout_ms: 5,
        ..Default::default()
    }
}
