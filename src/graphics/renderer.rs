//! Renderer drives the per-frame cycle of acquiring, recording and presenting swapchain images.
//!
//! A frame is begun with [Renderer::begin_frame], drawn into inside a [PassInFrame] and handed back with [Renderer::end_frame].
//! Beginning and finishing a pass consume their receiver, so draws can only be recorded while the render pass is active.

use super::device::Device;
use super::swapchain::{Swapchain, SwapchainCreationError};

use crate::config::GraphicsConfig;
use crate::window::Window;

use std::sync::Arc;

use vulkano::command_buffer::{
	AutoCommandBufferBuilder, AutoCommandBufferBuilderContextError, BeginRenderPassError, BuildError,
	CommandBufferExecError, DrawError, DrawIndexedError, DynamicState,
};
use vulkano::device::{Device as LogicalDevice, Queue as DeviceQueue};
use vulkano::format::ClearValue;
use vulkano::framebuffer::{FramebufferAbstract, RenderPassAbstract};
use vulkano::swapchain::{AcquireError, Surface, SwapchainAcquireFuture, SwapchainCreationError as VlkSwapchainCreationError};
use vulkano::sync::{FlushError, GpuFuture};
use vulkano::OomError;

/// Owner of the swapchain and of the synchronization between consecutive frames.
pub struct Renderer {
	device: Arc<LogicalDevice>,
	queue: Arc<DeviceQueue>,
	surface: Arc<Surface<Window>>,
	swapchain: Swapchain,
	previous_frame_end: Option<Box<dyn GpuFuture>>,
	recreate_swapchain: bool,
	clear_color: [f32; 4],
}

/// A frame in the process of being drawn.
pub struct Frame {
	pub(super) commands: AutoCommandBufferBuilder,
	pub(super) dynamic_state: DynamicState,
	framebuffer: Arc<dyn FramebufferAbstract + Send + Sync>,
	clear_color: [f32; 4],
	image_index: usize,
	acquire_future: SwapchainAcquireFuture<Window>,
}

/// A frame with an active render pass.
pub struct PassInFrame {
	pub(super) frame: Frame,
}

/// Error during recording or submission of a frame.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
	/// The command buffer could not be allocated.
	#[error("failed to allocate command buffer: {0}")]
	Oom(#[from] OomError),
	/// The next swapchain image could not be acquired.
	#[error("failed to acquire swapchain image: {0}")]
	Acquire(#[from] AcquireError),
	/// The swapchain could not be recreated.
	#[error(transparent)]
	Swapchain(#[from] SwapchainCreationError),
	#[error("failed to begin render pass: {0}")]
	BeginRenderPass(#[from] BeginRenderPassError),
	#[error("failed to end render pass: {0}")]
	EndRenderPass(#[from] AutoCommandBufferBuilderContextError),
	#[error("failed to record draw: {0}")]
	Draw(#[from] DrawError),
	#[error("failed to record indexed draw: {0}")]
	DrawIndexed(#[from] DrawIndexedError),
	/// The command buffer could not be finalized, typically because a pass was left open.
	#[error("failed to build command buffer: {0}")]
	Build(#[from] BuildError),
	/// The command buffer could not be submitted.
	#[error("failed to execute command buffer: {0}")]
	Execute(#[from] CommandBufferExecError),
}

impl Renderer {
	/// Create a renderer presenting to the surface.
	pub fn new(
		device: &Device,
		surface: Arc<Surface<Window>>,
		config: &GraphicsConfig,
	) -> Result<Renderer, SwapchainCreationError>
	{
		let swapchain = Swapchain::new(device, surface.clone(), config.present_mode)?;

		Ok(Renderer {
			device: device.logical_device(),
			queue: device.graphics_queue().clone(),
			surface,
			swapchain,
			previous_frame_end: None,
			recreate_swapchain: false,
			clear_color: config.clear_color,
		})
	}

	/// Begin drawing a frame.
	///
	/// Returns `Ok(None)` when no image can be drawn to right now: the window is minimized, mid-resize,
	/// or the swapchain went out of date and will be recreated on the next call.
	pub fn begin_frame(&mut self) -> Result<Option<Frame>, FrameError> {
		if let Some(previous) = self.previous_frame_end.as_mut() {
			previous.cleanup_finished();
		}

		let dimensions: [u32; 2] = self.surface.window().inner_size().into();
		if dimensions[0] == 0 || dimensions[1] == 0 {
			return Ok(None);
		}

		if self.recreate_swapchain || dimensions != self.swapchain.extent() {
			match self.swapchain.recreate(dimensions) {
				Ok(()) => {
					tracing::debug!("recreated swapchain at {}x{}", dimensions[0], dimensions[1]);
					self.recreate_swapchain = false;
				},
				Err(SwapchainCreationError::UnsizedWindow) |
				Err(SwapchainCreationError::Swapchain(VlkSwapchainCreationError::UnsupportedDimensions)) => return Ok(None),
				Err(err) => return Err(err.into()),
			}
		}

		let (image_index, suboptimal, acquire_future) = match vulkano::swapchain::acquire_next_image(self.swapchain.swapchain.clone(), None) {
			Ok(result) => result,
			Err(AcquireError::OutOfDate) => {
				self.recreate_swapchain = true;
				return Ok(None);
			},
			Err(err) => return Err(err.into()),
		};
		if suboptimal {
			self.recreate_swapchain = true;
		}

		let commands = AutoCommandBufferBuilder::primary_one_time_submit(self.device.clone(), self.queue.family())?;

		Ok(Some(Frame {
			commands,
			dynamic_state: self.swapchain.dynamic_state.clone(),
			framebuffer: self.swapchain.framebuffers[image_index].clone(),
			clear_color: self.clear_color,
			image_index,
			acquire_future,
		}))
	}

	/// Finish drawing the frame, submit its commands and present the image.
	///
	/// An out of date swapchain is not an error, it gets recreated when the next frame begins.
	pub fn end_frame(&mut self, frame: Frame) -> Result<(), FrameError> {
		let Frame { commands, image_index, acquire_future, .. } = frame;
		let command_buffer = commands.build()?;

		let previous = match self.previous_frame_end.take() {
			Some(previous) => previous,
			None => Box::new(vulkano::sync::now(self.device.clone())) as Box<dyn GpuFuture>,
		};

		let after_flush = previous.join(acquire_future)
			.then_execute(self.queue.clone(), command_buffer)?
			.then_swapchain_present(self.queue.clone(), self.swapchain.swapchain.clone(), image_index)
			.then_signal_fence_and_flush();

		self.previous_frame_end = match after_flush {
			Ok(future) => Some(Box::new(future) as Box<dyn GpuFuture>),
			Err(FlushError::OutOfDate) => {
				self.recreate_swapchain = true;
				None
			},
			Err(err) => {
				tracing::warn!("failed to flush frame: {}", err);
				None
			},
		};
		Ok(())
	}

	/// Request swapchain recreation before the next frame.
	#[inline]
	pub fn window_resized(&mut self) { self.recreate_swapchain = true; }

	/// Width divided by height of the images being drawn to.
	#[inline]
	pub fn aspect_ratio(&self) -> f32 { self.swapchain.extent_aspect_ratio() }

	/// The render pass used by every frame.
	#[inline]
	pub fn render_pass(&self) -> Arc<dyn RenderPassAbstract + Send + Sync> { self.swapchain.render_pass().clone() }
}

impl std::fmt::Debug for Renderer {
	fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
		fmt.debug_struct("Renderer")
			.field("extent", &self.swapchain.extent())
			.field("image_count", &self.swapchain.image_count())
			.field("recreate_swapchain", &self.recreate_swapchain)
			.finish()
	}
}

impl Frame {
	/// Begin the render pass, clearing color and depth.
	pub fn begin_pass(mut self) -> Result<PassInFrame, FrameError> {
		let clear_values: Vec<ClearValue> = vec![self.clear_color.into(), 1f32.into()];
		self.commands.begin_render_pass(self.framebuffer.clone(), false, clear_values)?;
		Ok(PassInFrame { frame: self })
	}
}

impl PassInFrame {
	/// End the render pass, releasing the [Frame] to be finished.
	pub fn finish_pass(mut self) -> Result<Frame, FrameError> {
		self.frame.commands.end_render_pass()?;
		Ok(self.frame)
	}
}
