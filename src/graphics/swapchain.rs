//! Swapchain holds the images that are drawn to and presented on the window.
//!
//! Every presentable image gets a framebuffer combining it with a depth attachment.

use super::device::Device;

use crate::config::PresentModeConfig;
use crate::window::Window;

use std::sync::Arc;

use vulkano::command_buffer::DynamicState;
use vulkano::format::Format;
use vulkano::framebuffer::{Framebuffer, FramebufferAbstract, FramebufferCreationError, RenderPassAbstract, RenderPassCreationError};
use vulkano::image::{AttachmentImage, ImageCreationError, ImageUsage, SwapchainImage};
use vulkano::pipeline::viewport::Viewport;
use vulkano::swapchain::{
	CapabilitiesError, ColorSpace, FullscreenExclusive, PresentMode, Surface, SurfaceTransform,
	Swapchain as VlkSwapchain, SwapchainCreationError as VlkSwapchainCreationError,
};

/// Format of the depth attachment.
pub const DEPTH_FORMAT: Format = Format::D16Unorm;

/// Swapchain is the infrastructure for drawing on the screen.
///
/// It includes the front and back buffers that are presented on the screen.
pub struct Swapchain {
	device: Arc<vulkano::device::Device>,

	pub(super) swapchain: Arc<VlkSwapchain<Window>>,
	pub(super) render_pass: Arc<dyn RenderPassAbstract + Send + Sync>,
	pub(super) framebuffers: Vec<Arc<dyn FramebufferAbstract + Send + Sync>>,
	pub(super) dynamic_state: DynamicState,

	extent: [u32; 2],
}

/// An error during the creation of a [Swapchain].
#[derive(Debug, thiserror::Error)]
pub enum SwapchainCreationError {
	/// Error during querying draw-surface capabilities.
	#[error("failed to query surface capabilities: {0}")]
	SurfaceCapabilities(#[from] CapabilitiesError),
	/// Error during the creation of the swapchain.
	#[error("failed to create swapchain: {0}")]
	Swapchain(#[from] VlkSwapchainCreationError),
	/// Error during the creation of the render pass.
	#[error("failed to create render pass: {0}")]
	RenderPass(#[from] RenderPassCreationError),
	/// Error during the creation of the depth-buffer image.
	#[error("failed to create depth image: {0}")]
	Image(#[from] ImageCreationError),
	/// Error during the creation of framebuffers.
	#[error("failed to create framebuffer: {0}")]
	Framebuffer(#[from] FramebufferCreationError),
	/// No applicable format for draw-surface was found.
	#[error("surface supports no image formats")]
	NoCompatibleFormatFound,
	/// The surface reports no usable composite alpha mode.
	#[error("surface supports no composite alpha mode")]
	NoCompositeAlpha,
	/// Window passed for the creation of the swapchain has no apparent size.
	#[error("window has no apparent size")]
	UnsizedWindow,
}

impl Swapchain {
	/// Create a new Swapchain for the surface using provided Device.
	pub fn new(
		device: &Device,
		surface: Arc<Surface<Window>>,
		present_mode: PresentModeConfig,
	) -> Result<Swapchain, SwapchainCreationError>
	{
		let dimensions: [u32; 2] = surface.window().inner_size().into();
		if dimensions[0] == 0 || dimensions[1] == 0 {
			return Err(SwapchainCreationError::UnsizedWindow);
		}

		let capabilities = surface.capabilities(device.physical_device())?;
		let alpha = capabilities.supported_composite_alpha.iter().next().ok_or(SwapchainCreationError::NoCompositeAlpha)?;
		let format = select_format(&capabilities.supported_formats)?;

		let requested = to_present_mode(present_mode);
		let present_mode = if capabilities.present_modes.supports(requested) {
			requested
		} else {
			tracing::warn!("present mode {:?} is not supported, falling back to fifo", requested);
			PresentMode::Fifo
		};

		let image_count = match capabilities.max_image_count {
			Some(max) => (capabilities.min_image_count + 1).min(max),
			None => capabilities.min_image_count + 1,
		};

		let (swapchain, images) = VlkSwapchain::new(
			device.logical_device(),
			surface,
			image_count,
			format,
			dimensions,
			1,
			ImageUsage::color_attachment(),
			device.graphics_queue(),
			SurfaceTransform::Identity,
			alpha,
			present_mode,
			FullscreenExclusive::Default,
			true,
			ColorSpace::SrgbNonLinear,
		)?;
		tracing::debug!("created swapchain: {} images of {:?}, {:?}", images.len(), format, present_mode);

		let logical_device = device.logical_device();
		let render_pass = Arc::new(vulkano::single_pass_renderpass!(
			logical_device.clone(),
			attachments: {
				color: {
					load: Clear,
					store: Store,
					format: swapchain.format(),
					samples: 1,
				},
				depth: {
					load: Clear,
					store: DontCare,
					format: DEPTH_FORMAT,
					samples: 1,
				}
			},
			pass: {
				color: [color],
				depth_stencil: {depth}
			}
		)?) as Arc<dyn RenderPassAbstract + Send + Sync>;

		let mut result = Swapchain {
			device: logical_device,
			swapchain,
			render_pass,
			framebuffers: Vec::new(),
			dynamic_state: DynamicState::default(),
			extent: dimensions,
		};
		result.window_size_dependent_setup(&images)?;
		Ok(result)
	}

	/// Recreate the swapchain images for new window dimensions.
	///
	/// Fails with [VlkSwapchainCreationError::UnsupportedDimensions] while the window is resizing.
	pub fn recreate(&mut self, dimensions: [u32; 2]) -> Result<(), SwapchainCreationError> {
		if dimensions[0] == 0 || dimensions[1] == 0 {
			return Err(SwapchainCreationError::UnsizedWindow);
		}

		let (swapchain, images) = self.swapchain.recreate_with_dimensions(dimensions)?;
		self.swapchain = swapchain;
		self.window_size_dependent_setup(&images)
	}

	/// Width divided by height of the swapchain images.
	pub fn extent_aspect_ratio(&self) -> f32 {
		aspect_ratio(self.extent)
	}

	/// Dimensions of the swapchain images.
	#[inline(always)]
	pub fn extent(&self) -> [u32; 2] { self.extent }

	/// Number of images in the swapchain.
	#[inline(always)]
	pub fn image_count(&self) -> usize { self.framebuffers.len() }

	/// The render pass every framebuffer of this swapchain is compatible with.
	#[inline(always)]
	pub fn render_pass(&self) -> &Arc<dyn RenderPassAbstract + Send + Sync> { &self.render_pass }

	fn window_size_dependent_setup(&mut self, images: &[Arc<SwapchainImage<Window>>]) -> Result<(), SwapchainCreationError> {
		let dimensions = match images.first() {
			Some(image) => image.dimensions(),
			None => self.extent,
		};
		self.extent = dimensions;
		resize_dynamic_state_viewport(&mut self.dynamic_state, dimensions);

		let depth = AttachmentImage::transient(self.device.clone(), dimensions, DEPTH_FORMAT)?;

		let mut framebuffers = Vec::with_capacity(images.len());
		for image in images {
			let framebuffer = Framebuffer::start(self.render_pass.clone())
				.add(image.clone())?
				.add(depth.clone())?
				.build()?;
			framebuffers.push(Arc::new(framebuffer) as Arc<dyn FramebufferAbstract + Send + Sync>);
		}
		self.framebuffers = framebuffers;
		Ok(())
	}
}

fn select_format(formats: &[(Format, ColorSpace)]) -> Result<Format, SwapchainCreationError> {
	// prefer an sRGB format so the shaders can output linear colors
	formats.iter()
		.find(|(format, space)| *format == Format::B8G8R8A8Srgb && *space == ColorSpace::SrgbNonLinear)
		.or_else(|| formats.first())
		.map(|(format, _)| *format)
		.ok_or(SwapchainCreationError::NoCompatibleFormatFound)
}

fn to_present_mode(mode: PresentModeConfig) -> PresentMode {
	match mode {
		PresentModeConfig::Fifo => PresentMode::Fifo,
		PresentModeConfig::Mailbox => PresentMode::Mailbox,
		PresentModeConfig::Immediate => PresentMode::Immediate,
		PresentModeConfig::Relaxed => PresentMode::Relaxed,
	}
}

fn aspect_ratio(extent: [u32; 2]) -> f32 {
	extent[0] as f32 / extent[1] as f32
}

fn resize_dynamic_state_viewport(dynamic_state: &mut DynamicState, dimensions: [u32; 2]) {
	let viewport = Viewport {
		origin: [0.0, 0.0],
		dimensions: [dimensions[0] as f32, dimensions[1] as f32],
		depth_range: 0.0 .. 1.0,
	};

	match dynamic_state.viewports {
		Some(ref mut vec) => {
			match vec.len() {
				0 => vec.push(viewport),
				_ => vec[0] = viewport,
			}
		},
		None => dynamic_state.viewports = Some(vec![viewport]),
	};
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn prefers_srgb_format() {
		let formats = [
			(Format::B8G8R8A8Unorm, ColorSpace::SrgbNonLinear),
			(Format::B8G8R8A8Srgb, ColorSpace::SrgbNonLinear),
		];
		assert_eq!(select_format(&formats).unwrap(), Format::B8G8R8A8Srgb);
		assert_eq!(select_format(&formats[..1]).unwrap(), Format::B8G8R8A8Unorm);
		assert!(matches!(select_format(&[]), Err(SwapchainCreationError::NoCompatibleFormatFound)));
	}

	#[test]
	fn viewport_follows_dimensions() {
		let mut state = DynamicState::default();
		resize_dynamic_state_viewport(&mut state, [800, 600]);
		resize_dynamic_state_viewport(&mut state, [1280, 720]);

		let viewports = state.viewports.unwrap();
		assert_eq!(viewports.len(), 1);
		assert_eq!(viewports[0].dimensions, [1280.0, 720.0]);
		assert_eq!(viewports[0].depth_range, 0.0 .. 1.0);
	}

	#[test]
	fn aspect_ratio_is_width_over_height() {
		assert_eq!(aspect_ratio([800, 600]), 800.0 / 600.0);
		assert_eq!(aspect_ratio([1920, 1080]), 1920.0 / 1080.0);
	}
}
