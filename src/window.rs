//! OS window and the Vulkan surface drawn onto it.

use crate::config::WindowConfig;
use crate::graphics::context::Context;

use std::sync::Arc;

use vulkano::swapchain::Surface;
use vulkano_win::VkSurfaceBuild;
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

pub use winit::window::Window;

/// Error during window creation.
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
	#[error("failed to create window surface: {0}")]
	Creation(#[from] vulkano_win::CreationError),
	#[error("window size {0}x{1} is empty")]
	EmptySize(u32, u32),
}

/// Open a window of the configured size and title and build a surface for it.
pub fn create_surface(
	event_loop: &EventLoop<()>,
	context: &Context,
	config: &WindowConfig,
) -> Result<Arc<Surface<Window>>, WindowError>
{
	if config.width == 0 || config.height == 0 {
		return Err(WindowError::EmptySize(config.width, config.height));
	}

	let surface = WindowBuilder::new()
		.with_inner_size(LogicalSize::new(config.width, config.height))
		.with_title(config.title.clone())
		.build_vk_surface(event_loop, context.instance().clone())?;

	tracing::debug!("opened window {:?} ({}x{})", config.title, config.width, config.height);
	Ok(surface)
}

/// Confine and hide the cursor so the mouse can be used for looking around, or release it.
///
/// Platforms that refuse the grab keep working, the cursor just stays free.
pub fn set_cursor_captured(window: &Window, captured: bool) {
	if let Err(err) = window.set_cursor_grab(captured) {
		tracing::warn!("failed to {} cursor: {}", if captured { "grab" } else { "release" }, err);
	}
	window.set_cursor_visible(!captured);
}

/// A minimized window has no area to draw to.
pub fn is_unsized(window: &Window) -> bool {
	let size = window.inner_size();
	size.width == 0 || size.height == 0
}
