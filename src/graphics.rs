//! Graphics provide hardware accelerated rendering.
//!
//! The workflow follows the Vulkan object hierarchy:
//! - [Context](context/struct.Context.html) holds the Vulkan instance.
//! - [Device](device/struct.Device.html) is the selected GPU and its queue.
//! - [Swapchain](swapchain/struct.Swapchain.html) holds the images presented on the window.
//! - [Renderer](renderer/struct.Renderer.html) drives frames, [SimpleRenderSystem](render_system/struct.SimpleRenderSystem.html) draws game objects in them.

pub mod buffer;
pub mod context;
pub mod device;
pub mod model;
pub mod pipeline;
pub mod render_system;
pub mod renderer;
pub mod shaders;
pub mod swapchain;

/// used for hardware acceleration.
pub use vulkano;
pub use vulkano::instance::Version;

const REQUIRED_VULKAN_VERSION: Version = Version { major: 1, minor: 0, patch: 0 };
const ENGINE_NAME: &str = "hex";
// Graphical engine version. Is allowed to differ from the cargo version.
const ENGINE_VERSION: Version = Version { major: 0, minor: 0, patch: 1 };
