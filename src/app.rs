//! Application wiring and the main loop.

use crate::camera::Camera;
use crate::config::{Config, SceneConfig};
use crate::controller::MovementController;
use crate::graphics::context::Context;
use crate::graphics::device::{Device, DeviceCreationError};
use crate::graphics::model::{Model, ModelError};
use crate::graphics::pipeline::PipelineError;
use crate::graphics::render_system::SimpleRenderSystem;
use crate::graphics::renderer::{FrameError, Renderer};
use crate::graphics::swapchain::SwapchainCreationError;
use crate::graphics::Version;
use crate::input::InputState;
use crate::mesh::MeshBuilder;
use crate::requirements::PACKAGE;
use crate::scene::GameObject;
use crate::window::{self, Window, WindowError};

use std::sync::Arc;
use std::time::Instant;

use cgmath::{Vector3, Zero};
use vulkano::instance::InstanceCreationError;
use vulkano::swapchain::Surface;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::desktop::EventLoopExtDesktop;

const APP_VERSION: Version = Version { major: 0, minor: 0, patch: 1 };

/// Error during start-up or while running the main loop.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("failed to create vulkan instance: {0}")]
	Instance(#[from] InstanceCreationError),
	#[error(transparent)]
	Window(#[from] WindowError),
	#[error("failed to create device: {0}")]
	Device(#[from] DeviceCreationError),
	#[error(transparent)]
	Swapchain(#[from] SwapchainCreationError),
	#[error(transparent)]
	Pipeline(#[from] PipelineError),
	#[error("failed to load model: {0}")]
	Model(#[from] ModelError),
	#[error(transparent)]
	Frame(#[from] FrameError),
}

/// Counters collected over a run of the main loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
	pub frames: u64,
	pub seconds: f64,
}

impl FrameStats {
	/// Average frames per second, zero for a run of no measurable length.
	pub fn fps(&self) -> f64 {
		match self.seconds > 0.0 {
			true => self.frames as f64 / self.seconds,
			false => 0.0,
		}
	}
}

/// The game client: a window, the GPU state and the objects to draw.
pub struct App {
	config: Config,
	event_loop: EventLoop<()>,
	surface: Arc<Surface<Window>>,
	device: Device,
	renderer: Renderer,
	render_system: SimpleRenderSystem,
	game_objects: Vec<GameObject>,
}

impl App {
	/// Open the window, initialize vulkan and load the scene.
	pub fn new(config: Config) -> Result<App, AppError> {
		let event_loop = EventLoop::new();
		let context = Context::with_app_info(PACKAGE.name, APP_VERSION)?;
		let surface = window::create_surface(&event_loop, &context, &config.window)?;

		let device = Device::new(&context, &surface)?;
		tracing::debug!("initialized device: {:?}", device);

		let renderer = Renderer::new(&device, surface.clone(), &config.graphics)?;
		let render_system = SimpleRenderSystem::new(&device, renderer.render_pass())?;
		let game_objects = load_game_objects(&device, &config.scene)?;
		tracing::info!("loaded {} game objects, {:?}", game_objects.len(), renderer);

		Ok(App { config, event_loop, surface, device, renderer, render_system, game_objects })
	}

	/// Run the main loop until the window is closed or Escape is pressed.
	pub fn run(self) -> Result<FrameStats, AppError> {
		let App { config, mut event_loop, surface, device, mut renderer, render_system, game_objects } = self;

		let controls = &config.controls;
		let controller = MovementController::new(controls.keys.clone(), controls.move_speed, controls.look_speed, controls.sensitivity);
		let mut input = InputState::new();
		let mut camera = Camera::new();
		let mut viewer = GameObject::create();
		viewer.transform.translation = config.scene.spawn.into();

		window::set_cursor_captured(surface.window(), true);

		let start_time = Instant::now();
		let mut current_time = start_time;
		let mut frame_count: u64 = 0;
		let mut failure = None;

		event_loop.run_return(|event, _, control_flow| {
			*control_flow = ControlFlow::Poll;

			match event {
				Event::WindowEvent { event, .. } => {
					input.handle_window_event(&event);
					match event {
						WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
						WindowEvent::KeyboardInput { input: KeyboardInput { virtual_keycode: Some(VirtualKeyCode::Escape), state: ElementState::Pressed, .. }, .. } => {
							window::set_cursor_captured(surface.window(), false);
							*control_flow = ControlFlow::Exit;
						},
						WindowEvent::Focused(focused) => window::set_cursor_captured(surface.window(), focused),
						WindowEvent::Resized(_) => renderer.window_resized(),
						_ => (),
					}
				},
				Event::DeviceEvent { event, .. } => input.handle_device_event(&event),
				Event::MainEventsCleared => {
					let now = Instant::now();
					let frame_time = now.duration_since(current_time).as_secs_f32().min(config.max_frame_time);
					current_time = now;

					controller.move_in_plane_xz(&input, frame_time, &mut viewer);
					controller.look_around(&mut input, frame_time, &mut viewer);
					camera.set_view_yxz(viewer.transform.translation, viewer.transform.rotation);

					let fov_y = config.camera.fov_y_degrees.to_radians();
					if let Err(err) = camera.set_perspective_projection(fov_y, renderer.aspect_ratio(), config.camera.near, config.camera.far) {
						tracing::debug!("keeping previous projection: {}", err);
					}

					match draw_frame(&mut renderer, &render_system, &game_objects, &camera) {
						Ok(true) => frame_count += 1,
						Ok(false) => tracing::trace!("skipped frame"),
						Err(err) => {
							failure = Some(err);
							*control_flow = ControlFlow::Exit;
						},
					}
				},
				_ => (),
			}
		});

		device.wait_idle();

		let stats = FrameStats { frames: frame_count, seconds: start_time.elapsed().as_secs_f64() };
		tracing::info!("produced {} frames over {:.2} seconds ({:.2} avg fps)", stats.frames, stats.seconds, stats.fps());

		match failure {
			Some(err) => Err(err.into()),
			None => Ok(stats),
		}
	}
}

/// Record and submit a single frame, `false` if it had to be skipped.
fn draw_frame(
	renderer: &mut Renderer,
	render_system: &SimpleRenderSystem,
	game_objects: &[GameObject],
	camera: &Camera,
) -> Result<bool, FrameError>
{
	let frame = match renderer.begin_frame()? {
		Some(frame) => frame,
		None => return Ok(false),
	};

	let mut pass = frame.begin_pass()?;
	render_system.render_game_objects(&mut pass, game_objects, camera)?;
	let frame = pass.finish_pass()?;

	renderer.end_frame(frame)?;
	Ok(true)
}

fn load_game_objects(device: &Device, scene: &SceneConfig) -> Result<Vec<GameObject>, ModelError> {
	let model = match scene.model.as_str() {
		"cube" => Model::new(device, &MeshBuilder::cube(Vector3::zero()))?,
		"test-cube" => Model::new(device, &MeshBuilder::test_cube(Vector3::zero()))?,
		name => Model::from_file(device, &scene.models_dir, name)?,
	};

	tracing::debug!(
		"model {:?}: {} vertices, {} indices ({})",
		scene.model, model.vertex_count(), model.index_count(), if model.is_indexed() { "indexed" } else { "in order" },
	);

	let mut object = GameObject::create();
	object.model = Some(Arc::new(model));
	Ok(vec![object])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fps_is_frames_over_seconds() {
		let stats = FrameStats { frames: 120, seconds: 2.0 };
		assert_eq!(stats.fps(), 60.0);
	}

	#[test]
	fn empty_run_has_zero_fps() {
		let stats = FrameStats { frames: 0, seconds: 0.0 };
		assert_eq!(stats.fps(), 0.0);
	}
}
