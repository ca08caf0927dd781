//! Drawing of game objects with the `simple` shaders.

use super::device::Device;
use super::pipeline::{PipelineConfig, PipelineError};
use super::renderer::{FrameError, PassInFrame};
use super::shaders::simple;

use crate::camera::Camera;
use crate::scene::GameObject;

use std::sync::Arc;

use vulkano::framebuffer::RenderPassAbstract;
use vulkano::pipeline::GraphicsPipelineAbstract;

/// Draws every game object that has a model, lit by a single directional light.
pub struct SimpleRenderSystem {
	pipeline: Arc<dyn GraphicsPipelineAbstract + Send + Sync>,
}

impl SimpleRenderSystem {
	pub fn new(device: &Device, render_pass: Arc<dyn RenderPassAbstract + Send + Sync>) -> Result<Self, PipelineError> {
		Self::with_config(device, render_pass, &PipelineConfig::default())
	}

	pub fn with_config(
		device: &Device,
		render_pass: Arc<dyn RenderPassAbstract + Send + Sync>,
		config: &PipelineConfig,
	) -> Result<Self, PipelineError>
	{
		let pipeline = config.build_simple(device, render_pass)?;
		Ok(Self { pipeline })
	}

	/// Record draws of `objects` as seen by `camera`.
	pub fn render_game_objects(&self, pass: &mut PassInFrame, objects: &[GameObject], camera: &Camera) -> Result<(), FrameError> {
		let projection_view = camera.projection_view();

		for object in objects {
			let model = match &object.model {
				Some(model) => model,
				None => continue,
			};

			let push_constants = simple::vertex::ty::Push {
				transform: (projection_view * object.transform.matrix()).into(),
				normal_matrix: object.transform.normal_matrix().into(),
			};
			model.draw(pass, &self.pipeline, push_constants)?;
		}
		Ok(())
	}
}
