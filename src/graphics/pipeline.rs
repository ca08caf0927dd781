//! Fixed-function configuration and creation of graphics pipelines.

use super::device::Device;
use super::shaders::simple;

use crate::mesh::Vertex;

use std::sync::Arc;

use vulkano::framebuffer::{RenderPassAbstract, Subpass};
use vulkano::OomError;
use vulkano::pipeline::{GraphicsPipeline, GraphicsPipelineAbstract, GraphicsPipelineCreationError};
use vulkano::pipeline::raster::{CullMode, FrontFace, PolygonMode};

pub use vulkano::pipeline::input_assembly::PrimitiveTopology;

/// Fixed-function state of a pipeline.
#[derive(Clone, Copy, Debug)]
pub struct PipelineConfig {
	pub topology: PrimitiveTopology,
	pub polygon_mode: PolygonMode,
	pub cull_mode: CullMode,
	pub front_face: FrontFace,
	/// Test and write depth, passing fragments closer than the stored value.
	pub depth_test: bool,
	pub subpass: u32,
}

/// Error during pipeline creation.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
	/// The shader module could not be loaded onto the device.
	#[error("failed to load shader module: {0}")]
	Shader(#[from] OomError),
	/// Error during creation of the underlying vulkan graphics-pipeline.
	#[error("failed to create graphics pipeline: {0}")]
	GraphicsPipeline(#[from] GraphicsPipelineCreationError),
	/// The render pass has no subpass with the configured index.
	#[error("render pass has no subpass {0}")]
	NoSubpass(u32),
}

impl Default for PipelineConfig {
	fn default() -> Self {
		Self {
			topology: PrimitiveTopology::TriangleList,
			polygon_mode: PolygonMode::Fill,
			cull_mode: CullMode::None,
			front_face: FrontFace::Clockwise,
			depth_test: true,
			subpass: 0,
		}
	}
}

impl PipelineConfig {
	/// Use given [PrimitiveTopology].
	pub fn topology(self, topology: PrimitiveTopology) -> Self { Self { topology, .. self } }
	/// Rasterize edges only.
	pub fn wireframe(self) -> Self { Self { polygon_mode: PolygonMode::Line, .. self } }
	/// Cull back faces.
	pub fn cull_back(self) -> Self { Self { cull_mode: CullMode::Back, .. self } }
	/// Ignore and keep the depth buffer untouched.
	pub fn without_depth_test(self) -> Self { Self { depth_test: false, .. self } }

	/// Build a pipeline drawing [Vertex] data with the `simple` shaders.
	pub fn build_simple(
		&self,
		device: &Device,
		render_pass: Arc<dyn RenderPassAbstract + Send + Sync>,
	) -> Result<Arc<dyn GraphicsPipelineAbstract + Send + Sync>, PipelineError>
	{
		let logical_device = device.logical_device();
		let vs = simple::vertex::Shader::load(logical_device.clone())?;
		let fs = simple::fragment::Shader::load(logical_device.clone())?;
		let subpass = Subpass::from(render_pass, self.subpass).ok_or(PipelineError::NoSubpass(self.subpass))?;

		let builder = GraphicsPipeline::start()
			.vertex_input_single_buffer::<Vertex>()
			.vertex_shader(vs.main_entry_point(), ())
			.primitive_topology(self.topology)
			.viewports_dynamic_scissors_irrelevant(1)
			.fragment_shader(fs.main_entry_point(), ())
			.render_pass(subpass);

		let builder = match self.polygon_mode {
			PolygonMode::Point => builder.polygon_mode_point(),
			PolygonMode::Line => builder.polygon_mode_line(),
			PolygonMode::Fill => builder.polygon_mode_fill(),
		};

		let builder = match self.cull_mode {
			CullMode::None => builder.cull_mode_disabled(),
			CullMode::Front => builder.cull_mode_front(),
			CullMode::Back => builder.cull_mode_back(),
			CullMode::FrontAndBack => builder.cull_mode_front_and_back(),
		};

		let builder = match self.front_face {
			FrontFace::Clockwise => builder.front_face_clockwise(),
			FrontFace::CounterClockwise => builder.front_face_counter_clockwise(),
		};

		let builder = match self.depth_test {
			true => builder.depth_stencil_simple_depth(),
			false => builder.depth_stencil_disabled(),
		};

		let pipeline: Arc<dyn GraphicsPipelineAbstract + Send + Sync> = Arc::new(builder.build(logical_device)?);
		Ok(pipeline)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_is_filled_depth_tested_triangles() {
		let config = PipelineConfig::default();
		assert_eq!(config.topology, PrimitiveTopology::TriangleList);
		assert_eq!(config.polygon_mode, PolygonMode::Fill);
		assert_eq!(config.cull_mode, CullMode::None);
		assert!(config.depth_test);
	}

	#[test]
	fn modifiers_only_touch_their_field() {
		let config = PipelineConfig::default().cull_back().wireframe();
		assert_eq!(config.cull_mode, CullMode::Back);
		assert_eq!(config.polygon_mode, PolygonMode::Line);
		assert_eq!(config.front_face, FrontFace::Clockwise);
		assert!(!PipelineConfig::default().without_depth_test().depth_test);
	}
}
