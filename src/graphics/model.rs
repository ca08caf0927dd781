//! Geometry uploaded to the GPU.

use super::buffer::{create_immutable_buffer_from_iter, BufferAccess, BufferUsage, ImmutableBuffer, UploadError};
use super::device::Device;
use super::renderer::{FrameError, PassInFrame};

use crate::mesh::{MeshBuilder, MeshError, Vertex};

use std::path::Path;
use std::sync::Arc;

use vulkano::pipeline::GraphicsPipelineAbstract;

/// Device-local vertex data with optional indices.
pub struct Model {
	vertex_buffer: Arc<ImmutableBuffer<[Vertex]>>,
	index_buffer: Option<Arc<ImmutableBuffer<[u32]>>>,
	vertex_count: u32,
	index_count: u32,
}

/// Error during model creation.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
	/// Error during upload of vertex or index data.
	#[error(transparent)]
	Upload(#[from] UploadError),
	/// The mesh could not be loaded or is not drawable.
	#[error(transparent)]
	Mesh(#[from] MeshError),
}

impl Model {
	/// Upload the mesh to the device.
	///
	/// An index buffer is only created when the mesh has indices.
	pub fn new(device: &Device, mesh: &MeshBuilder) -> Result<Model, ModelError> {
		mesh.validate()?;

		let vertex_buffer = create_immutable_buffer_from_iter(device, mesh.vertices.iter().cloned(), BufferUsage::vertex_buffer())?;
		let index_buffer = match mesh.indices.is_empty() {
			true => None,
			false => Some(create_immutable_buffer_from_iter(device, mesh.indices.iter().cloned(), BufferUsage::index_buffer())?),
		};

		Ok(Model {
			vertex_buffer,
			index_buffer,
			vertex_count: mesh.vertices.len() as u32,
			index_count: mesh.indices.len() as u32,
		})
	}

	/// Load `<models_dir>/<name>.obj` and upload it.
	pub fn from_file(device: &Device, models_dir: &Path, name: &str) -> Result<Model, ModelError> {
		let path = models_dir.join(format!("{}.obj", name));
		let mesh = MeshBuilder::load_obj(&path)?;
		tracing::debug!("loaded {}: {} vertices", path.display(), mesh.vertices.len());
		Model::new(device, &mesh)
	}

	#[inline(always)]
	pub fn vertex_count(&self) -> u32 { self.vertex_count }

	#[inline(always)]
	pub fn index_count(&self) -> u32 { self.index_count }

	#[inline(always)]
	pub fn is_indexed(&self) -> bool { self.index_buffer.is_some() }

	/// Record a draw of this model into the active pass.
	///
	/// Uses the index buffer when the model has one, otherwise draws the vertices in order.
	pub fn draw<Pc>(
		&self,
		pass: &mut PassInFrame,
		pipeline: &Arc<dyn GraphicsPipelineAbstract + Send + Sync>,
		push_constants: Pc,
	) -> Result<(), FrameError>
	{
		let vertex_buffers = vec![self.vertex_buffer.clone() as Arc<dyn BufferAccess + Send + Sync>];
		let frame = &mut pass.frame;

		match &self.index_buffer {
			Some(index_buffer) => {
				frame.commands.draw_indexed(pipeline.clone(), &frame.dynamic_state, vertex_buffers, index_buffer.clone(), (), push_constants)?;
			},
			None => {
				frame.commands.draw(pipeline.clone(), &frame.dynamic_state, vertex_buffers, (), push_constants)?;
			},
		}
		Ok(())
	}
}

impl std::fmt::Debug for Model {
	fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
		fmt.debug_struct("Model")
			.field("vertex_count", &self.vertex_count)
			.field("index_count", &self.index_count)
			.finish()
	}
}
