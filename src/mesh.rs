//! CPU-side geometry: vertex layout, procedural cubes and Wavefront OBJ loading.
//!
//! A [MeshBuilder] is uploaded to the GPU by [Model::new](../graphics/model/struct.Model.html#method.new).

use cgmath::Vector3;

use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Vertex layout shared by every model.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
	pub position: [f32; 3],
	pub color: [f32; 3],
	pub normal: [f32; 3],
	pub uv: [f32; 2],
}

vulkano::impl_vertex!(Vertex, position, color, normal, uv);

impl Vertex {
	/// Vertex with a position and a color, other attributes zeroed.
	pub fn colored(position: [f32; 3], color: [f32; 3]) -> Self {
		Self { position, color, .. Self::default() }
	}
}

/// Geometry waiting to be uploaded.
///
/// An empty index list means the vertices are drawn in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuilder {
	pub vertices: Vec<Vertex>,
	pub indices: Vec<u32>,
}

/// Minimal number of vertices a mesh must have to be drawn.
pub const MIN_VERTEX_COUNT: usize = 3;

/// Error during loading or validation of a mesh.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
	/// Fewer than [MIN_VERTEX_COUNT] vertices.
	#[error("a mesh needs at least 3 vertices, got {0}")]
	TooFewVertices(usize),
	/// The OBJ loader rejected the file.
	#[error("failed to load {}: {source}", .path.display())]
	Load { path: PathBuf, source: tobj::LoadError },
	/// The OBJ loader rejected the stream.
	#[error("failed to parse obj data: {0}")]
	Parse(#[from] tobj::LoadError),
}

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

fn load_options() -> tobj::LoadOptions {
	tobj::LoadOptions {
		single_index: false,
		triangulate: true,
		..Default::default()
	}
}

impl MeshBuilder {
	/// Load all shapes of an OBJ file.
	///
	/// Every face corner becomes its own vertex, the resulting mesh is not indexed.
	pub fn load_obj(path: &Path) -> Result<MeshBuilder, MeshError> {
		let (models, _materials) = tobj::load_obj(path, &load_options())
			.map_err(|source| MeshError::Load { path: path.to_owned(), source })?;
		Ok(Self::from_models(&models))
	}

	/// Load all shapes of OBJ data from a reader.
	///
	/// Material libraries are not resolved.
	pub fn load_obj_from_reader<R: BufRead>(reader: &mut R) -> Result<MeshBuilder, MeshError> {
		let (models, _materials) = tobj::load_obj_buf(reader, &load_options(), |_| Err(tobj::LoadError::OpenFileFailed))?;
		Ok(Self::from_models(&models))
	}

	/// Check that the mesh can be uploaded and drawn.
	pub fn validate(&self) -> Result<(), MeshError> {
		if self.vertices.len() < MIN_VERTEX_COUNT {
			return Err(MeshError::TooFewVertices(self.vertices.len()));
		}
		Ok(())
	}

	fn from_models(models: &[tobj::Model]) -> MeshBuilder {
		let mut vertices = Vec::new();

		for model in models {
			let mesh = &model.mesh;
			for (corner, &position_index) in mesh.indices.iter().enumerate() {
				let p = 3 * position_index as usize;
				let mut vertex = Vertex {
					position: [mesh.positions[p], mesh.positions[p + 1], mesh.positions[p + 2]],
					color: WHITE,
					.. Vertex::default()
				};

				if p + 2 < mesh.vertex_color.len() {
					vertex.color = [mesh.vertex_color[p], mesh.vertex_color[p + 1], mesh.vertex_color[p + 2]];
				}

				if let Some(&normal_index) = mesh.normal_indices.get(corner) {
					let n = 3 * normal_index as usize;
					vertex.normal = [mesh.normals[n], mesh.normals[n + 1], mesh.normals[n + 2]];
				}

				if let Some(&texcoord_index) = mesh.texcoord_indices.get(corner) {
					let t = 2 * texcoord_index as usize;
					vertex.uv = [mesh.texcoords[t], mesh.texcoords[t + 1]];
				}

				vertices.push(vertex);
			}
		}

		MeshBuilder { vertices, indices: Vec::new() }
	}

	/// A 1x1x1 cube centered at `offset` with a flat color per face.
	///
	/// Remember the Y axis points down, the "top" face is at `-0.5`.
	pub fn cube(offset: Vector3<f32>) -> MeshBuilder {
		const FACES: [([f32; 3], [f32; 3]); 6] = [
			([-1.0, 0.0, 0.0], [0.9, 0.9, 0.9]), // left, white
			([1.0, 0.0, 0.0], [0.8, 0.8, 0.1]), // right, yellow
			([0.0, -1.0, 0.0], [0.9, 0.6, 0.1]), // top, orange
			([0.0, 1.0, 0.0], [0.8, 0.1, 0.1]), // bottom, red
			([0.0, 0.0, 1.0], [0.1, 0.1, 0.8]), // nose, blue
			([0.0, 0.0, -1.0], [0.1, 0.8, 0.1]), // tail, green
		];

		let mut vertices = Vec::with_capacity(24);
		let mut indices = Vec::with_capacity(36);

		for (normal, color) in FACES.iter() {
			let axis = normal.iter().position(|c| *c != 0.0).unwrap_or(0);
			// the remaining two axes span the face
			let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
			let corners = [(-0.5, -0.5), (0.5, 0.5), (-0.5, 0.5), (0.5, -0.5)];

			let base = vertices.len() as u32;
			for (a, b) in corners.iter() {
				let mut position = [0.0f32; 3];
				position[axis] = normal[axis] * 0.5;
				position[u] = *a;
				position[v] = *b;
				vertices.push(Vertex {
					position: [position[0] + offset.x, position[1] + offset.y, position[2] + offset.z],
					color: *color,
					normal: *normal,
					uv: [a + 0.5, b + 0.5],
				});
			}
			indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 3, base + 1]);
		}

		MeshBuilder { vertices, indices }
	}

	/// A 1x1x1 cube centered at `offset` with a distinct color at each corner.
	pub fn test_cube(offset: Vector3<f32>) -> MeshBuilder {
		let corners = [
			([-0.5, -0.5, -0.5], [0.0, 0.0, 0.0]),
			([-0.5, 0.5, -0.5], [1.0, 0.0, 0.0]),
			([0.5, 0.5, -0.5], [0.0, 1.0, 0.0]),
			([0.5, -0.5, -0.5], [1.0, 1.0, 0.0]),

			([-0.5, -0.5, 0.5], [0.0, 0.0, 1.0]),
			([-0.5, 0.5, 0.5], [1.0, 0.0, 1.0]),
			([0.5, 0.5, 0.5], [0.0, 1.0, 1.0]),
			([0.5, -0.5, 0.5], [1.0, 1.0, 1.0]),
		];

		let vertices = corners.iter()
			.map(|(p, c)| Vertex::colored([p[0] + offset.x, p[1] + offset.y, p[2] + offset.z], *c))
			.collect();

		let indices = vec![
			0, 1, 2, 0, 2, 3,
			4, 5, 6, 4, 6, 7,
			0, 3, 7, 0, 7, 4,
			1, 5, 6, 1, 6, 2,
			4, 0, 5, 1, 5, 0,
			3, 2, 7, 6, 2, 7,
		];

		MeshBuilder { vertices, indices }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use cgmath::Zero;

	const TRIANGLE_OBJ: &str = "
v 0.0 0.0 0.0 1.0 0.0 0.0
v 1.0 0.0 0.0 0.0 1.0 0.0
v 0.0 1.0 0.0 0.0 0.0 1.0
vn 0.0 0.0 1.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";

	const QUAD_OBJ: &str = "
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
f 1 2 3 4
";

	#[test]
	fn cube_has_flat_faces() {
		let cube = MeshBuilder::cube(Vector3::zero());
		assert_eq!(cube.vertices.len(), 24);
		assert_eq!(cube.indices.len(), 36);
		assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertices.len()));

		for face in cube.vertices.chunks(4) {
			let color = face[0].color;
			let normal = face[0].normal;
			assert!(face.iter().all(|v| v.color == color && v.normal == normal));
			// every corner lies on the face plane
			for v in face {
				let along_normal: f32 = (0..3).map(|i| v.position[i] * normal[i]).sum();
				assert_eq!(along_normal, 0.5);
			}
		}
		assert_eq!(cube.vertices[16].color, [0.1, 0.1, 0.8]);
	}

	#[test]
	fn cube_is_offset() {
		let cube = MeshBuilder::cube(Vector3::new(10.0, 0.0, -2.0));
		for v in &cube.vertices {
			assert!(v.position[0] >= 9.5 && v.position[0] <= 10.5);
			assert!(v.position[2] >= -2.5 && v.position[2] <= -1.5);
		}
	}

	#[test]
	fn test_cube_corners() {
		let cube = MeshBuilder::test_cube(Vector3::new(0.0, 1.0, 0.0));
		assert_eq!(cube.vertices.len(), 8);
		assert_eq!(cube.indices.len(), 36);
		assert_eq!(cube.vertices[1].position, [-0.5, 1.5, -0.5]);
		assert_eq!(cube.vertices[7].color, [1.0, 1.0, 1.0]);
	}

	#[test]
	fn obj_attributes_are_unpacked_per_corner() {
		let mesh = MeshBuilder::load_obj_from_reader(&mut TRIANGLE_OBJ.as_bytes()).unwrap();
		assert!(mesh.indices.is_empty());
		assert_eq!(mesh.vertices.len(), 3);

		assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
		assert_eq!(mesh.vertices[1].color, [0.0, 1.0, 0.0]);
		assert_eq!(mesh.vertices[2].normal, [0.0, 0.0, 1.0]);
		assert_eq!(mesh.vertices[2].uv, [0.0, 1.0]);
	}

	#[test]
	fn obj_without_colors_is_white() {
		let mesh = MeshBuilder::load_obj_from_reader(&mut QUAD_OBJ.as_bytes()).unwrap();
		// the quad is triangulated
		assert_eq!(mesh.vertices.len(), 6);
		assert!(mesh.vertices.iter().all(|v| v.color == WHITE && v.normal == [0.0; 3]));
	}

	#[test]
	fn drawable_mesh_needs_three_vertices() {
		let mut mesh = MeshBuilder::default();
		assert!(matches!(mesh.validate(), Err(MeshError::TooFewVertices(0))));

		mesh.vertices = vec![Vertex::default(); 2];
		assert!(matches!(mesh.validate(), Err(MeshError::TooFewVertices(2))));

		mesh.vertices.push(Vertex::default());
		assert!(mesh.validate().is_ok());
		assert!(MeshBuilder::test_cube(Vector3::zero()).validate().is_ok());
	}

	#[test]
	fn missing_obj_file_is_an_error() {
		let result = MeshBuilder::load_obj(Path::new("models/does_not_exist.obj"));
		assert!(matches!(result, Err(MeshError::Load { .. })));
	}
}
