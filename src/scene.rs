//! Objects that populate the world.

use crate::graphics::model::Model;

pub use cgmath::{Matrix4, Rad, Vector3, Zero};

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifier of a [GameObject], unique within the process.
pub type ObjectId = u32;

static NEXT_ID: AtomicU32 = AtomicU32::new(0);

/// Placement of an object in the world.
///
/// Rotation holds Tait-Bryan angles in radians, applied in Y (yaw), X (pitch), Z (roll) order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
	pub translation: Vector3<f32>,
	pub scale: Vector3<f32>,
	pub rotation: Vector3<f32>,
}

impl Transform {
	/// Model matrix: `translate * rotate_y * rotate_x * rotate_z * scale`.
	pub fn matrix(&self) -> Matrix4<f32> {
		Matrix4::from_translation(self.translation)
			* self.rotation_matrix()
			* Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
	}

	/// Matrix for transforming normals into world space.
	///
	/// Equal to the inverse transpose of the upper 3x3 of [Transform::matrix].
	pub fn normal_matrix(&self) -> Matrix4<f32> {
		let inverse_scale = Vector3::new(1.0 / self.scale.x, 1.0 / self.scale.y, 1.0 / self.scale.z);
		self.rotation_matrix() * Matrix4::from_nonuniform_scale(inverse_scale.x, inverse_scale.y, inverse_scale.z)
	}

	fn rotation_matrix(&self) -> Matrix4<f32> {
		Matrix4::from_angle_y(Rad(self.rotation.y))
			* Matrix4::from_angle_x(Rad(self.rotation.x))
			* Matrix4::from_angle_z(Rad(self.rotation.z))
	}
}

impl Default for Transform {
	fn default() -> Self {
		Self {
			translation: Vector3::zero(),
			scale: Vector3::new(1.0, 1.0, 1.0),
			rotation: Vector3::zero(),
		}
	}
}

/// Anything that exists in the world: drawable props as well as the viewer.
///
/// Game objects can be moved but not cloned, their id stays unique.
#[derive(Debug)]
pub struct GameObject {
	id: ObjectId,
	pub model: Option<Arc<Model>>,
	pub color: Vector3<f32>,
	pub transform: Transform,
}

impl GameObject {
	/// Create a new object with a fresh id.
	pub fn create() -> GameObject {
		GameObject {
			id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
			model: None,
			color: Vector3::zero(),
			transform: Transform::default(),
		}
	}

	#[inline(always)]
	pub fn id(&self) -> ObjectId { self.id }
}

#[cfg(test)]
mod tests {
	use super::*;

	use cgmath::{SquareMatrix, Vector4};

	fn assert_close(a: Vector4<f32>, b: Vector4<f32>) {
		let diff = a - b;
		assert!(diff.x.abs() < 1e-5 && diff.y.abs() < 1e-5 && diff.z.abs() < 1e-5 && diff.w.abs() < 1e-5, "{:?} != {:?}", a, b);
	}

	#[test]
	fn ids_are_unique_and_increasing() {
		let first = GameObject::create();
		let second = GameObject::create();
		assert!(second.id() > first.id());
	}

	#[test]
	fn default_transform_is_identity() {
		assert_eq!(Transform::default().matrix(), Matrix4::identity());
		assert_eq!(Transform::default().normal_matrix(), Matrix4::identity());
	}

	#[test]
	fn scale_then_rotate_then_translate() {
		let transform = Transform {
			translation: Vector3::new(1.0, 2.0, 3.0),
			scale: Vector3::new(2.0, 2.0, 2.0),
			rotation: Vector3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
		};
		// yaw of 90 degrees maps +x onto -z
		let point = transform.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
		assert_close(point, Vector4::new(1.0, 2.0, 1.0, 1.0));
	}

	#[test]
	fn normal_matrix_is_inverse_transpose() {
		let transform = Transform {
			translation: Vector3::new(5.0, -1.0, 0.5),
			scale: Vector3::new(1.0, 3.0, 0.5),
			rotation: Vector3::new(0.3, 1.1, -0.7),
		};
		let model = transform.matrix();
		let expected = model.invert().unwrap();
		let normal = transform.normal_matrix();
		// compare the upper 3x3 of (M^-1)^T with the normal matrix
		for column in 0..3 {
			for row in 0..3 {
				assert!((normal[column][row] - expected[row][column]).abs() < 1e-4);
			}
		}
	}
}
