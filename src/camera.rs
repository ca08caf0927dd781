//! Projection and view matrices.
//!
//! Matrices target Vulkan clip space: depth in `0..1`, +y pointing down the screen and +z forward.

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3, Zero};

/// Error while setting up a [Camera].
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum CameraError {
	/// Perspective projection with an aspect ratio of zero.
	#[error("aspect ratio must be non-zero")]
	ZeroAspectRatio,
	/// View direction is zero or parallel to the up vector.
	#[error("view direction is degenerate")]
	DegenerateDirection,
}

/// Camera described by a projection and a view matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	projection: Matrix4<f32>,
	view: Matrix4<f32>,
}

impl Default for Camera {
	fn default() -> Self {
		Self { projection: Matrix4::identity(), view: Matrix4::identity() }
	}
}

impl Camera {
	pub fn new() -> Self { Self::default() }

	/// Map the box between the given planes onto the clip volume.
	pub fn set_orthographic_projection(&mut self, left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) {
		let mut projection = Matrix4::identity();
		projection[0][0] = 2.0 / (right - left);
		projection[1][1] = 2.0 / (bottom - top);
		projection[2][2] = 1.0 / (far - near);
		projection[3][0] = -(right + left) / (right - left);
		projection[3][1] = -(bottom + top) / (bottom - top);
		projection[3][2] = -near / (far - near);
		self.projection = projection;
	}

	/// Perspective projection with vertical field of view `fov_y` in radians.
	pub fn set_perspective_projection(&mut self, fov_y: f32, aspect: f32, near: f32, far: f32) -> Result<(), CameraError> {
		if aspect.abs() <= f32::EPSILON {
			return Err(CameraError::ZeroAspectRatio);
		}

		let tan_half_fov_y = (fov_y / 2.0).tan();
		let mut projection = Matrix4::zero();
		projection[0][0] = 1.0 / (aspect * tan_half_fov_y);
		projection[1][1] = 1.0 / tan_half_fov_y;
		projection[2][2] = far / (far - near);
		projection[2][3] = 1.0;
		projection[3][2] = -(far * near) / (far - near);
		self.projection = projection;
		Ok(())
	}

	/// Look from `position` along `direction`.
	pub fn set_view_direction(&mut self, position: Vector3<f32>, direction: Vector3<f32>, up: Vector3<f32>) -> Result<(), CameraError> {
		let side = direction.cross(up);
		if direction.magnitude2() <= f32::EPSILON || side.magnitude2() <= f32::EPSILON {
			return Err(CameraError::DegenerateDirection);
		}

		let w = direction.normalize();
		let u = w.cross(up).normalize();
		let v = w.cross(u);
		self.view = view_from_basis(position, u, v, w);
		Ok(())
	}

	/// Look from `position` at `target`.
	pub fn set_view_target(&mut self, position: Vector3<f32>, target: Vector3<f32>, up: Vector3<f32>) -> Result<(), CameraError> {
		self.set_view_direction(position, target - position, up)
	}

	/// Look from `position` with the orientation of an object rotated by `rotation` (Y, X, Z order).
	pub fn set_view_yxz(&mut self, position: Vector3<f32>, rotation: Vector3<f32>) {
		let (s1, c1) = rotation.y.sin_cos();
		let (s2, c2) = rotation.x.sin_cos();
		let (s3, c3) = rotation.z.sin_cos();
		let u = Vector3::new(c1 * c3 + s1 * s2 * s3, c2 * s3, c1 * s2 * s3 - c3 * s1);
		let v = Vector3::new(c3 * s1 * s2 - c1 * s3, c2 * c3, c1 * c3 * s2 + s1 * s3);
		let w = Vector3::new(c2 * s1, -s2, c1 * c2);
		self.view = view_from_basis(position, u, v, w);
	}

	#[inline(always)]
	pub fn projection(&self) -> Matrix4<f32> { self.projection }

	#[inline(always)]
	pub fn view(&self) -> Matrix4<f32> { self.view }

	#[inline(always)]
	pub fn projection_view(&self) -> Matrix4<f32> { self.projection * self.view }
}

// rows of the rotation are the camera axes, translation moves `position` to the origin
fn view_from_basis(position: Vector3<f32>, u: Vector3<f32>, v: Vector3<f32>, w: Vector3<f32>) -> Matrix4<f32> {
	let mut view = Matrix4::identity();
	view[0][0] = u.x;
	view[1][0] = u.y;
	view[2][0] = u.z;
	view[0][1] = v.x;
	view[1][1] = v.y;
	view[2][1] = v.z;
	view[0][2] = w.x;
	view[1][2] = w.y;
	view[2][2] = w.z;
	view[3][0] = -u.dot(position);
	view[3][1] = -v.dot(position);
	view[3][2] = -w.dot(position);
	view
}

#[cfg(test)]
mod tests {
	use super::*;

	use cgmath::Vector4;

	fn assert_close(a: Vector4<f32>, b: Vector4<f32>) {
		let diff = a - b;
		assert!(diff.x.abs() < 1e-5 && diff.y.abs() < 1e-5 && diff.z.abs() < 1e-5 && diff.w.abs() < 1e-5, "{:?} != {:?}", a, b);
	}

	#[test]
	fn perspective_maps_near_and_far_to_depth_range() {
		let mut camera = Camera::new();
		camera.set_perspective_projection(60f32.to_radians(), 4.0 / 3.0, 0.1, 100.0).unwrap();

		let near = camera.projection() * Vector4::new(0.0, 0.0, 0.1, 1.0);
		let far = camera.projection() * Vector4::new(0.0, 0.0, 100.0, 1.0);
		assert!((near.z / near.w).abs() < 1e-5);
		assert!((far.z / far.w - 1.0).abs() < 1e-5);
	}

	#[test]
	fn perspective_rejects_zero_aspect() {
		let mut camera = Camera::new();
		assert_eq!(camera.set_perspective_projection(1.0, 0.0, 0.1, 100.0), Err(CameraError::ZeroAspectRatio));
		assert_eq!(camera.projection(), Matrix4::identity());
	}

	#[test]
	fn orthographic_maps_box_to_clip_volume() {
		let mut camera = Camera::new();
		camera.set_orthographic_projection(-2.0, 2.0, -1.0, 1.0, 0.5, 10.0);

		assert_close(camera.projection() * Vector4::new(-2.0, -1.0, 0.5, 1.0), Vector4::new(-1.0, -1.0, 0.0, 1.0));
		assert_close(camera.projection() * Vector4::new(2.0, 1.0, 10.0, 1.0), Vector4::new(1.0, 1.0, 1.0, 1.0));
	}

	#[test]
	fn view_target_puts_target_in_front() {
		let mut camera = Camera::new();
		let up = Vector3::new(0.0, -1.0, 0.0);
		camera.set_view_target(Vector3::new(0.0, 0.0, -2.5), Vector3::zero(), up).unwrap();

		assert_close(camera.view() * Vector4::new(0.0, 0.0, 0.0, 1.0), Vector4::new(0.0, 0.0, 2.5, 1.0));
		assert_close(camera.view() * Vector4::new(1.0, 0.0, 0.0, 1.0), Vector4::new(1.0, 0.0, 2.5, 1.0));
	}

	#[test]
	fn view_direction_rejects_degenerate_input() {
		let mut camera = Camera::new();
		let up = Vector3::new(0.0, -1.0, 0.0);
		assert_eq!(camera.set_view_direction(Vector3::zero(), Vector3::zero(), up), Err(CameraError::DegenerateDirection));
		assert_eq!(camera.set_view_direction(Vector3::zero(), up, up), Err(CameraError::DegenerateDirection));
	}

	#[test]
	fn view_yxz_moves_position_to_origin() {
		let mut camera = Camera::new();
		let position = Vector3::new(1.0, -2.0, 3.0);
		camera.set_view_yxz(position, Vector3::new(0.4, -1.2, 0.3));

		assert_close(camera.view() * position.extend(1.0), Vector4::new(0.0, 0.0, 0.0, 1.0));
	}

	#[test]
	fn view_yxz_looks_along_yaw() {
		let mut camera = Camera::new();
		camera.set_view_yxz(Vector3::zero(), Vector3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));

		// yaw of 90 degrees faces +x
		assert_close(camera.view() * Vector4::new(5.0, 0.0, 0.0, 1.0), Vector4::new(0.0, 0.0, 5.0, 1.0));
	}

	#[test]
	fn projection_view_combines_both() {
		let mut camera = Camera::new();
		camera.set_perspective_projection(1.0, 1.5, 0.1, 10.0).unwrap();
		camera.set_view_yxz(Vector3::new(0.5, 0.0, -1.0), Vector3::new(0.0, 0.3, 0.0));
		assert_eq!(camera.projection_view(), camera.projection() * camera.view());
	}
}
