//! Keyboard and mouse driven movement of a [GameObject].

use crate::input::InputState;
use crate::scene::GameObject;

use cgmath::{InnerSpace, Vector3, Zero};
use serde::Deserialize;
use winit::event::VirtualKeyCode;

use std::f32::consts::PI;

const PITCH_LIMIT: f32 = 1.5;
const MOUSE_SCALE: f32 = 0.1;

/// Keys bound to movement actions.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeyMappings {
	pub move_left: VirtualKeyCode,
	pub move_right: VirtualKeyCode,
	pub move_forward: VirtualKeyCode,
	pub move_backward: VirtualKeyCode,
	pub move_up: VirtualKeyCode,
	pub move_down: VirtualKeyCode,

	pub look_left: VirtualKeyCode,
	pub look_right: VirtualKeyCode,
	pub look_up: VirtualKeyCode,
	pub look_down: VirtualKeyCode,
}

impl Default for KeyMappings {
	fn default() -> Self {
		Self {
			move_left: VirtualKeyCode::A,
			move_right: VirtualKeyCode::D,
			move_forward: VirtualKeyCode::W,
			move_backward: VirtualKeyCode::S,
			move_up: VirtualKeyCode::Space,
			move_down: VirtualKeyCode::LShift,

			look_left: VirtualKeyCode::Left,
			look_right: VirtualKeyCode::Right,
			look_up: VirtualKeyCode::Up,
			look_down: VirtualKeyCode::Down,
		}
	}
}

/// First-person style controller.
///
/// Moves an object in the XZ plane relative to its yaw, vertical movement goes along +Y.
#[derive(Clone, Debug)]
pub struct MovementController {
	pub keys: KeyMappings,
	pub move_speed: f32,
	pub look_speed: f32,
	pub sensitivity: f32,
}

impl MovementController {
	pub fn new(keys: KeyMappings, move_speed: f32, look_speed: f32, sensitivity: f32) -> Self {
		Self { keys, move_speed, look_speed, sensitivity }
	}

	/// Apply held look and move keys for a time step of `dt` seconds.
	pub fn move_in_plane_xz(&self, input: &InputState, dt: f32, object: &mut GameObject) {
		let keys = &self.keys;
		let axis = |positive, negative| -> f32 {
			(input.is_pressed(positive) as i32 - input.is_pressed(negative) as i32) as f32
		};

		let rotate = Vector3::new(axis(keys.look_up, keys.look_down), axis(keys.look_right, keys.look_left), 0.0);
		if rotate.magnitude2() > f32::EPSILON {
			object.transform.rotation += self.look_speed * dt * rotate.normalize();
		}
		constrain_rotation(&mut object.transform.rotation);

		let yaw = object.transform.rotation.y;
		let forward = Vector3::new(yaw.sin(), 0.0, yaw.cos());
		let right = Vector3::new(forward.z, 0.0, -forward.x);
		let up = Vector3::new(0.0, 1.0, 0.0);

		let mut direction = Vector3::zero();
		direction += forward * axis(keys.move_forward, keys.move_backward);
		direction += right * axis(keys.move_right, keys.move_left);
		direction += up * axis(keys.move_up, keys.move_down);

		if direction.magnitude2() > f32::EPSILON {
			object.transform.translation += self.move_speed * dt * direction.normalize();
		}
	}

	/// Rotate by the mouse motion accumulated in `input`.
	pub fn look_around(&self, input: &mut InputState, dt: f32, object: &mut GameObject) {
		let (dx, dy) = input.take_mouse_delta();
		if dx != 0.0 || dy != 0.0 {
			let scale = self.sensitivity * MOUSE_SCALE * dt;
			object.transform.rotation.y += scale * dx as f32;
			object.transform.rotation.x -= scale * dy as f32;
		}
		constrain_rotation(&mut object.transform.rotation);
	}
}

/// Clamp pitch so the view never flips and wrap yaw into `[0, 2π)`.
fn constrain_rotation(rotation: &mut Vector3<f32>) {
	rotation.x = rotation.x.max(-PITCH_LIMIT).min(PITCH_LIMIT);
	rotation.y = rotation.y.rem_euclid(2.0 * PI);
	// tiny negative angles round up to a full turn
	if rotation.y >= 2.0 * PI {
		rotation.y = 0.0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use winit::event::ElementState;

	fn controller() -> MovementController {
		MovementController::new(KeyMappings::default(), 3.0, 1.5, 2.0)
	}

	fn close(a: f32, b: f32) -> bool { (a - b).abs() < 1e-5 }

	#[test]
	fn idle_input_leaves_object_in_place() {
		let mut object = GameObject::create();
		let input = InputState::new();
		controller().move_in_plane_xz(&input, 0.5, &mut object);
		assert_eq!(object.transform.translation, Vector3::zero());
		assert_eq!(object.transform.rotation, Vector3::zero());
	}

	#[test]
	fn forward_follows_yaw() {
		let mut object = GameObject::create();
		object.transform.rotation.y = PI / 2.0;
		let mut input = InputState::new();
		input.set_key(VirtualKeyCode::W, ElementState::Pressed);

		controller().move_in_plane_xz(&input, 0.5, &mut object);
		let t = object.transform.translation;
		assert!(close(t.x, 1.5) && close(t.y, 0.0) && close(t.z, 0.0), "{:?}", t);
	}

	#[test]
	fn diagonal_movement_is_normalized() {
		let mut object = GameObject::create();
		let mut input = InputState::new();
		input.set_key(VirtualKeyCode::W, ElementState::Pressed);
		input.set_key(VirtualKeyCode::D, ElementState::Pressed);
		input.set_key(VirtualKeyCode::Space, ElementState::Pressed);

		controller().move_in_plane_xz(&input, 1.0, &mut object);
		let t = object.transform.translation;
		assert!(close(t.magnitude(), 3.0));
		assert!(t.y > 0.0, "up is +Y");
	}

	#[test]
	fn vertical_keys_move_along_y() {
		let mut object = GameObject::create();
		let mut input = InputState::new();
		input.set_key(VirtualKeyCode::Space, ElementState::Pressed);

		controller().move_in_plane_xz(&input, 1.0, &mut object);
		let t = object.transform.translation;
		assert!(close(t.x, 0.0) && close(t.y, 3.0) && close(t.z, 0.0), "{:?}", t);

		input.set_key(VirtualKeyCode::Space, ElementState::Released);
		input.set_key(VirtualKeyCode::LShift, ElementState::Pressed);
		controller().move_in_plane_xz(&input, 0.5, &mut object);
		assert!(close(object.transform.translation.y, 1.5), "{:?}", object.transform.translation);
	}

	#[test]
	fn opposite_keys_cancel() {
		let mut object = GameObject::create();
		let mut input = InputState::new();
		input.set_key(VirtualKeyCode::A, ElementState::Pressed);
		input.set_key(VirtualKeyCode::D, ElementState::Pressed);

		controller().move_in_plane_xz(&input, 1.0, &mut object);
		assert_eq!(object.transform.translation, Vector3::zero());
	}

	#[test]
	fn pitch_is_clamped() {
		let mut object = GameObject::create();
		let mut input = InputState::new();
		input.set_key(VirtualKeyCode::Up, ElementState::Pressed);

		controller().move_in_plane_xz(&input, 10.0, &mut object);
		assert!(close(object.transform.rotation.x, PITCH_LIMIT));

		input.add_mouse_motion(0.0, 1000.0);
		controller().look_around(&mut input, 1.0, &mut object);
		assert!(close(object.transform.rotation.x, -PITCH_LIMIT));
	}

	#[test]
	fn yaw_wraps_into_full_turn() {
		let mut object = GameObject::create();
		let mut input = InputState::new();
		input.set_key(VirtualKeyCode::Left, ElementState::Pressed);

		controller().move_in_plane_xz(&input, 1.0, &mut object);
		let yaw = object.transform.rotation.y;
		assert!(yaw >= 0.0 && yaw < 2.0 * PI);
		assert!(close(yaw, 2.0 * PI - 1.5));
	}

	#[test]
	fn yaw_just_below_zero_wraps_to_zero() {
		let mut object = GameObject::create();
		object.transform.rotation.y = -1e-8;

		controller().look_around(&mut InputState::new(), 0.0, &mut object);
		let yaw = object.transform.rotation.y;
		assert!(yaw >= 0.0 && yaw < 2.0 * PI, "{}", yaw);
	}

	#[test]
	fn mouse_look_consumes_delta() {
		let mut object = GameObject::create();
		let mut input = InputState::new();
		input.add_mouse_motion(10.0, 5.0);

		controller().look_around(&mut input, 0.5, &mut object);
		// sensitivity 2.0 * 0.1 * dt 0.5 = 0.1 per unit of motion
		assert!(close(object.transform.rotation.y, 1.0));
		assert!(close(object.transform.rotation.x, -0.5));
		assert_eq!(input.take_mouse_delta(), (0.0, 0.0));
	}
}
