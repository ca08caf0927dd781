//! Input state gathered from window events.
//!
//! Winit reports input as events, the [movement controller](../controller/index.html) wants to poll it.
//! [InputState] bridges the two by remembering which keys are held and how far the mouse moved.

use winit::event::{DeviceEvent, ElementState, KeyboardInput, VirtualKeyCode, WindowEvent};

use std::collections::HashSet;

/// Snapshot of keyboard and mouse state.
#[derive(Clone, Debug, Default)]
pub struct InputState {
	pressed: HashSet<VirtualKeyCode>,
	mouse_delta: (f64, f64),
}

impl InputState {
	pub fn new() -> Self { Self::default() }

	/// Whether the key is currently held down.
	#[inline]
	pub fn is_pressed(&self, key: VirtualKeyCode) -> bool { self.pressed.contains(&key) }

	/// Record a key transition.
	pub fn set_key(&mut self, key: VirtualKeyCode, state: ElementState) {
		match state {
			ElementState::Pressed => { self.pressed.insert(key); },
			ElementState::Released => { self.pressed.remove(&key); },
		}
	}

	/// Accumulate raw mouse motion.
	pub fn add_mouse_motion(&mut self, dx: f64, dy: f64) {
		self.mouse_delta.0 += dx;
		self.mouse_delta.1 += dy;
	}

	/// Get the mouse motion accumulated since the last call and reset it.
	pub fn take_mouse_delta(&mut self) -> (f64, f64) {
		std::mem::replace(&mut self.mouse_delta, (0.0, 0.0))
	}

	/// Forget every held key, for example after the window lost focus.
	pub fn release_all(&mut self) {
		self.pressed.clear();
	}

	/// Update the state from a window event.
	pub fn handle_window_event(&mut self, event: &WindowEvent) {
		match event {
			WindowEvent::KeyboardInput { input: KeyboardInput { virtual_keycode: Some(key), state, .. }, .. } => self.set_key(*key, *state),
			WindowEvent::Focused(false) => self.release_all(),
			_ => (),
		}
	}

	/// Update the state from a device event.
	///
	/// Mouse motion is taken from the raw device deltas, so it keeps working while the cursor is grabbed.
	pub fn handle_device_event(&mut self, event: &DeviceEvent) {
		if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
			self.add_mouse_motion(*dx, *dy);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tracks_held_keys() {
		let mut input = InputState::new();
		input.set_key(VirtualKeyCode::W, ElementState::Pressed);
		input.set_key(VirtualKeyCode::A, ElementState::Pressed);
		input.set_key(VirtualKeyCode::W, ElementState::Released);

		assert!(!input.is_pressed(VirtualKeyCode::W));
		assert!(input.is_pressed(VirtualKeyCode::A));

		input.release_all();
		assert!(!input.is_pressed(VirtualKeyCode::A));
	}

	#[test]
	fn mouse_delta_accumulates_until_taken() {
		let mut input = InputState::new();
		input.handle_device_event(&DeviceEvent::MouseMotion { delta: (3.0, -1.0) });
		input.handle_device_event(&DeviceEvent::MouseMotion { delta: (2.0, 4.0) });

		assert_eq!(input.take_mouse_delta(), (5.0, 3.0));
		assert_eq!(input.take_mouse_delta(), (0.0, 0.0));
	}

	#[test]
	fn losing_focus_releases_keys() {
		let mut input = InputState::new();
		input.set_key(VirtualKeyCode::Space, ElementState::Pressed);
		input.handle_window_event(&WindowEvent::Focused(false));
		assert!(!input.is_pressed(VirtualKeyCode::Space));
	}
}
