//! Device is a logical handle to a hardware-backed instance of a graphical device (typically a GPU).

use super::context::Context;

use crate::window::Window;

use std::sync::Arc;

use vulkano::device::{Device as LogicalDevice, DeviceExtensions, Features, Queue as DeviceQueue};
use vulkano::instance::{PhysicalDevice, PhysicalDeviceType, QueueFamily};
use vulkano::swapchain::Surface;

/// A device responsible for hardware-accelerated computations.
///
/// It is responsible for recording, submitting and synchronizing commands and data to the GPU.
/// A single queue is used for graphics, presentation and uploads.
pub struct Device {
	pub(super) device: Arc<LogicalDevice>,
	pub(super) graphics_queue: Arc<DeviceQueue>,
}

/// Error during device creation.
#[derive(Debug, thiserror::Error)]
pub enum DeviceCreationError {
	/// No hardware devices were found.
	#[error("no physical devices found")]
	NoPhysicalDevicesFound,
	/// Some hardware devices was found, but none of it can draw to the window.
	#[error("no physical device supports drawing to the window")]
	NoCompatiblePhysicalDeviceFound,
	/// Error during the creation of logical device.
	#[error("failed to create logical device: {0}")]
	Logical(#[from] vulkano::device::DeviceCreationError),
}

impl Device {
	/// Create a new device able to present to the given surface.
	pub fn new(
		context: &Context,
		surface: &Arc<Surface<Window>>,
	) -> Result<Device, DeviceCreationError>
	{
		let (physical, family) = select_physical_device(context, surface)?;
		tracing::info!("selected {} ({:?})", physical.name(), physical.ty());

		let device_extensions = DeviceExtensions { khr_swapchain: true, .. DeviceExtensions::none() };
		let (device, mut queues) = LogicalDevice::new(physical, &Features::none(), &device_extensions, [(family, 1.0)].iter().cloned())?;
		let graphics_queue = queues.next().ok_or(DeviceCreationError::NoCompatiblePhysicalDeviceFound)?;

		Ok(Device { device, graphics_queue })
	}

	/// Get the PhysicalDevice selected when this Device was created.
	pub fn physical_device(&self) -> PhysicalDevice {
		self.device.physical_device()
	}

	/// Get the underlying vulkano logical device.
	pub fn logical_device(&self) -> Arc<LogicalDevice> { self.device.clone() }

	/// Get the queue used for graphics, presentation and transfers.
	#[inline(always)]
	pub fn graphics_queue(&self) -> &Arc<DeviceQueue> { &self.graphics_queue }

	/// Block until the device finished all submitted work.
	pub fn wait_idle(&self) {
		// SAFETY: no other thread submits to this device while the caller holds it.
		if let Err(err) = unsafe { self.device.wait() } {
			tracing::warn!("failed to wait for device idle: {}", err);
		}
	}
}

impl std::fmt::Debug for Device {
	fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
		let physical_device = self.device.physical_device();
		let family = self.graphics_queue.family();
		writeln!(fmt, "{{")?;
		writeln!(fmt, "  name: {}", physical_device.name())?;
		writeln!(fmt, "  type: {:?}", physical_device.ty())?;
		writeln!(fmt, "  api version: {:?}", physical_device.api_version())?;
		writeln!(fmt, "  graphics_queue: {}-{}", family.id(), self.graphics_queue.id_within_family())?;
		write!(fmt, "}}")
	}
}


fn select_physical_device<'a>(context: &'a Context, surface: &Arc<Surface<Window>>) -> Result<(PhysicalDevice<'a>, QueueFamily<'a>), DeviceCreationError> {
	let mut devices = PhysicalDevice::enumerate(&context.instance).peekable();
	if devices.peek().is_none() {
		return Err(DeviceCreationError::NoPhysicalDevicesFound);
	}

	let mut best: Option<(PhysicalDevice, QueueFamily)> = None;
	for device in devices {
		tracing::debug!("found {} ({:?}, vulkan {:?})", device.name(), device.ty(), device.api_version());
		let family = match present_family(&device, surface) {
			Some(family) => family,
			None => continue,
		};
		best = match best {
			Some((current, current_family)) if device_rank(&current) <= device_rank(&device) => Some((current, current_family)),
			_ => Some((device, family)),
		};
	}

	best.ok_or(DeviceCreationError::NoCompatiblePhysicalDeviceFound)
}

/// Find a queue family that can both draw and present to the surface.
fn present_family<'a>(device: &PhysicalDevice<'a>, surface: &Arc<Surface<Window>>) -> Option<QueueFamily<'a>> {
	if device.api_version() < super::REQUIRED_VULKAN_VERSION { return None; }

	device.queue_families().find(|family| {
		family.queues_count() > 0
			&& family.supports_graphics()
			&& surface.is_supported(*family).unwrap_or(false)
	})
}

/// Lower rank is preferred.
fn device_rank(device: &PhysicalDevice) -> u8 {
	type_rank(device.ty())
}

fn type_rank(ty: PhysicalDeviceType) -> u8 {
	match ty {
		PhysicalDeviceType::DiscreteGpu => 0,
		PhysicalDeviceType::IntegratedGpu => 1,
		PhysicalDeviceType::VirtualGpu => 2,
		PhysicalDeviceType::Cpu => 3,
		PhysicalDeviceType::Other => 4,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn prefers_dedicated_hardware() {
		let mut types = vec![
			PhysicalDeviceType::Cpu,
			PhysicalDeviceType::Other,
			PhysicalDeviceType::IntegratedGpu,
			PhysicalDeviceType::DiscreteGpu,
			PhysicalDeviceType::VirtualGpu,
		];
		types.sort_by_key(|ty| type_rank(*ty));
		assert_eq!(types[0], PhysicalDeviceType::DiscreteGpu);
		assert_eq!(types[1], PhysicalDeviceType::IntegratedGpu);
		assert_eq!(types[4], PhysicalDeviceType::Other);
	}
}
