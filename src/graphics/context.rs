//! Vulkan instance of the hex client.
//!
//! The instance is the only thing that needs the system loader, so a failure here usually means
//! the loader library named by [loader_library] is missing.

use super::{ENGINE_NAME, ENGINE_VERSION};

use crate::requirements::{loader_library, TargetOs};

use std::borrow::Cow;
use std::sync::Arc;

use vulkano::instance::{ApplicationInfo, Instance, InstanceCreationError, Version};

/// Global Vulkan state: the instance with the extensions the window system requires.
pub struct Context {
	pub(super) instance: Arc<Instance>,
}

impl Context {
	/// Create the instance, announcing `name` and `version` to the driver.
	pub fn with_app_info(name: &str, version: Version) -> Result<Context, InstanceCreationError> {
		let app_info = ApplicationInfo {
			application_name: Some(Cow::from(name)),
			application_version: Some(version),
			engine_name: Some(Cow::from(ENGINE_NAME)),
			engine_version: Some(ENGINE_VERSION),
		};
		let extensions = vulkano_win::required_extensions();

		let instance = Instance::new(Some(&app_info), &extensions, None).map_err(|err| {
			tracing::error!("failed to create vulkan instance: {}", err);
			tracing::error!("{}", loader_hint(&TargetOs::current()));
			err
		})?;

		tracing::debug!("created vulkan instance for {} {:?}", name, version);
		Ok(Context { instance })
	}

	#[inline(always)]
	pub fn instance(&self) -> &Arc<Instance> { &self.instance }
}

fn loader_hint(os: &TargetOs) -> String {
	match loader_library(os) {
		Some(library) => format!("is {} installed and on the library path?", library),
		None => format!("{} should provide a vulkan loader", os),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hint_names_the_expected_loader() {
		assert!(loader_hint(&TargetOs::Linux).contains("libvulkan.so.1"));
		assert!(loader_hint(&TargetOs::Windows).contains("vulkan-1.dll"));
		assert!(loader_hint(&TargetOs::Android).contains("Android should provide"));
	}
}
