//! Native requirement manifest of the hex package.
//!
//! The native build resolves a windowing library, a math library and the Vulkan headers on every platform.
//! The Vulkan loader is only required where the operating system does not ship one (everywhere but Android).
//! The Rust build links none of these statically, but the loader still has to be found at runtime by vulkano,
//! so [loader_library] names the shared library that is expected on each platform.

use std::fmt;
use std::str::FromStr;

/// Package metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Package {
	pub name: &'static str,
	pub version: &'static str,
	pub author: &'static str,
	pub description: &'static str,
}

/// Metadata of this package.
pub const PACKAGE: Package = Package {
	name: "hex",
	version: "0.0.1",
	author: "S3V04KA",
	description: "Hex game",
};

/// Build settings that the native build consumes.
pub const SETTINGS: [&str; 4] = ["os", "compiler", "build_type", "arch"];

/// Operating system a build targets.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TargetOs {
	Windows,
	Linux,
	Macos,
	Android,
	Ios,
	FreeBsd,
	/// Any operating system not known to the manifest.
	Other(String),
}

/// The role a requirement plays for the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
	Windowing,
	Math,
	GraphicsHeaders,
	GraphicsLoader,
}

/// A single resolved requirement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Requirement {
	pub role: Role,
	pub name: &'static str,
	pub version: &'static str,
}

const WINDOWING: Requirement = Requirement { role: Role::Windowing, name: "glfw", version: "3.4" };
const MATH: Requirement = Requirement { role: Role::Math, name: "glm", version: "1.0.1" };
const VULKAN_HEADERS: Requirement = Requirement { role: Role::GraphicsHeaders, name: "vulkan-headers", version: "1.4.313.0" };
const VULKAN_LOADER: Requirement = Requirement { role: Role::GraphicsLoader, name: "vulkan-loader", version: "1.4.313.0" };

/// Resolve the requirement set for the given operating system.
///
/// Requirements are returned in declaration order.
pub fn requirements(os: &TargetOs) -> Vec<Requirement> {
	let mut result = vec![WINDOWING, MATH, VULKAN_HEADERS];
	if *os != TargetOs::Android {
		result.push(VULKAN_LOADER);
	}
	result
}

/// Name of the Vulkan loader library expected at runtime.
///
/// Returns `None` where the operating system provides the loader itself.
pub fn loader_library(os: &TargetOs) -> Option<&'static str> {
	match os {
		TargetOs::Android => None,
		TargetOs::Windows => Some("vulkan-1.dll"),
		TargetOs::Macos | TargetOs::Ios => Some("libvulkan.1.dylib"),
		TargetOs::Linux | TargetOs::FreeBsd | TargetOs::Other(_) => Some("libvulkan.so.1"),
	}
}

impl TargetOs {
	/// The operating system this binary was compiled for.
	pub fn current() -> TargetOs {
		// parsing never fails, unknown names become `Other`
		std::env::consts::OS.parse().unwrap_or_else(|_| TargetOs::Other(std::env::consts::OS.to_owned()))
	}
}

impl FromStr for TargetOs {
	type Err = std::convert::Infallible;

	fn from_str(name: &str) -> Result<Self, Self::Err> {
		let os = match name.to_ascii_lowercase().as_str() {
			"windows" | "windowsstore" => TargetOs::Windows,
			"linux" => TargetOs::Linux,
			"macos" => TargetOs::Macos,
			"android" => TargetOs::Android,
			"ios" => TargetOs::Ios,
			"freebsd" => TargetOs::FreeBsd,
			_ => TargetOs::Other(name.to_owned()),
		};
		Ok(os)
	}
}

impl fmt::Display for TargetOs {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			TargetOs::Windows => write!(f, "Windows"),
			TargetOs::Linux => write!(f, "Linux"),
			TargetOs::Macos => write!(f, "Macos"),
			TargetOs::Android => write!(f, "Android"),
			TargetOs::Ios => write!(f, "iOS"),
			TargetOs::FreeBsd => write!(f, "FreeBSD"),
			TargetOs::Other(name) => write!(f, "{}", name),
		}
	}
}

impl fmt::Display for Requirement {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}/{}", self.name, self.version)
	}
}
