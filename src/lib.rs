//! ***Hex*** is a small Vulkan-rendered game client.
//!
//! The crate is split into:
//! - [graphics](graphics/index.html): hardware accelerated rendering (uses [vulkano](https://vulkano.rs/)).
//! - Scene state: [game objects](scene/index.html), the [camera](camera/index.html) and the [movement controller](controller/index.html).
//! - OS integration: the [window](window/index.html) and [input](input/index.html) state (uses [winit](https://docs.rs/winit/)).
//! - [Configuration](config/index.html) and the [requirement manifest](requirements/index.html).
//!
//! The [app](app/index.html) module ties everything into the main loop.

pub mod app;
pub mod camera;
pub mod config;
pub mod controller;
pub mod graphics;
pub mod input;
pub mod mesh;
pub mod requirements;
pub mod scene;
pub mod window;

pub use app::App;
pub use config::Config;
