//! The Cargo plugin: builder, file manager and launcher implementations over
//! `cargo_bridge_core`, plus explicit registration with the host.
pub mod factory;
pub mod launch;
pub mod plugin;

pub use factory::{register, unregister, PLUGIN_ID};
pub use launch::{CargoExecutionConfigType, CargoLauncher, LaunchConfig};
pub use plugin::CargoPlugin;
