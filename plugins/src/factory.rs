//! Explicit plugin registration. The host's loader calls `register` once at
//! load time and `unregister` before unloading.
use std::sync::Arc;

use cargo_bridge_core::api::PluginRegistry;

use crate::launch::CONFIG_TYPE_ID;
use crate::plugin::CargoPlugin;

pub const PLUGIN_ID: &str = "cargo-bridge";

pub fn register(registry: &mut PluginRegistry) -> Arc<CargoPlugin> {
    let plugin = Arc::new(CargoPlugin::new());
    registry.add_builder(PLUGIN_ID, plugin.clone());
    registry.add_file_manager(PLUGIN_ID, plugin.clone());
    registry.add_configuration_type(plugin.config_type());
    tracing::info!(plugin = PLUGIN_ID, "registered");
    plugin
}

pub fn unregister(registry: &mut PluginRegistry) {
    let removed = registry.remove_configuration_type(CONFIG_TYPE_ID)
        | registry.remove_builder(PLUGIN_ID)
        | registry.remove_file_manager(PLUGIN_ID);
    if removed {
        tracing::info!(plugin = PLUGIN_ID, "unregistered");
    }
}
