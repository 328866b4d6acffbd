use std::collections::BTreeMap;
use std::sync::Arc;

use super::traits::{Builder, FileManager, LaunchConfigurationType};

/// Host-owned table of what loaded plugins provide. Plugins register
/// explicitly when the loader calls them and remove themselves on unload.
#[derive(Default)]
pub struct PluginRegistry {
    builders: BTreeMap<String, Arc<dyn Builder>>,
    file_managers: BTreeMap<String, Arc<dyn FileManager>>,
    config_types: Vec<Arc<dyn LaunchConfigurationType>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_builder(&mut self, id: &str, builder: Arc<dyn Builder>) {
        if self.builders.insert(id.to_string(), builder).is_some() {
            tracing::warn!(plugin = id, "builder replaced");
        }
    }

    pub fn remove_builder(&mut self, id: &str) -> bool {
        self.builders.remove(id).is_some()
    }

    pub fn builder(&self, id: &str) -> Option<Arc<dyn Builder>> {
        self.builders.get(id).cloned()
    }

    pub fn add_file_manager(&mut self, id: &str, manager: Arc<dyn FileManager>) {
        self.file_managers.insert(id.to_string(), manager);
    }

    pub fn remove_file_manager(&mut self, id: &str) -> bool {
        self.file_managers.remove(id).is_some()
    }

    pub fn file_manager(&self, id: &str) -> Option<Arc<dyn FileManager>> {
        self.file_managers.get(id).cloned()
    }

    pub fn add_configuration_type(&mut self, config_type: Arc<dyn LaunchConfigurationType>) {
        self.config_types
            .retain(|t| t.type_id() != config_type.type_id());
        self.config_types.push(config_type);
    }

    pub fn remove_configuration_type(&mut self, type_id: &str) -> bool {
        let before = self.config_types.len();
        self.config_types.retain(|t| t.type_id() != type_id);
        before != self.config_types.len()
    }

    pub fn configuration_type(&self, type_id: &str) -> Option<Arc<dyn LaunchConfigurationType>> {
        self.config_types
            .iter()
            .find(|t| t.type_id() == type_id)
            .cloned()
    }

    pub fn configuration_types(&self) -> &[Arc<dyn LaunchConfigurationType>] {
        &self.config_types
    }
}
