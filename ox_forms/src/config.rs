use crate::error::FormError;
use crate::request::CHILD_FIELD_ROUTE_ACTIONS;
use ox_persistence::MorphMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct FormsConfig {
    /// Alias → class table used for stored discriminators.
    #[serde(default)]
    pub morph_map: MorphMap,
    #[serde(default)]
    pub strict_discriminators: bool,
    /// Overrides the route action suffixes that pull in child fields.
    #[serde(default)]
    pub child_field_actions: Option<Vec<String>>,
}

impl FormsConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, FormError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| FormError::Config(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FormError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| FormError::Config(format!("failed to read {:?}: {}", path, e)))?;
        let config = Self::from_yaml_str(&content)?;
        log::debug!("Loaded forms config from {:?}", path);
        Ok(config)
    }

    pub fn child_field_actions(&self) -> Vec<String> {
        match &self.child_field_actions {
            Some(actions) => actions.clone(),
            None => CHILD_FIELD_ROUTE_ACTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
