use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Alias table between short discriminator keys and fully-qualified class names.
///
/// Lookups fall back to identity, so an unmapped discriminator is its own class
/// and an unmapped class is its own alias.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MorphMap {
    aliases: BTreeMap<String, String>,
}

impl MorphMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(mut self, alias: &str, class: &str) -> Self {
        self.insert(alias, class);
        self
    }

    pub fn insert(&mut self, alias: &str, class: &str) {
        self.aliases.insert(alias.to_string(), class.to_string());
    }

    /// Class for a stored discriminator.
    pub fn resolve<'a>(&'a self, discriminator: &'a str) -> &'a str {
        self.aliases
            .get(discriminator)
            .map(String::as_str)
            .unwrap_or(discriminator)
    }

    /// Discriminator to store for a class. First alias in key order wins.
    pub fn alias_for<'a>(&'a self, class: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(_, mapped)| mapped.as_str() == class)
            .map(|(alias, _)| alias.as_str())
            .unwrap_or(class)
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl FromIterator<(String, String)> for MorphMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { aliases: iter.into_iter().collect() }
    }
}
