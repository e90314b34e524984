use crate::config::FormsConfig;
use crate::registry::HookRegistry;
use crate::traits::LifecycleHook;
use ox_persistence::{MorphMap, RecordStore};
use std::sync::Arc;

/// Collaborators handed to fields while they resolve or fill records.
#[derive(Clone, Copy)]
pub struct FieldContext<'a> {
    pub store: &'a dyn RecordStore,
    pub morph_map: &'a MorphMap,
    pub hooks: Option<&'a HookRegistry>,
    /// Reject submitted discriminators no type is registered for.
    pub strict_discriminators: bool,
}

impl<'a> FieldContext<'a> {
    pub fn new(store: &'a dyn RecordStore, morph_map: &'a MorphMap) -> Self {
        Self {
            store,
            morph_map,
            hooks: None,
            strict_discriminators: false,
        }
    }

    pub fn from_config(store: &'a dyn RecordStore, config: &'a FormsConfig) -> Self {
        Self {
            strict_discriminators: config.strict_discriminators,
            ..Self::new(store, &config.morph_map)
        }
    }

    pub fn with_hooks(mut self, hooks: &'a HookRegistry) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_discriminators = strict;
        self
    }

    pub fn hook(&self, name: &str) -> Option<Arc<dyn LifecycleHook>> {
        self.hooks.and_then(|registry| registry.get_hook(name))
    }
}
