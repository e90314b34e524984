use crate::traits::LifecycleHook;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps hook names (as listed in a field's `plugins`) to implementations.
#[derive(Default, Clone)]
pub struct HookRegistry {
    hooks: HashMap<String, Arc<dyn LifecycleHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_hook(&mut self, name: &str, hook: Arc<dyn LifecycleHook>) {
        if self.hooks.insert(name.to_string(), hook).is_some() {
            log::debug!("Replaced lifecycle hook '{}'", name);
        }
    }

    pub fn get_hook(&self, name: &str) -> Option<Arc<dyn LifecycleHook>> {
        self.hooks.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
