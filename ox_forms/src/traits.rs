use crate::request::FormRequest;
use crate::schema::{Field, FieldDefinition};
use ox_data_object::GenericDataObject;
use serde_json::Value;
use std::fmt;

/// Side effect to run once the whole form's records are saved.
pub type DeferredAction = Box<dyn FnOnce() -> anyhow::Result<()> + Send>;

/// Ordered deferred actions collected while filling a form.
#[derive(Default)]
pub struct DeferredActions {
    actions: Vec<DeferredAction>,
}

impl DeferredActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: DeferredAction) {
        self.actions.push(action);
    }

    pub fn extend(&mut self, other: DeferredActions) {
        self.actions.extend(other.actions);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run every action in collection order, stopping at the first failure.
    pub fn run(self) -> anyhow::Result<()> {
        for action in self.actions {
            action()?;
        }
        Ok(())
    }
}

impl fmt::Debug for DeferredActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredActions").field("len", &self.actions.len()).finish()
    }
}

pub trait LifecycleHook: Send + Sync {
    /// Adjust a value read from a record before it is shown.
    fn on_resolve(&self, _field: &FieldDefinition, _value: &mut Value) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called after the field's value has been copied into `record`.
    fn on_fill(
        &self,
        field: &FieldDefinition,
        request: &FormRequest,
        record: &mut GenericDataObject,
    ) -> anyhow::Result<Option<DeferredAction>>;
}

/// Final pass over a resolved field set, supplied by the host.
pub trait FieldFilter: Send + Sync {
    fn filter(&self, fields: Vec<Field>, request: &FormRequest) -> Vec<Field>;
}

/// Drops hidden fields.
pub struct VisibleFieldFilter;

impl FieldFilter for VisibleFieldFilter {
    fn filter(&self, fields: Vec<Field>, _request: &FormRequest) -> Vec<Field> {
        fields.into_iter().filter(|f| !f.is_hidden()).collect()
    }
}
