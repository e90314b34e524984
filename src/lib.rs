//! Polymorphic form fields: one attribute that points at one of several
//! related record types, with a sub-form of child fields per type.
//!
//! The pieces live in their own crates and are re-exported here:
//! records in `ox_data_object`, storage in `ox_persistence`, fields,
//! field-set resolution and validation in `ox_forms`.

pub use ox_data_object::GenericDataObject;
pub use ox_forms::{
    fill_fields, resolve_fields, DeferredAction, DeferredActions, Field, FieldContext, FieldDefinition,
    FieldFilter, FieldSetPolicy, FieldSetResolver, FormError, FormRequest, FormsConfig, HookRegistry,
    LifecycleHook, PolymorphicField, PolymorphicFieldBuilder, RuleMode, TypeOption, ValidationError,
    ValidationRule, Validator,
};
pub use ox_persistence::{MemoryStore, MorphMap, PersistenceError, RecordStore};

/// Form fields as declared in a YAML document (a sequence of fields).
pub fn fields_from_yaml(content: &str) -> Result<Vec<Field>, FormError> {
    serde_yaml::from_str(content).map_err(|e| FormError::Config(e.to_string()))
}

/// JSON meta sent to the UI for a resolved field list.
pub fn fields_to_json(fields: &[Field]) -> Result<serde_json::Value, FormError> {
    serde_json::to_value(fields).map_err(|e| FormError::Config(e.to_string()))
}
