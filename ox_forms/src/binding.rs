use crate::context::FieldContext;
use crate::error::FormError;
use crate::request::FormRequest;
use crate::schema::{Field, FieldDefinition};
use crate::traits::DeferredActions;
use ox_data_object::GenericDataObject;
use serde_json::Value;

/// Moves values between a field and a record.
pub trait Binder<T> {
    /// Populates the field's value from the record.
    fn hydrate(&self, field: &mut FieldDefinition, obj: &T, ctx: &FieldContext) -> Result<(), FormError>;

    /// Copies the submitted value for the field into the record.
    fn extract(&self, field: &FieldDefinition, obj: &mut T, request: &FormRequest) -> Result<(), FormError>;
}

/// A binder implementation for GenericDataObject.
pub struct GenericDataObjectBinder;

impl Binder<GenericDataObject> for GenericDataObjectBinder {
    fn hydrate(&self, field: &mut FieldDefinition, obj: &GenericDataObject, ctx: &FieldContext) -> Result<(), FormError> {
        let mut value = obj.get_attribute(&field.attribute).cloned().unwrap_or(Value::Null);

        for name in &field.plugins {
            if let Some(hook) = ctx.hook(name) {
                hook.on_resolve(field, &mut value)?;
            }
        }

        field.value = match value {
            Value::Null => None,
            other => Some(other),
        };
        Ok(())
    }

    fn extract(&self, field: &FieldDefinition, obj: &mut GenericDataObject, request: &FormRequest) -> Result<(), FormError> {
        // Absent keys leave the record untouched; an explicit null clears it.
        if let Some(value) = request.input(&field.attribute) {
            obj.set(&field.attribute, value.clone());
        }
        Ok(())
    }
}

/// Resolve every field of a form against `record`.
pub fn resolve_fields(fields: &mut [Field], record: &GenericDataObject, ctx: &FieldContext) -> Result<(), FormError> {
    for field in fields {
        field.resolve_for_display(record, ctx)?;
    }
    Ok(())
}

/// Fill every field of a form from `request` into `record`.
///
/// The returned actions must be run after `record` itself has been saved.
pub fn fill_fields(
    fields: &[Field],
    request: &FormRequest,
    record: &mut GenericDataObject,
    ctx: &FieldContext,
) -> Result<DeferredActions, FormError> {
    let mut deferred = DeferredActions::new();
    for field in fields {
        deferred.extend(field.fill(request, record, ctx)?);
    }
    Ok(deferred)
}
