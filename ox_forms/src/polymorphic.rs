//! A field whose value selects one of several related record types and
//! carries a sub-form of child fields per type.
//!
//! The parent record stores the relation in two attributes, `<attribute>_type`
//! (the discriminator, possibly an alias from the [`MorphMap`]) and
//! `<attribute>_id` (the related record's primary key).
//!
//! [`MorphMap`]: ox_persistence::MorphMap

use crate::context::FieldContext;
use crate::error::FormError;
use crate::request::FormRequest;
use crate::schema::{default_attribute, Field, ValidationRule};
use crate::traits::DeferredActions;
use ox_data_object::GenericDataObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

pub const POLYMORPHIC_COMPONENT: &str = "polymorphic-field";

/// One selectable type of a polymorphic field.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TypeOption {
    #[serde(rename = "value")]
    pub discriminator: String,
    pub label: String,
    pub fields: Vec<Field>,
    /// Set while resolving: this type is the one the record currently points to.
    pub active: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "PolymorphicFieldDefinition")]
pub struct PolymorphicField {
    pub component: String,
    pub name: String,
    pub attribute: String,
    types: Vec<TypeOption>,
    pub hide_type_when_updating: bool,
    pub disable_type_when_updating: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<ValidationRule>>,
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

pub struct PolymorphicFieldBuilder {
    name: String,
    attribute: Option<String>,
    types: Vec<TypeOption>,
    hide_type_when_updating: bool,
    disable_type_when_updating: bool,
    rules: Option<Vec<ValidationRule>>,
    hidden: bool,
}

impl PolymorphicFieldBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attribute: None,
            types: Vec::new(),
            hide_type_when_updating: false,
            disable_type_when_updating: false,
            rules: None,
            hidden: false,
        }
    }

    pub fn attribute(mut self, attribute: &str) -> Self {
        self.attribute = Some(attribute.to_string());
        self
    }

    /// Register a selectable type. Order of registration is display order.
    pub fn with_type(mut self, label: &str, discriminator: &str, fields: Vec<Field>) -> Self {
        self.types.push(TypeOption {
            discriminator: discriminator.to_string(),
            label: label.to_string(),
            fields,
            active: false,
        });
        self
    }

    pub fn hide_type_when_updating(mut self) -> Self {
        self.hide_type_when_updating = true;
        self
    }

    pub fn disable_type_when_updating(mut self) -> Self {
        self.disable_type_when_updating = true;
        self
    }

    pub fn rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn build(self) -> Result<PolymorphicField, FormError> {
        let attribute = self.attribute.unwrap_or_else(|| default_attribute(&self.name));

        let mut seen = HashSet::new();
        for option in &self.types {
            if !seen.insert(option.discriminator.as_str()) {
                return Err(FormError::DuplicateDiscriminator {
                    field: attribute,
                    discriminator: option.discriminator.clone(),
                });
            }
        }

        Ok(PolymorphicField {
            component: POLYMORPHIC_COMPONENT.to_string(),
            name: self.name,
            attribute,
            types: self.types,
            hide_type_when_updating: self.hide_type_when_updating,
            disable_type_when_updating: self.disable_type_when_updating,
            rules: self.rules,
            hidden: self.hidden,
            value: None,
            display_value: None,
        })
    }
}

impl PolymorphicField {
    pub fn builder(name: &str) -> PolymorphicFieldBuilder {
        PolymorphicFieldBuilder::new(name)
    }

    pub fn types(&self) -> &[TypeOption] {
        &self.types
    }

    pub fn type_attribute(&self) -> String {
        format!("{}_type", self.attribute)
    }

    pub fn id_attribute(&self) -> String {
        format!("{}_id", self.attribute)
    }

    pub fn active_type(&self) -> Option<&TypeOption> {
        self.types.iter().find(|t| t.active)
    }

    /// Label of the type `stored` refers to, compared after alias resolution.
    pub fn display_label(&self, stored: Option<&str>, ctx: &FieldContext) -> Option<&str> {
        let stored_class = ctx.morph_map.resolve(stored?);
        self.types
            .iter()
            .find(|t| ctx.morph_map.resolve(&t.discriminator) == stored_class)
            .map(|t| t.label.as_str())
    }

    pub fn resolve(&mut self, record: &GenericDataObject, ctx: &FieldContext) -> Result<(), FormError> {
        self.resolve_types(record, ctx, false)
    }

    pub fn resolve_for_display(&mut self, record: &GenericDataObject, ctx: &FieldContext) -> Result<(), FormError> {
        self.resolve_types(record, ctx, true)?;
        let stored = record.get_str(&self.type_attribute());
        self.display_value = self.display_label(stored.as_deref(), ctx).map(str::to_string);
        Ok(())
    }

    /// Every type's child fields are resolved: the active type against the
    /// related record, the others against an empty instance so the UI can
    /// switch types without another round trip.
    fn resolve_types(&mut self, record: &GenericDataObject, ctx: &FieldContext, display: bool) -> Result<(), FormError> {
        let stored_class = record
            .get_str(&self.type_attribute())
            .map(|stored| ctx.morph_map.resolve(&stored).to_string());
        self.value = stored_class.clone().map(Value::String);

        let related_id = record.get_str(&self.id_attribute());
        let mut matched = false;
        for index in 0..self.types.len() {
            let class = ctx.morph_map.resolve(&self.types[index].discriminator).to_string();
            // First match wins, the same rule `fill` selects by.
            let active = !matched && stored_class.as_deref() == Some(class.as_str());
            matched |= active;

            let related = if active {
                self.load_related(record, &class, related_id.as_deref(), ctx)?
            } else {
                ctx.store.instantiate(&class)
            };

            let option = &mut self.types[index];
            option.active = active;
            for field in &mut option.fields {
                if display {
                    field.resolve_for_display(&related, ctx)?;
                } else {
                    field.resolve(&related, ctx)?;
                }
            }
        }
        Ok(())
    }

    fn load_related(
        &self,
        record: &GenericDataObject,
        class: &str,
        related_id: Option<&str>,
        ctx: &FieldContext,
    ) -> Result<GenericDataObject, FormError> {
        if let Some(loaded) = record.relation(&self.attribute) {
            if loaded.class_name == class {
                return Ok(loaded.clone());
            }
        }
        let id = related_id.ok_or_else(|| FormError::MissingRelatedId {
            field: self.attribute.clone(),
        })?;
        Ok(ctx.store.find_or_fail(class, id)?)
    }

    /// Fill the related record of the submitted type and point `record` at it.
    ///
    /// Switching from another stored type deletes the previous related record.
    /// The delete, the child fills, the save and the parent update share one
    /// store transaction. An unregistered discriminator leaves `record`
    /// untouched unless the context is strict.
    pub fn fill(
        &self,
        request: &FormRequest,
        record: &mut GenericDataObject,
        ctx: &FieldContext,
    ) -> Result<DeferredActions, FormError> {
        let Some(submitted) = request.input_str(&self.attribute) else {
            log::debug!("No '{}' submitted, leaving relation unchanged", self.attribute);
            return Ok(DeferredActions::new());
        };

        let Some(option) = self.types.iter().find(|t| t.discriminator == submitted) else {
            if ctx.strict_discriminators {
                return Err(FormError::UnknownDiscriminator {
                    field: self.attribute.clone(),
                    value: submitted,
                });
            }
            log::warn!("Ignoring unregistered type '{}' for field '{}'", submitted, self.attribute);
            return Ok(DeferredActions::new());
        };

        ox_persistence::transaction(ctx.store, || self.fill_type(option, request, record, ctx))
    }

    fn fill_type(
        &self,
        option: &TypeOption,
        request: &FormRequest,
        record: &mut GenericDataObject,
        ctx: &FieldContext,
    ) -> Result<DeferredActions, FormError> {
        let class = ctx.morph_map.resolve(&option.discriminator).to_string();
        let stored_class = record
            .get_str(&self.type_attribute())
            .map(|stored| ctx.morph_map.resolve(&stored).to_string());

        let mut related = match stored_class {
            Some(current) if current == class => {
                let id = self.stored_related_id(record)?;
                ctx.store.find_or_fail(&class, &id)?
            }
            Some(previous) => {
                let id = self.stored_related_id(record)?;
                let old = ctx.store.find_or_fail(&previous, &id)?;
                log::info!(
                    "Field '{}' switches from '{}' to '{}', deleting {}#{}",
                    self.attribute, previous, class, previous, id
                );
                ctx.store.delete(&old)?;
                record.unset_relation(&self.attribute);
                ctx.store.instantiate(&class)
            }
            None => ctx.store.instantiate(&class),
        };

        let mut deferred = DeferredActions::new();
        for field in &option.fields {
            deferred.extend(field.fill(request, &mut related, ctx)?);
        }

        ctx.store.save(&mut related)?;

        let related_id = related.id().ok_or_else(|| FormError::MissingRelatedId {
            field: self.attribute.clone(),
        })?;
        log::debug!("Field '{}' now points to {}#{}", self.attribute, class, related_id);
        record.set(&self.id_attribute(), related_id);
        record.set(&self.type_attribute(), ctx.morph_map.alias_for(&class));
        record.set_relation(&self.attribute, related);

        Ok(deferred)
    }

    fn stored_related_id(&self, record: &GenericDataObject) -> Result<String, FormError> {
        record
            .get_str(&self.id_attribute())
            .ok_or_else(|| FormError::MissingRelatedId {
                field: self.attribute.clone(),
            })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PolymorphicFieldDefinition {
    name: String,
    #[serde(default)]
    attribute: Option<String>,
    #[serde(default)]
    types: Vec<TypeOptionDefinition>,
    #[serde(default)]
    hide_type_when_updating: bool,
    #[serde(default)]
    disable_type_when_updating: bool,
    #[serde(default)]
    rules: Option<Vec<ValidationRule>>,
    #[serde(default)]
    hidden: bool,
}

#[derive(Deserialize)]
struct TypeOptionDefinition {
    #[serde(rename = "value", alias = "discriminator")]
    discriminator: String,
    label: String,
    #[serde(default)]
    fields: Vec<Field>,
}

impl TryFrom<PolymorphicFieldDefinition> for PolymorphicField {
    type Error = FormError;

    fn try_from(def: PolymorphicFieldDefinition) -> Result<Self, Self::Error> {
        let mut builder = PolymorphicField::builder(&def.name);
        if let Some(attribute) = &def.attribute {
            builder = builder.attribute(attribute);
        }
        for option in def.types {
            builder = builder.with_type(&option.label, &option.discriminator, option.fields);
        }
        if def.hide_type_when_updating {
            builder = builder.hide_type_when_updating();
        }
        if def.disable_type_when_updating {
            builder = builder.disable_type_when_updating();
        }
        if let Some(rules) = def.rules {
            builder = builder.rules(rules);
        }
        if def.hidden {
            builder = builder.hidden();
        }
        builder.build()
    }
}
