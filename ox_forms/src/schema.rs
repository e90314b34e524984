use crate::binding::{Binder, GenericDataObjectBinder};
use crate::context::FieldContext;
use crate::error::FormError;
use crate::polymorphic::PolymorphicField;
use crate::request::FormRequest;
use crate::traits::DeferredActions;
use ox_data_object::GenericDataObject;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const RULE_REQUIRED: &str = "required";
/// Required only while a sibling discriminator selects a given type.
pub const RULE_SOMETIMES_REQUIRED: &str = "sometimes_required";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ValidationRule {
    pub rule_type: String, // "required", "sometimes_required", "min", "max", "regex"
    #[serde(default)]
    pub parameters: Value,
    #[serde(default)]
    pub message: Option<String>,
}

impl ValidationRule {
    pub fn new(rule_type: &str, parameters: Value) -> Self {
        Self {
            rule_type: rule_type.to_string(),
            parameters,
            message: None,
        }
    }

    pub fn required() -> Self {
        Self::new(RULE_REQUIRED, Value::Null)
    }

    pub fn sometimes_required(discriminator_attribute: &str, discriminator: &str) -> Self {
        Self::new(
            RULE_SOMETIMES_REQUIRED,
            json!({ "attribute": discriminator_attribute, "value": discriminator }),
        )
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }
}

/// Which rule set applies to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMode {
    Creation,
    Update,
}

impl RuleMode {
    /// Update rules for update submissions, creation rules otherwise.
    pub fn for_request(request: &FormRequest) -> Self {
        if request.is_update() {
            RuleMode::Update
        } else {
            RuleMode::Creation
        }
    }
}

/// A plain (non-polymorphic) field.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub attribute: String,
    /// Abstract data type (e.g., "string", "integer")
    #[serde(default)]
    pub data_type: String,
    /// Concrete component override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Named lifecycle hooks run for this field
    #[serde(default)]
    pub plugins: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<ValidationRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_rules: Option<Vec<ValidationRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_rules: Option<Vec<ValidationRule>>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub props: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

impl FieldDefinition {
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            attribute: default_attribute(name),
            data_type: data_type.to_string(),
            ..Default::default()
        }
    }

    pub fn attribute(mut self, attribute: &str) -> Self {
        self.attribute = attribute.to_string();
        self
    }

    pub fn rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn creation_rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.creation_rules = Some(rules);
        self
    }

    pub fn update_rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.update_rules = Some(rules);
        self
    }

    pub fn plugin(mut self, name: &str) -> Self {
        self.plugins.push(name.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Base rules followed by the set specific to `mode`.
    pub fn effective_rules(&self, mode: RuleMode) -> Vec<ValidationRule> {
        let specific = match mode {
            RuleMode::Creation => &self.creation_rules,
            RuleMode::Update => &self.update_rules,
        };
        self.rules
            .iter()
            .chain(specific.iter())
            .flatten()
            .cloned()
            .collect()
    }

    /// Append `rule` to every rule set this field declares, skipping sets
    /// that already hold it.
    pub fn append_rule(&mut self, rule: &ValidationRule) {
        for set in [&mut self.rules, &mut self.creation_rules, &mut self.update_rules]
            .into_iter()
            .flatten()
        {
            if !set.contains(rule) {
                set.push(rule.clone());
            }
        }
    }

    pub fn resolve(&mut self, record: &GenericDataObject, ctx: &FieldContext) -> Result<(), FormError> {
        GenericDataObjectBinder.hydrate(self, record, ctx)
    }

    pub fn resolve_for_display(&mut self, record: &GenericDataObject, ctx: &FieldContext) -> Result<(), FormError> {
        self.resolve(record, ctx)?;
        self.display_value = self.value.as_ref().and_then(|v| match v {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });
        Ok(())
    }

    /// Copy the request value into `record` and collect deferred hook actions.
    pub fn fill(
        &self,
        request: &FormRequest,
        record: &mut GenericDataObject,
        ctx: &FieldContext,
    ) -> Result<DeferredActions, FormError> {
        GenericDataObjectBinder.extract(self, record, request)?;

        let mut deferred = DeferredActions::new();
        for name in &self.plugins {
            match ctx.hook(name) {
                Some(hook) => {
                    if let Some(action) = hook.on_fill(self, request, record)? {
                        deferred.push(action);
                    }
                }
                None => log::warn!("Field '{}' names unknown hook '{}'", self.attribute, name),
            }
        }
        Ok(deferred)
    }
}

/// Every field a form can declare.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Field {
    Plain(FieldDefinition),
    Polymorphic(PolymorphicField),
}

impl Field {
    pub fn name(&self) -> &str {
        match self {
            Field::Plain(def) => &def.name,
            Field::Polymorphic(poly) => &poly.name,
        }
    }

    pub fn attribute(&self) -> &str {
        match self {
            Field::Plain(def) => &def.attribute,
            Field::Polymorphic(poly) => &poly.attribute,
        }
    }

    pub fn is_hidden(&self) -> bool {
        match self {
            Field::Plain(def) => def.hidden,
            Field::Polymorphic(poly) => poly.hidden,
        }
    }

    pub fn as_polymorphic(&self) -> Option<&PolymorphicField> {
        match self {
            Field::Polymorphic(poly) => Some(poly),
            Field::Plain(_) => None,
        }
    }

    pub fn as_plain(&self) -> Option<&FieldDefinition> {
        match self {
            Field::Plain(def) => Some(def),
            Field::Polymorphic(_) => None,
        }
    }

    pub fn effective_rules(&self, mode: RuleMode) -> Vec<ValidationRule> {
        match self {
            Field::Plain(def) => def.effective_rules(mode),
            Field::Polymorphic(poly) => poly.rules.clone().unwrap_or_default(),
        }
    }

    pub fn resolve(&mut self, record: &GenericDataObject, ctx: &FieldContext) -> Result<(), FormError> {
        match self {
            Field::Plain(def) => def.resolve(record, ctx),
            Field::Polymorphic(poly) => poly.resolve(record, ctx),
        }
    }

    pub fn resolve_for_display(&mut self, record: &GenericDataObject, ctx: &FieldContext) -> Result<(), FormError> {
        match self {
            Field::Plain(def) => def.resolve_for_display(record, ctx),
            Field::Polymorphic(poly) => poly.resolve_for_display(record, ctx),
        }
    }

    pub fn fill(
        &self,
        request: &FormRequest,
        record: &mut GenericDataObject,
        ctx: &FieldContext,
    ) -> Result<DeferredActions, FormError> {
        match self {
            Field::Plain(def) => def.fill(request, record, ctx),
            Field::Polymorphic(poly) => poly.fill(request, record, ctx),
        }
    }
}

impl From<FieldDefinition> for Field {
    fn from(def: FieldDefinition) -> Self {
        Field::Plain(def)
    }
}

impl From<PolymorphicField> for Field {
    fn from(poly: PolymorphicField) -> Self {
        Field::Polymorphic(poly)
    }
}

/// Snake-cased attribute name derived from a display name.
pub fn default_attribute(name: &str) -> String {
    let mut attribute = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            attribute.extend(c.to_lowercase());
        } else if !attribute.ends_with('_') && !attribute.is_empty() {
            attribute.push('_');
        }
    }
    attribute.trim_end_matches('_').to_string()
}
