use crate::config::FormsConfig;
use crate::request::{FormRequest, ASSOCIATE_LISTING_ROUTE_ACTIONS, CHILD_FIELD_ROUTE_ACTIONS};
use crate::schema::{Field, RuleMode, ValidationRule};
use crate::traits::{FieldFilter, VisibleFieldFilter};
use crate::validation::{ValidationError, Validator};

/// How child fields of polymorphic fields join the field set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSetPolicy {
    /// Only the type selected by the request, and only while a validating
    /// request runs one of the child-field route actions.
    SelectedType,
    /// Every type's child fields, as listed. Used when listing candidates
    /// across all types.
    AllTypes,
}

impl FieldSetPolicy {
    pub fn for_request(request: &FormRequest) -> Self {
        if !request.performs_validation() && request.route_action_matches(&ASSOCIATE_LISTING_ROUTE_ACTIONS) {
            FieldSetPolicy::AllTypes
        } else {
            FieldSetPolicy::SelectedType
        }
    }
}

/// Which type options a flatten pass descends into.
#[derive(Clone, Copy)]
enum TypeSelector<'a> {
    Submitted(&'a FormRequest),
    All,
}

impl TypeSelector<'_> {
    fn selects(&self, attribute: &str, discriminator: &str) -> bool {
        match self {
            TypeSelector::Submitted(request) => request.input_str(attribute).as_deref() == Some(discriminator),
            TypeSelector::All => true,
        }
    }
}

/// Child fields gathered from polymorphic fields, unique by attribute.
#[derive(Default)]
struct ChildFieldAccumulator {
    fields: Vec<Field>,
}

impl ChildFieldAccumulator {
    fn contains(&self, attribute: &str) -> bool {
        self.fields.iter().any(|f| f.attribute() == attribute)
    }

    fn extract(&mut self, children: &[Field], discriminator_attribute: &str, discriminator: &str, selector: TypeSelector) {
        for child in children {
            match child {
                Field::Polymorphic(nested) => {
                    for option in nested.types() {
                        if selector.selects(&nested.attribute, &option.discriminator) {
                            self.extract(&option.fields, &nested.attribute, &option.discriminator, selector);
                        }
                    }
                }
                Field::Plain(def) => {
                    if self.contains(&def.attribute) {
                        continue;
                    }
                    let mut def = def.clone();
                    def.append_rule(&ValidationRule::sometimes_required(discriminator_attribute, discriminator));
                    self.fields.push(Field::Plain(def));
                }
            }
        }
    }
}

/// Decides the field list a form exposes for a given request.
pub struct FieldSetResolver {
    child_field_actions: Vec<String>,
    filter: Box<dyn FieldFilter>,
}

impl Default for FieldSetResolver {
    fn default() -> Self {
        Self {
            child_field_actions: CHILD_FIELD_ROUTE_ACTIONS.iter().map(|s| s.to_string()).collect(),
            filter: Box::new(VisibleFieldFilter),
        }
    }
}

impl FieldSetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &FormsConfig) -> Self {
        Self {
            child_field_actions: config.child_field_actions(),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: Box<dyn FieldFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// True when the request is a validation pass for one of the child-field route actions.
    pub fn requires_child_fields(&self, request: &FormRequest) -> bool {
        request.performs_validation() && request.route_action_matches(&self.child_field_actions)
    }

    /// Field list for `request`, with the policy picked from the request context.
    pub fn available_fields(&self, fields: &[Field], request: &FormRequest) -> Vec<Field> {
        self.available_fields_with_policy(fields, request, FieldSetPolicy::for_request(request))
    }

    pub fn available_fields_with_policy(
        &self,
        fields: &[Field],
        request: &FormRequest,
        policy: FieldSetPolicy,
    ) -> Vec<Field> {
        let available = match policy {
            FieldSetPolicy::SelectedType => self.selected_type_fields(fields, request),
            FieldSetPolicy::AllTypes => all_type_fields(fields),
        };
        self.filter.filter(available, request)
    }

    fn selected_type_fields(&self, fields: &[Field], request: &FormRequest) -> Vec<Field> {
        let mut children = ChildFieldAccumulator::default();

        if self.requires_child_fields(request) {
            let selector = TypeSelector::Submitted(request);
            for poly in fields.iter().filter_map(Field::as_polymorphic) {
                for option in poly.types() {
                    if selector.selects(&poly.attribute, &option.discriminator) {
                        children.extract(&option.fields, &poly.attribute, &option.discriminator, selector);
                    }
                }
            }
        } else {
            log::debug!("Request does not need child fields, keeping declared fields only");
        }

        log::debug!("Appending {} child fields to {} declared fields", children.fields.len(), fields.len());
        fields.iter().cloned().chain(children.fields).collect()
    }

    /// Declared fields plus the child fields of every type of every
    /// polymorphic field, regardless of request context.
    pub fn action_fields(&self, fields: &[Field]) -> Vec<Field> {
        let mut children = ChildFieldAccumulator::default();
        for poly in fields.iter().filter_map(Field::as_polymorphic) {
            for option in poly.types() {
                children.extract(&option.fields, &poly.attribute, &option.discriminator, TypeSelector::All);
            }
        }
        fields.iter().cloned().chain(children.fields).collect()
    }

    /// Validate an action submission against the creation rules of its
    /// fields, child fields of every type included.
    pub fn validate_action_fields(&self, fields: &[Field], request: &FormRequest) -> Vec<ValidationError> {
        let fields = self.action_fields(fields);
        Validator.validate(&fields, request, RuleMode::Creation)
    }
}

fn all_type_fields(fields: &[Field]) -> Vec<Field> {
    let mut available: Vec<Field> = fields.to_vec();
    for poly in fields.iter().filter_map(Field::as_polymorphic) {
        for option in poly.types() {
            available.extend(option.fields.iter().cloned());
        }
    }
    available
}
