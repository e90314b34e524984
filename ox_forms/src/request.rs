use ox_data_object::value_as_key;
use serde_json::{Map, Value};

/// Route actions whose validation pass must see the selected type's child fields.
pub const CHILD_FIELD_ROUTE_ACTIONS: [&str; 5] = [
    "FieldDestroyController@handle",
    "ResourceUpdateController@handle",
    "ResourceStoreController@handle",
    "AssociatableController@index",
    "MorphableController@index",
];

/// Route actions that list candidate records across every type.
pub const ASSOCIATE_LISTING_ROUTE_ACTIONS: [&str; 2] = [
    "AssociatableController@index",
    "MorphableController@index",
];

const UPDATE_ROUTE_ACTION: &str = "ResourceUpdateController@handle";

/// An inbound form submission together with the context it arrived in.
///
/// `performs_validation` is set by the caller when the request is being run
/// through rule validation; the field-set resolver keys off it together with
/// the matched route action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormRequest {
    input: Map<String, Value>,
    route_action: Option<String>,
    performs_validation: bool,
}

impl FormRequest {
    pub fn new(input: Map<String, Value>) -> Self {
        Self {
            input,
            ..Default::default()
        }
    }

    /// Build from a JSON object. Anything else yields an empty input.
    pub fn from_json(input: Value) -> Self {
        match input {
            Value::Object(map) => Self::new(map),
            _ => Self::default(),
        }
    }

    pub fn with_route_action(mut self, route_action: &str) -> Self {
        self.route_action = Some(route_action.to_string());
        self
    }

    pub fn validating(mut self) -> Self {
        self.performs_validation = true;
        self
    }

    pub fn input(&self, attribute: &str) -> Option<&Value> {
        self.input.get(attribute)
    }

    pub fn input_str(&self, attribute: &str) -> Option<String> {
        self.input.get(attribute).and_then(value_as_key)
    }

    pub fn route_action(&self) -> Option<&str> {
        self.route_action.as_deref()
    }

    pub fn performs_validation(&self) -> bool {
        self.performs_validation
    }

    /// Whether the matched route action ends with any of `suffixes`.
    pub fn route_action_matches<S: AsRef<str>>(&self, suffixes: &[S]) -> bool {
        match &self.route_action {
            Some(action) => suffixes.iter().any(|s| action.ends_with(s.as_ref())),
            None => false,
        }
    }

    pub fn is_update(&self) -> bool {
        self.route_action_matches(&[UPDATE_ROUTE_ACTION])
    }
}
