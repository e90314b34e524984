use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// A schemaless record: a class name, the name of its identifier attribute,
/// and a bag of JSON attribute values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericDataObject {
    pub class_name: String,
    pub identifier_name: String,
    attributes: Map<String, Value>,
    /// Related records already loaded for this object, keyed by relation name.
    #[serde(skip)]
    relations: HashMap<String, GenericDataObject>,
}

impl GenericDataObject {
    /// Create a new object of `class_name`. A fresh UUID is assigned when no id is given.
    pub fn new(class_name: &str, identifier_name: &str, id: Option<Uuid>) -> Self {
        let guid = id.unwrap_or_else(Uuid::new_v4);
        Self::with_id(class_name, identifier_name, guid.to_string())
    }

    /// Create an object with an explicit identifier value.
    pub fn with_id(class_name: &str, identifier_name: &str, id: impl Into<String>) -> Self {
        let mut object = Self::unsaved(class_name, identifier_name);
        let id: String = id.into();
        object.set(identifier_name, id);
        object
    }

    /// Create an object with no identifier value yet. The id is assigned on first save.
    pub fn unsaved(class_name: &str, identifier_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            identifier_name: identifier_name.to_string(),
            attributes: Map::new(),
            relations: HashMap::new(),
        }
    }

    /// Give the object a fresh UUID identifier and return it.
    pub fn assign_id(&mut self) -> String {
        let id = Uuid::new_v4().to_string();
        let identifier_name = self.identifier_name.clone();
        self.set(&identifier_name, id.clone());
        id
    }

    /// The identifier rendered as a string, whatever JSON type it is stored as.
    pub fn id(&self) -> Option<String> {
        self.attributes.get(&self.identifier_name).and_then(value_as_key)
    }

    pub fn get_attribute(&self, identifier: &str) -> Option<&Value> {
        self.attributes.get(identifier)
    }

    /// String view of an attribute. Null counts as absent.
    pub fn get_str(&self, identifier: &str) -> Option<String> {
        self.attributes.get(identifier).and_then(value_as_key)
    }

    /// Set a value. Returns the previous value if one was replaced.
    pub fn set<T: Into<Value>>(&mut self, identifier: &str, value: T) -> Option<Value> {
        self.attributes.insert(identifier.to_string(), value.into())
    }

    pub fn has_attribute(&self, identifier: &str) -> bool {
        self.attributes.contains_key(identifier)
    }

    pub fn remove_attribute(&mut self, identifier: &str) -> Option<Value> {
        self.attributes.remove(identifier)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn set_attributes(&mut self, attributes: Map<String, Value>) {
        self.attributes = attributes;
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attach an already-loaded related record under `name`.
    pub fn set_relation(&mut self, name: &str, related: GenericDataObject) {
        self.relations.insert(name.to_string(), related);
    }

    pub fn relation(&self, name: &str) -> Option<&GenericDataObject> {
        self.relations.get(name)
    }

    pub fn relation_loaded(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    pub fn unset_relation(&mut self, name: &str) -> Option<GenericDataObject> {
        self.relations.remove(name)
    }
}

impl Default for GenericDataObject {
    fn default() -> Self {
        Self::new("", "id", None)
    }
}

/// Strings pass through, numbers and booleans are rendered, null and
/// compound values have no key form.
pub fn value_as_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
