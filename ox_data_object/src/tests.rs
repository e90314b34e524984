use super::*;
use serde_json::json;

#[test]
fn test_new_data_object() {
    let data_object = GenericDataObject::new("App\\Post", "id", None);
    assert!(!data_object.is_empty());
    assert_eq!(data_object.len(), 1);
    assert!(data_object.has_attribute("id"));
    assert_eq!(data_object.class_name, "App\\Post");
    assert!(Uuid::parse_str(&data_object.id().unwrap()).is_ok());
}

#[test]
fn test_set_and_get() {
    let mut data_object = GenericDataObject::with_id("App\\Post", "id", "5");
    assert_eq!(data_object.set("title", "Hello"), None);
    assert_eq!(data_object.set("title", "World"), Some(json!("Hello")));
    assert_eq!(data_object.get_attribute("title"), Some(&json!("World")));
    assert_eq!(data_object.id().as_deref(), Some("5"));
}

#[test]
fn test_numeric_identifier_renders_as_key() {
    let mut data_object = GenericDataObject::with_id("App\\Post", "id", "x");
    data_object.set("id", 42);
    assert_eq!(data_object.id().as_deref(), Some("42"));
}

#[test]
fn test_null_is_absent_in_string_view() {
    let mut data_object = GenericDataObject::default();
    data_object.set("target_type", Value::Null);
    assert!(data_object.has_attribute("target_type"));
    assert_eq!(data_object.get_str("target_type"), None);
}

#[test]
fn test_relations_are_cached_per_name() {
    let mut parent = GenericDataObject::with_id("App\\Comment", "id", "1");
    let related = GenericDataObject::with_id("App\\Video", "id", "9");
    assert!(!parent.relation_loaded("target"));
    parent.set_relation("target", related.clone());
    assert_eq!(parent.relation("target"), Some(&related));
    assert_eq!(parent.unset_relation("target"), Some(related));
    assert!(parent.relation("target").is_none());
}

#[test]
fn test_unsaved_object_has_no_identifier_until_assigned() {
    let mut data_object = GenericDataObject::unsaved("App\\Video", "id");
    assert!(data_object.is_empty());
    assert_eq!(data_object.id(), None);

    let id = data_object.assign_id();
    assert_eq!(data_object.id(), Some(id.clone()));
    assert!(Uuid::parse_str(&id).is_ok());
}
