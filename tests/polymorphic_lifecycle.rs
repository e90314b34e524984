use ox_polymorphic_field::*;
use serde_json::json;
use std::sync::{Arc, Mutex};

const UPDATE_ACTION: &str = "Laravel\\Nova\\Http\\Controllers\\ResourceUpdateController@handle";

const CONFIG: &str = r#"
morph_map:
  post: App\Post
  video: App\Video
"#;

const FIELDS: &str = r#"
- kind: plain
  name: Body
  attribute: body
  rules:
    - rule_type: required
- kind: polymorphic
  name: Commentable
  disableTypeWhenUpdating: true
  types:
    - value: post
      label: Post
      fields:
        - kind: plain
          name: Title
          attribute: title
          rules: []
    - value: video
      label: Video
      fields:
        - kind: plain
          name: Url
          attribute: url
          plugins: [notify]
          rules:
            - rule_type: regex
              parameters: "^https://"
"#;

struct NotifyHook {
    sent: Arc<Mutex<Vec<String>>>,
}

impl LifecycleHook for NotifyHook {
    fn on_fill(
        &self,
        _field: &FieldDefinition,
        _request: &FormRequest,
        record: &mut GenericDataObject,
    ) -> anyhow::Result<Option<DeferredAction>> {
        let sent = self.sent.clone();
        let url = record.get_str("url").unwrap_or_default();
        Ok(Some(Box::new(move || {
            sent.lock().unwrap().push(url);
            Ok::<(), anyhow::Error>(())
        })))
    }
}

fn seeded_store() -> (MemoryStore, GenericDataObject) {
    let store = MemoryStore::new();
    let mut post = GenericDataObject::with_id("App\\Post", "id", "5");
    post.set("title", "Hello");
    store.save(&mut post).unwrap();

    let mut comment = GenericDataObject::with_id("App\\Comment", "id", "1");
    comment.set("body", "Nice");
    comment.set("commentable_type", "post");
    comment.set("commentable_id", "5");
    store.save(&mut comment).unwrap();
    (store, comment)
}

#[test]
fn detail_view_reflects_related_record() {
    let config = FormsConfig::from_yaml_str(CONFIG).unwrap();
    let (store, comment) = seeded_store();
    let ctx = FieldContext::from_config(&store, &config);

    let mut fields = fields_from_yaml(FIELDS).unwrap();
    resolve_fields(&mut fields, &comment, &ctx).unwrap();
    let meta = fields_to_json(&fields).unwrap();

    assert_eq!(meta[0]["value"], json!("Nice"));
    assert_eq!(meta[1]["value"], json!("App\\Post"));
    assert_eq!(meta[1]["displayValue"], json!("Post"));
    assert_eq!(meta[1]["disableTypeWhenUpdating"], json!(true));
    assert_eq!(meta[1]["types"][0]["active"], json!(true));
    assert_eq!(meta[1]["types"][0]["fields"][0]["value"], json!("Hello"));
    assert_eq!(meta[1]["types"][1]["active"], json!(false));
}

#[test]
fn update_switching_type_validates_then_persists() {
    let config = FormsConfig::from_yaml_str(CONFIG).unwrap();
    let (store, mut comment) = seeded_store();
    let sent = Arc::new(Mutex::new(Vec::new()));
    let mut hooks = HookRegistry::new();
    hooks.register_hook("notify", Arc::new(NotifyHook { sent: sent.clone() }));
    let ctx = FieldContext::from_config(&store, &config).with_hooks(&hooks);
    let resolver = FieldSetResolver::from_config(&config);
    let declared = fields_from_yaml(FIELDS).unwrap();

    // Validation pass sees the selected type's child fields.
    let invalid = FormRequest::from_json(json!({ "body": "Nice", "commentable": "video", "url": "" }))
        .with_route_action(UPDATE_ACTION)
        .validating();
    let fields = resolver.available_fields(&declared, &invalid);
    let errors = Validator.validate(&fields, &invalid, RuleMode::for_request(&invalid));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "url");

    let request = FormRequest::from_json(json!({
        "body": "Nice",
        "commentable": "video",
        "url": "https://example.test/v",
    }))
    .with_route_action(UPDATE_ACTION)
    .validating();
    let fields = resolver.available_fields(&declared, &request);
    assert_eq!(RuleMode::for_request(&request), RuleMode::Update);
    assert!(Validator.validate(&fields, &request, RuleMode::for_request(&request)).is_empty());

    // Fill the declared fields, save the parent, then run deferred work.
    let deferred = fill_fields(&declared, &request, &mut comment, &ctx).unwrap();
    store.save(&mut comment).unwrap();
    assert!(sent.lock().unwrap().is_empty());
    deferred.run().unwrap();

    assert_eq!(*sent.lock().unwrap(), vec!["https://example.test/v".to_string()]);
    assert!(!store.contains("App\\Post", "5"));

    let saved = store.find_or_fail("App\\Comment", "1").unwrap();
    assert_eq!(saved.get_str("commentable_type").as_deref(), Some("video"));
    let video_id = saved.get_str("commentable_id").unwrap();
    let video = store.find_or_fail("App\\Video", &video_id).unwrap();
    assert_eq!(video.get_str("url").as_deref(), Some("https://example.test/v"));
}

#[test]
fn associate_listing_offers_all_child_fields() {
    let resolver = FieldSetResolver::new();
    let declared = fields_from_yaml(FIELDS).unwrap();
    let request = FormRequest::default()
        .with_route_action("Laravel\\Nova\\Http\\Controllers\\MorphableController@index");

    let fields = resolver.available_fields(&declared, &request);
    let attributes: Vec<&str> = fields.iter().map(Field::attribute).collect();
    assert_eq!(attributes, vec!["body", "commentable", "title", "url"]);
}
