//! End-to-end coverage of the backed-model lifecycle: hydrate a model
//! through an activated parse-node factory, mutate it, and serialize a
//! partial-update payload through an activated writer factory.
//!
//! The JSON format used here is test-local; shipped format adapters
//! live outside this workspace and integrate the same way.

use std::any::Any;
use std::sync::{Arc, Mutex};

use patchwire::backing::{
    connect_nested_store, enable_backing_store_for_parse_node_factory,
    enable_backing_store_for_serialization_writer_factory, new_backing_store,
};
use patchwire::prelude::*;
use patchwire::{ParsableFactory, ParsableHook};

// ---------------------------------------------------------------------------
// Minimal JSON format
// ---------------------------------------------------------------------------

struct JsonParseNode {
    value: serde_json::Value,
    on_before: Option<ParsableHook>,
    on_after: Option<ParsableHook>,
}

impl JsonParseNode {
    fn child(&self, value: serde_json::Value) -> JsonParseNode {
        JsonParseNode {
            value,
            on_before: self.on_before.clone(),
            on_after: self.on_after.clone(),
        }
    }
}

impl ParseNode for JsonParseNode {
    fn get_child_node(&self, identifier: &str) -> Result<Option<Box<dyn ParseNode>>> {
        Ok(self
            .value
            .get(identifier)
            .map(|child| Box::new(self.child(child.clone())) as Box<dyn ParseNode>))
    }

    fn get_string_value(&self) -> Result<Option<String>> {
        Ok(self.value.as_str().map(str::to_string))
    }

    fn get_bool_value(&self) -> Result<Option<bool>> {
        Ok(self.value.as_bool())
    }

    fn get_i64_value(&self) -> Result<Option<i64>> {
        Ok(self.value.as_i64())
    }

    fn get_f64_value(&self) -> Result<Option<f64>> {
        Ok(self.value.as_f64())
    }

    fn get_raw_value(&self) -> Result<serde_json::Value> {
        Ok(self.value.clone())
    }

    fn get_collection_of_raw_values(&self) -> Result<Vec<serde_json::Value>> {
        Ok(self.value.as_array().cloned().unwrap_or_default())
    }

    fn get_object_value(&self, factory: ParsableFactory) -> Result<Box<dyn Parsable>> {
        let mut model = factory(self)?;
        if let Some(hook) = &self.on_before {
            hook(model.as_ref());
        }
        model.deserialize_fields(self)?;
        if let Some(hook) = &self.on_after {
            hook(model.as_ref());
        }
        Ok(model)
    }

    fn get_collection_of_object_values(
        &self,
        factory: ParsableFactory,
    ) -> Result<Vec<Box<dyn Parsable>>> {
        let items = self.value.as_array().cloned().unwrap_or_default();
        items
            .into_iter()
            .map(|item| self.child(item).get_object_value(factory))
            .collect()
    }

    fn on_before_assign_field_values(&self) -> Option<ParsableHook> {
        self.on_before.clone()
    }

    fn set_on_before_assign_field_values(&mut self, hook: Option<ParsableHook>) {
        self.on_before = hook;
    }

    fn on_after_assign_field_values(&self) -> Option<ParsableHook> {
        self.on_after.clone()
    }

    fn set_on_after_assign_field_values(&mut self, hook: Option<ParsableHook>) {
        self.on_after = hook;
    }
}

struct JsonParseNodeFactory;

impl ParseNodeFactory for JsonParseNodeFactory {
    fn valid_content_type(&self) -> String {
        "application/json".to_string()
    }

    fn get_root_parse_node(
        &self,
        content_type: &str,
        content: &[u8],
    ) -> Result<Box<dyn ParseNode>> {
        if !content_type.starts_with("application/json") {
            return Err(WireError::NoFactoryForContentType(content_type.to_string()));
        }
        let value: serde_json::Value = serde_json::from_slice(content)?;
        Ok(Box::new(JsonParseNode {
            value,
            on_before: None,
            on_after: None,
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct JsonSerializationWriter {
    /// Innermost map last; index 0 is the payload root.
    stack: Vec<serde_json::Map<String, serde_json::Value>>,
    on_before: Option<ParsableHook>,
    on_after: Option<ParsableHook>,
}

impl JsonSerializationWriter {
    fn new() -> Self {
        Self {
            stack: vec![serde_json::Map::new()],
            on_before: None,
            on_after: None,
        }
    }

    fn current(&mut self) -> &mut serde_json::Map<String, serde_json::Value> {
        if self.stack.is_empty() {
            self.stack.push(serde_json::Map::new());
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn serialize_scoped(&mut self, value: &dyn Parsable) -> Result<serde_json::Map<String, serde_json::Value>> {
        if let Some(hook) = self.on_before.clone() {
            hook(value);
        }
        self.stack.push(serde_json::Map::new());
        let result = value.serialize(self);
        let fields = self.stack.pop().unwrap_or_default();
        if let Some(hook) = self.on_after.clone() {
            hook(value);
        }
        result.map(|()| fields)
    }
}

impl SerializationWriter for JsonSerializationWriter {
    fn write_string_value(&mut self, key: &str, value: &str) -> Result<()> {
        self.current().insert(key.to_string(), value.into());
        Ok(())
    }

    fn write_bool_value(&mut self, key: &str, value: bool) -> Result<()> {
        self.current().insert(key.to_string(), value.into());
        Ok(())
    }

    fn write_i64_value(&mut self, key: &str, value: i64) -> Result<()> {
        self.current().insert(key.to_string(), value.into());
        Ok(())
    }

    fn write_f64_value(&mut self, key: &str, value: f64) -> Result<()> {
        self.current().insert(key.to_string(), value.into());
        Ok(())
    }

    fn write_raw_value(&mut self, key: &str, value: &serde_json::Value) -> Result<()> {
        self.current().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn write_null_value(&mut self, key: &str) -> Result<()> {
        self.current()
            .insert(key.to_string(), serde_json::Value::Null);
        Ok(())
    }

    fn write_collection_of_raw_values(
        &mut self,
        key: &str,
        values: &[serde_json::Value],
    ) -> Result<()> {
        self.current()
            .insert(key.to_string(), serde_json::Value::Array(values.to_vec()));
        Ok(())
    }

    fn write_object_value(&mut self, key: Option<&str>, value: &dyn Parsable) -> Result<()> {
        let fields = self.serialize_scoped(value)?;
        match key {
            Some(key) => {
                self.current()
                    .insert(key.to_string(), serde_json::Value::Object(fields));
            }
            None => self.current().extend(fields),
        }
        Ok(())
    }

    fn write_collection_of_object_values(
        &mut self,
        key: &str,
        values: &[&dyn Parsable],
    ) -> Result<()> {
        let mut items = Vec::with_capacity(values.len());
        for value in values {
            let fields = self.serialize_scoped(*value)?;
            items.push(serde_json::Value::Object(fields));
        }
        self.current()
            .insert(key.to_string(), serde_json::Value::Array(items));
        Ok(())
    }

    fn serialized_content(&mut self) -> Result<Vec<u8>> {
        let root = self.stack.first().cloned().unwrap_or_default();
        Ok(serde_json::to_vec(&serde_json::Value::Object(root))?)
    }

    fn on_before_object_serialization(&self) -> Option<ParsableHook> {
        self.on_before.clone()
    }

    fn set_on_before_object_serialization(&mut self, hook: Option<ParsableHook>) {
        self.on_before = hook;
    }

    fn on_after_object_serialization(&self) -> Option<ParsableHook> {
        self.on_after.clone()
    }

    fn set_on_after_object_serialization(&mut self, hook: Option<ParsableHook>) {
        self.on_after = hook;
    }
}

struct JsonSerializationWriterFactory;

impl SerializationWriterFactory for JsonSerializationWriterFactory {
    fn valid_content_type(&self) -> String {
        "application/json".to_string()
    }

    fn get_serialization_writer(
        &self,
        content_type: &str,
    ) -> Result<Box<dyn SerializationWriter>> {
        if !content_type.starts_with("application/json") {
            return Err(WireError::NoFactoryForContentType(content_type.to_string()));
        }
        Ok(Box::new(JsonSerializationWriter::new()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// A backed model, written the way generated code would be
// ---------------------------------------------------------------------------

struct User {
    store: Arc<dyn BackingStore>,
}

impl User {
    fn new() -> Self {
        Self {
            store: new_backing_store(),
        }
    }

    fn create_from_node(_node: &dyn ParseNode) -> Result<Box<dyn Parsable>> {
        Ok(Box::new(User::new()))
    }

    fn id(&self) -> Option<String> {
        self.store
            .get("id")
            .and_then(|value| value.as_str().map(str::to_string))
    }

    fn display_name(&self) -> Option<String> {
        self.store
            .get("displayName")
            .and_then(|value| value.as_str().map(str::to_string))
    }

    fn set_display_name(&self, value: Option<&str>) {
        match value {
            Some(value) => self.store.set("displayName", value.into()),
            None => self.store.set("displayName", StoredValue::Null),
        }
    }

    fn set_manager(&self, manager: Arc<User>) {
        connect_nested_store(self.store.clone(), "manager", manager.as_ref());
        self.store
            .set("manager", StoredValue::Model(manager as Arc<dyn BackedModel>));
    }
}

impl Parsable for User {
    fn deserialize_fields(&mut self, node: &dyn ParseNode) -> Result<()> {
        if let Some(child) = node.get_child_node("id")? {
            if let Some(value) = child.get_string_value()? {
                self.store.set("id", value.as_str().into());
            }
        }
        if let Some(child) = node.get_child_node("displayName")? {
            if let Some(value) = child.get_string_value()? {
                self.store.set("displayName", value.as_str().into());
            }
        }
        if let Some(child) = node.get_child_node("aliases")? {
            let aliases = child
                .get_collection_of_raw_values()?
                .into_iter()
                .map(StoredValue::from)
                .collect();
            self.store.set("aliases", StoredValue::collection(aliases));
        }
        if let Some(child) = node.get_child_node("manager")? {
            let manager = child.get_object_value(User::create_from_node)?;
            if let Ok(manager) = manager.into_any().downcast::<User>() {
                self.set_manager(Arc::from(manager));
            }
        }
        Ok(())
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        for (key, value) in self.store.enumerate() {
            match value {
                StoredValue::Null => writer.write_null_value(&key)?,
                StoredValue::Scalar(raw) => writer.write_raw_value(&key, &raw)?,
                StoredValue::Collection(handle) => {
                    let items: Vec<serde_json::Value> = handle
                        .read()
                        .map(|values| {
                            values
                                .iter()
                                .filter_map(|item| match item {
                                    StoredValue::Scalar(raw) => Some(raw.clone()),
                                    StoredValue::Null => Some(serde_json::Value::Null),
                                    _ => None,
                                })
                                .collect()
                        })
                        .unwrap_or_default();
                    writer.write_collection_of_raw_values(&key, &items)?;
                }
                StoredValue::Model(model) => {
                    writer.write_object_value(Some(&key), model.as_parsable())?;
                }
            }
        }
        Ok(())
    }

    fn as_backed_model(&self) -> Option<&dyn BackedModel> {
        Some(self)
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl BackedModel for User {
    fn backing_store(&self) -> Arc<dyn BackingStore> {
        self.store.clone()
    }

    fn as_parsable(&self) -> &dyn Parsable {
        self
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn hydrate(payload: &[u8]) -> Box<User> {
    let factory = enable_backing_store_for_parse_node_factory(Arc::new(JsonParseNodeFactory));
    let node = factory
        .get_root_parse_node("application/json", payload)
        .expect("payload parses");
    let model = node
        .get_object_value(User::create_from_node)
        .expect("model materializes");
    model.into_any().downcast::<User>().expect("user model")
}

fn serialize_with(
    factory: &Arc<dyn SerializationWriterFactory>,
    model: &User,
) -> serde_json::Value {
    let mut writer = factory
        .get_serialization_writer("application/json")
        .expect("writer");
    writer.write_object_value(None, model).expect("serialize");
    let content = writer.serialized_content().expect("content");
    serde_json::from_slice(&content).expect("valid json")
}

fn changed_writer_factory() -> Arc<dyn SerializationWriterFactory> {
    enable_backing_store_for_serialization_writer_factory(Arc::new(JsonSerializationWriterFactory))
}

fn plain_writer_factory() -> Arc<dyn SerializationWriterFactory> {
    Arc::new(JsonSerializationWriterFactory)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn hydration_is_not_a_change() {
    let user = hydrate(br#"{"id":"u-1","displayName":"Maya"}"#);
    assert_eq!(user.id().as_deref(), Some("u-1"));
    assert!(user.store.initialization_completed());

    let patch = serialize_with(&changed_writer_factory(), &user);
    assert_eq!(patch, serde_json::json!({}));
}

#[test]
fn filtered_serialize_emits_only_changed_fields() {
    let user = hydrate(br#"{"id":"u-1","displayName":"Maya"}"#);
    user.set_display_name(Some("Maya R."));

    let patch = serialize_with(&changed_writer_factory(), &user);
    assert_eq!(patch, serde_json::json!({"displayName": "Maya R."}));

    let full = serialize_with(&plain_writer_factory(), &user);
    assert_eq!(
        full,
        serde_json::json!({"id": "u-1", "displayName": "Maya R."})
    );
}

#[test]
fn filter_resets_after_each_serialization_pass() {
    let user = hydrate(br#"{"id":"u-1"}"#);
    user.set_display_name(Some("Maya"));

    let factory = changed_writer_factory();
    serialize_with(&factory, &user);
    assert!(!user.store.return_only_changed_values());

    // No baseline commit on serialize: the same change ships again.
    let second = serialize_with(&factory, &user);
    assert_eq!(second, serde_json::json!({"displayName": "Maya"}));
}

#[test]
fn explicit_null_round_trips_into_the_patch() {
    let user = hydrate(br#"{"id":"u-1","displayName":"Maya"}"#);
    user.set_display_name(None);

    let patch = serialize_with(&changed_writer_factory(), &user);
    assert_eq!(patch, serde_json::json!({"displayName": null}));
    assert_eq!(
        user.store.enumerate_keys_for_values_changed_to_null(),
        vec!["displayName".to_string()]
    );
}

#[test]
fn collection_growth_ships_the_whole_collection() {
    let user = hydrate(br#"{"id":"u-1","aliases":["maya"]}"#);

    let patch = serialize_with(&changed_writer_factory(), &user);
    assert_eq!(patch, serde_json::json!({}));

    if let Some(aliases) = user
        .store
        .get("aliases")
        .and_then(|value| value.as_collection().cloned())
    {
        aliases
            .write()
            .expect("collection lock")
            .push("mr".into());
    }

    let patch = serialize_with(&changed_writer_factory(), &user);
    assert_eq!(patch, serde_json::json!({"aliases": ["maya", "mr"]}));
}

#[test]
fn nested_model_change_surfaces_at_the_parent_key() {
    let user = hydrate(br#"{"id":"u-1","manager":{"id":"u-2","displayName":"Sam"}}"#);

    let patch = serialize_with(&changed_writer_factory(), &user);
    assert_eq!(patch, serde_json::json!({}));

    let manager = user
        .store
        .get("manager")
        .and_then(|value| value.as_model().cloned())
        .expect("manager is backed");
    manager.backing_store().set("displayName", "Samuel".into());

    let patch = serialize_with(&changed_writer_factory(), &user);
    assert_eq!(
        patch,
        serde_json::json!({"manager": {"displayName": "Samuel"}})
    );
}

#[test]
fn nested_hydration_initializes_child_stores_too() {
    let user = hydrate(br#"{"id":"u-1","manager":{"id":"u-2"}}"#);

    let manager = user
        .store
        .get("manager")
        .and_then(|value| value.as_model().cloned())
        .expect("manager is backed");
    assert!(manager.backing_store().initialization_completed());
    manager.backing_store().set_return_only_changed_values(true);
    assert!(manager.backing_store().enumerate().is_empty());
}

#[test]
fn activation_hooks_compose_with_caller_hooks() {
    let seen = Arc::new(Mutex::new(0usize));
    let counter = seen.clone();
    let counting: ParsableHook = Arc::new(move |_model| {
        *counter.lock().expect("counter lock") += 1;
    });

    // Stack an audit proxy over the store-aware factory; both concerns
    // must observe the same parse.
    let store_aware =
        enable_backing_store_for_parse_node_factory(Arc::new(JsonParseNodeFactory));
    let audited = patchwire::ParseNodeProxyFactory::new(store_aware, Some(counting), None);

    let node = audited
        .get_root_parse_node("application/json", br#"{"id":"u-1"}"#)
        .expect("payload parses");
    let model = node
        .get_object_value(User::create_from_node)
        .expect("model materializes");
    let user = model.into_any().downcast::<User>().expect("user model");

    assert_eq!(*seen.lock().expect("counter lock"), 1);
    assert!(user.store.initialization_completed());
    user.store.set_return_only_changed_values(true);
    assert!(user.store.enumerate().is_empty());
}
