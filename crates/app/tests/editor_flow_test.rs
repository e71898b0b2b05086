//! End-to-end editing flows over the real adapters.
//!
//! These tests open editors against the in-memory store, save resources,
//! and round-trip the store through the snapshot file.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

use scopebind_application::ports::{SharedStore, SnapshotRepository};
use scopebind_application::{FieldBinding, ResourceEditor};
use scopebind_domain::{
    DraftField, EditorSettings, InstanceSelector, ResourceHeader, ResourceMethod,
    StoreSnapshot, Variable, VariableValue, VariableValues, string_literal,
};
use scopebind_infrastructure::{FileSnapshotRepository, InMemoryStore, UuidIdGenerator};

type Editor = ResourceEditor<InMemoryStore, UuidIdGenerator>;

fn open(store: &Arc<InMemoryStore>, variable_id: Option<&str>) -> Editor {
    ResourceEditor::open(
        Arc::clone(store),
        Arc::new(UuidIdGenerator::new()),
        EditorSettings::default(),
        variable_id,
    )
    .expect("editor should open")
}

fn inst_a() -> InstanceSelector {
    InstanceSelector::new(["instA"]).unwrap()
}

#[test]
fn test_create_resource() {
    let store = Arc::new(InMemoryStore::new());
    store.select(Some(inst_a()));

    let mut editor = open(&store, None);
    editor.set_field(DraftField::Name("users".into()));
    editor.set_field(DraftField::Url("\"https://api.example.com\"".into()));
    let committed = editor.save().unwrap().expect("an instance is selected");

    assert_eq!(store.version(), 1);
    assert_eq!(committed.resource.url, "\"https://api.example.com\"");
    assert_eq!(committed.resource.method, ResourceMethod::Get);
    assert!(committed.resource.headers.is_empty());
    assert!(committed.variable.is_resource());
    assert_eq!(committed.variable.scope_instance_id, "instA");
    assert_eq!(committed.variable.resource_id(), Some(committed.resource.id.as_str()));

    let resources = store.resources();
    let declarations = store.data_sources();
    assert_eq!(resources.get(&committed.resource.id), Some(&committed.resource));
    assert_eq!(declarations.get(&committed.variable.id), Some(&committed.variable));
}

#[test]
fn test_save_without_selection_is_noop() {
    let store = Arc::new(InMemoryStore::new());
    let mut editor = open(&store, None);
    editor.set_field(DraftField::Url(string_literal("https://api.example.com")));

    assert!(editor.save().unwrap().is_none());
    assert_eq!(store.version(), 0);
    assert!(store.resources().is_empty());
    assert!(store.data_sources().is_empty());
}

#[test]
fn test_body_survives_method_round_trip() {
    let store = Arc::new(InMemoryStore::new());
    store.select(Some(inst_a()));

    let mut editor = open(&store, None);
    editor.set_field(DraftField::Method(ResourceMethod::Post));
    editor.set_field(DraftField::Body("{\"page\": 1}".into()));
    let created = editor.save().unwrap().unwrap();
    editor.close();

    let mut editor = open(&store, Some(&created.variable.id));
    editor.set_field(DraftField::Method(ResourceMethod::Get));
    assert_eq!(editor.bind_body(), None);
    editor.set_field(DraftField::Method(ResourceMethod::Post));
    assert_eq!(
        editor.bind_body(),
        Some(FieldBinding::Expression {
            expression: "{\"page\": 1}".into(),
            value: json!({"page": 1}),
        })
    );
    editor.set_field(DraftField::Method(ResourceMethod::Get));
    let updated = editor.save().unwrap().unwrap();

    assert_eq!(updated.variable.id, created.variable.id);
    assert_eq!(updated.resource.id, created.resource.id);
    assert_eq!(updated.resource.method, ResourceMethod::Get);
    assert_eq!(updated.resource.body, "{\"page\": 1}");
    assert_eq!(store.resources().len(), 1);
    assert_eq!(store.data_sources().len(), 1);
}

#[test]
fn test_header_editing() {
    let store = Arc::new(InMemoryStore::new());
    let mut editor = open(&store, None);

    editor.add_header();
    assert_eq!(editor.draft().headers, vec![ResourceHeader::new("", "\"\"")]);
    editor.remove_header(0).unwrap();
    assert!(editor.draft().headers.is_empty());

    editor.add_header();
    editor.add_header();
    editor.set_header(0, "x-trace", string_literal("a")).unwrap();
    editor.set_header(1, "x-trace", string_literal("b")).unwrap();
    let once = editor.draft().clone();
    editor.set_header(1, "x-trace", string_literal("b")).unwrap();
    assert_eq!(editor.draft(), &once);

    assert!(editor.set_header(2, "x", "\"y\"").is_err());
    assert_eq!(editor.draft(), &once);
}

#[test]
fn test_expressions_resolve_against_live_values() {
    let store = Arc::new(InMemoryStore::from_snapshot(StoreSnapshot {
        data_sources: [
            (
                "host-1".to_string(),
                Variable::with_value("host-1", "host", "instA", VariableValue::String(String::new())),
            ),
            ("other".to_string(), Variable::resource("other", "other", "instA", "res-x")),
        ]
        .into_iter()
        .collect(),
        ..StoreSnapshot::default()
    }));
    store.select(Some(inst_a()));
    store.set_variable_values(
        &inst_a(),
        VariableValues::from([
            ("host-1".to_string(), json!("api.example.com")),
            ("other".to_string(), json!({"data": 1})),
        ]),
    );

    let mut editor = open(&store, None);
    let scope = editor.scope();
    assert_eq!(scope.len(), 1);
    assert_eq!(scope.alias("$ws$dataSource$host__DASH__1"), Some("host"));

    editor.set_field(DraftField::Url("`https://${$ws$dataSource$host__DASH__1}/v1`".into()));
    assert_eq!(
        editor.bind_url(),
        FieldBinding::Expression {
            expression: "`https://${$ws$dataSource$host__DASH__1}/v1`".into(),
            value: json!("https://api.example.com/v1"),
        }
    );
    assert_eq!(
        editor.label("`https://${$ws$dataSource$host__DASH__1}/v1`"),
        "`https://${host}/v1`"
    );

    editor.set_field(DraftField::Url("$ws$dataSource$other.data".into()));
    assert_eq!(editor.bind_url().value(), &json!("#error"));
}

#[tokio::test]
async fn test_snapshot_round_trip_keeps_ids() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("store.json");
    let repo = FileSnapshotRepository::new();

    let store = Arc::new(InMemoryStore::new());
    store.select(Some(inst_a()));
    let mut editor = open(&store, None);
    editor.set_field(DraftField::Name("users".into()));
    editor.add_header();
    editor
        .set_header(0, "authorization", "\"Bearer \" + $ws$dataSource$token")
        .unwrap();
    let created = editor.save().unwrap().unwrap();
    repo.save(&path, &store.snapshot()).await.unwrap();

    let reloaded = Arc::new(InMemoryStore::from_snapshot(repo.load(&path).await.unwrap()));
    assert_eq!(reloaded.snapshot(), store.snapshot());

    let mut editor = open(&reloaded, Some(&created.variable.id));
    assert!(editor.is_editing());
    assert_eq!(editor.draft().name, "users");
    assert_eq!(
        editor.bind_header(0),
        Some(FieldBinding::Expression {
            expression: "\"Bearer \" + $ws$dataSource$token".into(),
            value: json!("#error"),
        })
    );

    editor.set_field(DraftField::Url(string_literal("https://api.example.com/users")));
    let updated = editor.save().unwrap().unwrap();
    assert_eq!(updated.variable.id, created.variable.id);
    assert_eq!(updated.resource.id, created.resource.id);
    assert_eq!(updated.variable.scope_instance_id, "instA");
}
