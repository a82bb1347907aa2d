//! Full CRUD walk over the web engine — the external wire contract.

use std::time::Duration;

use rumormill::app::RumorRegistry;
use rumormill::web::{Method, handle};

use crate::mock_hw::MemStore;

const TIMEOUT: Duration = Duration::from_millis(200);

fn registry() -> RumorRegistry<MemStore> {
    RumorRegistry::new(MemStore::new(), Vec::new(), TIMEOUT, 5)
}

fn body(json: &serde_json::Value) -> String {
    json.to_string()
}

const CREATE_A: &str =
    r#"{"title":"A","text_nl":"hallo","text_en":"hello","people":"Alice, Bob","active":true}"#;

#[test]
fn create_list_update_delete_walk() {
    let reg = registry();

    // Create → 201 with the assigned id and defaulted quota.
    let resp = handle(&reg, Method::Post, "/api/rumors", None, CREATE_A.as_bytes());
    assert_eq!(resp.status, 201);
    let created: serde_json::Value = serde_json::from_str(resp.body.as_deref().unwrap()).unwrap();
    assert_eq!(created["id"], 1);
    assert_eq!(created["max_prints"], 5);
    assert_eq!(created["printed_count"], 0);

    // List → 200 array of one.
    let resp = handle(&reg, Method::Get, "/api/rumors", None, b"");
    assert_eq!(resp.status, 200);
    let listed: Vec<serde_json::Value> =
        serde_json::from_str(resp.body.as_deref().unwrap()).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "A");

    // Update → 200 with merged fields.
    let patch = body(&serde_json::json!({ "active": false, "title": "A2" }));
    let resp = handle(&reg, Method::Put, "/api/rumors/1", None, patch.as_bytes());
    assert_eq!(resp.status, 200);
    let updated: serde_json::Value = serde_json::from_str(resp.body.as_deref().unwrap()).unwrap();
    assert_eq!(updated["title"], "A2");
    assert_eq!(updated["active"], false);
    assert_eq!(updated["text_nl"], "hallo");

    // Delete → 204 empty, then 404.
    let resp = handle(&reg, Method::Delete, "/api/rumors/1", None, b"");
    assert_eq!(resp.status, 204);
    assert_eq!(resp.body, None);
    let resp = handle(&reg, Method::Delete, "/api/rumors/1", None, b"");
    assert_eq!(resp.status, 404);
}

#[test]
fn list_filter_matches_per_tag_case_insensitive() {
    let reg = registry();
    handle(&reg, Method::Post, "/api/rumors", None, CREATE_A.as_bytes());
    let other = r#"{"title":"B","text_nl":"x","text_en":"y","people":"Carol","active":true}"#;
    handle(&reg, Method::Post, "/api/rumors", None, other.as_bytes());

    let resp = handle(&reg, Method::Get, "/api/rumors", Some("name=bob"), b"");
    let listed: Vec<serde_json::Value> =
        serde_json::from_str(resp.body.as_deref().unwrap()).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "A");

    // Percent-encoded needle decodes before matching.
    let resp = handle(&reg, Method::Get, "/api/rumors", Some("name=CAR%4FL"), b"");
    let listed: Vec<serde_json::Value> =
        serde_json::from_str(resp.body.as_deref().unwrap()).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "B");

    let resp = handle(&reg, Method::Get, "/api/rumors", Some("name=dave"), b"");
    let listed: Vec<serde_json::Value> =
        serde_json::from_str(resp.body.as_deref().unwrap()).unwrap();
    assert!(listed.is_empty());
}

#[test]
fn create_rejects_partial_and_malformed_bodies() {
    let reg = registry();

    let resp = handle(&reg, Method::Post, "/api/rumors", None, b"{\"title\":\"A\"}");
    assert_eq!(resp.status, 400);
    assert!(resp.body.unwrap().contains("missing fields"));

    let resp = handle(&reg, Method::Post, "/api/rumors", None, b"{not json");
    assert_eq!(resp.status, 400);
    assert!(resp.body.unwrap().contains("invalid json"));

    // Nothing half-created.
    let resp = handle(&reg, Method::Get, "/api/rumors", None, b"");
    assert_eq!(resp.body.as_deref(), Some("[]"));
}

#[test]
fn update_unknown_id_is_not_found() {
    let reg = registry();
    let resp = handle(&reg, Method::Put, "/api/rumors/42", None, b"{}");
    assert_eq!(resp.status, 404);
}

#[test]
fn reset_routes() {
    let reg = registry();
    handle(&reg, Method::Post, "/api/rumors", None, CREATE_A.as_bytes());
    reg.select_eligible().unwrap().unwrap();

    let resp = handle(&reg, Method::Post, "/api/rumors/1/reset", None, b"");
    assert_eq!(resp.status, 204);
    assert_eq!(reg.list(None).unwrap()[0].printed_count, 0);

    reg.select_eligible().unwrap().unwrap();
    let resp = handle(&reg, Method::Post, "/api/rumors/resetAll", None, b"");
    assert_eq!(resp.status, 204);
    assert_eq!(reg.list(None).unwrap()[0].printed_count, 0);

    let resp = handle(&reg, Method::Post, "/api/rumors/9/reset", None, b"");
    assert_eq!(resp.status, 404);
}

#[test]
fn unknown_routes_and_bad_ids_are_not_found() {
    let reg = registry();
    assert_eq!(handle(&reg, Method::Get, "/api/unknown", None, b"").status, 404);
    assert_eq!(handle(&reg, Method::Put, "/api/rumors/abc", None, b"{}").status, 404);
    assert_eq!(handle(&reg, Method::Delete, "/api/rumors", None, b"").status, 404);
    assert_eq!(
        handle(&reg, Method::Post, "/api/rumors/1/unknown", None, b"").status,
        404
    );
}

#[test]
fn busy_registry_maps_to_service_unavailable() {
    struct SlowStore;
    impl rumormill::app::ports::SnapshotStore for SlowStore {
        fn save(
            &self,
            _rumors: &[rumormill::app::Rumor],
        ) -> Result<(), rumormill::error::StorageError> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(())
        }
        fn load(&self) -> Result<Vec<rumormill::app::Rumor>, rumormill::error::StorageError> {
            Ok(Vec::new())
        }
    }

    let reg = RumorRegistry::new(SlowStore, Vec::new(), Duration::from_millis(60), 5);
    std::thread::scope(|s| {
        let writer = s.spawn(|| {
            handle(&reg, Method::Post, "/api/rumors", None, CREATE_A.as_bytes())
        });
        std::thread::sleep(Duration::from_millis(50));

        let resp = handle(&reg, Method::Get, "/api/rumors", None, b"");
        assert_eq!(resp.status, 503);
        assert!(resp.body.unwrap().contains("busy"));

        assert_eq!(writer.join().unwrap().status, 201);
    });
}
