#![allow(clippy::unwrap_used)]

use chrono::Utc;
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hue_api::ClipClient;
use hue_core::{CollectionKind, RefreshFlags, ResourceCache};

fn clip_for(server: &MockServer) -> ClipClient {
    let mut clip = ClipClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
    );
    clip.set_application_key("test-user");
    clip
}

fn resource(id: &str, name: &str) -> serde_json::Value {
    json!({ "id": id, "metadata": { "name": name } })
}

fn ok_data(items: Vec<serde_json::Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "errors": [], "data": items }))
}

fn seed_cache(dir: &std::path::Path, value: &serde_json::Value) {
    std::fs::write(dir.join("cache.json"), value.to_string()).unwrap();
}

#[tokio::test]
async fn scheduled_refresh_on_fresh_cache_issues_no_requests() {
    let server = MockServer::start().await;
    // Any request at all is a failure here.
    Mock::given(method("GET"))
        .respond_with(ok_data(vec![]))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let fresh = Utc::now().timestamp();
    seed_cache(
        dir.path(),
        &json!({ "last_updated": fresh, "lights": [resource("l1", "Desk")] }),
    );

    let mut cache = ResourceCache::in_dir(dir.path()).unwrap();
    let clip = clip_for(&server);
    cache
        .refresh(&clip, RefreshFlags::all(), false, true)
        .await
        .unwrap();

    assert_eq!(cache.last_updated(), fresh);
    assert_eq!(cache.snapshot().lights.len(), 1);
}

#[tokio::test]
async fn wipe_discards_snapshot_and_forces_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resource/device"))
        .respond_with(ok_data(vec![
            resource("bridge", "Bridge"),
            resource("l1", "Desk"),
        ]))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    // Fresh snapshot with stale content in every slot; the wipe must win
    // over the staleness throttle.
    seed_cache(
        dir.path(),
        &json!({
            "last_updated": Utc::now().timestamp(),
            "lights": [resource("old", "Old")],
            "rooms": [resource("old-room", "Old Room")],
            "scenes": [resource("old-scene", "Old Scene")]
        }),
    );

    let mut cache = ResourceCache::in_dir(dir.path()).unwrap();
    let clip = clip_for(&server);
    let flags = RefreshFlags {
        device: true,
        ..RefreshFlags::default()
    };
    cache.refresh(&clip, flags, true, true).await.unwrap();

    let snap = cache.snapshot();
    assert_eq!(snap.device.as_ref().unwrap().id, "bridge");
    assert_eq!(snap.lights.len(), 1);
    assert_eq!(snap.lights[0].id, "l1");
    // Only the device category was requested; the rest of the wiped
    // snapshot stays empty until the window elapses again.
    assert!(snap.rooms.is_empty());
    assert!(snap.scenes.is_empty());
    assert!(snap.last_updated > 0);
}

#[tokio::test]
async fn device_endpoint_splits_bridge_record_from_lights() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resource/device"))
        .and(header("hue-application-key", "test-user"))
        .respond_with(ok_data(vec![
            resource("bridge", "Bridge"),
            resource("l1", "Desk"),
            resource("l2", "Shelf"),
        ]))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cache = ResourceCache::in_dir(dir.path()).unwrap();
    let clip = clip_for(&server);

    let device = cache.device(&clip, true).await.unwrap();
    assert_eq!(device.id, "bridge");

    let snap = cache.snapshot();
    assert_eq!(snap.lights.len(), 2);
    assert_eq!(snap.lights[0].id, "l1");
    assert_eq!(snap.lights[1].id, "l2");
}

#[tokio::test]
async fn collection_hit_skips_network_and_miss_fetches_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resource/room"))
        .respond_with(ok_data(vec![resource("r1", "Office")]))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cache = ResourceCache::in_dir(dir.path()).unwrap();
    let clip = clip_for(&server);

    // Miss: fetches and fills the slot.
    let rooms = cache
        .collection(&clip, CollectionKind::Rooms, true)
        .await;
    assert_eq!(rooms.len(), 1);

    // Hit: served from the slot; the expect(1) above enforces no second
    // network call.
    let rooms = cache
        .collection(&clip, CollectionKind::Rooms, true)
        .await;
    assert_eq!(rooms[0].id, "r1");
}

#[tokio::test]
async fn collection_reads_never_query_the_device_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resource/device"))
        .respond_with(ok_data(vec![]))
        .expect(0)
        .mount(&server)
        .await;
    for (p, id) in [
        ("/resource/light", "l1"),
        ("/resource/room", "r1"),
        ("/resource/scene", "s1"),
    ] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(ok_data(vec![resource(id, id)]))
            .expect(1)
            .mount(&server)
            .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let mut cache = ResourceCache::in_dir(dir.path()).unwrap();
    let clip = clip_for(&server);

    let lights = cache.collection(&clip, CollectionKind::Lights, false).await;
    let rooms = cache.collection(&clip, CollectionKind::Rooms, false).await;
    let scenes = cache.collection(&clip, CollectionKind::Scenes, false).await;

    assert_eq!(lights[0].id, "l1");
    assert_eq!(rooms[0].id, "r1");
    assert_eq!(scenes[0].id, "s1");
    // The device slot is reachable only through `device()`.
    assert!(cache.snapshot().device.is_none());
}

#[tokio::test]
async fn failed_fetch_yields_empty_and_leaves_slot_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resource/light"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "description": "internal error" }],
            "data": []
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    seed_cache(
        dir.path(),
        &json!({ "last_updated": 1, "lights": [resource("l1", "Desk")] }),
    );

    let mut cache = ResourceCache::in_dir(dir.path()).unwrap();
    let clip = clip_for(&server);

    let lights = cache
        .collection(&clip, CollectionKind::Lights, false)
        .await;
    assert!(lights.is_empty());
    assert_eq!(cache.snapshot().lights.len(), 1);
    assert_eq!(cache.snapshot().lights[0].id, "l1");
}

#[tokio::test]
async fn refresh_persists_snapshot_across_reopens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resource/device"))
        .respond_with(ok_data(vec![
            resource("bridge", "Bridge"),
            resource("l1", "Desk"),
        ]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/resource/room"))
        .respond_with(ok_data(vec![resource("r1", "Office")]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/resource/scene"))
        .respond_with(ok_data(vec![resource("s1", "Relax")]))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let clip = clip_for(&server);
    {
        let mut cache = ResourceCache::in_dir(dir.path()).unwrap();
        cache
            .refresh(&clip, RefreshFlags::all(), false, false)
            .await
            .unwrap();
    }

    let reopened = ResourceCache::in_dir(dir.path()).unwrap();
    let snap = reopened.snapshot();
    assert_eq!(snap.device.as_ref().unwrap().id, "bridge");
    assert_eq!(snap.lights.len(), 1);
    assert_eq!(snap.rooms.len(), 1);
    assert_eq!(snap.scenes.len(), 1);
    assert!(snap.last_updated > 0);
}

#[test]
fn malformed_cache_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cache.json"), "{ nope").unwrap();

    match ResourceCache::in_dir(dir.path()) {
        Err(hue_core::CoreError::ConfigCorrupt { .. }) => {}
        other => panic!("expected ConfigCorrupt, got: {:?}", other.map(|_| ())),
    }
}
