// Integration tests for bridge discovery and the pairing handshake.
#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hue_api::{Error, discovery, pairing};

// ── Discovery ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_discover_returns_candidates_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "001788fffe001122", "internalipaddress": "192.168.1.5" },
            { "internalipaddress": "192.168.1.6" },
        ])))
        .mount(&server)
        .await;

    let bridges = discovery::discover_at(&reqwest::Client::new(), &server.uri())
        .await
        .unwrap();

    assert_eq!(bridges.len(), 2);
    assert_eq!(bridges[0].internal_ip_address, "192.168.1.5");
    assert_eq!(bridges[0].id.as_deref(), Some("001788fffe001122"));
    assert_eq!(bridges[1].internal_ip_address, "192.168.1.6");
}

#[tokio::test]
async fn test_discover_non_200_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = discovery::discover_at(&reqwest::Client::new(), &server.uri()).await;

    match result {
        Err(Error::Discovery { status }) => assert_eq!(status, 503),
        other => panic!("expected Discovery error, got: {other:?}"),
    }
}

// ── Pairing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_pair_success_extracts_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_json(json!({
            "devicetype": "huectl#rust",
            "generateclientkey": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "success": { "username": "abc123", "clientkey": "FFEE00" } }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let control_url = format!("{}/api", server.uri()).parse().unwrap();
    let cred = pairing::pair(&reqwest::Client::new(), &control_url, "huectl#rust")
        .await
        .unwrap();

    assert_eq!(cred.username, "abc123");
    assert_eq!(cred.client_key, "FFEE00");
}

#[tokio::test]
async fn test_pair_type_101_is_link_button_not_pressed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "error": { "type": 101, "address": "", "description": "link button not pressed" } }
        ])))
        .mount(&server)
        .await;

    let control_url = format!("{}/api", server.uri()).parse().unwrap();
    let result = pairing::pair(&reqwest::Client::new(), &control_url, "huectl#rust").await;

    let err = result.unwrap_err();
    assert!(err.needs_link_button());
    assert!(matches!(err, Error::LinkButtonNotPressed));
}

#[tokio::test]
async fn test_pair_other_error_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "error": { "type": 7, "description": "invalid value" } }
        ])))
        .mount(&server)
        .await;

    let control_url = format!("{}/api", server.uri()).parse().unwrap();
    let result = pairing::pair(&reqwest::Client::new(), &control_url, "huectl#rust").await;

    match result {
        Err(Error::PairingRejected {
            type_code,
            ref description,
        }) => {
            assert_eq!(type_code, 7);
            assert_eq!(description, "invalid value");
        }
        other => panic!("expected PairingRejected, got: {other:?}"),
    }
}
