#![allow(clippy::unwrap_used)]
// Integration tests for `ParkClient` using wiremock.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parkvision_api::types::{BulkSpotUpdate, LotCreate, LotUpdate, SpotStatusUpdate, UserUpdate};
use parkvision_api::{Error, ParkClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ParkClient) {
    let server = MockServer::start().await;
    let token = SecretString::from("tok-123".to_string());
    let client = ParkClient::new(&server.uri(), Some(&token), &TransportConfig::default()).unwrap();
    (server, client)
}

fn lot_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "address": "1 Main St",
        "total_spaces": 40,
        "description": null,
        "created_at": "2025-03-01T10:00:00",
        "updated_at": "2025-03-01T10:00:00"
    })
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_token() {
    let server = MockServer::start().await;
    let client = ParkClient::with_client(&server.uri(), reqwest::Client::new()).unwrap();

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"username": "admin", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc",
            "token_type": "bearer",
            "id": 1,
            "username": "admin",
            "is_admin": true
        })))
        .mount(&server)
        .await;

    let session = client
        .login("admin", &SecretString::from("hunter2".to_string()))
        .await
        .unwrap();

    assert_eq!(session.token.expose_secret(), "abc");
    assert_eq!(session.username.as_deref(), Some("admin"));
    assert_eq!(session.is_admin, Some(true));
}

#[tokio::test]
async fn test_login_without_token_is_auth_error() {
    let server = MockServer::start().await;
    let client = ParkClient::with_client(&server.uri(), reqwest::Client::new()).unwrap();

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 1, "username": "admin"})),
        )
        .mount(&server)
        .await;

    let result = client
        .login("admin", &SecretString::from("pw".to_string()))
        .await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    let client = ParkClient::with_client(&server.uri(), reqwest::Client::new()).unwrap();

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Invalid username or password"})),
        )
        .mount(&server)
        .await;

    let result = client
        .login("admin", &SecretString::from("wrong".to_string()))
        .await;
    match result {
        Err(Error::Authentication { message }) => {
            assert!(message.contains("invalid username"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/lots/"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let lots = client.list_lots().await.unwrap();
    assert!(lots.is_empty());
}

// ── Lots ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_lots() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/lots/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([lot_json(1, "North"), lot_json(2, "South")])),
        )
        .mount(&server)
        .await;

    let lots = client.list_lots().await.unwrap();
    assert_eq!(lots.len(), 2);
    assert_eq!(lots[0].name, "North");
    assert_eq!(lots[1].total_spaces, 40);
}

#[tokio::test]
async fn test_create_lot_sends_only_set_fields() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/lots/"))
        .and(body_json(json!({"name": "Garage", "total_spaces": 12})))
        .respond_with(ResponseTemplate::new(201).set_body_json(lot_json(9, "Garage")))
        .mount(&server)
        .await;

    let lot = client
        .create_lot(&LotCreate {
            name: "Garage".into(),
            address: None,
            total_spaces: 12,
            description: None,
            init_frame_path: None,
            video_path: None,
            video_start_time: None,
        })
        .await
        .unwrap();
    assert_eq!(lot.id, 9);
}

#[tokio::test]
async fn test_update_lot() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/lots/3"))
        .and(body_json(json!({"description": "covered"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(lot_json(3, "East")))
        .mount(&server)
        .await;

    let update = LotUpdate {
        description: Some("covered".into()),
        ..LotUpdate::default()
    };
    let lot = client.update_lot(3, &update).await.unwrap();
    assert_eq!(lot.name, "East");
}

#[tokio::test]
async fn test_delete_lot_no_content() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/lots/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_lot(3).await.unwrap();
}

#[tokio::test]
async fn test_get_missing_lot_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/lots/404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Parking lot not found"})),
        )
        .mount(&server)
        .await;

    let err = client.get_lot(404).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Not found: Parking lot not found");
}

#[tokio::test]
async fn test_lot_status_summary() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/lots/1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lot_id": 1,
            "summary": {"11": "occupied", "12": "vacant", "13": null}
        })))
        .mount(&server)
        .await;

    let status = client.lot_status(1).await.unwrap();
    assert_eq!(status.lot_id, Some(1));
    assert_eq!(status.summary.len(), 3);
    assert_eq!(status.summary["11"], json!("occupied"));
}

#[tokio::test]
async fn test_list_spots_wrapped() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/lots/1/spots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lot_id": 1,
            "spots": [
                {"id": 11, "spot_number": "A1", "last_status": "occupied"},
                {"id": 12, "spot_number": "A2", "current_status": "vacant"}
            ]
        })))
        .mount(&server)
        .await;

    let spots = client.list_spots(1).await.unwrap();
    assert_eq!(spots.len(), 2);
    assert_eq!(spots[0].last_status.as_deref(), Some("occupied"));
    assert_eq!(spots[1].spot_number.as_deref(), Some("A2"));
}

#[tokio::test]
async fn test_bulk_update_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/lots/1/bulk_update"))
        .and(body_json(json!({"updates": [{"spot_id": 11, "status": "vacant"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updated": 1})))
        .mount(&server)
        .await;

    let resp = client
        .bulk_update_spots(
            1,
            vec![BulkSpotUpdate {
                spot_id: 11,
                status: "vacant".into(),
                meta: None,
            }],
        )
        .await
        .unwrap();
    assert_eq!(resp["updated"], 1);
}

// ── Spots ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_spot() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/lots/1/spots/11/update"))
        .and(body_json(json!({"status": "reserved"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"spot_id": 11, "status": "reserved"})),
        )
        .mount(&server)
        .await;

    let resp = client
        .update_spot(
            1,
            11,
            &SpotStatusUpdate {
                status: "reserved".into(),
                meta: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(resp.spot_id, Some(11));
    assert_eq!(resp.status.as_deref(), Some("reserved"));
}

// ── Users ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_user_includes_password_only_when_given() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/auth/users/4"))
        .and(body_json(json!({"email": "new@example.com", "password": "s3cret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "username": "ops", "email": "new@example.com", "is_admin": false
        })))
        .mount(&server)
        .await;

    let update = UserUpdate {
        username: None,
        email: Some("new@example.com".into()),
    };
    let user = client
        .update_user(4, &update, Some(&SecretString::from("s3cret".to_string())))
        .await
        .unwrap();
    assert_eq!(user.email, "new@example.com");
}

#[tokio::test]
async fn test_conflict_detail_is_surfaced() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Username already exists"})),
        )
        .mount(&server)
        .await;

    let err = client
        .register("ops", "ops@example.com", &SecretString::from("pw".to_string()))
        .await
        .unwrap_err();
    match err {
        Error::Api { status, detail } => {
            assert_eq!(status, 400);
            assert_eq!(detail, "Username already exists");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_expired_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.list_users().await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized), "got: {err:?}");
    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/lots/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.list_lots().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert!(body.contains("oops")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
