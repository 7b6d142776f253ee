#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use calendar_api::authn::{IdentityConfig, StaticAuthnConfig, TokenMapping};
use calendar_api::domain::model::NewUser;
use calendar_api::{
    ApiState, AppServices, ServiceConfig, StaticTokenResolver, create_tables, router,
};
use calendar_authz::AccessPolicyConfig;
use calendar_security::constants::{ROLE_ADMIN, ROLE_USER};
use calendar_security::{Principal, SecurityContext};
use http::{Request, StatusCode, header};
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tower::ServiceExt;

const ALICE: &str = "alice-token";
const BOB: &str = "bob-token";

fn mapping(token: &str, user_id: i64, username: &str, roles: &[&str]) -> TokenMapping {
    TokenMapping {
        token: token.into(),
        identity: IdentityConfig {
            user_id,
            username: username.to_owned(),
            roles: roles.iter().map(|r| (*r).to_owned()).collect(),
        },
    }
}

async fn app(policy: AccessPolicyConfig) -> Router {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1);
    let db = Database::connect(opts).await.unwrap();
    create_tables(&db).await.unwrap();

    let services = AppServices::new(db, Arc::new(policy), ServiceConfig::default());
    let system = SecurityContext::for_principal(Principal::new(
        0,
        "system",
        vec![ROLE_ADMIN.to_owned()],
    ));
    for (id, name) in [(1, "alice"), (2, "bob")] {
        services
            .users
            .provision(
                &system,
                NewUser {
                    id: Some(id),
                    email: format!("{name}@example.com"),
                    username: name.to_owned(),
                    roles: vec![ROLE_USER.to_owned()],
                },
            )
            .await
            .unwrap();
    }

    let resolver = StaticTokenResolver::from_config(&StaticAuthnConfig {
        tokens: vec![
            mapping(ALICE, 1, "alice", &[ROLE_USER]),
            mapping(BOB, 2, "bob", &[ROLE_USER]),
        ],
    });
    router(ApiState {
        services: Arc::new(services),
        resolver: Arc::new(resolver),
    })
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, http::HeaderMap, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(v) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, value)
}

async fn create_calendar(app: &Router, token: &str, title: &str) -> i64 {
    let (status, headers, body) = call(
        app,
        "POST",
        "/api/v1/calendars",
        Some(token),
        Some(json!({ "title": title })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["id"].as_i64().unwrap();
    assert_eq!(
        headers.get(header::LOCATION).unwrap(),
        format!("/api/v1/calendars/{id}").as_str()
    );
    id
}

#[tokio::test]
async fn health_is_public() {
    let app = app(AccessPolicyConfig::default()).await;
    let (status, _, body) = call(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn anonymous_collection_read_is_unauthorized() {
    let app = app(AccessPolicyConfig::default()).await;
    let (status, headers, body) = call(&app, "GET", "/api/v1/calendars", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let app = app(AccessPolicyConfig::default()).await;
    let (status, _, _) = call(&app, "GET", "/api/v1/calendars", Some("nope"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn calendars_are_scoped_to_owner() {
    let app = app(AccessPolicyConfig::default()).await;
    create_calendar(&app, ALICE, "Work").await;
    create_calendar(&app, ALICE, "Home").await;
    let bobs = create_calendar(&app, BOB, "Gym").await;

    let (status, headers, body) = call(&app, "GET", "/api/v1/calendars", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("x-total-count").unwrap(), "2");
    assert_eq!(headers.get("x-total-pages").unwrap(), "1");
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Work", "Home"]);

    let uri = format!("/api/v1/calendars/{bobs}");
    let (status, _, body) = call(&app, "GET", &uri, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["title"], "Not Found");

    let (status, _, _) = call(&app, "DELETE", &uri, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = call(&app, "DELETE", &uri, Some(BOB), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn public_access_mode_serves_anonymous_reads() {
    let app = app(AccessPolicyConfig::public_access()).await;
    create_calendar(&app, ALICE, "Work").await;
    create_calendar(&app, BOB, "Gym").await;

    let (status, headers, _) = call(&app, "GET", "/api/v1/calendars", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("x-total-count").unwrap(), "2");
}

#[tokio::test]
async fn public_access_mode_rejects_anonymous_writes() {
    let app = app(AccessPolicyConfig::public_access()).await;
    let id = create_calendar(&app, ALICE, "Work").await;
    let uri = format!("/api/v1/calendars/{id}");

    let patch = json!({ "title": "Renamed" });
    let (status, headers, _) = call(&app, "PATCH", &uri, None, Some(patch)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );

    let (status, _, _) = call(&app, "DELETE", &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, body) = call(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Work");
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() {
    let app = app(AccessPolicyConfig::default()).await;
    create_calendar(&app, ALICE, "Work").await;

    let uri = format!("/api/v1/calendars?page={}", u64::MAX);
    let (status, headers, body) = call(&app, "GET", &uri, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(headers.get("x-total-count").unwrap(), "1");
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn event_lifecycle() {
    let app = app(AccessPolicyConfig::default()).await;
    let cal = create_calendar(&app, ALICE, "Work").await;

    let (status, _, body) = call(
        &app,
        "POST",
        "/api/v1/events",
        Some(ALICE),
        Some(json!({
            "calendar_id": cal,
            "title": "Standup",
            "starts_at": "2026-03-02T09:00:00Z",
            "ends_at": "2026-03-02T09:15:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["owner_id"], 1);

    let uri = format!("/api/v1/events/{id}");
    let (status, _, body) = call(
        &app,
        "PATCH",
        &uri,
        Some(ALICE),
        Some(json!({ "location": "Room 4" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "Room 4");

    let (status, _, _) = call(&app, "GET", &uri, Some(BOB), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = call(
        &app,
        "GET",
        &format!("/api/v1/events?calendar_id={cal}&from=2026-03-02T09:10:00Z"),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_event_range_is_unprocessable() {
    let app = app(AccessPolicyConfig::default()).await;
    let cal = create_calendar(&app, ALICE, "Work").await;

    let (status, headers, body) = call(
        &app,
        "POST",
        "/api/v1/events",
        Some(ALICE),
        Some(json!({
            "calendar_id": cal,
            "title": "Backwards",
            "starts_at": "2026-03-02T10:00:00Z",
            "ends_at": "2026-03-02T09:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    assert!(body["detail"].as_str().unwrap().contains("ends_at"));
}

#[tokio::test]
async fn users_act_only_on_themselves() {
    let app = app(AccessPolicyConfig::default()).await;

    let (status, _, body) = call(&app, "GET", "/api/v1/me", Some(BOB), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "bob");

    let (status, _, _) = call(&app, "GET", "/api/v1/users/1", Some(BOB), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = call(
        &app,
        "PATCH",
        "/api/v1/users/2",
        Some(BOB),
        Some(json!({ "username": "robert" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "robert");

    let (status, _, _) = call(
        &app,
        "PATCH",
        "/api/v1/users/2",
        Some(BOB),
        Some(json!({ "email": "alice@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = call(&app, "GET", "/api/v1/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn calendar_images_link_owned_rows() {
    let app = app(AccessPolicyConfig::default()).await;
    let cal = create_calendar(&app, ALICE, "Work").await;
    let (status, _, image) = call(
        &app,
        "POST",
        "/api/v1/images",
        Some(ALICE),
        Some(json!({ "file_name": "cover.jpg", "mime_type": "image/jpeg", "size_bytes": 2048 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let image_id = image["id"].as_i64().unwrap();

    let (status, _, _) = call(
        &app,
        "POST",
        "/api/v1/calendar-images",
        Some(BOB),
        Some(json!({ "calendar_id": cal, "image_id": image_id })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _, placed) = call(
        &app,
        "POST",
        "/api/v1/calendar-images",
        Some(ALICE),
        Some(json!({ "calendar_id": cal, "image_id": image_id, "position": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, headers, _) = call(
        &app,
        "GET",
        &format!("/api/v1/calendar-images?calendar_id={cal}"),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("x-total-count").unwrap(), "1");

    let uri = format!("/api/v1/calendar-images/{}", placed["id"]);
    let (status, _, _) = call(&app, "DELETE", &uri, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
