//! Integration tests for the users resource service
//!
//! These tests run the service against an in-process axum server standing
//! in for the remote API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use common::client::{ApiClient, ApiConfig};
use common::error::ClientError;
use users::UsersService;
use users::models::{NewUser, UpdateUser};

type Hits = Arc<AtomicUsize>;

struct Stub {
    addr: SocketAddr,
    hits: Hits,
}

fn user_json(id: i64, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "username": name.to_lowercase(),
        "employ_code": 100 + id,
    })
}

async fn admin_users(State(hits): State<Hits>) -> Json<serde_json::Value> {
    hits.fetch_add(1, Ordering::SeqCst);
    Json(serde_json::json!({
        "message": "ok",
        "users": [user_json(1, "Alice"), user_json(2, "Bob")],
    }))
}

/// Echo the payload back the way the API would: a stored row with a fresh
/// id and no password.
async fn store_user(
    State(hits): State<Hits>,
    Json(body): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    hits.fetch_add(1, Ordering::SeqCst);
    Json(serde_json::json!({
        "id": 3,
        "name": body["name"],
        "email": body["email"],
        "username": body["username"],
        "employ_code": body["employ_code"],
    }))
}

async fn update_user(
    State(hits): State<Hits>,
    Path(id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    hits.fetch_add(1, Ordering::SeqCst);
    Json(serde_json::json!({
        "id": id,
        "name": body["name"],
        "email": body["email"],
        "username": body["username"],
        "employ_code": body["employ_code"],
    }))
}

async fn delete_user(State(hits): State<Hits>, Path(_id): Path<i64>) -> StatusCode {
    hits.fetch_add(1, Ordering::SeqCst);
    StatusCode::NO_CONTENT
}

async fn failing_store(State(hits): State<Hits>) -> (StatusCode, Json<serde_json::Value>) {
    hits.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({ "message": "The given data was invalid." })),
    )
}

async fn spawn(app: Router<Hits>) -> Stub {
    let hits: Hits = Arc::new(AtomicUsize::new(0));
    let app = app.with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub");
    });

    Stub { addr, hits }
}

async fn spawn_users_stub() -> Stub {
    spawn(
        Router::new()
            .route("/users/admin", get(admin_users))
            .route("/users/store", post(store_user))
            .route("/users/:id", patch(update_user).delete(delete_user)),
    )
    .await
}

fn service_for(addr: SocketAddr) -> UsersService {
    UsersService::new(ApiClient::new(&ApiConfig {
        base_url: format!("http://{addr}"),
    }))
}

fn new_user() -> NewUser {
    NewUser {
        name: "Carol".to_string(),
        email: "carol@example.com".to_string(),
        username: "carol".to_string(),
        password: "secret1".to_string(),
        employ_code: "103".to_string(),
    }
}

fn ids(service: &UsersService) -> Vec<i64> {
    service
        .snapshot()
        .data
        .iter()
        .map(|user| user.id)
        .collect()
}

#[tokio::test]
async fn load_replaces_the_cached_collection() -> Result<()> {
    let stub = spawn_users_stub().await;
    let service = service_for(stub.addr);
    assert!(!service.has_users());

    let users = service.load_users().await?;
    assert_eq!(users.len(), 2);
    assert_eq!(ids(&service), vec![1, 2]);

    // A second load does not accumulate.
    service.load_users().await?;
    assert_eq!(ids(&service), vec![1, 2]);
    assert!(service.has_users());

    Ok(())
}

#[tokio::test]
async fn create_prepends_the_new_user() -> Result<()> {
    let stub = spawn_users_stub().await;
    let service = service_for(stub.addr);
    service.load_users().await?;

    let created = service.create_user(&new_user()).await?;
    assert_eq!(created.id, 3);
    assert_eq!(created.employ_code, 103);

    assert_eq!(ids(&service), vec![3, 1, 2]);

    let snapshot = service.snapshot();
    assert!(!snapshot.is_submitting);
    assert_eq!(snapshot.error, None);

    Ok(())
}

#[tokio::test]
async fn create_trims_form_input_before_submission() -> Result<()> {
    let stub = spawn_users_stub().await;
    let service = service_for(stub.addr);

    let mut payload = new_user();
    payload.name = "  Carol  ".to_string();
    payload.employ_code = " 103 ".to_string();

    // The stub echoes the request body, so the response reflects what was
    // actually sent.
    let created = service.create_user(&payload).await?;
    assert_eq!(created.name, "Carol");
    assert_eq!(created.employ_code, 103);

    Ok(())
}

#[tokio::test]
async fn a_non_numeric_employ_code_never_reaches_the_network() {
    let stub = spawn_users_stub().await;
    let service = service_for(stub.addr);

    let mut payload = new_user();
    payload.employ_code = "abc".to_string();

    let error = service
        .create_user(&payload)
        .await
        .expect_err("code must be numeric");

    match error {
        ClientError::Validation(errors) => {
            assert_eq!(
                errors.field("employ_code"),
                Some("Employee code must be a number")
            );
        }
        other => panic!("expected validation errors, got {other:?}"),
    }
    assert_eq!(stub.hits.load(Ordering::SeqCst), 0);
    assert!(!service.snapshot().is_submitting);
}

#[tokio::test]
async fn update_replaces_the_row_in_place() -> Result<()> {
    let stub = spawn_users_stub().await;
    let service = service_for(stub.addr);
    service.load_users().await?;

    let payload = UpdateUser {
        name: "Bob Updated".to_string(),
        email: "bob@example.com".to_string(),
        username: "bob".to_string(),
        password: String::new(),
        employ_code: "102".to_string(),
    };

    let updated = service.update_user(2, &payload).await?;
    assert_eq!(updated.name, "Bob Updated");

    assert_eq!(ids(&service), vec![1, 2], "order is preserved");
    let snapshot = service.snapshot();
    assert_eq!(snapshot.data[1].name, "Bob Updated");
    assert_eq!(snapshot.data[0].name, "Alice");

    Ok(())
}

#[tokio::test]
async fn an_update_for_an_uncached_id_leaves_the_collection_alone() -> Result<()> {
    let stub = spawn_users_stub().await;
    let service = service_for(stub.addr);
    service.load_users().await?;

    let payload = UpdateUser {
        name: "Ghost".to_string(),
        email: "ghost@example.com".to_string(),
        username: "ghost".to_string(),
        password: String::new(),
        employ_code: "199".to_string(),
    };

    let updated = service.update_user(99, &payload).await?;
    assert_eq!(updated.id, 99, "the caller still receives the response");
    assert_eq!(ids(&service), vec![1, 2]);

    Ok(())
}

#[tokio::test]
async fn delete_drops_the_matching_row() -> Result<()> {
    let stub = spawn_users_stub().await;
    let service = service_for(stub.addr);
    service.load_users().await?;

    service.delete_user(1).await?;
    assert_eq!(ids(&service), vec![2]);

    Ok(())
}

#[tokio::test]
async fn a_rejected_create_stores_the_server_message() -> Result<()> {
    let stub = spawn(Router::new().route("/users/store", post(failing_store))).await;
    let service = service_for(stub.addr);

    let error = service
        .create_user(&new_user())
        .await
        .expect_err("stub answers 422");
    assert!(matches!(error, ClientError::Api(_)));

    let snapshot = service.snapshot();
    assert_eq!(
        snapshot.error.as_deref(),
        Some("The given data was invalid.")
    );
    assert!(!snapshot.is_submitting);

    service.clear_error();
    assert_eq!(service.snapshot().error, None);

    Ok(())
}
