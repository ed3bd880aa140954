//! API integration tests over a real HTTP listener

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use library_api::{
    api, config::AppConfig, repository::InMemoryBooksRepository, services::Services, AppState,
};

/// Start the server on an ephemeral port and return its base URL
async fn spawn_server() -> String {
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(Services::new(Arc::new(InMemoryBooksRepository::new()))),
    };
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    format!("http://{}/api", addr)
}

async fn create_book(client: &Client, base: &str, body: Value) -> (StatusCode, Value) {
    let response = client
        .post(format!("{}/books", base))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body: Value = response.json().await.expect("Failed to parse response");
    (status, body)
}

#[tokio::test]
async fn test_health_check() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_book_lifecycle() {
    let base = spawn_server().await;
    let client = Client::new();

    // Create
    let (status, created) = create_book(
        &client,
        &base,
        json!({ "title": "Titulo Maroto", "author": "Escritor Famoso", "isbn": "123456" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().expect("No book ID");

    // Duplicate ISBN
    let (status, body) = create_book(
        &client,
        &base,
        json!({ "title": "Outro", "author": "Outro", "isbn": "123456" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0], "ISBN already registered");

    // Update
    let response = client
        .put(format!("{}/books/{}", base, id))
        .json(&json!({ "title": "Y", "author": "X", "isbn": "321" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"], id);
    assert_eq!(body["isbn"], "321");

    // Filter
    let response = client
        .get(format!("{}/books?author=x&page=0&size=10", base))
        .send()
        .await
        .expect("Failed to send request");
    let page: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(page["totalElements"], 1);
    assert_eq!(page["content"][0]["title"], "Y");

    // Delete
    let response = client
        .delete(format!("{}/books/{}", base, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(format!("{}/books/{}", base, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pagination_totals() {
    let base = spawn_server().await;
    let client = Client::new();

    for i in 0..5 {
        let (status, _) = create_book(
            &client,
            &base,
            json!({ "title": format!("Volume {}", i), "author": "Autor", "isbn": format!("isbn-{}", i) }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let response = client
        .get(format!("{}/books?title=volume&page=1&size=2&sort=title,desc", base))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let page: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(page["totalElements"], 5);
    assert_eq!(page["totalPages"], 3);
    assert_eq!(page["content"].as_array().unwrap().len(), 2);
    assert_eq!(page["content"][0]["title"], "Volume 2");
    assert_eq!(page["pageable"]["pageNumber"], 1);
}
