//! HTTP-level integration tests for decorative element uploads.
//!
//! Uploads go to the in-memory storage backend, so these tests run the
//! real multipart parsing and key generation without any external service.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_multipart};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];

// ---------------------------------------------------------------------------
// Test: uploading a file returns 201 with its storage URL and key
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_element_returns_201_with_url_and_key() {
    let (app, storage) = common::build_test_app_with_storage(common::lazy_pool());

    let response = post_multipart(
        app,
        "/api/v1/assets/elements",
        "file",
        "Estrela Dourada.png",
        PNG_BYTES,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let url = json["data"]["url"].as_str().unwrap();
    let key = json["data"]["key"].as_str().unwrap();

    assert!(
        url.starts_with("memory://elements/"),
        "URL should point into the elements prefix, got: {url}"
    );
    assert!(key.starts_with("elements/"));
    assert!(
        key.ends_with("-estrela-dourada.png"),
        "Key should keep a slug of the original name, got: {key}"
    );

    // The bytes actually landed in storage under that key.
    assert_eq!(storage.len(), 1);
    assert_eq!(storage.object(key).as_deref(), Some(PNG_BYTES));
}

// ---------------------------------------------------------------------------
// Test: each upload of the same filename gets a distinct key
// ---------------------------------------------------------------------------

#[tokio::test]
async fn repeated_uploads_never_share_a_key() {
    let (app, storage) = common::build_test_app_with_storage(common::lazy_pool());

    let first = post_multipart(
        app.clone(),
        "/api/v1/assets/elements",
        "file",
        "logo.png",
        PNG_BYTES,
    )
    .await;
    let second = post_multipart(app, "/api/v1/assets/elements", "file", "logo.png", PNG_BYTES).await;

    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(second.status(), StatusCode::CREATED);

    let keys = storage.keys();
    assert_eq!(keys.len(), 2);
    assert_ne!(keys[0], keys[1], "Uploads must never overwrite each other");
}

// ---------------------------------------------------------------------------
// Test: unsupported file extension returns 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_element_rejects_unsupported_extension() {
    let (app, storage) = common::build_test_app_with_storage(common::lazy_pool());

    let response = post_multipart(
        app,
        "/api/v1/assets/elements",
        "file",
        "sticker.svg",
        b"<svg></svg>",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(
        json["error"],
        "Unsupported image format '.svg'. Supported: .png, .jpg, .jpeg, .webp, .gif"
    );
    assert!(storage.is_empty(), "Rejected upload must not reach storage");
}

// ---------------------------------------------------------------------------
// Test: multipart body without a "file" field returns 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_element_requires_file_field() {
    let (app, storage) = common::build_test_app_with_storage(common::lazy_pool());

    // A well-formed multipart body whose only field is not named "file".
    let response = post_multipart(
        app,
        "/api/v1/assets/elements",
        "attachment",
        "sticker.png",
        PNG_BYTES,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Missing required 'file' field");
    assert!(storage.is_empty());
}

// ---------------------------------------------------------------------------
// Test: empty file returns 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_element_rejects_empty_file() {
    let (app, storage) = common::build_test_app_with_storage(common::lazy_pool());

    let response = post_multipart(app, "/api/v1/assets/elements", "file", "empty.png", &[]).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Uploaded file is empty");
    assert!(storage.is_empty());
}
