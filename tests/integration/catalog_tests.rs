//! Integration tests for the metadata, listing and health endpoints.

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::test_utils::{body_text, get, write_sqlite, MbtilesFixture, TilesDir, PNG_TILE};

async fn json_body(response: axum::http::Response<axum::body::Body>) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

// =============================================================================
// Metadata
// =============================================================================

#[tokio::test]
async fn test_metadata_as_json() {
    let tiles = TilesDir::new();
    tiles
        .add(
            "city.mbtiles",
            MbtilesFixture::new()
                .metadata("name", "A")
                .metadata("version", "1"),
        )
        .await;

    let response = get(tiles.router(), "/city/meta").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/json"));

    let body = json_body(response).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.contains(&json!({"name": "name", "value": "A"})));
    assert!(entries.contains(&json!({"name": "version", "value": "1"})));
}

#[tokio::test]
async fn test_metadata_with_extension() {
    let tiles = TilesDir::new();
    tiles
        .add("city.mbtiles", MbtilesFixture::new().metadata("format", "png"))
        .await;

    let response = get(tiles.router(), "/city.mbtiles/meta").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!([{"name": "format", "value": "png"}])
    );
}

#[tokio::test]
async fn test_metadata_from_untyped_table() {
    let tiles = TilesDir::new();
    write_sqlite(
        &tiles.file("untyped.mbtiles"),
        &[
            "CREATE TABLE tiles (zoom_level, tile_column, tile_row, tile_data)",
            "CREATE TABLE metadata (name, value)",
            "INSERT INTO metadata VALUES ('minzoom', 0), ('format', 'pbf')",
        ],
    )
    .await;

    let response = get(tiles.router(), "/untyped/meta").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.contains(&json!({"name": "minzoom", "value": "0"})));
    assert!(entries.contains(&json!({"name": "format", "value": "pbf"})));
}

#[tokio::test]
async fn test_empty_metadata_is_no_content() {
    let tiles = TilesDir::new();
    tiles
        .add("city.mbtiles", MbtilesFixture::new().tile(0, 0, 0, PNG_TILE))
        .await;

    let response = get(tiles.router(), "/city/meta").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_missing_metadata_table_is_server_error() {
    let tiles = TilesDir::new();
    tiles
        .add(
            "bare.mbtiles",
            MbtilesFixture::new().without_metadata_table(),
        )
        .await;

    let response = get(tiles.router(), "/bare/meta").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response)
        .await
        .starts_with("Error fetching metadata: "));
}

#[tokio::test]
async fn test_metadata_of_missing_dataset_is_server_error() {
    let tiles = TilesDir::new();

    let response = get(tiles.router(), "/nowhere/meta").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert!(body.starts_with("Error fetching metadata: "), "{body}");
    assert!(body.contains("nowhere.mbtiles"), "{body}");
    assert!(!tiles.file("nowhere.mbtiles").exists());
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_list_datasets() {
    let tiles = TilesDir::new();
    tiles.add("region.mbtiles", MbtilesFixture::new()).await;
    tiles.add("city.mbtiles", MbtilesFixture::new()).await;
    tiles.add_raw("README.txt", b"not a dataset");

    let response = get(tiles.router(), "/list").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!(["city.mbtiles", "region.mbtiles"])
    );
}

#[tokio::test]
async fn test_list_empty_directory() {
    let tiles = TilesDir::new();

    let response = get(tiles.router(), "/list").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn test_listed_names_resolve() {
    let tiles = TilesDir::new();
    tiles
        .add(
            "city.mbtiles",
            MbtilesFixture::new()
                .tile(0, 0, 0, PNG_TILE)
                .metadata("name", "City"),
        )
        .await;

    let listed = json_body(get(tiles.router(), "/list").await).await;
    let name = listed[0].as_str().unwrap().to_string();

    let response = get(tiles.router(), &format!("/{}/0/0/0", name)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(tiles.router(), &format!("/{}/meta", name)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let tiles = TilesDir::new();

    let response = get(tiles.router(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
