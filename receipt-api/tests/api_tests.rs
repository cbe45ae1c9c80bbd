//! Integration tests for the receipt API
//!
//! Every test runs against the in-memory repository, a local blob store in a
//! temporary directory and a canned vision extractor.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use receipt_api::{create_router, AppConfig, AppState};
use async_trait::async_trait;
use receipt_core::{Receipt, ReceiptPatch, ReceiptStatus};
use receipt_db::{DbError, DbResult, InMemoryReceiptRepository, ReceiptRepository};
use receipt_storage::{
    BackendType, BlobStore, HealthStatus, LocalBlobStore, StorageError, StorageResult,
};
use uuid::Uuid;
use receipt_vision::{MockVisionExtractor, VisionExtractor};
use serde_json::{json, Value};
use tempfile::TempDir;

const AI_REPLY: &str = r#"```json
{"isletme": "MIGROS", "tarih": "05.03.2024", "genel_toplam_kdv_dahil": 200.00}
```"#;

struct TestApp {
    server: TestServer,
    repository: Arc<InMemoryReceiptRepository>,
    vision: Option<Arc<MockVisionExtractor>>,
    _uploads: TempDir,
}

async fn create_test_app(vision: Option<MockVisionExtractor>) -> TestApp {
    let uploads = TempDir::new().unwrap();
    let store = Arc::new(LocalBlobStore::new(uploads.path()).await.unwrap());
    let repository = Arc::new(InMemoryReceiptRepository::new());
    let vision = vision.map(Arc::new);

    let config = AppConfig {
        uploads_dir: uploads.path().to_path_buf(),
        ..AppConfig::default()
    };

    let state = AppState::new(
        config,
        repository.clone(),
        store.clone(),
        store,
        vision.clone().map(|v| v as Arc<dyn VisionExtractor>),
    );

    TestApp {
        server: TestServer::new(create_router(state)).unwrap(),
        repository,
        vision,
        _uploads: uploads,
    }
}

fn receipt_form(total_hint: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("vendorName", "Migros")
        .add_text("date", "05.03.2024")
        .add_text("grandTotal", total_hint)
        .add_part(
            "file",
            Part::bytes(b"fake-jpeg-bytes".to_vec())
                .file_name("receipt.jpg")
                .mime_type("image/jpeg"),
        )
}

async fn upload(app: &TestApp) -> Value {
    let response = app
        .server
        .post("/receipts")
        .multipart(receipt_form("150,50 TL"))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["receipt"].clone()
}

// ============ Health ============

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(None).await;

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storageBackend"], "local");
    assert_eq!(body["databaseBackend"], "memory");
    assert_eq!(body["aiConfigured"], false);
}

#[tokio::test]
async fn test_liveness_and_readiness() {
    let app = create_test_app(None).await;

    let live = app.server.get("/health/live").await;
    live.assert_status_ok();
    assert_eq!(live.text(), "OK");

    app.server.get("/health/ready").await.assert_status_ok();
}

// ============ Upload ============

#[tokio::test]
async fn test_upload_without_source_is_rejected() {
    let app = create_test_app(Some(MockVisionExtractor::replying(AI_REPLY))).await;

    let form = MultipartForm::new().add_text("vendorName", "Migros");
    let response = app.server.post("/receipts").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(app.repository.list().await.unwrap().is_empty());
    assert_eq!(app.vision.as_ref().unwrap().call_count(), 0);
}

#[tokio::test]
async fn test_upload_ai_total_beats_hint() {
    let app = create_test_app(Some(MockVisionExtractor::replying(AI_REPLY))).await;

    let receipt = upload(&app).await;

    assert_eq!(receipt["status"], "DRAFT");
    assert_eq!(receipt["grandTotal"], "200.00");
    assert_eq!(receipt["vendorName"], "MIGROS");
    assert_eq!(receipt["date"], "2024-03-05");
    assert_eq!(receipt["headerFields"]["genel_toplam_kdv_dahil"], "200.00");
    assert!(receipt["fileLocator"]
        .as_str()
        .unwrap()
        .starts_with("/uploads/"));

    let (image, prompt) = app.vision.as_ref().unwrap().last_call().unwrap();
    assert_eq!(image.mime_type, "image/jpeg");
    assert_eq!(image.bytes, b"fake-jpeg-bytes");
    assert!(prompt.contains("150,50 TL"));
}

#[tokio::test]
async fn test_upload_falls_back_to_hints_when_ai_fails() {
    let app = create_test_app(Some(MockVisionExtractor::failing("quota exceeded"))).await;

    let receipt = upload(&app).await;

    assert_eq!(receipt["status"], "DRAFT");
    assert_eq!(receipt["grandTotal"], "150.50");
    assert_eq!(receipt["vendorName"], "Migros");
    assert_eq!(receipt["date"], "2024-03-05");
}

#[tokio::test]
async fn test_upload_falls_back_to_hints_on_malformed_ai_reply() {
    let app = create_test_app(Some(MockVisionExtractor::replying(
        "Sorry, I cannot read this receipt.",
    )))
    .await;

    let receipt = upload(&app).await;

    assert_eq!(receipt["grandTotal"], "150.50");
    assert_eq!(app.vision.as_ref().unwrap().call_count(), 1);
}

#[tokio::test]
async fn test_upload_without_ai_uses_hints() {
    let app = create_test_app(None).await;

    let receipt = upload(&app).await;

    assert_eq!(receipt["grandTotal"], "150.50");
    assert_eq!(receipt["headerFields"]["isletme"], "Migros");
}

#[tokio::test]
async fn test_upload_by_url_keeps_locator() {
    let app = create_test_app(None).await;

    let form = MultipartForm::new()
        .add_text("fileUrl", "https://cdn.example.com/r/42.png")
        .add_text("date", "not-a-date");
    let response = app.server.post("/receipts").multipart(form).await;

    response.assert_status(StatusCode::CREATED);
    let receipt = response.json::<Value>()["receipt"].clone();
    assert_eq!(receipt["fileLocator"], "https://cdn.example.com/r/42.png");
    assert!(receipt["date"].is_null());
    assert!(receipt["grandTotal"].is_null());
}

// ============ Upload failures ============

/// Blob store whose writes always fail
struct BrokenBlobStore;

#[async_trait]
impl BlobStore for BrokenBlobStore {
    async fn put(&self, name: &str, _: &[u8], _: &str) -> StorageResult<String> {
        Err(StorageError::WriteFailed(format!("{}: disk full", name)))
    }

    async fn read(&self, locator: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::NotFound(locator.to_string()))
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Local
    }

    async fn health_check(&self) -> StorageResult<HealthStatus> {
        Ok(HealthStatus::unhealthy("disk full"))
    }
}

/// Repository whose inserts always fail
struct BrokenRepository;

#[async_trait]
impl ReceiptRepository for BrokenRepository {
    async fn create(&self, _: &Receipt) -> DbResult<Receipt> {
        Err(DbError::CorruptRow("insert rejected".into()))
    }

    async fn get(&self, _: Uuid) -> DbResult<Option<Receipt>> {
        Ok(None)
    }

    async fn list(&self) -> DbResult<Vec<Receipt>> {
        Ok(Vec::new())
    }

    async fn set_status(&self, id: Uuid, _: ReceiptStatus) -> DbResult<Receipt> {
        Err(DbError::NotFound(id))
    }

    async fn update(&self, id: Uuid, _: &ReceiptPatch) -> DbResult<Receipt> {
        Err(DbError::NotFound(id))
    }

    fn backend_name(&self) -> &'static str {
        "broken"
    }

    async fn health_check(&self) -> DbResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_upload_blob_write_failure_creates_nothing() {
    let uploads = TempDir::new().unwrap();
    let local = Arc::new(LocalBlobStore::new(uploads.path()).await.unwrap());
    let repository = Arc::new(InMemoryReceiptRepository::new());
    let vision = Arc::new(MockVisionExtractor::replying(AI_REPLY));

    let state = AppState::new(
        AppConfig::default(),
        repository.clone(),
        Arc::new(BrokenBlobStore),
        local,
        Some(vision.clone() as Arc<dyn VisionExtractor>),
    );
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server
        .post("/receipts")
        .multipart(receipt_form("150,50 TL"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["code"], "STORAGE_ERROR");
    assert!(repository.list().await.unwrap().is_empty());
    assert_eq!(vision.call_count(), 0);
}

#[tokio::test]
async fn test_upload_repository_failure_leaves_stored_blob() {
    let uploads = TempDir::new().unwrap();
    let store = Arc::new(LocalBlobStore::new(uploads.path()).await.unwrap());

    let state = AppState::new(
        AppConfig::default(),
        Arc::new(BrokenRepository),
        store.clone(),
        store,
        None,
    );
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server
        .post("/receipts")
        .multipart(receipt_form("150,50 TL"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["code"], "DATABASE_ERROR");

    let stored: Vec<_> = std::fs::read_dir(uploads.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].ends_with(".jpg"));
}

// ============ Read and review ============

#[tokio::test]
async fn test_list_and_get_receipts() {
    let app = create_test_app(None).await;

    let first = upload(&app).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = upload(&app).await;

    let response = app.server.get("/receipts").await;
    response.assert_status_ok();
    let receipts = response.json::<Value>()["receipts"].clone();
    assert_eq!(receipts.as_array().unwrap().len(), 2);
    assert_eq!(receipts[0]["id"], second["id"]);
    assert_eq!(receipts[1]["id"], first["id"]);

    let id = first["id"].as_str().unwrap();
    let response = app.server.get(&format!("/receipts/{}", id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["receipt"], first);
}

#[tokio::test]
async fn test_get_receipt_errors() {
    let app = create_test_app(None).await;

    app.server
        .get("/receipts/not-a-uuid")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .get("/receipts/00000000-0000-4000-8000-000000000000")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_approve_then_reject_last_call_wins() {
    let app = create_test_app(None).await;
    let receipt = upload(&app).await;
    let id = receipt["id"].as_str().unwrap();

    let response = app.server.post(&format!("/receipts/{}/approve", id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["receipt"]["status"], "APPROVED");

    let response = app.server.post(&format!("/receipts/{}/approve", id)).await;
    assert_eq!(response.json::<Value>()["receipt"]["status"], "APPROVED");

    let response = app.server.post(&format!("/receipts/{}/reject", id)).await;
    assert_eq!(response.json::<Value>()["receipt"]["status"], "REJECTED");

    let stored = app
        .server
        .get(&format!("/receipts/{}", id))
        .await
        .json::<Value>();
    assert_eq!(stored["receipt"]["status"], "REJECTED");
}

#[tokio::test]
async fn test_review_unknown_receipt() {
    let app = create_test_app(None).await;

    app.server
        .post("/receipts/00000000-0000-4000-8000-000000000000/approve")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_receipt() {
    let app = create_test_app(None).await;
    let receipt = upload(&app).await;
    let id = receipt["id"].as_str().unwrap();

    let response = app
        .server
        .patch(&format!("/receipts/{}", id))
        .json(&json!({ "vendorName": "A101", "grandTotal": "99.90", "date": null }))
        .await;

    response.assert_status_ok();
    let patched = response.json::<Value>()["receipt"].clone();
    assert_eq!(patched["vendorName"], "A101");
    assert_eq!(patched["grandTotal"], "99.90");
    assert!(patched["date"].is_null());
    assert_eq!(patched["fileLocator"], receipt["fileLocator"]);
    assert_eq!(patched["status"], "DRAFT");
}

#[tokio::test]
async fn test_patch_rejects_immutable_fields() {
    let app = create_test_app(None).await;
    let receipt = upload(&app).await;
    let id = receipt["id"].as_str().unwrap();

    app.server
        .patch(&format!("/receipts/{}", id))
        .json(&json!({ "fileLocator": "/uploads/other.jpg" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .patch(&format!("/receipts/{}", id))
        .json(&json!({ "status": "DRAFT" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .patch(&format!("/receipts/{}", id))
        .json(&json!({ "status": "APPROVED" }))
        .await
        .assert_status_ok();
}

// ============ Exports ============

#[tokio::test]
async fn test_export_empty() {
    let app = create_test_app(None).await;

    let response = app.server.get("/exports").await;
    response.assert_status_ok();
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=receipts.csv"
    );
    assert_eq!(
        response.text(),
        "id,vendorName,date,grandTotal,status,fileLocator\n"
    );

    let response = app.server.get("/exports").add_query_param("format", "json").await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/json");
    assert_eq!(response.text(), "[]");
}

#[tokio::test]
async fn test_export_csv_rows() {
    let app = create_test_app(None).await;
    let receipt = upload(&app).await;

    let response = app.server.get("/exports").add_query_param("format", "CSV").await;
    response.assert_status_ok();

    let text = response.text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[1],
        format!(
            "\"{}\",\"Migros\",\"2024-03-05\",\"150.50\",\"DRAFT\",\"{}\"",
            receipt["id"].as_str().unwrap(),
            receipt["fileLocator"].as_str().unwrap()
        )
    );
}

#[tokio::test]
async fn test_export_xlsx_and_pdf() {
    let app = create_test_app(None).await;
    upload(&app).await;

    let response = app.server.get("/exports").add_query_param("format", "xlsx").await;
    response.assert_status_ok();
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=receipts.xlsx"
    );
    assert!(response.as_bytes().starts_with(b"PK"));

    let response = app.server.get("/exports").add_query_param("format", "pdf").await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/pdf");
    let document = lopdf::Document::load_mem(response.as_bytes()).unwrap();
    assert_eq!(document.get_pages().len(), 1);
}

#[tokio::test]
async fn test_export_unknown_format() {
    let app = create_test_app(None).await;

    let response = app.server.get("/exports").add_query_param("format", "docx").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
}

// ============ Uploads ============

#[tokio::test]
async fn test_serve_stored_upload() {
    let app = create_test_app(None).await;
    let receipt = upload(&app).await;
    let locator = receipt["fileLocator"].as_str().unwrap();

    let response = app.server.get(locator).await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().to_vec(), b"fake-jpeg-bytes".to_vec());
    assert_eq!(response.header("content-type"), "image/jpeg");
    assert_eq!(
        response.header("cache-control"),
        "public, max-age=31536000, immutable"
    );
}

#[tokio::test]
async fn test_serve_upload_rejects_traversal() {
    let app = create_test_app(None).await;

    app.server
        .get("/uploads/..%2Fsecret")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.server
        .get("/uploads/..")
        .await
        .assert_status_not_ok();
}

#[tokio::test]
async fn test_serve_missing_upload() {
    let app = create_test_app(None).await;

    app.server
        .get("/uploads/missing.png")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ============ AI analysis ============

#[tokio::test]
async fn test_analyze_without_ai() {
    let app = create_test_app(None).await;

    let response = app
        .server
        .post("/ai/analyze")
        .json(&json!({ "imageBase64": BASE64.encode(b"img") }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["code"], "UPSTREAM_UNAVAILABLE");
}

#[tokio::test]
async fn test_analyze_requires_image() {
    let app = create_test_app(Some(MockVisionExtractor::replying(AI_REPLY))).await;

    app.server
        .post("/ai/analyze")
        .json(&json!({ "headerHint": { "vendorName": "Migros" } }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .post("/ai/analyze")
        .json(&json!({ "imageBase64": "%%% not base64 %%%" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_inline_image() {
    let app = create_test_app(Some(MockVisionExtractor::replying(AI_REPLY))).await;

    let data_url = format!("data:image/png;base64,{}", BASE64.encode(b"png-bytes"));
    let response = app
        .server
        .post("/ai/analyze")
        .json(&json!({
            "imageBase64": data_url,
            "headerHint": { "grandTotal": "150,50 TL" }
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["raw"], AI_REPLY);
    assert_eq!(body["headerFields"]["isletme"], "MIGROS");
    assert_eq!(body["headerFields"]["genel_toplam_kdv_dahil"], "200.00");

    let (image, prompt) = app.vision.as_ref().unwrap().last_call().unwrap();
    assert_eq!(image.mime_type, "image/png");
    assert_eq!(image.bytes, b"png-bytes");
    assert!(prompt.contains("150,50 TL"));
}

#[tokio::test]
async fn test_analyze_stored_upload_by_locator() {
    let app = create_test_app(Some(MockVisionExtractor::replying("no json here"))).await;
    let receipt = upload(&app).await;

    let response = app
        .server
        .post("/ai/analyze")
        .json(&json!({ "imageUrl": receipt["fileLocator"] }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["raw"], "no json here");
    assert!(body["headerFields"].is_null());

    let (image, _) = app.vision.as_ref().unwrap().last_call().unwrap();
    assert_eq!(image.bytes, b"fake-jpeg-bytes");
}

#[tokio::test]
async fn test_analyze_reports_ai_failure() {
    let app = create_test_app(Some(MockVisionExtractor::failing("quota exceeded"))).await;

    app.server
        .post("/ai/analyze")
        .json(&json!({ "imageBase64": BASE64.encode(b"img") }))
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
