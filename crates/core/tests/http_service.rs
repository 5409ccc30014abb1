//! Drives the HTTP client against an in-process stand-in for the
//! processing service.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use smartstudy_core::{Artifact, ExecuteError, OperationId, Workbench, WorkflowConfig};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct UploadedPart {
    field: String,
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

#[derive(Default)]
struct Recorded {
    uploads: Vec<UploadedPart>,
    processed: Vec<String>,
}

type Shared = Arc<Mutex<Recorded>>;

async fn upload(State(recorded): State<Shared>, mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    let mut count = 0;
    while let Ok(Some(field)) = multipart.next_field().await {
        let part = UploadedPart {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().unwrap_or_default().to_string(),
            content_type: field.content_type().unwrap_or_default().to_string(),
            data: Vec::new(),
        };
        let data = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();

        if part.file_name == "full.pptx" {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "disk full" })),
            );
        }

        recorded.lock().unwrap().uploads.push(UploadedPart { data, ..part });
        count += 1;
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": format!("Successfully uploaded {} files", count)
        })),
    )
}

async fn process(State(recorded): State<Shared>, Path(option): Path<String>) -> (StatusCode, Json<Value>) {
    recorded.lock().unwrap().processed.push(option.clone());

    match option.as_str() {
        "custom" => (
            StatusCode::OK,
            Json(json!({ "status": "error", "message": "bad template" })),
        ),
        "terms" => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "detail": "No PDF files found. Please convert PowerPoint files to PDF first."
            })),
        ),
        _ => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": format!("Successfully processed {}", option)
            })),
        ),
    }
}

async fn spawn_service() -> (String, Shared) {
    let recorded = Shared::default();
    let app = Router::new()
        .route("/upload", post(upload))
        .route("/process/:option", post(process))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), recorded)
}

fn deck(name: &str, data: &[u8]) -> Artifact {
    Artifact::new(
        name,
        data.to_vec(),
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    )
}

#[tokio::test]
async fn conversion_uploads_parts_in_order_then_processes() {
    let (url, recorded) = spawn_service().await;
    let bench = Workbench::connect(WorkflowConfig::default().with_base_url(url)).unwrap();
    bench.add(vec![deck("week1.pptx", b"one"), deck("week2.pptx", b"two")]);
    bench.select(OperationId::Default).unwrap();

    let outcome = bench.execute().await.unwrap();

    assert_eq!(outcome.uploaded, 2);
    assert!(outcome.staging_cleared);
    assert_eq!(
        outcome.upload_message.as_deref(),
        Some("Successfully uploaded 2 files")
    );
    assert_eq!(outcome.message.as_deref(), Some("Successfully processed default"));
    assert!(bench.staged().is_empty());

    let recorded = recorded.lock().unwrap();
    let names: Vec<&str> = recorded.uploads.iter().map(|p| p.file_name.as_str()).collect();
    assert_eq!(names, ["week1.pptx", "week2.pptx"]);
    assert!(recorded.uploads.iter().all(|p| p.field == "files"));
    assert_eq!(recorded.uploads[1].data, b"two");
    assert_eq!(
        recorded.uploads[0].content_type,
        "application/vnd.openxmlformats-officedocument.presentationml.presentation"
    );
    assert_eq!(recorded.processed, ["default"]);
}

#[tokio::test]
async fn failed_upload_never_reaches_process() {
    let (url, recorded) = spawn_service().await;
    let bench = Workbench::connect(WorkflowConfig::default().with_base_url(url)).unwrap();
    bench.add(vec![deck("full.pptx", b"x")]);
    bench.select(OperationId::Default).unwrap();

    let err = bench.execute().await.unwrap_err();

    assert_eq!(
        err,
        ExecuteError::UploadRejected {
            status: 500,
            message: "disk full".to_string()
        }
    );
    assert_eq!(bench.last_error().as_deref(), Some("disk full"));
    assert_eq!(bench.staged().len(), 1);
    assert!(recorded.lock().unwrap().processed.is_empty());
}

#[tokio::test]
async fn logical_failure_is_surfaced() {
    let (url, _recorded) = spawn_service().await;
    let bench = Workbench::connect(WorkflowConfig::default().with_base_url(url)).unwrap();
    bench.add(vec![deck("deck.pptx", b"x")]);
    bench.select(OperationId::Custom).unwrap();

    bench.execute().await.unwrap_err();

    assert_eq!(bench.last_error().as_deref(), Some("bad template"));
    assert_eq!(bench.staged().len(), 1);
    assert_eq!(bench.selection(), None);
    assert!(!bench.is_busy());
}

#[tokio::test]
async fn framework_detail_is_surfaced() {
    let (url, recorded) = spawn_service().await;
    let bench = Workbench::connect(WorkflowConfig::default().with_base_url(url)).unwrap();
    bench.select(OperationId::Terms).unwrap();

    bench.execute().await.unwrap_err();

    assert_eq!(
        bench.last_error().as_deref(),
        Some("No PDF files found. Please convert PowerPoint files to PDF first.")
    );
    let recorded = recorded.lock().unwrap();
    assert!(recorded.uploads.is_empty());
    assert_eq!(recorded.processed, ["terms"]);
}

#[tokio::test]
async fn unreachable_service_returns_to_idle() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let bench =
        Workbench::connect(WorkflowConfig::default().with_base_url(format!("http://{}", addr)))
            .unwrap();
    bench.select(OperationId::Audio).unwrap();

    let err = bench.execute().await.unwrap_err();

    assert!(matches!(err, ExecuteError::Unexpected(_)));
    assert!(!err.to_string().is_empty());
    assert_eq!(bench.last_error(), Some(err.to_string()));
    assert_eq!(bench.selection(), None);
    assert!(!bench.is_busy());
}
