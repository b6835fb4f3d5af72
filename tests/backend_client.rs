//! Backend client against a fake backend.

mod common;

use chrono::Duration;
use serde_json::json;

use common::{USER_ID, dead_backend, spawn_backend};
use docdesk::Error;
use docdesk::auth::UserSession;
use docdesk::backend::{AskRequest, BackendClient, Credentials, DocumentUpload};

fn user() -> UserSession {
    UserSession::new(USER_ID, Some("Asha".into()), Duration::hours(1))
}

fn upload(title: &str) -> DocumentUpload {
    DocumentUpload {
        file_name: "report.pdf".into(),
        content_type: "application/pdf".into(),
        bytes: b"%PDF-1.4".to_vec(),
        title: title.into(),
        doc_type: "typed".into(),
        language: "english".into(),
    }
}

#[tokio::test]
async fn test_ask_sends_selected_file() {
    let (base, recorded) = spawn_backend().await;
    let client = BackendClient::new(&base).unwrap();

    let response = client
        .rag()
        .ask(&AskRequest {
            question: "What is the Q3 budget?".into(),
            selected_file: Some("policy_manual".into()),
        })
        .await
        .unwrap();

    assert_eq!(response.answer, json!("12M"));
    let sent = &recorded.lock().unwrap().questions[0];
    assert_eq!(
        *sent,
        json!({ "question": "What is the Q3 budget?", "selectedFile": "policy_manual" })
    );
}

#[tokio::test]
async fn test_ask_errors() {
    let (base, _) = spawn_backend().await;
    let client = BackendClient::new(&base).unwrap();

    let err = client
        .rag()
        .ask(&AskRequest {
            question: "fail now".into(),
            selected_file: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { status: 500, ref message } if message == "model offline"));

    let err = client
        .rag()
        .ask(&AskRequest {
            question: "garbled".into(),
            selected_file: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Json(_)));

    let offline = BackendClient::new(dead_backend().await).unwrap();
    let err = offline
        .rag()
        .ask(&AskRequest {
            question: "anyone?".into(),
            selected_file: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}

#[tokio::test]
async fn test_summaries_translate_and_download() {
    let (base, _) = spawn_backend().await;
    let client = BackendClient::new(&base).unwrap();

    let summaries = client.summaries().list(&user()).await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[1].display_title(), "Untitled document");

    let pdf = client.summaries().download_pdf(&summaries).await.unwrap();
    assert_eq!(pdf, b"%PDF-1.4 2 summaries");

    let translated = client.translate().text("Good morning").await.unwrap();
    assert_eq!(translated, "[ml] Good morning");
}

#[tokio::test]
async fn test_upload_verdicts() {
    let (base, recorded) = spawn_backend().await;
    let client = BackendClient::new(&base).unwrap();

    let accepted = client.documents().upload(&user(), upload("Annual report")).await.unwrap();
    assert!(accepted.success);

    let rejected = client
        .documents()
        .upload(&user(), upload("Duplicate report"))
        .await
        .unwrap();
    assert!(!rejected.success);
    assert!(rejected.errors.unwrap().contains_key("title"));

    let failed = client
        .documents()
        .upload(&user(), upload("Broken report"))
        .await
        .unwrap();
    assert_eq!(failed.message.as_deref(), Some("Storage is full"));

    let fields = &recorded.lock().unwrap().uploads[0];
    let names: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, ["file", "title", "type", "language", "source", "uploaded_by"]);
}

#[tokio::test]
async fn test_login_rejected() {
    let (base, _) = spawn_backend().await;
    let client = BackendClient::new(&base).unwrap();

    let err = client
        .accounts()
        .login(&Credentials {
            email: "who@example.com".into(),
            password: "nope".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { status: 401, .. }));
}
