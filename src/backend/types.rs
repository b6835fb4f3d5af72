//! Wire types exchanged with the document backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Question answering
// =============================================================================

/// Body of a RAG question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// Selected knowledge source id; omitted when the picker was bypassed.
    #[serde(rename = "selectedFile", skip_serializing_if = "Option::is_none")]
    pub selected_file: Option<String>,
}

/// Backend answer. The payload may be any JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: serde_json::Value,
}

// =============================================================================
// Summaries
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SummariesRequest<'a> {
    pub user_id: &'a str,
}

/// A document summary held by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub document_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub summary_text: String,
    pub department_id: String,
}

impl Summary {
    /// Title shown for the summary, with a placeholder for untitled documents.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Untitled document")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummariesResponse {
    #[serde(default)]
    pub summaries: Vec<Summary>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct DownloadRequest<'a> {
    pub summaries: &'a [Summary],
}

// =============================================================================
// Translation
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TranslateRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
}

// =============================================================================
// Document upload
// =============================================================================

/// Value sent in the `source` field of every upload.
pub const UPLOAD_SOURCE: &str = "official website";

/// A document upload, ready to be sent as multipart form data.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub title: String,
    pub doc_type: String,
    pub language: String,
}

/// Backend verdict on an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    /// Field name to error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// =============================================================================
// Auth
// =============================================================================

/// Login form contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Signup form contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Identity returned by the backend after login or signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ask_request_omits_missing_source() {
        let req = AskRequest {
            question: "hi".into(),
            selected_file: None,
        };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"question": "hi"}));

        let req = AskRequest {
            question: "hi".into(),
            selected_file: Some("policy_manual".into()),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"question": "hi", "selectedFile": "policy_manual"})
        );
    }

    #[test]
    fn test_ask_response_requires_answer() {
        assert!(serde_json::from_value::<AskResponse>(json!({"result": 1})).is_err());
        let resp: AskResponse = serde_json::from_value(json!({"answer": {"x": 1}})).unwrap();
        assert_eq!(resp.answer, json!({"x": 1}));
    }

    #[test]
    fn test_summary_display_title() {
        let mut summary: Summary = serde_json::from_value(json!({
            "document_id": "d1",
            "summary_text": "text",
            "department_id": "finance"
        }))
        .unwrap();
        assert_eq!(summary.display_title(), "Untitled document");
        summary.title = Some("Budget".into());
        assert_eq!(summary.display_title(), "Budget");
    }

    #[test]
    fn test_upload_response_defaults() {
        let resp: UploadResponse =
            serde_json::from_value(json!({"errors": {"title": "taken"}})).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.errors.unwrap()["title"], "taken");
    }
}
