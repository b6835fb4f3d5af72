//! Document upload form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{DocumentUpload, UploadResponse};

/// Accepted document types.
pub const DOCUMENT_TYPES: &[&str] = &["typed", "handwritten"];

/// Accepted document languages.
pub const LANGUAGES: &[&str] = &["english", "malayalam", "bilingual"];

/// Minimum title length, in characters.
const MIN_TITLE_CHARS: usize = 3;

/// Banner shown when the backend gives no better reason.
pub const UPLOAD_FAILED: &str = "Upload failed. Please try again.";

/// Field name to message, rendered next to each field.
pub type FieldErrors = BTreeMap<String, String>;

/// Fields the upload page can show an inline error for.
const FORM_FIELDS: &[&str] = &["title", "type", "language", "file"];

/// File attached to the upload form.
#[derive(Debug, Clone)]
pub struct AttachedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Raw upload form, as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadForm {
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub language: String,
}

impl UploadForm {
    /// Check every field; all problems are reported at once.
    pub fn validate(&self, file: Option<&AttachedFile>) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.title.trim().is_empty() {
            errors.insert("title".into(), "Document title is required".into());
        } else if self.title.chars().count() < MIN_TITLE_CHARS {
            errors.insert(
                "title".into(),
                "Title must be at least 3 characters long".into(),
            );
        }

        if !DOCUMENT_TYPES.contains(&self.doc_type.as_str()) {
            errors.insert("type".into(), "Document type is required".into());
        }

        if !LANGUAGES.contains(&self.language.as_str()) {
            errors.insert("language".into(), "Document language is required".into());
        }

        if file.is_none_or(|f| f.file_name.is_empty()) {
            errors.insert("file".into(), "Please choose a file to upload".into());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Combine a validated form with its file.
    #[must_use]
    pub fn into_upload(self, file: AttachedFile) -> DocumentUpload {
        DocumentUpload {
            file_name: file.file_name,
            content_type: file.content_type,
            bytes: file.bytes,
            title: self.title,
            doc_type: self.doc_type,
            language: self.language,
        }
    }
}

/// Whether a user id is acceptable as an uploader.
#[must_use]
pub fn is_valid_uploader(user_id: &str) -> bool {
    Uuid::parse_str(user_id).is_ok()
}

/// What the upload page shows after the backend answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Accepted,
    FieldErrors(FieldErrors),
    Rejected(String),
}

impl From<UploadResponse> for UploadOutcome {
    fn from(response: UploadResponse) -> Self {
        if response.success {
            return Self::Accepted;
        }
        let errors = response.errors.unwrap_or_default();
        if errors.keys().any(|field| FORM_FIELDS.contains(&field.as_str())) {
            return Self::FieldErrors(errors);
        }
        // Errors on fields the form does not show still need a visible reason
        let reason = response
            .message
            .filter(|m| !m.trim().is_empty())
            .or_else(|| errors.into_values().next())
            .unwrap_or_else(|| UPLOAD_FAILED.to_string());
        Self::Rejected(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> AttachedFile {
        AttachedFile {
            file_name: "budget.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: b"%PDF".to_vec(),
        }
    }

    fn form(title: &str, doc_type: &str, language: &str) -> UploadForm {
        UploadForm {
            title: title.into(),
            doc_type: doc_type.into(),
            language: language.into(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form("Budget 2024", "typed", "english").validate(Some(&file())).is_ok());
    }

    #[test]
    fn test_every_problem_reported() {
        let errors = form("  ", "scanned", "").validate(None).unwrap_err();
        assert_eq!(errors["title"], "Document title is required");
        assert_eq!(errors["type"], "Document type is required");
        assert_eq!(errors["language"], "Document language is required");
        assert_eq!(errors["file"], "Please choose a file to upload");
    }

    #[test]
    fn test_short_title() {
        let errors = form("ab", "handwritten", "bilingual")
            .validate(Some(&file()))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["title"], "Title must be at least 3 characters long");
        // Multi-byte characters count once.
        assert!(form("ബജറ്റ്", "typed", "malayalam").validate(Some(&file())).is_ok());
    }

    #[test]
    fn test_uploader_must_be_uuid() {
        assert!(is_valid_uploader("3b241101-e2bb-4255-8caf-4136c566a962"));
        assert!(!is_valid_uploader("user-42"));
    }

    #[test]
    fn test_outcome_from_response() {
        let ok = UploadResponse {
            success: true,
            ..Default::default()
        };
        assert_eq!(UploadOutcome::from(ok), UploadOutcome::Accepted);

        let mut errors = FieldErrors::new();
        errors.insert("title".into(), "Duplicate title".into());
        let with_errors = UploadResponse {
            success: false,
            errors: Some(errors.clone()),
            message: None,
        };
        assert_eq!(UploadOutcome::from(with_errors), UploadOutcome::FieldErrors(errors));

        let mut hidden = FieldErrors::new();
        hidden.insert("uploaded_by".into(), "Unknown uploader".into());
        let with_hidden = UploadResponse {
            success: false,
            errors: Some(hidden.clone()),
            message: Some("User not found".into()),
        };
        assert_eq!(
            UploadOutcome::from(with_hidden),
            UploadOutcome::Rejected("User not found".into())
        );
        let hidden_only = UploadResponse {
            success: false,
            errors: Some(hidden),
            message: None,
        };
        assert_eq!(
            UploadOutcome::from(hidden_only),
            UploadOutcome::Rejected("Unknown uploader".into())
        );

        let bare = UploadResponse::default();
        assert_eq!(
            UploadOutcome::from(bare),
            UploadOutcome::Rejected(UPLOAD_FAILED.to_string())
        );
    }
}
