//! Knowledge source catalog.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Id of the catalog entry that opens the file picker.
pub const CUSTOM_UPLOAD_ID: &str = "custom_upload";

/// Id given to sources synthesized from an uploaded file.
pub const UPLOADED_SOURCE_ID: &str = "custom_uploaded";

/// File extensions accepted by the custom upload picker.
pub const ACCEPTED_UPLOAD_EXTENSIONS: &[&str] = &["txt", "md", "json", "pdf", "docx"];

/// A named document collection the widget can be scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeSource {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl KnowledgeSource {
    /// Source record describing a user-supplied file.
    #[must_use]
    pub fn uploaded(filename: &str) -> Self {
        Self {
            id: UPLOADED_SOURCE_ID.to_string(),
            name: filename.to_string(),
            description: format!("Uploaded file: {filename}"),
            endpoint: None,
        }
    }

    /// Whether choosing this entry should open a file picker instead of
    /// selecting it directly.
    #[must_use]
    pub fn is_upload_trigger(&self) -> bool {
        self.id == CUSTOM_UPLOAD_ID
    }
}

struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    endpoint: &'static str,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "policy_manual",
        name: "Finance Document",
        description: "Documents containing budgets",
        endpoint: "/rag/policy",
    },
    CatalogEntry {
        id: "technical_docs",
        name: "HR Document",
        description: "Documents for guidelines to HR and salary",
        endpoint: "/rag/technical",
    },
    CatalogEntry {
        id: "faq_database",
        name: "Operations Document",
        description: "Guidelines and principles to be followed by metro",
        endpoint: "/rag/faq",
    },
    CatalogEntry {
        id: CUSTOM_UPLOAD_ID,
        name: "Upload Custom File",
        description: "Upload your own document",
        endpoint: "/rag/custom",
    },
];

impl From<&CatalogEntry> for KnowledgeSource {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            name: entry.name.to_string(),
            description: entry.description.to_string(),
            endpoint: Some(entry.endpoint.to_string()),
        }
    }
}

/// The fixed source catalog, in display order.
#[must_use]
pub fn catalog() -> Vec<KnowledgeSource> {
    CATALOG.iter().map(KnowledgeSource::from).collect()
}

/// Look up a catalog entry by id.
pub fn find_source(id: &str) -> Result<KnowledgeSource> {
    CATALOG
        .iter()
        .find(|entry| entry.id == id)
        .map(KnowledgeSource::from)
        .ok_or_else(|| Error::UnknownSource(id.to_string()))
}

/// Whether a file name carries one of the accepted upload extensions.
#[must_use]
pub fn is_accepted_upload(filename: &str) -> bool {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_UPLOAD_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}
