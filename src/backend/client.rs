//! HTTP client for the document backend.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;
use url::Url;

use super::types::{
    AccountResponse, AskRequest, AskResponse, Credentials, DocumentUpload, DownloadRequest,
    Registration, SummariesRequest, SummariesResponse, Summary, TranslateRequest,
    TranslateResponse, UPLOAD_SOURCE, UploadResponse,
};
use crate::auth::UserSession;
use crate::chat::AnswerBackend;
use crate::error::{Error, Result};

const ASK_PATH: &str = "/rag/ask";
const SUMMARIES_PATH: &str = "/summary/summaries";
const SUMMARIES_DOWNLOAD_PATH: &str = "/summary/summaries/download";
const TRANSLATE_PATH: &str = "/translate";
const UPLOAD_PATH: &str = "/document/upload";
const LOGIN_PATH: &str = "/auth/login";
const SIGNUP_PATH: &str = "/auth/signup";

/// HTTP client for the backend API.
///
/// # Example
///
/// ```rust,no_run
/// use docdesk::backend::BackendClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = BackendClient::new("http://127.0.0.1:5001")?;
/// let translated = client.translate().text("Good morning").await?;
/// println!("{translated}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: Url,
    http: reqwest::Client,
}

impl BackendClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The backend base URL (e.g., "http://127.0.0.1:5001")
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a new client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self { base_url, http })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the question-answering API.
    pub fn rag(&self) -> RagApi<'_> {
        RagApi { client: self }
    }

    /// Access the summaries API.
    pub fn summaries(&self) -> SummariesApi<'_> {
        SummariesApi { client: self }
    }

    /// Access the translation API.
    pub fn translate(&self) -> TranslateApi<'_> {
        TranslateApi { client: self }
    }

    /// Access the document upload API.
    pub fn documents(&self) -> DocumentsApi<'_> {
        DocumentsApi { client: self }
    }

    /// Access the account API.
    pub fn accounts(&self) -> AccountsApi<'_> {
        AccountsApi { client: self }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        debug!(name: "backend.request", url = %url.as_str(), "POST");
        let response = self.http.post(url).json(body).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

// =============================================================================
// RAG API
// =============================================================================

/// Question-answering API client.
#[derive(Debug)]
pub struct RagApi<'a> {
    client: &'a BackendClient,
}

impl RagApi<'_> {
    /// Ask a question, optionally scoped to a knowledge source.
    pub async fn ask(&self, request: &AskRequest) -> Result<AskResponse> {
        self.client.post_json(ASK_PATH, request).await
    }
}

#[async_trait]
impl AnswerBackend for BackendClient {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse> {
        self.rag().ask(request).await
    }
}

// =============================================================================
// Summaries API
// =============================================================================

/// Summaries API client.
#[derive(Debug)]
pub struct SummariesApi<'a> {
    client: &'a BackendClient,
}

impl SummariesApi<'_> {
    /// List the summaries visible to a user.
    pub async fn list(&self, user: &UserSession) -> Result<Vec<Summary>> {
        let request = SummariesRequest {
            user_id: user.user_id(),
        };
        let response: SummariesResponse = self.client.post_json(SUMMARIES_PATH, &request).await?;
        Ok(response.summaries)
    }

    /// Render summaries to a PDF document.
    pub async fn download_pdf(&self, summaries: &[Summary]) -> Result<Vec<u8>> {
        let url = self.client.url(SUMMARIES_DOWNLOAD_PATH)?;
        let response = self
            .client
            .http
            .post(url)
            .json(&DownloadRequest { summaries })
            .send()
            .await?;
        let response = BackendClient::check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

// =============================================================================
// Translate API
// =============================================================================

/// Translation API client.
#[derive(Debug)]
pub struct TranslateApi<'a> {
    client: &'a BackendClient,
}

impl TranslateApi<'_> {
    /// Translate a piece of text.
    pub async fn text(&self, text: &str) -> Result<String> {
        let response: TranslateResponse = self
            .client
            .post_json(TRANSLATE_PATH, &TranslateRequest { text })
            .await?;
        Ok(response.translated_text)
    }
}

// =============================================================================
// Documents API
// =============================================================================

/// Document upload API client.
#[derive(Debug)]
pub struct DocumentsApi<'a> {
    client: &'a BackendClient,
}

impl DocumentsApi<'_> {
    /// Upload a document on behalf of a user.
    ///
    /// Any readable verdict is `Ok`, including rejections with field errors
    /// and non-2xx responses; transport failures and unreadable bodies are
    /// errors.
    pub async fn upload(&self, user: &UserSession, upload: DocumentUpload) -> Result<UploadResponse> {
        let file = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let form = Form::new()
            .part("file", file)
            .text("title", upload.title)
            .text("type", upload.doc_type)
            .text("language", upload.language)
            .text("source", UPLOAD_SOURCE)
            .text("uploaded_by", user.user_id().to_string());

        let url = self.client.url(UPLOAD_PATH)?;
        let response = self.client.http.post(url).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<UploadResponse>(&body) {
            Ok(verdict) => Ok(verdict),
            Err(_) if !status.is_success() => Err(Error::Api {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Accounts API
// =============================================================================

/// Login and signup API client.
#[derive(Debug)]
pub struct AccountsApi<'a> {
    client: &'a BackendClient,
}

impl AccountsApi<'_> {
    pub async fn login(&self, credentials: &Credentials) -> Result<AccountResponse> {
        self.client.post_json(LOGIN_PATH, credentials).await
    }

    pub async fn signup(&self, registration: &Registration) -> Result<AccountResponse> {
        self.client.post_json(SIGNUP_PATH, registration).await
    }
}
