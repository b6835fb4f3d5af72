//! Document upload validation and dashboard filtering.

mod filter;
mod upload;

pub use filter::{ALL_DEPARTMENTS, DocumentFilter, departments};
pub use upload::{
    AttachedFile, DOCUMENT_TYPES, FieldErrors, LANGUAGES, UPLOAD_FAILED, UploadForm,
    UploadOutcome, is_valid_uploader,
};
