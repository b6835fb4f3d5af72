use axum::{
    Extension,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use super::{browser_session, load_listing};
use crate::AppState;
use crate::auth::Identity;
use crate::documents::{
    AttachedFile, DocumentFilter, FieldErrors, UPLOAD_FAILED, UploadForm, UploadOutcome,
    is_valid_uploader,
};
use crate::ui::{Tone, pages, widget_fragment};

const LOGIN_FOR_UPLOAD: &str = "/login?next=/upload";
const UPLOADED: &str = "Upload Successful! Your document has been uploaded and processed successfully.";
const INVALID_USER: &str = "Invalid user ID";

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(filter): Query<DocumentFilter>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, session) = browser_session(&state, jar);
    let listing = load_listing(&state, &identity).await;
    let widget = widget_fragment(&session.widget_snapshot());
    (
        jar,
        Html(pages::dashboard(&identity, &listing, &filter, &widget)),
    )
}

/// GET /upload
pub async fn upload_page(Extension(identity): Extension<Identity>) -> Response {
    if identity.user().is_none() {
        return Redirect::to(LOGIN_FOR_UPLOAD).into_response();
    }
    Html(pages::upload(
        &identity,
        &UploadForm::default(),
        &FieldErrors::new(),
        None,
    ))
    .into_response()
}

/// Read the upload form fields and the file out of a multipart body.
async fn read_upload(
    multipart: &mut Multipart,
) -> Result<(UploadForm, Option<AttachedFile>), axum::extract::multipart::MultipartError> {
    let mut form = UploadForm::default();
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = field.text().await?,
            "type" => form.doc_type = field.text().await?,
            "language" => form.language = field.text().await?,
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map_or_else(
                    || {
                        mime_guess::from_path(&file_name)
                            .first_or_octet_stream()
                            .to_string()
                    },
                    str::to_string,
                );
                let bytes = field.bytes().await?.to_vec();
                if !file_name.is_empty() {
                    file = Some(AttachedFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            _ => {}
        }
    }
    Ok((form, file))
}

/// POST /upload
pub async fn upload(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    mut multipart: Multipart,
) -> Response {
    let Ok(user) = identity.require() else {
        return Redirect::to(LOGIN_FOR_UPLOAD).into_response();
    };

    let (form, file) = match read_upload(&mut multipart).await {
        Ok(parts) => parts,
        Err(e) => {
            warn!(name: "upload.multipart.invalid", error = %e, "Malformed upload body");
            let page = pages::upload(
                &identity,
                &UploadForm::default(),
                &FieldErrors::new(),
                Some((Tone::Error, UPLOAD_FAILED)),
            );
            return (StatusCode::BAD_REQUEST, Html(page)).into_response();
        }
    };

    if let Err(errors) = form.validate(file.as_ref()) {
        let page = pages::upload(&identity, &form, &errors, None);
        return (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response();
    }
    if !is_valid_uploader(user.user_id()) {
        let page = pages::upload(
            &identity,
            &form,
            &FieldErrors::new(),
            Some((Tone::Error, INVALID_USER)),
        );
        return (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response();
    }
    let Some(file) = file else {
        // validate() already rejected a missing file
        return Redirect::to("/upload").into_response();
    };

    let title = form.title.clone();
    let shown = form.clone();
    let result = state
        .backend
        .documents()
        .upload(user, form.into_upload(file))
        .await;

    match result.map(UploadOutcome::from) {
        Ok(UploadOutcome::Accepted) => {
            info!(name: "upload.accepted", user_id = %user.user_id(), title = %title, "Document uploaded");
            let page = pages::upload(
                &identity,
                &UploadForm::default(),
                &FieldErrors::new(),
                Some((Tone::Success, UPLOADED)),
            );
            Html(page).into_response()
        }
        Ok(UploadOutcome::FieldErrors(errors)) => {
            let page = pages::upload(&identity, &shown, &errors, None);
            (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response()
        }
        Ok(UploadOutcome::Rejected(message)) => {
            let page = pages::upload(
                &identity,
                &shown,
                &FieldErrors::new(),
                Some((Tone::Error, message.as_str())),
            );
            (StatusCode::BAD_GATEWAY, Html(page)).into_response()
        }
        Err(e) => {
            warn!(name: "upload.failed", user_id = %user.user_id(), error = %e, "Upload request failed");
            let page = pages::upload(
                &identity,
                &shown,
                &FieldErrors::new(),
                Some((Tone::Error, UPLOAD_FAILED)),
            );
            (StatusCode::BAD_GATEWAY, Html(page)).into_response()
        }
    }
}
