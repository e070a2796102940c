use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart, State,
    },
    response::Json,
};
use serde_json::json;
use tracing::{info, warn};

use metalca_common::MetaLcaError;

use crate::session::{CallerContext, MaybeSession};
use crate::uploads::{accept_filename, PendingUpload, UploadStore};
use crate::AppState;

const FILES_FIELD: &str = "files";

pub async fn api_upload_dataset(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<serde_json::Value> {
    let Ok(multipart) = multipart else {
        return Json(json!({ "success": false, "message": "No files provided" }));
    };

    let mut caller = match &session {
        Some(session) => Some(state.sessions.load(session).await),
        None => None,
    };

    let body = match store_uploads(&state.uploads, multipart, caller.as_mut()).await {
        Ok(None) => json!({ "success": false, "message": "No files provided" }),
        Ok(Some(files)) if files.is_empty() => {
            json!({ "success": false, "message": "No valid files uploaded" })
        }
        Ok(Some(files)) => json!({
            "success": true,
            "message": format!("Successfully uploaded {} file(s)", files.len()),
            "files": files,
        }),
        Err(e) => {
            warn!(error = %e, "Dataset upload failed");
            json!({ "success": false, "message": format!("Upload error: {e}") })
        }
    };

    if let Some(context) = caller {
        state.sessions.save(context).await;
    }
    Json(body)
}

/// Write every `files` part to the store.
///
/// Returns `None` when the request had no `files` file part at all, otherwise
/// the names that were written. A `files` part without a `filename` is a plain
/// form value and does not count. Parts with an empty or unsafe filename are
/// skipped. When at least one file was written the caller's uploaded list is
/// replaced. A part that fails mid-stream leaves any earlier file untouched.
async fn store_uploads(
    store: &UploadStore,
    mut multipart: Multipart,
    caller: Option<&mut CallerContext>,
) -> Result<Option<Vec<String>>, MetaLcaError> {
    let mut saw_files_field = false;
    let mut uploaded = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| MetaLcaError::Multipart(e.to_string()))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        saw_files_field = true;

        if filename.is_empty() {
            continue;
        }
        if accept_filename(&filename).is_none() {
            warn!(filename = %filename, "Skipping upload with unsafe filename");
            continue;
        }

        let mut upload = store.begin(&filename).await?;
        let bytes = match receive_part(&mut field, &mut upload).await {
            Ok(bytes) => bytes,
            Err(e) => {
                upload.discard().await;
                return Err(e);
            }
        };
        upload.commit().await?;

        info!(filename = %filename, bytes, "Stored uploaded dataset");
        uploaded.push(filename);
    }

    if !saw_files_field {
        return Ok(None);
    }

    if let Some(caller) = caller {
        if !uploaded.is_empty() {
            caller.uploaded_datasets = uploaded.clone();
        }
    }
    Ok(Some(uploaded))
}

async fn receive_part(
    field: &mut Field<'_>,
    upload: &mut PendingUpload,
) -> Result<usize, MetaLcaError> {
    let mut bytes = 0usize;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| MetaLcaError::Multipart(e.to_string()))?
    {
        bytes += chunk.len();
        upload.write(&chunk).await?;
    }
    Ok(bytes)
}

/// Files the current caller uploaded most recently.
pub async fn api_uploaded_datasets(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
) -> Json<serde_json::Value> {
    match session {
        Some(session) => {
            let context = state.sessions.load(&session).await;
            Json(json!({ "success": true, "files": context.uploaded_datasets }))
        }
        None => Json(json!({ "success": false, "message": "Not logged in" })),
    }
}
