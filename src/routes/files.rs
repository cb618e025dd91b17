use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::documents::UploadedFile;
use crate::models::{AppState, DocumentInfo};
use crate::types::{AppError, AppResult};

const BYTES_PER_MB: usize = 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let limit = body_limit(state.config.app.max_file_size_mb);

    Router::new()
        .route("/api/sessions/{session_id}/document", post(upload_document))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

/// Request body limit for uploads, kept above the configured file maximum
fn body_limit(max_file_size_mb: u64) -> usize {
    usize::try_from(max_file_size_mb)
        .unwrap_or(usize::MAX)
        .saturating_add(1)
        .saturating_mul(2 * BYTES_PER_MB)
}

async fn upload_document(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<Json<DocumentInfo>> {
    let handle = state.sessions.get(session_id).await?;

    let file = read_file_field(&mut multipart, state.config.app.max_file_size_mb).await?;
    info!(session_id = %session_id, filename = %file.filename, size = file.size(), "File upload request received");

    let mut session = handle.lock().await;
    let document = state.analyst.load_document(&mut session, file).await?;

    Ok(Json(DocumentInfo::from(&document)))
}

async fn read_file_field(multipart: &mut Multipart, max_file_size_mb: u64) -> AppResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_file_size_mb))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidRequest("file field has no filename".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_file_size_mb))?;

        return Ok(UploadedFile::new(filename, bytes));
    }

    Err(AppError::InvalidRequest("multipart field `file` is missing".to_string()))
}

fn multipart_error(err: MultipartError, max_file_size_mb: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        // The body was cut off at the limit, so the limit is the best known size
        return AppError::FileTooLarge {
            size_bytes: body_limit(max_file_size_mb),
            max_mb: max_file_size_mb,
        };
    }
    AppError::InvalidRequest(err.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_limit_above_file_maximum() {
        assert_eq!(body_limit(10), 22 * BYTES_PER_MB);
        assert!(body_limit(1) > BYTES_PER_MB);
    }

    #[test]
    fn test_body_limit_saturates() {
        assert_eq!(body_limit(u64::MAX), usize::MAX);
        assert_eq!(body_limit(usize::MAX as u64 / 2), usize::MAX);
    }
}
