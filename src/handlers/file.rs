use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};

use crate::error::{ApiResponse, AppError, Result};
use crate::models::{CurrentUser, FileResponse};
use crate::services::file::content_type_for;
use crate::services::upload::{UploadBuffer, UploadContent};
use crate::services::FileService;
use crate::AppState;

/// List the caller's files
/// GET /api/filemain
pub async fn list_files(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>> {
    let files = FileService::list_owned(&state.db, current_user.id).await?;
    Ok(Json(ApiResponse::success(files)))
}

/// Upload a file
/// POST /api/filemain, POST /api/filemain/:id  (multipart field "file")
pub async fn upload_file(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponse>>)> {
    let mut upload: Option<(String, UploadContent)> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let mut buffer = UploadBuffer::new(
            state.config.storage.inline_threshold_bytes,
            std::env::temp_dir(),
        );

        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => buffer.write(&chunk).await?,
                Ok(None) => break,
                Err(e) => {
                    buffer.abort();
                    return Err(multipart_error(e));
                }
            }
        }

        upload = Some((file_name, buffer.finish().await?));
        break;
    }

    let (file_name, content) =
        upload.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    let file = FileService::upload(
        &state.db,
        state.storage.as_ref(),
        current_user.id,
        file_name,
        content,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(file))))
}

/// Oversized bodies surface as multipart errors; keep their 413
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the maximum request size".to_string())
    } else {
        AppError::BadRequest(format!("Failed to process multipart: {}", e))
    }
}

/// Download a file
/// GET /api/filemain/:id
pub async fn download_file(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let (file, data) =
        FileService::read(&state.db, state.storage.as_ref(), id, current_user.id).await?;

    let fallback_name = file.name.replace(['"', '\\'], "_");
    let encoded_name = urlencoding::encode(&file.name);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&file.extension))
        .header(header::CONTENT_LENGTH, data.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"; filename*=UTF-8''{}",
                fallback_name, encoded_name
            ),
        )
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// Delete a file
/// DELETE /api/filedelete/:id, DELETE /api/filemain/:id
pub async fn delete_file(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    FileService::delete(&state.db, state.storage.as_ref(), id, current_user.id).await?;
    Ok(Json(ApiResponse::<()>::success_message("File deleted")))
}
