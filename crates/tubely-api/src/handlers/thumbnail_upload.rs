use crate::auth::CallerIdentity;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::ThumbnailUploadService;
use crate::state::UploadConfig;
use crate::utils::upload::extract_thumbnail;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use tubely_core::models::Video;
use tubely_core::AppError;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/videos/{video_id}/thumbnail",
    tag = "videos",
    params(
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Image in the 'thumbnail' field (image/jpeg or image/png)"),
    responses(
        (status = 200, description = "Thumbnail stored and video updated", body = Video),
        (status = 400, description = "Invalid upload or video ID", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Storage or metadata failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %caller.user_id))]
pub async fn upload_thumbnail(
    State(thumbnails): State<ThumbnailUploadService>,
    State(upload): State<UploadConfig>,
    caller: CallerIdentity,
    Path(video_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    let video_id =
        Uuid::parse_str(&video_id).map_err(|_| AppError::InvalidInput("Invalid ID".to_string()))?;

    let multipart = multipart.map_err(|e| {
        AppError::InvalidInput(format!("Invalid multipart request: {}", e.body_text()))
    })?;

    let thumbnail = extract_thumbnail(multipart, upload.max_thumbnail_size_bytes).await?;

    tracing::info!(
        video_id = %video_id,
        media_type = %thumbnail.media_type,
        size_bytes = thumbnail.len(),
        "Uploading thumbnail"
    );

    let video = thumbnails.upload(&caller, video_id, thumbnail).await?;

    Ok(Json(video))
}
