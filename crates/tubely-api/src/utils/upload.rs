//! Multipart extraction for thumbnail uploads

use crate::validation::validate_thumbnail_media_type;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};
use tubely_core::models::UploadedThumbnail;
use tubely_core::AppError;

/// Name of the multipart field carrying the image
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Room for boundaries, part headers and small form fields on top of the
/// file payload when sizing the request body limit.
pub const MULTIPART_ENVELOPE_BYTES: usize = 64 * 1024;

/// Body limit for a thumbnail upload request
pub fn request_body_limit(max_thumbnail_size_bytes: usize) -> usize {
    max_thumbnail_size_bytes.saturating_add(MULTIPART_ENVELOPE_BYTES)
}

fn multipart_error(err: MultipartError, max_size: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { max: max_size }
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Read a field chunk by chunk, failing as soon as it exceeds `max_size`.
async fn read_field_limited(field: &mut Field<'_>, max_size: usize) -> Result<Bytes, AppError> {
    let mut data = BytesMut::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, max_size))?
    {
        if data.len() + chunk.len() > max_size {
            return Err(AppError::PayloadTooLarge { max: max_size });
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data.freeze())
}

/// Extract the single `thumbnail` file part from a multipart body.
///
/// The part's content type is validated before its bytes are read. Other
/// fields are skipped. A second `thumbnail` field is rejected.
pub async fn extract_thumbnail(
    mut multipart: Multipart,
    max_size: usize,
) -> Result<UploadedThumbnail, AppError> {
    let mut thumbnail: Option<UploadedThumbnail> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_size))?
    {
        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }

        if thumbnail.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Multiple '{}' fields are not allowed; send exactly one",
                THUMBNAIL_FIELD
            )));
        }

        let media_type = validate_thumbnail_media_type(field.content_type())?;
        let data = read_field_limited(&mut field, max_size).await?;

        tracing::debug!(
            media_type = %media_type,
            size_bytes = data.len(),
            filename = ?field.file_name(),
            "Thumbnail part received"
        );

        thumbnail = Some(UploadedThumbnail { data, media_type });
    }

    thumbnail.ok_or_else(|| AppError::MissingFile(THUMBNAIL_FIELD.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_limit_adds_envelope() {
        assert_eq!(request_body_limit(10), 10 + MULTIPART_ENVELOPE_BYTES);
        assert_eq!(request_body_limit(usize::MAX), usize::MAX);
    }
}
