//! Content-type validation for uploaded thumbnails

use tubely_core::models::ThumbnailMediaType;
use tubely_core::AppError;

/// RFC 2045 `tspecials`
const TSPECIALS: &[char] = &[
    '(', ')', '<', '>', '@', ',', ';', ':', '\\', '"', '/', '[', ']', '?', '=',
];

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_graphic() && !TSPECIALS.contains(&c))
}

/// Parse a Content-Type value into its canonical `type/subtype` form.
///
/// Parameters after `;` are dropped; type and subtype are lowercased and must
/// be RFC 2045 tokens.
pub fn parse_media_type(raw: &str) -> Result<String, AppError> {
    let essence = raw.split(';').next().unwrap_or_default().trim();

    let (main_type, sub_type) = essence
        .split_once('/')
        .ok_or_else(|| AppError::InvalidContentType(raw.to_string()))?;

    let (main_type, sub_type) = (main_type.trim(), sub_type.trim());
    if !is_token(main_type) || !is_token(sub_type) {
        return Err(AppError::InvalidContentType(raw.to_string()));
    }

    Ok(format!(
        "{}/{}",
        main_type.to_ascii_lowercase(),
        sub_type.to_ascii_lowercase()
    ))
}

/// Validate a file part's declared content type against the thumbnail allow-list.
/// A missing content type counts as unparseable.
pub fn validate_thumbnail_media_type(
    content_type: Option<&str>,
) -> Result<ThumbnailMediaType, AppError> {
    let raw = content_type
        .ok_or_else(|| AppError::InvalidContentType("missing Content-Type".to_string()))?;
    let media_type = parse_media_type(raw)?;
    ThumbnailMediaType::from_canonical(&media_type)
        .ok_or(AppError::UnsupportedMediaType(media_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_canonicalizes() {
        assert_eq!(parse_media_type("image/png").unwrap(), "image/png");
        assert_eq!(parse_media_type(" Image/JPEG ").unwrap(), "image/jpeg");
        assert_eq!(
            parse_media_type("image/jpeg; charset=binary").unwrap(),
            "image/jpeg"
        );
    }

    #[test]
    fn rejects_unparseable() {
        for raw in ["", "   ", "image", "/png", "image/", "image/p ng", "ima(ge/png", "image/png/x"] {
            assert!(
                matches!(parse_media_type(raw), Err(AppError::InvalidContentType(_))),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn allow_list() {
        assert_eq!(
            validate_thumbnail_media_type(Some("image/png")).unwrap(),
            ThumbnailMediaType::Png
        );
        assert_eq!(
            validate_thumbnail_media_type(Some("IMAGE/JPEG; q=1")).unwrap(),
            ThumbnailMediaType::Jpeg
        );
        assert!(matches!(
            validate_thumbnail_media_type(Some("image/gif")),
            Err(AppError::UnsupportedMediaType(ref t)) if t == "image/gif"
        ));
        assert!(matches!(
            validate_thumbnail_media_type(Some("text/plain")),
            Err(AppError::UnsupportedMediaType(_))
        ));
        assert!(matches!(
            validate_thumbnail_media_type(None),
            Err(AppError::InvalidContentType(_))
        ));
    }
}
