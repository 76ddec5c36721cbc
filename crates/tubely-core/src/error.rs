//! Error types module
//!
//! All failures of the thumbnail write path are unified under `AppError`. Each
//! variant self-describes its HTTP presentation through `ErrorMetadata`, so the
//! API layer renders them without matching on variants itself.
//!
//! The `Database` variant carries a `sqlx::Error` when the `sqlx` feature is on.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected client mistakes (bad input, bad credentials)
    Debug,
    /// Requests refused for policy reasons
    Warn,
    /// Unexpected failures of a collaborator
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NOT_AUTHORIZED")
    fn error_code(&self) -> &'static str;

    /// Whether the client may retry the request unchanged
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Payload too large: exceeds max {max} bytes")]
    PayloadTooLarge { max: usize },

    #[error("Missing file field '{0}'")]
    MissingFile(String),

    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Storage write failed: {0}")]
    StorageWriteFailed(String),

    #[error("Metadata update failed: {0}")]
    MetadataUpdateFailed(String),

    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

/// Static metadata for each variant:
/// (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
#[allow(clippy::type_complexity)]
fn app_error_static_metadata(
    err: &AppError,
) -> (u16, &'static str, bool, Option<&'static str>, bool, LogLevel) {
    match err {
        AppError::MissingCredential(_) => (
            401,
            "MISSING_CREDENTIAL",
            false,
            Some("Send an 'Authorization: Bearer <token>' header"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidCredential(_) => (
            401,
            "INVALID_CREDENTIAL",
            false,
            Some("Obtain a fresh access token"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge { .. } => (
            400,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Upload a smaller image"),
            false,
            LogLevel::Debug,
        ),
        AppError::MissingFile(_) => (
            400,
            "MISSING_FILE",
            false,
            Some("Send the image in the 'thumbnail' multipart field"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidContentType(_) => (
            400,
            "INVALID_CONTENT_TYPE",
            false,
            Some("Set a Content-Type on the file part"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnsupportedMediaType(_) => (
            400,
            "UNSUPPORTED_MEDIA_TYPE",
            false,
            Some("Upload a JPEG or PNG image"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, None, false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, None, false, LogLevel::Debug),
        AppError::NotAuthorized(_) => (403, "NOT_AUTHORIZED", false, None, false, LogLevel::Warn),
        AppError::StorageWriteFailed(_) => (
            500,
            "STORAGE_WRITE_FAILED",
            false,
            None,
            true,
            LogLevel::Error,
        ),
        AppError::MetadataUpdateFailed(_) => (
            500,
            "METADATA_UPDATE_FAILED",
            false,
            None,
            true,
            LogLevel::Error,
        ),
        AppError::Database(_) => (500, "DATABASE_ERROR", false, None, true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", false, None, true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::MissingCredential(_) => "MissingCredential",
            AppError::InvalidCredential(_) => "InvalidCredential",
            AppError::PayloadTooLarge { .. } => "PayloadTooLarge",
            AppError::MissingFile(_) => "MissingFile",
            AppError::InvalidContentType(_) => "InvalidContentType",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::NotAuthorized(_) => "NotAuthorized",
            AppError::StorageWriteFailed(_) => "StorageWriteFailed",
            AppError::MetadataUpdateFailed(_) => "MetadataUpdateFailed",
            AppError::Database(_) => "Database",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::MissingCredential(_) => "Couldn't find JWT".to_string(),
            AppError::InvalidCredential(_) => "Couldn't validate JWT".to_string(),
            AppError::PayloadTooLarge { max, .. } => {
                format!("File exceeds the maximum allowed size of {} bytes", max)
            }
            AppError::MissingFile(field) => format!("Missing file field '{}'", field),
            AppError::InvalidContentType(_) => "Invalid Content-Type".to_string(),
            AppError::UnsupportedMediaType(media_type) => {
                format!("Invalid file type '{}': only image/jpeg and image/png are accepted", media_type)
            }
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::NotAuthorized(_) => "Not authorized to update this video".to_string(),
            AppError::StorageWriteFailed(_) => "Failed to write file".to_string(),
            AppError::MetadataUpdateFailed(_) => "Cannot update video metadata".to_string(),
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
