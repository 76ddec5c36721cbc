use crate::error::{ErrorResponse, RenderedError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

/// Whether error responses may carry `details` and `error_type`
#[derive(Debug, Clone, Copy)]
pub struct ErrorDetailsConfig {
    pub expose_details: bool,
}

impl ErrorDetailsConfig {
    pub fn new(is_production: bool) -> Self {
        Self {
            expose_details: !is_production,
        }
    }
}

/// Re-render error responses without diagnostic details when they are hidden.
pub async fn error_details_middleware(
    State(config): State<ErrorDetailsConfig>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(RenderedError(body)) = response.extensions_mut().remove::<RenderedError>() else {
        return response;
    };
    if config.expose_details || (body.details.is_none() && body.error_type.is_none()) {
        return response;
    }

    let redacted = ErrorResponse {
        details: None,
        error_type: None,
        ..body
    };
    (response.status(), Json(redacted)).into_response()
}
