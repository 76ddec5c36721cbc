use crate::auth::jwt::JwtVerifier;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tubely_core::AppError;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<JwtVerifier>,
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::MissingCredential("Missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| {
            AppError::MissingCredential("Authorization header is not valid ASCII".to_string())
        })?;

    if !auth_header.starts_with("Bearer ") {
        return Err(AppError::MissingCredential(
            "Invalid authorization header format".to_string(),
        ));
    }

    let token = auth_header[7..].trim(); // Remove "Bearer " prefix
    if token.is_empty() {
        return Err(AppError::MissingCredential(
            "Empty bearer token".to_string(),
        ));
    }

    Ok(token)
}

/// Resolve the caller before any handler runs, so requests with bad
/// credentials never reach storage or the metadata store.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match extract_bearer_token(request.headers())
        .and_then(|token| auth_state.verifier.verify(token))
    {
        Ok(identity) => identity,
        Err(e) => {
            tracing::debug!(
                method = %request.method(),
                path = %request.uri().path(),
                "Authentication failed"
            );
            return HttpAppError(e).into_response();
        }
    };

    tracing::debug!(user_id = %identity.user_id, "Authenticated request");
    request.extensions_mut().insert(identity);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_missing_credential() {
        assert!(matches!(
            extract_bearer_token(&HeaderMap::new()),
            Err(AppError::MissingCredential(_))
        ));
    }

    #[test]
    fn wrong_scheme_is_missing_credential() {
        assert!(matches!(
            extract_bearer_token(&headers("Basic dXNlcjpwYXNz")),
            Err(AppError::MissingCredential(_))
        ));
        assert!(matches!(
            extract_bearer_token(&headers("Bearer ")),
            Err(AppError::MissingCredential(_))
        ));
    }
}
