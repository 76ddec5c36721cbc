pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::{AccessClaims, JwtVerifier, ACCESS_TOKEN_ISSUER};
pub use middleware::{auth_middleware, extract_bearer_token, AuthState};
pub use models::CallerIdentity;
