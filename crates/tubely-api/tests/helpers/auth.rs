use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use tubely_api::auth::{AccessClaims, ACCESS_TOKEN_ISSUER};
use uuid::Uuid;

/// Signing secret shared with the test app's verifier.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

fn sign(secret: &str, claims: &AccessClaims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign test token")
}

fn claims_for(user_id: Uuid, expires_in_secs: i64) -> AccessClaims {
    let now = Utc::now().timestamp();
    AccessClaims {
        iss: ACCESS_TOKEN_ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now,
        exp: now + expires_in_secs,
    }
}

/// Valid access token for `user_id`.
pub fn token_for(user_id: Uuid) -> String {
    sign(TEST_JWT_SECRET, &claims_for(user_id, 3600))
}

/// Token that expired a minute ago.
pub fn expired_token_for(user_id: Uuid) -> String {
    sign(TEST_JWT_SECRET, &claims_for(user_id, -60))
}

/// Well-formed token signed with a different secret.
pub fn forged_token_for(user_id: Uuid) -> String {
    sign(
        "some-other-secret-that-is-also-32-chars-long",
        &claims_for(user_id, 3600),
    )
}
