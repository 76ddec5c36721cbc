//! HS256 access token verification

use crate::auth::models::CallerIdentity;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tubely_core::AppError;
use uuid::Uuid;

/// Issuer of the access tokens this service accepts
pub const ACCESS_TOKEN_ISSUER: &str = "tubely-access";

/// Access token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub iss: String,
    pub sub: String, // user_id
    pub iat: i64,
    pub exp: i64,
}

/// Verifies bearer tokens against the server-held secret.
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[ACCESS_TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Check signature, expiry and issuer, and resolve the caller.
    pub fn verify(&self, token: &str) -> Result<CallerIdentity, AppError> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::InvalidCredential(format!("JWT validation failed: {}", e)))?;

        let user_id = Uuid::parse_str(&token_data.claims.sub).map_err(|_| {
            AppError::InvalidCredential("Subject claim is not a valid user ID".to_string())
        })?;

        Ok(CallerIdentity { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "supersecretjwtsecretforunittesting123";

    fn token(secret: &str, claims: &AccessClaims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(sub: &str, exp_offset_secs: i64) -> AccessClaims {
        let now = Utc::now().timestamp();
        AccessClaims {
            iss: ACCESS_TOKEN_ISSUER.to_string(),
            sub: sub.to_string(),
            iat: now,
            exp: now + exp_offset_secs,
        }
    }

    #[test]
    fn test_verify_success() {
        let user_id = Uuid::new_v4();
        let verifier = JwtVerifier::new(SECRET);

        let identity = verifier
            .verify(&token(SECRET, &claims(&user_id.to_string(), 3600)))
            .expect("Valid token should pass");

        assert_eq!(identity.user_id, user_id);
    }

    #[test]
    fn test_verify_expired() {
        let verifier = JwtVerifier::new(SECRET);
        let result = verifier.verify(&token(SECRET, &claims(&Uuid::new_v4().to_string(), -60)));
        assert!(matches!(result, Err(AppError::InvalidCredential(_))));
    }

    #[test]
    fn test_verify_invalid_signature() {
        let verifier = JwtVerifier::new(SECRET);
        let result = verifier.verify(&token(
            "wrongsecretwrongsecretwrongsecret",
            &claims(&Uuid::new_v4().to_string(), 3600),
        ));
        assert!(matches!(result, Err(AppError::InvalidCredential(_))));
    }

    #[test]
    fn test_verify_wrong_issuer() {
        let verifier = JwtVerifier::new(SECRET);
        let mut c = claims(&Uuid::new_v4().to_string(), 3600);
        c.iss = "someone-else".to_string();
        assert!(matches!(
            verifier.verify(&token(SECRET, &c)),
            Err(AppError::InvalidCredential(_))
        ));
    }

    #[test]
    fn test_verify_non_uuid_subject() {
        let verifier = JwtVerifier::new(SECRET);
        let result = verifier.verify(&token(SECRET, &claims("not-a-uuid", 3600)));
        assert!(matches!(result, Err(AppError::InvalidCredential(_))));
    }

    #[test]
    fn test_verify_garbage() {
        let verifier = JwtVerifier::new(SECRET);
        assert!(matches!(
            verifier.verify("not.a.jwt"),
            Err(AppError::InvalidCredential(_))
        ));
    }
}
