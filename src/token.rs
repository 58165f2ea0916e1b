//! Demo credential issuance for `/login`.
//!
//! Tokens are HS256 JWTs signed with a single shared secret from
//! configuration and a fixed lifetime. Nothing verifies them: `/protected`
//! checks a static bearer string instead. This is a placeholder and should be
//! swapped for a real identity provider before anything depends on it.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

/// Lifetime of an issued token.
pub const TOKEN_TTL_HOURS: i64 = 72;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires: i64,
}

pub struct TokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8]) -> Self {
        Self { key: EncodingKey::from_secret(secret), ttl: Duration::hours(TOKEN_TTL_HOURS) }
    }

    pub fn issue(&self, user_id: i64, username: &str) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        let expires = (Utc::now() + self.ttl).timestamp();
        let claims = Claims { user_id, username: username.to_owned(), exp: expires };
        let token = encode(&Header::default(), &claims, &self.key)?;
        Ok(IssuedToken { token, expires })
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

    use super::*;

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let issuer = TokenIssuer::new(b"secret");
        let issued = issuer.issue(123, "ana").unwrap();

        let data = decode::<Claims>(
            &issued.token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();
        assert_eq!(data.claims.user_id, 123);
        assert_eq!(data.claims.username, "ana");
        assert_eq!(data.claims.exp, issued.expires);
    }

    #[test]
    fn expiry_is_three_days_out() {
        let before = Utc::now().timestamp();
        let issued = TokenIssuer::new(b"k").issue(1, "x").unwrap();
        let ttl = issued.expires - before;
        assert!((TOKEN_TTL_HOURS * 3600 - 5..=TOKEN_TTL_HOURS * 3600 + 5).contains(&ttl), "{ttl}");
    }

    #[test]
    fn other_secret_fails_verification() {
        let issued = TokenIssuer::new(b"secret").issue(1, "x").unwrap();
        let result = decode::<Claims>(
            &issued.token,
            &DecodingKey::from_secret(b"not-the-secret"),
            &Validation::new(Algorithm::HS256),
        );
        assert!(result.is_err());
    }
}
