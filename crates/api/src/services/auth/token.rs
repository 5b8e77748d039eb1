//! JWT issuing and validation.
//!
//! Tokens are HS256-signed and carry `{sub, role, exp}`. Validation is a pure
//! function of the token, the secret, and the clock; there is no server-side
//! session state and no revocation list. A token stays valid until its expiry
//! regardless of later account changes (accepted limitation).

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use tamarind_core::{Role, UserId};

/// Token lifetime: 7 days.
pub const TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Principal identity extracted from a validated token.
#[derive(Debug, Clone, Copy)]
pub struct TokenIdentity {
    pub user_id: UserId,
    pub role: Role,
}

/// Errors returned by [`verify_token`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("token could not be signed")]
    Signing,
}

/// JWT claims payload.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User ID.
    sub: String,
    /// Role as its lowercase wire value.
    role: Role,
    /// Expiration timestamp (seconds since UNIX epoch).
    exp: u64,
}

/// Issue a signed token for a principal, expiring [`TOKEN_TTL_SECS`] from now.
///
/// # Errors
///
/// Returns `TokenError::Signing` if encoding fails.
pub fn issue_token(user_id: UserId, role: Role, secret: &str) -> Result<String, TokenError> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(|_| TokenError::Signing)?
        .as_secs();

    let claims = Claims {
        sub: user_id.to_string(),
        role,
        exp: now + TOKEN_TTL_SECS,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| TokenError::Signing)
}

/// Decode and validate a token, returning the principal's identity.
///
/// Validation: HS256, `exp` checked with the library's default leeway,
/// required claims `exp` + `sub`.
///
/// # Errors
///
/// Returns `TokenError::Expired`, `TokenError::InvalidSignature`, or
/// `TokenError::Malformed` depending on what failed. All three map to 401 at
/// the HTTP boundary.
pub fn verify_token(token: &str, secret: &str) -> Result<TokenIdentity, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    let user_id = data
        .claims
        .sub
        .parse::<UserId>()
        .map_err(|_| TokenError::Malformed)?;

    Ok(TokenIdentity {
        user_id,
        role: data.claims.role,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    #[test]
    fn test_issue_then_verify() {
        let token = issue_token(UserId::new(42), Role::Admin, TEST_SECRET).unwrap();

        let identity = verify_token(&token, TEST_SECRET).unwrap();
        assert_eq!(identity.user_id, UserId::new(42));
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn test_reject_wrong_secret() {
        let token = issue_token(UserId::new(1), Role::User, TEST_SECRET).unwrap();

        let err = verify_token(&token, "wrong-secret").unwrap_err();
        assert!(matches!(err, TokenError::InvalidSignature));
    }

    #[test]
    fn test_reject_expired_token() {
        // Hand-roll a token with exp in the past.
        let claims = Claims {
            sub: "1".to_string(),
            role: Role::User,
            exp: 1_000_000,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let err = verify_token(&token, TEST_SECRET).unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn test_reject_malformed_token() {
        let err = verify_token("not-a-jwt", TEST_SECRET).unwrap_err();
        assert!(matches!(err, TokenError::Malformed));
    }

    #[test]
    fn test_reject_non_numeric_subject() {
        let claims = Claims {
            sub: "abc".to_string(),
            role: Role::User,
            exp: u64::MAX,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let err = verify_token(&token, TEST_SECRET).unwrap_err();
        assert!(matches!(err, TokenError::Malformed));
    }
}
