//! Signed bearer tokens (JWT wire shape, HMAC-SHA-256 only).
//!
//! The verifier pins the algorithm: the header is inspected *before* the
//! signature, and anything other than `HS256` — in particular `none` — is
//! rejected outright.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `iss` claim stamped into every token and required at verification.
pub const TOKEN_ISSUER: &str = "user-order-api";

/// Claims carried by an issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u32,
    pub email: String,
    /// Issued-at, epoch seconds.
    pub iat: i64,
    /// Expiry, epoch seconds.
    pub exp: i64,
    pub iss: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Empty secret or signing failure.
    #[error("token issuance failed")]
    IssueFailure,

    #[error("token expired")]
    Expired,

    #[error("signature verification failed")]
    BadSignature,

    /// Not three dot-joined segments, undecodable segments, bad claims.
    #[error("malformed token")]
    Malformed,

    /// Header names an algorithm other than HS256 (including `none`).
    #[error("wrong signing algorithm")]
    WrongAlgorithm,
}

/// Issue a token for `(user_id, email)` valid for `ttl_seconds`.
pub fn issue_token(
    user_id: u32,
    email: &str,
    secret: &str,
    ttl_seconds: u64,
) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::IssueFailure);
    }

    let now = Utc::now().timestamp();
    let claims = Claims {
        user_id,
        email: email.to_string(),
        iat: now,
        exp: now + ttl_seconds as i64,
        iss: TOKEN_ISSUER.to_string(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!(error = %e, "jwt signing failed");
        TokenError::IssueFailure
    })
}

/// Verify a token and return its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    require_hs256(token)?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss"]);

    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::BadSignature,
        jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => TokenError::WrongAlgorithm,
        _ => TokenError::Malformed,
    })?;

    Ok(data.claims)
}

/// Inspect the (unverified) header segment and insist on `"alg":"HS256"`.
fn require_hs256(token: &str) -> Result<(), TokenError> {
    let header_segment = token.split('.').next().ok_or(TokenError::Malformed)?;
    let raw = URL_SAFE_NO_PAD
        .decode(header_segment)
        .map_err(|_| TokenError::Malformed)?;
    let header: serde_json::Value =
        serde_json::from_slice(&raw).map_err(|_| TokenError::Malformed)?;

    match header.get("alg").and_then(|v| v.as_str()) {
        Some("HS256") => Ok(()),
        Some(_) => Err(TokenError::WrongAlgorithm),
        None => Err(TokenError::Malformed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let token = issue_token(7, "ann@ex.io", SECRET, 600).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.email, "ann@ex.io");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, 600);
    }

    #[test]
    fn wrong_secret_is_a_bad_signature() {
        let token = issue_token(7, "ann@ex.io", SECRET, 600).unwrap();
        assert_eq!(
            verify_token(&token, "other-secret"),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        // exp in the past; leeway is zero so this fails immediately.
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: 7,
            email: "ann@ex.io".to_string(),
            iat: now - 120,
            exp: now - 60,
            iss: TOKEN_ISSUER.to_string(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(verify_token(&token, SECRET), Err(TokenError::Expired));
    }

    #[test]
    fn empty_secret_cannot_issue() {
        assert_eq!(
            issue_token(7, "ann@ex.io", "", 600),
            Err(TokenError::IssueFailure)
        );
    }

    #[test]
    fn none_algorithm_is_rejected_before_signature_checks() {
        // Hand-rolled unsigned token: {"alg":"none","typ":"JWT"}.
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            format!(
                r#"{{"user_id":7,"email":"ann@ex.io","iat":0,"exp":9999999999,"iss":"{TOKEN_ISSUER}"}}"#
            )
            .as_bytes(),
        );
        let token = format!("{header}.{payload}.");

        assert_eq!(verify_token(&token, SECRET), Err(TokenError::WrongAlgorithm));
    }

    #[test]
    fn foreign_algorithm_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let token = format!("{header}.e30.sig");
        assert_eq!(verify_token(&token, SECRET), Err(TokenError::WrongAlgorithm));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(verify_token("not-a-token", SECRET), Err(TokenError::Malformed));
        assert_eq!(verify_token("", SECRET), Err(TokenError::Malformed));
        assert_eq!(verify_token("a.b.c", SECRET), Err(TokenError::Malformed));
    }

    #[test]
    fn wrong_issuer_fails_verification() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: 7,
            email: "ann@ex.io".to_string(),
            iat: now,
            exp: now + 600,
            iss: "someone-else".to_string(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(verify_token(&token, SECRET), Err(TokenError::Malformed));
    }
}
