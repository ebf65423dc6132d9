//! Bearer tokens: compact HS256 JWTs (`header.payload.signature`,
//! base64url without padding) signed with HMAC-SHA256.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;
const MAX_TOKEN_LEN: usize = 2048;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("unsupported token algorithm")]
    UnsupportedAlgorithm,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("token signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    /// Expiry, unix seconds.
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct Header {
    alg: String,
}

pub fn issue_token(user_id: Uuid, secret: &[u8], ttl: Duration) -> Result<String, TokenError> {
    let claims = Claims {
        sub: user_id,
        exp: (Utc::now() + ttl).timestamp(),
    };
    encode(&claims, secret)
}

pub fn encode(claims: &Claims, secret: &[u8]) -> Result<String, TokenError> {
    let payload = serde_json::to_vec(claims).map_err(|e| TokenError::Signing(e.to_string()))?;
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(HEADER),
        URL_SAFE_NO_PAD.encode(payload)
    );
    let signature = sign(secret, signing_input.as_bytes())?;
    Ok(format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature)))
}

/// Verifies structure, signature and expiry; returns the claims.
pub fn verify_token(token: &str, secret: &[u8]) -> Result<Claims, TokenError> {
    if token.len() > MAX_TOKEN_LEN {
        return Err(TokenError::Malformed);
    }
    let mut parts = token.split('.');
    let (Some(header_part), Some(payload_part), Some(sig_part), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };

    let header: Header = decode_json(header_part)?;
    if header.alg != "HS256" {
        return Err(TokenError::UnsupportedAlgorithm);
    }

    let signature = URL_SAFE_NO_PAD
        .decode(sig_part)
        .map_err(|_| TokenError::Malformed)?;
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|e| TokenError::Signing(e.to_string()))?;
    mac.update(header_part.as_bytes());
    mac.update(b".");
    mac.update(payload_part.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| TokenError::InvalidSignature)?;

    let claims: Claims = decode_json(payload_part)?;
    if claims.exp <= Utc::now().timestamp() {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

fn sign(secret: &[u8], input: &[u8]) -> Result<Vec<u8>, TokenError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|e| TokenError::Signing(e.to_string()))?;
    mac.update(input);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn decode_json<T: serde::de::DeserializeOwned>(part: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(part)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unit-test-secret";

    #[test]
    fn test_issue_then_verify() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, SECRET, Duration::minutes(5)).unwrap();
        assert_eq!(token.split('.').count(), 3);
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(Uuid::new_v4(), SECRET, Duration::minutes(5)).unwrap();
        assert_eq!(
            verify_token(&token, b"other-secret"),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            exp: Utc::now().timestamp() - 1,
        };
        let token = encode(&claims, SECRET).unwrap();
        assert_eq!(verify_token(&token, SECRET), Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = issue_token(Uuid::new_v4(), SECRET, Duration::minutes(5)).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_claims = Claims {
            sub: Uuid::new_v4(),
            exp: Utc::now().timestamp() + 3600,
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
        assert_eq!(verify_token(&forged, SECRET), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        for bad in ["", "abc", "a.b", "a.b.c.d", "!!!.???.***"] {
            assert_eq!(verify_token(bad, SECRET), Err(TokenError::Malformed), "{bad}");
        }
    }

    #[test]
    fn test_alg_none_rejected() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"00000000-0000-0000-0000-000000000000","exp":99999999999}"#);
        let token = format!("{header}.{payload}.");
        assert_eq!(
            verify_token(&token, SECRET),
            Err(TokenError::UnsupportedAlgorithm)
        );
    }
}
