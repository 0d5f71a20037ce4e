use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_VERSION_V1: &str = "v1";
const MAX_TOKEN_LEN: usize = 1024;

/// Claims carried inside a signed bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id the token was issued for.
    pub sub: i64,
    pub email: String,
    pub role: String,
    /// Expiry as unix seconds.
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("unsupported token version `{0}`")]
    UnsupportedVersion(String),
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("invalid token payload: {0}")]
    Payload(String),
}

/// Serializes the claims and signs them with HMAC-SHA256, producing a
/// `v1.<payload>.<signature>` token with base64url parts.
pub fn sign_token(claims: &Claims, secret: &[u8]) -> Result<String, TokenError> {
    let payload_bytes =
        serde_json::to_vec(claims).map_err(|err| TokenError::Payload(err.to_string()))?;
    let payload_part = URL_SAFE_NO_PAD.encode(payload_bytes);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|err| TokenError::Payload(err.to_string()))?;
    mac.update(payload_part.as_bytes());
    let sig_part = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!(
        "{}.{}.{}",
        TOKEN_VERSION_V1, payload_part, sig_part
    ))
}

/// Checks the signature before touching the payload, then decodes the
/// claims and rejects anything past its expiry.
pub fn verify_token(token: &str, secret: &[u8], now: i64) -> Result<Claims, TokenError> {
    if token.len() > MAX_TOKEN_LEN {
        return Err(TokenError::Malformed);
    }

    let (payload_part, sig_part) = parse_token_parts(token)?;

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|err| TokenError::Payload(err.to_string()))?;
    mac.update(payload_part.as_bytes());
    let sig = URL_SAFE_NO_PAD
        .decode(sig_part)
        .map_err(|_| TokenError::Malformed)?;
    mac.verify_slice(&sig)
        .map_err(|_| TokenError::BadSignature)?;

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload_part)
        .map_err(|_| TokenError::Malformed)?;
    let claims: Claims =
        serde_json::from_slice(&payload_bytes).map_err(|err| TokenError::Payload(err.to_string()))?;

    if now >= claims.exp {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

fn parse_token_parts(token: &str) -> Result<(&str, &str), TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    match parts.as_slice() {
        [version, payload, sig] if *version == TOKEN_VERSION_V1 => Ok((payload, sig)),
        [version, _, _] => Err(TokenError::UnsupportedVersion((*version).to_string())),
        _ => Err(TokenError::Malformed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unit-test-secret";

    fn sample_claims() -> Claims {
        Claims {
            sub: 7,
            email: "rater@example.com".to_string(),
            role: "user".to_string(),
            exp: 2_000_000_000,
        }
    }

    #[test]
    fn sign_then_verify_round_trips_claims() {
        let claims = sample_claims();
        let token = sign_token(&claims, SECRET).unwrap();
        assert!(token.starts_with("v1."));

        let verified = verify_token(&token, SECRET, 1_999_999_999).unwrap();
        assert_eq!(verified, claims);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = sign_token(&sample_claims(), SECRET).unwrap();
        let err = verify_token(&token, b"other-secret", 0).unwrap_err();
        assert!(matches!(err, TokenError::BadSignature));
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let token = sign_token(&sample_claims(), SECRET).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&Claims {
                sub: 999,
                ..sample_claims()
            })
            .unwrap(),
        );
        parts[1] = &forged;
        let tampered = parts.join(".");

        let err = verify_token(&tampered, SECRET, 0).unwrap_err();
        assert!(matches!(err, TokenError::BadSignature));
    }

    #[test]
    fn verify_rejects_expired_token() {
        let claims = Claims {
            exp: 100,
            ..sample_claims()
        };
        let token = sign_token(&claims, SECRET).unwrap();

        let err = verify_token(&token, SECRET, 100).unwrap_err();
        assert!(matches!(err, TokenError::Expired));
        assert!(verify_token(&token, SECRET, 99).is_ok());
    }

    #[test]
    fn verify_rejects_unknown_version() {
        let token = sign_token(&sample_claims(), SECRET).unwrap();
        let swapped = format!("v2.{}", token.trim_start_matches("v1."));
        let err = verify_token(&swapped, SECRET, 0).unwrap_err();
        assert!(matches!(err, TokenError::UnsupportedVersion(version) if version == "v2"));
    }

    #[test]
    fn verify_rejects_garbage() {
        for bad in ["", "v1", "v1.only-two", "not a token at all", "v1...."] {
            assert!(matches!(
                verify_token(bad, SECRET, 0),
                Err(TokenError::Malformed) | Err(TokenError::UnsupportedVersion(_))
            ));
        }
        let oversized = format!("v1.{}.sig", "a".repeat(2048));
        assert!(matches!(
            verify_token(&oversized, SECRET, 0),
            Err(TokenError::Malformed)
        ));
    }
}
