use chrono::Utc;

use crate::config::{AuthConfig, AuthMode};

use super::token::{self, Claims, TokenError};

/// User id the fixture provider reports. The serving layer seeds a matching
/// `users` row at startup so submissions in fixture mode reference a real
/// account.
pub const FIXTURE_USER_ID: i64 = 1;
pub const FIXTURE_EMAIL: &str = "dev@example.com";
pub const FIXTURE_TOKEN: &str = "dev";

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub role: String,
}

impl Identity {
    pub fn fixture() -> Self {
        Self {
            user_id: FIXTURE_USER_ID,
            email: FIXTURE_EMAIL.to_string(),
            role: "user".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// How request identities are established. Selected once at startup from
/// configuration; requests never mix modes.
#[derive(Debug, Clone)]
pub enum AuthProvider {
    Verified {
        secret: Vec<u8>,
        token_ttl_hours: i64,
    },
    Fixture,
}

impl AuthProvider {
    pub fn from_config(config: &AuthConfig) -> Self {
        match config.mode {
            AuthMode::Verified => Self::Verified {
                secret: config.secret.clone().into_bytes(),
                token_ttl_hours: config.token_ttl_hours,
            },
            AuthMode::Fixture => Self::Fixture,
        }
    }

    /// Issues a bearer token for a registered or logged-in user.
    pub fn issue(&self, user_id: i64, email: &str, role: &str) -> Result<String, TokenError> {
        match self {
            Self::Verified {
                secret,
                token_ttl_hours,
            } => {
                let claims = Claims {
                    sub: user_id,
                    email: email.to_string(),
                    role: role.to_string(),
                    exp: Utc::now().timestamp() + token_ttl_hours * 3600,
                };
                token::sign_token(&claims, secret)
            }
            Self::Fixture => Ok(FIXTURE_TOKEN.to_string()),
        }
    }

    /// Resolves the identity behind a request. Fixture mode maps every
    /// request to the fixed development identity regardless of headers.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Identity, AuthError> {
        match self {
            Self::Fixture => Ok(Identity::fixture()),
            Self::Verified { secret, .. } => {
                let bearer = bearer_token(authorization).ok_or(AuthError::MissingToken)?;
                let claims = token::verify_token(bearer, secret, Utc::now().timestamp())?;
                Ok(Identity {
                    user_id: claims.sub,
                    email: claims.email,
                    role: claims.role,
                })
            }
        }
    }
}

fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    let token = authorization?.trim().strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verified_provider(ttl_hours: i64) -> AuthProvider {
        AuthProvider::Verified {
            secret: b"unit-test-secret".to_vec(),
            token_ttl_hours: ttl_hours,
        }
    }

    #[test]
    fn verified_issue_then_authenticate_round_trips() {
        let provider = verified_provider(8);
        let token = provider.issue(42, "rater@example.com", "user").unwrap();

        let identity = provider
            .authenticate(Some(&format!("Bearer {token}")))
            .unwrap();
        assert_eq!(identity.user_id, 42);
        assert_eq!(identity.email, "rater@example.com");
        assert_eq!(identity.role, "user");
    }

    #[test]
    fn verified_rejects_missing_or_blank_header() {
        let provider = verified_provider(8);
        for header in [None, Some(""), Some("Bearer "), Some("Basic abc")] {
            assert!(matches!(
                provider.authenticate(header),
                Err(AuthError::MissingToken)
            ));
        }
    }

    #[test]
    fn verified_rejects_expired_token() {
        let expired = verified_provider(-1)
            .issue(42, "rater@example.com", "user")
            .unwrap();

        let err = verified_provider(8)
            .authenticate(Some(&format!("Bearer {expired}")))
            .unwrap_err();
        assert!(matches!(err, AuthError::Token(TokenError::Expired)));
    }

    #[test]
    fn fixture_mode_ignores_headers_entirely() {
        let provider = AuthProvider::Fixture;
        for header in [None, Some("Bearer whatever"), Some("garbage")] {
            let identity = provider.authenticate(header).unwrap();
            assert_eq!(identity, Identity::fixture());
        }
        assert_eq!(
            provider.issue(1, FIXTURE_EMAIL, "user").unwrap(),
            FIXTURE_TOKEN
        );
    }

    #[test]
    fn from_config_selects_the_configured_mode() {
        let verified = AuthProvider::from_config(&AuthConfig {
            mode: AuthMode::Verified,
            secret: "s3cret".to_string(),
            token_ttl_hours: 8,
            pbkdf2_iterations: 1_000,
        });
        assert!(matches!(verified, AuthProvider::Verified { .. }));

        let fixture = AuthProvider::from_config(&AuthConfig {
            mode: AuthMode::Fixture,
            secret: "s3cret".to_string(),
            token_ttl_hours: 8,
            pbkdf2_iterations: 1_000,
        });
        assert!(matches!(fixture, AuthProvider::Fixture));
    }
}
