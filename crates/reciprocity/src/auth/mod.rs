mod password;
mod provider;
mod token;

pub use password::{hash_password, verify_password, PasswordError};
pub use provider::{
    AuthError, AuthProvider, Identity, FIXTURE_EMAIL, FIXTURE_TOKEN, FIXTURE_USER_ID,
};
pub use token::{sign_token, verify_token, Claims, TokenError};
