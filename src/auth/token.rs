//! Session token issuing and verification.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::claims::Claims;
use super::error::AuthError;
use crate::user::User;

/// Issues and verifies HS256 session tokens.
///
/// The signing secret is injected at construction from configuration; there
/// is no hidden process-global. Tokens carry no expiry claim and are valid
/// until the secret rotates.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service signing with the given secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No expiry claim is set on issued tokens, so none is required or
        // checked here. Signature and structure only.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a signed token for the given user.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let claims = Claims {
            username: user.username.clone(),
            user_id: user.id.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("signing token: {e}")))
    }

    /// Verify a token's signature and structure, returning its claims.
    ///
    /// The underlying library's message is preserved so the error classifier
    /// can expose it verbatim.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}
