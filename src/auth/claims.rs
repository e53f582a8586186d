//! Session token claims.

use serde::{Deserialize, Serialize};

/// Claims carried by a session token.
///
/// Deliberately minimal: the token binds a username to a user id and nothing
/// else. No expiry claim is set, so a token stays valid until the signing
/// secret rotates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username at the time the token was issued.
    pub username: String,
    /// Id of the user the token was issued for.
    pub user_id: String,
}
