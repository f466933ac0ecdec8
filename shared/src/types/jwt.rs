use serde::{Deserialize, Serialize};

use crate::types::user::User;

/// Claims embedded in every token issued by the server.
///
/// Access and refresh tokens share this shape; they differ only in signing
/// secret and expiry window.  Tokens are stateless: there is no server-side
/// revocation list, `exp` is the only invalidation mechanism.
///
/// The full (redacted) user record rides along in `sub`.  This inflates the
/// token and repeats the redaction marker in every payload; it is preserved
/// because existing clients read user fields straight off the decoded token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID, duplicated out of `sub` for cheap lookups.
    pub id: String,

    /// The user record the token was issued for, password redacted.
    pub sub: User,

    /// Standard JWT expiry (Unix timestamp, seconds).
    pub exp: u64,
}
