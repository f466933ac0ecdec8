use serde::{Deserialize, Serialize};

/// Marker substituted for the password hash in every API response.
///
/// The literal hash never leaves the database layer: create, update, delete,
/// find and verify all redact before returning.  The marker (rather than
/// omitting the field) keeps the wire shape stable for existing clients.
pub const PASSWORD_REDACTED: &str = "*********";

/// A user record as stored and as returned by the API.
///
/// `password` holds the argon2 hash inside the database layer and the
/// redaction marker everywhere else — see [`User::redacted`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl User {
    /// Consume the record and blank the password field.
    pub fn redacted(mut self) -> Self {
        self.password = PASSWORD_REDACTED.to_string();
        self
    }
}

/// Registration payload (`POST /api/users`).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserData {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

/// Update payload (`PUT /api/users/:id`) — password change is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserData {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, rename = "confirmPassword")]
    pub confirm_password: Option<String>,
}

/// Login payload (`POST /api/login`).
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

/// Login / refresh response body: the redacted user flattened next to a
/// fresh token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthData {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}
