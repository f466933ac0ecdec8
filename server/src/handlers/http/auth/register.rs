use anyhow::Result;
use bytes::Bytes;
use hyper::{Request, Response, StatusCode};
use tracing::{info, warn};

use crate::database::{self, NewUser, UserStoreError};
use crate::handlers::http::utils::{deliver_envelope, deliver_message_json, ApiBody};
use crate::validations::validate_create;
use crate::AppState;

use shared::types::CreateUserData;

/// POST /api/users — register a new account.
///
/// The created user comes back redacted, never with the stored hash.
pub async fn handle_register(
    req: Request<Bytes>,
    state: AppState,
) -> Result<Response<ApiBody>> {
    let data: CreateUserData = match serde_json::from_slice(req.body()) {
        Ok(data) => data,
        Err(e) => {
            warn!("Register body rejected: {}", e);
            return deliver_message_json("Invalid request body", StatusCode::BAD_REQUEST);
        }
    };

    if let Err(e) = validate_create(&data) {
        warn!("Register validation failed: {}", e);
        return deliver_message_json(&e.to_string(), StatusCode::BAD_REQUEST);
    }

    let new_user = NewUser {
        name: data.name,
        email: data.email,
        password: data.password,
    };

    match database::create_user(&state.db, new_user).await {
        Ok(user) => {
            info!("User created: {}", user.id);
            deliver_envelope("User created successfully", user, StatusCode::CREATED)
        }
        Err(UserStoreError::EmailExists) => {
            deliver_message_json("Email already exists", StatusCode::BAD_REQUEST)
        }
        Err(e) => Err(e.into()),
    }
}
