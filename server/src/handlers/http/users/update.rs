use anyhow::Result;
use bytes::Bytes;
use hyper::{Request, Response, StatusCode};
use tracing::{info, warn};

use crate::database::{self, UserStoreError, UserUpdate};
use crate::handlers::http::routes::Router;
use crate::handlers::http::utils::{deliver_envelope, deliver_message_json, ApiBody};
use crate::validations::validate_update;
use crate::AppState;

use shared::types::{TokenClaims, UpdateUserData};

/// PUT /api/users/:id
///
/// The email uniqueness check runs against every other account; keeping
/// your own email on an update is allowed.
pub async fn handle_update_user(
    req: Request<Bytes>,
    state: AppState,
    _claims: TokenClaims,
) -> Result<Response<ApiBody>> {
    let Some(id) = Router::matched_param(&req) else {
        return deliver_message_json("User not found", StatusCode::NOT_FOUND);
    };

    let data: UpdateUserData = match serde_json::from_slice(req.body()) {
        Ok(data) => data,
        Err(e) => {
            warn!("Update body rejected: {}", e);
            return deliver_message_json("Invalid request body", StatusCode::BAD_REQUEST);
        }
    };

    if let Err(e) = validate_update(&data) {
        warn!("Update validation failed: {}", e);
        return deliver_message_json(&e.to_string(), StatusCode::BAD_REQUEST);
    }

    if database::find_by_id(&state.db, &id).await?.is_none() {
        return deliver_message_json("User not found", StatusCode::NOT_FOUND);
    }

    if let Some(owner) = database::find_by_email(&state.db, &data.email).await? {
        if owner.id != id {
            return deliver_message_json("Email already exists", StatusCode::BAD_REQUEST);
        }
    }

    let update = UserUpdate {
        name: data.name,
        email: data.email,
        password: data.password,
    };

    match database::update_user(&state.db, &id, update).await {
        Ok(user) => {
            info!("User updated: {}", user.id);
            deliver_envelope("User updated successfully", user, StatusCode::OK)
        }
        Err(UserStoreError::NotFound) => {
            deliver_message_json("User not found", StatusCode::NOT_FOUND)
        }
        Err(e) => Err(e.into()),
    }
}
