use anyhow::Result;
use bytes::Bytes;
use hyper::{Request, Response, StatusCode};
use tracing::info;

use crate::database::{self, UserStoreError};
use crate::handlers::http::routes::Router;
use crate::handlers::http::utils::{deliver_envelope, deliver_message_json, ApiBody};
use crate::AppState;

use shared::types::TokenClaims;

/// DELETE /api/users/:id — returns the deleted record one last time.
pub async fn handle_delete_user(
    req: Request<Bytes>,
    state: AppState,
    _claims: TokenClaims,
) -> Result<Response<ApiBody>> {
    let Some(id) = Router::matched_param(&req) else {
        return deliver_message_json("User not found", StatusCode::NOT_FOUND);
    };

    match database::delete_user(&state.db, &id).await {
        Ok(user) => {
            info!("User deleted: {}", user.id);
            deliver_envelope("User deleted successfully", user, StatusCode::OK)
        }
        Err(UserStoreError::NotFound) => {
            deliver_message_json("User not found", StatusCode::NOT_FOUND)
        }
        Err(e) => Err(e.into()),
    }
}
