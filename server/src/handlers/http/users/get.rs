use anyhow::Result;
use bytes::Bytes;
use hyper::{Request, Response, StatusCode};

use crate::database;
use crate::handlers::http::routes::Router;
use crate::handlers::http::utils::{deliver_envelope, deliver_message_json, ApiBody};
use crate::AppState;

use shared::types::TokenClaims;

/// GET /api/users/:id
pub async fn handle_get_user(
    req: Request<Bytes>,
    state: AppState,
    _claims: TokenClaims,
) -> Result<Response<ApiBody>> {
    let Some(id) = Router::matched_param(&req) else {
        return deliver_message_json("User not found", StatusCode::NOT_FOUND);
    };

    match database::find_by_id(&state.db, &id).await? {
        Some(user) => deliver_envelope("User found successfully", user, StatusCode::OK),
        None => deliver_message_json("User not found", StatusCode::NOT_FOUND),
    }
}
