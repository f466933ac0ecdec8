use anyhow::Result;
use bytes::Bytes;
use hyper::{Request, Response, StatusCode};

use crate::database;
use crate::handlers::http::utils::{deliver_envelope, ApiBody};
use crate::AppState;

use shared::types::TokenClaims;

/// GET /api/users — list every user, passwords redacted.
pub async fn handle_list_users(
    _req: Request<Bytes>,
    state: AppState,
    _claims: TokenClaims,
) -> Result<Response<ApiBody>> {
    let users = database::find_all(&state.db).await?;
    deliver_envelope("Users found successfully", users, StatusCode::OK)
}
