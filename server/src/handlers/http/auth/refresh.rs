use anyhow::Result;
use bytes::Bytes;
use hyper::{Request, Response, StatusCode};
use tracing::{info, warn};

use crate::database;
use crate::handlers::http::utils::{
    deliver_envelope, deliver_message_json, get_bearer_token, ApiBody,
};
use crate::AppState;

use shared::types::AuthData;

/// GET /api/refresh-token — exchange a refresh token for a fresh pair.
///
/// The refresh token rides in the `Authorization: Bearer` header, not
/// the body. A verified token whose user has since been deleted answers
/// 404, keeping the same "Unauthorized" message as the 401 cases.
pub async fn handle_refresh_token(
    req: Request<Bytes>,
    state: AppState,
) -> Result<Response<ApiBody>> {
    let Some(token) = get_bearer_token(req.headers()) else {
        return deliver_message_json("Unauthorized", StatusCode::UNAUTHORIZED);
    };

    let claims = match state.keys.verify_refresh(&token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Refresh token rejected: {}", e);
            return deliver_message_json("Unauthorized", StatusCode::UNAUTHORIZED);
        }
    };

    let Some(user) = database::find_by_id(&state.db, &claims.id).await? else {
        warn!("Refresh token for vanished user {}", claims.id);
        return deliver_message_json("Unauthorized", StatusCode::NOT_FOUND);
    };

    let token = state.keys.issue_access(&user)?;
    let refresh_token = state.keys.issue_refresh(&user)?;

    info!("Token refreshed for {}", user.id);

    deliver_envelope(
        "Token refreshed successfully",
        AuthData {
            user,
            token,
            refresh_token,
        },
        StatusCode::OK,
    )
}
