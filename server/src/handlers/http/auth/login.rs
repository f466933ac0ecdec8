use anyhow::Result;
use bytes::Bytes;
use hyper::{Request, Response, StatusCode};
use tracing::{info, warn};

use crate::database;
use crate::handlers::http::utils::{deliver_envelope, deliver_message_json, ApiBody};
use crate::validations::validate_login;
use crate::AppState;

use shared::types::{AuthData, LoginData};

/// POST /api/login — verify credentials and issue the token pair.
///
/// Unknown email answers 404 before the password is ever checked; a
/// known email with a wrong password answers 401.
pub async fn handle_login(req: Request<Bytes>, state: AppState) -> Result<Response<ApiBody>> {
    let data: LoginData = match serde_json::from_slice(req.body()) {
        Ok(data) => data,
        Err(e) => {
            warn!("Login body rejected: {}", e);
            return deliver_message_json("Invalid request body", StatusCode::BAD_REQUEST);
        }
    };

    if let Err(e) = validate_login(&data) {
        warn!("Login validation failed: {}", e);
        return deliver_message_json(&e.to_string(), StatusCode::BAD_REQUEST);
    }

    if database::find_by_email(&state.db, &data.email).await?.is_none() {
        return deliver_message_json("User not found", StatusCode::NOT_FOUND);
    }

    let Some(user) = database::verify_user(&state.db, &data.email, &data.password).await? else {
        warn!("Failed login for {}", data.email);
        return deliver_message_json("Invalid credentials", StatusCode::UNAUTHORIZED);
    };

    let token = state.keys.issue_access(&user)?;
    let refresh_token = state.keys.issue_refresh(&user)?;

    info!("User logged in: {}", user.id);

    deliver_envelope(
        "User logged in successfully",
        AuthData {
            user,
            token,
            refresh_token,
        },
        StatusCode::OK,
    )
}
