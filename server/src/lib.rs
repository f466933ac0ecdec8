//! Invitation backend server.
//!
//! HTTP API for user accounts behind an admission pipeline of CORS,
//! CSRF origin validation and fixed-window rate limiting. Handlers
//! speak a uniform `{"message", "data"}` JSON envelope.

pub mod auth;
pub mod database;
pub mod handlers;
pub mod pipeline;
pub mod security;
pub mod tower_middle;
pub mod validations;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::TokenKeys;
use crate::security::CounterStore;
use shared::config::LiveConfig;

/// Shared state handed to every handler and middleware.
///
/// Cheap to clone: everything inside is a pool or an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: LiveConfig,
    pub keys: Arc<TokenKeys>,
    pub counters: Arc<dyn CounterStore>,
}
