pub mod auth;
pub mod routes;
pub mod users;
pub mod utils;

pub use routes::Router;
