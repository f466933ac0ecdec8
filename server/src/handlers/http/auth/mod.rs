pub mod csrf_token;
pub mod login;
pub mod refresh;
pub mod register;

pub use csrf_token::handle_csrf_token;
pub use login::handle_login;
pub use refresh::handle_refresh_token;
pub use register::handle_register;
