pub mod delete;
pub mod get;
pub mod list;
pub mod update;

pub use delete::handle_delete_user;
pub use get::handle_get_user;
pub use list::handle_list_users;
pub use update::handle_update_user;
