pub mod password;
pub mod schema;
pub mod users;

pub use password::{hash_password, verify_password};
pub use schema::create_tables;
pub use users::{
    create_user, delete_user, find_all, find_by_email, find_by_id, update_user, verify_user,
    NewUser, UserStoreError, UserUpdate,
};
