use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::info;

use shared::types::User;

use crate::database::password::{hash_password, verify_password};

#[derive(Error, Debug)]
pub enum UserStoreError {
    #[error("Email already exists")]
    EmailExists,

    #[error("User not found")]
    NotFound,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Fields accepted when creating a user.  The password arrives in
/// plaintext and is hashed before it touches the database.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Fields accepted on update.  `password: None` keeps the stored hash.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password: row.try_get("password")?,
    })
}

/// Create a user; rejects duplicate emails before hashing.
///
/// Returns the stored record with the password redacted, like every other
/// read path out of this module.
pub async fn create_user(pool: &SqlitePool, new_user: NewUser) -> Result<User, UserStoreError> {
    if find_by_email(pool, &new_user.email).await?.is_some() {
        return Err(UserStoreError::EmailExists);
    }

    let hash = hash_password(&new_user.password)
        .map_err(|e| UserStoreError::Hash(e.to_string()))?;
    let id = uuid::Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO users (id, name, email, password) VALUES (?1, ?2, ?3, ?4)")
        .bind(&id)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&hash)
        .execute(pool)
        .await?;

    info!("New user created: {}", new_user.email);

    Ok(User {
        id,
        name: new_user.name,
        email: new_user.email,
        password: hash,
    }
    .redacted())
}

/// Update name, email and optionally the password (re-hashed when given).
pub async fn update_user(
    pool: &SqlitePool,
    id: &str,
    update: UserUpdate,
) -> Result<User, UserStoreError> {
    let password_hash = match update.password.as_deref() {
        Some(plain) if !plain.is_empty() => {
            Some(hash_password(plain).map_err(|e| UserStoreError::Hash(e.to_string()))?)
        }
        _ => None,
    };

    let result = match password_hash {
        Some(hash) => {
            sqlx::query("UPDATE users SET name = ?1, email = ?2, password = ?3 WHERE id = ?4")
                .bind(&update.name)
                .bind(&update.email)
                .bind(&hash)
                .bind(id)
                .execute(pool)
                .await?
        }
        None => {
            sqlx::query("UPDATE users SET name = ?1, email = ?2 WHERE id = ?3")
                .bind(&update.name)
                .bind(&update.email)
                .bind(id)
                .execute(pool)
                .await?
        }
    };

    if result.rows_affected() == 0 {
        return Err(UserStoreError::NotFound);
    }

    find_by_id(pool, id).await?.ok_or(UserStoreError::NotFound)
}

/// Delete a user, returning the (redacted) record that was removed.
pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<User, UserStoreError> {
    let user = find_by_id(pool, id).await?.ok_or(UserStoreError::NotFound)?;

    sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;

    info!("User deleted: {}", id);
    Ok(user)
}

/// Look a user up by email, **unredacted**.
///
/// The only read path that returns the stored hash — login needs it for
/// comparison.  Never serialize this result; call `.redacted()` first.
pub async fn find_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, UserStoreError> {
    let row = sqlx::query("SELECT id, name, email, password FROM users WHERE email = ?1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_user).transpose().map_err(Into::into)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, UserStoreError> {
    let row = sqlx::query("SELECT id, name, email, password FROM users WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row
        .as_ref()
        .map(row_to_user)
        .transpose()?
        .map(User::redacted))
}

pub async fn find_all(pool: &SqlitePool) -> Result<Vec<User>, UserStoreError> {
    let rows = sqlx::query("SELECT id, name, email, password FROM users ORDER BY rowid")
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| row_to_user(row).map(User::redacted).map_err(Into::into))
        .collect()
}

/// Compare credentials; `None` covers both unknown email and wrong
/// password so callers cannot distinguish the two from this layer.
pub async fn verify_user(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<Option<User>, UserStoreError> {
    let Some(user) = find_by_email(pool, email).await? else {
        return Ok(None);
    };

    let matches = verify_password(&user.password, password)
        .map_err(|e| UserStoreError::Hash(e.to_string()))?;

    Ok(matches.then(|| user.redacted()))
}
