//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `karigar-core` using sqlx with split
//! read/write pools: raw queries, private Row structs.

use karigar_core::repository::user::UserRepository;
use karigar_types::error::RepositoryError;
use karigar_types::user::{Role, UserId, UserProfile};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain UserProfile.
struct UserRow {
    id: String,
    email: String,
    phone: Option<String>,
    full_name: String,
    avatar_url: Option<String>,
    location: Option<String>,
    is_provider: bool,
    current_role: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            full_name: row.try_get("full_name")?,
            avatar_url: row.try_get("avatar_url")?,
            location: row.try_get("location")?,
            is_provider: row.try_get("is_provider")?,
            current_role: row.try_get("current_role")?,
        })
    }

    fn into_user(self) -> Result<UserProfile, RepositoryError> {
        let id = self
            .id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;
        let current_role: Role = self
            .current_role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(UserProfile {
            id,
            email: self.email,
            phone: self.phone,
            full_name: self.full_name,
            avatar_url: self.avatar_url,
            location: self.location,
            is_provider: self.is_provider,
            current_role,
        })
    }
}

impl UserRepository for SqliteUserRepository {
    async fn get_by_email(&self, email: &str) -> Result<Option<UserProfile>, RepositoryError> {
        // email is COLLATE NOCASE in the schema; = is case-insensitive.
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn get_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, user: &UserProfile) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (id, email, phone, full_name, avatar_url, location, is_provider, current_role)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 email = excluded.email,
                 phone = excluded.phone,
                 full_name = excluded.full_name,
                 avatar_url = excluded.avatar_url,
                 location = excluded.location,
                 is_provider = excluded.is_provider,
                 current_role = excluded.current_role",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.full_name)
        .bind(&user.avatar_url)
        .bind(&user.location)
        .bind(user.is_provider)
        .bind(user.current_role.to_string())
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                Err(RepositoryError::Conflict(format!(
                    "email '{}' already registered",
                    user.email
                )))
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }
}
