//! SQLite-Implementierung des UserRepository

use async_trait::async_trait;
use sso_core::UserId;

use crate::error::{einfuege_fehler, DbError};
use crate::models::{BenutzerRecord, NeuerBenutzer};
use crate::repository::{DbResult, UserRepository};
use crate::sqlite::pool::SqliteDb;

#[async_trait]
impl UserRepository for SqliteDb {
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<UserId> {
        let id = sqlx::query("INSERT INTO users (email, pass_hash) VALUES (?, ?)")
            .bind(data.email)
            .bind(data.pass_hash)
            .execute(&self.pool)
            .await
            .map_err(einfuege_fehler)?
            .last_insert_rowid();

        tracing::debug!(user_id = id, "Benutzer-Zeile eingefuegt");
        Ok(UserId(id))
    }

    async fn get_by_email(&self, email: &str) -> DbResult<BenutzerRecord> {
        let row = sqlx::query("SELECT id, email, pass_hash, is_admin FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::BenutzerNichtGefunden)?;

        row_to_benutzer(&row)
    }

    async fn is_admin(&self, id: UserId) -> DbResult<bool> {
        use sqlx::Row as _;

        let row = sqlx::query("SELECT is_admin FROM users WHERE id = ?")
            .bind(id.inner())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::BenutzerNichtGefunden)?;

        let is_admin: i64 = row.try_get("is_admin")?;
        Ok(is_admin != 0)
    }
}

fn row_to_benutzer(row: &sqlx::sqlite::SqliteRow) -> DbResult<BenutzerRecord> {
    use sqlx::Row as _;

    let is_admin: i64 = row.try_get("is_admin")?;

    Ok(BenutzerRecord {
        id: UserId(row.try_get("id")?),
        email: row.try_get("email")?,
        pass_hash: row.try_get("pass_hash")?,
        is_admin: is_admin != 0,
    })
}
