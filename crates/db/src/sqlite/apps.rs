//! SQLite-Implementierung des AppRepository

use async_trait::async_trait;
use sqlx::Row as _;
use sso_core::AppId;

use crate::error::DbError;
use crate::models::AppRecord;
use crate::repository::{AppRepository, DbResult};
use crate::sqlite::pool::SqliteDb;

#[async_trait]
impl AppRepository for SqliteDb {
    async fn get_by_id(&self, id: AppId) -> DbResult<AppRecord> {
        let row = sqlx::query("SELECT id, name, secret FROM apps WHERE id = ?")
            .bind(id.inner())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::AppNichtGefunden)?;

        Ok(AppRecord {
            id: AppId(row.try_get("id")?),
            name: row.try_get("name")?,
            secret: row.try_get("secret")?,
        })
    }
}
