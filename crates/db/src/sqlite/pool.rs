//! SQLite Connection Pool
//!
//! Der Pool ist die einzige geteilte Ressource des Dienstes. `SqlitePool`
//! ist intern synchronisiert; Aufrufer halten keine eigenen Locks.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::DbError;
use crate::repository::DatabaseConfig;

/// Wartezeit auf gesperrte Datenbankdateien bei gleichzeitigen Schreibern
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
/// Wartezeit auf eine freie Verbindung aus dem Pool
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Wrapper um den SQLite Connection Pool
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pub(crate) pool: SqlitePool,
}

impl SqliteDb {
    /// Oeffnet (oder erstellt) die Datenbank und fuehrt Migrationen aus
    pub async fn oeffnen(config: &DatabaseConfig) -> Result<Self, DbError> {
        let journal = if config.sqlite_wal {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        };
        let opts = verbindungsoptionen(&config.url)?
            .create_if_missing(true)
            .journal_mode(journal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_verbindungen)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(opts)
            .await?;

        info!(
            url = %config.url,
            wal = config.sqlite_wal,
            max_verbindungen = config.max_verbindungen,
            "SQLite-Pool geoeffnet"
        );

        Self::mit_migrationen(pool).await
    }

    /// Erstellt eine In-Memory-Datenbank fuer Tests
    ///
    /// Jede Verbindung sieht eine eigene In-Memory-Datenbank, deshalb haelt
    /// der Pool genau eine Verbindung dauerhaft offen.
    pub async fn in_memory() -> Result<Self, DbError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(verbindungsoptionen("sqlite::memory:")?)
            .await?;

        Self::mit_migrationen(pool).await
    }

    async fn mit_migrationen(pool: SqlitePool) -> Result<Self, DbError> {
        let db = Self { pool };
        db.migrationen_ausfuehren().await?;
        Ok(db)
    }

    /// Fuehrt alle ausstehenden Migrationen aus
    pub async fn migrationen_ausfuehren(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Datenbank-Migrationen abgeschlossen");
        Ok(())
    }

    /// Gibt den internen Pool zurueck (fuer Tests und Provisionierung)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Schliesst den Pool und wartet auf laufende Verbindungen
    pub async fn schliessen(&self) {
        self.pool.close().await;
        info!("SQLite-Pool geschlossen");
    }
}

fn verbindungsoptionen(url: &str) -> Result<SqliteConnectOptions, DbError> {
    Ok(SqliteConnectOptions::from_str(url)?
        .busy_timeout(BUSY_TIMEOUT)
        .foreign_keys(true))
}
