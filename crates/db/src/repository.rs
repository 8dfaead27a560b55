//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt den Auth-Service von der konkreten
//! Datenbank-Implementierung. Alle Operationen sind Punktabfragen bzw.
//! einzelne Inserts; Transaktionen werden nicht benoetigt.

use async_trait::async_trait;
use sso_core::{AppId, UserId};

use crate::error::DbError;
use crate::models::{AppRecord, BenutzerRecord, NeuerBenutzer};

/// Result-Alias fuer Repository-Operationen
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://sso.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://sso.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Repository fuer Benutzer-Datenzugriffe
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Legt einen neuen Benutzer an und gibt die vergebene ID zurueck
    ///
    /// Gibt `DbError::BenutzerExistiert` zurueck wenn die E-Mail vergeben ist.
    /// Die Pruefung erfolgt ueber den UNIQUE-Constraint, nicht vorab.
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<UserId>;

    /// Laedt einen Benutzer anhand seiner E-Mail
    ///
    /// Gibt `DbError::BenutzerNichtGefunden` zurueck wenn keine Zeile existiert.
    async fn get_by_email(&self, email: &str) -> DbResult<BenutzerRecord>;

    /// Liest das Admin-Flag eines Benutzers
    ///
    /// Gibt `DbError::BenutzerNichtGefunden` zurueck wenn keine Zeile existiert.
    async fn is_admin(&self, id: UserId) -> DbResult<bool>;
}

/// Repository fuer Mandanten-Apps (nur lesend)
#[async_trait]
pub trait AppRepository: Send + Sync {
    /// Laedt eine App anhand ihrer ID
    ///
    /// Gibt `DbError::AppNichtGefunden` zurueck wenn keine Zeile existiert.
    async fn get_by_id(&self, id: AppId) -> DbResult<AppRecord>;
}
