//! Fehlertypen fuer das Datenbank-Crate
//!
//! Aufrufer vergleichen Varianten, niemals Fehlermeldungen.

use thiserror::Error;

/// Datenbank-Fehlertypen
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Benutzer nicht gefunden")]
    BenutzerNichtGefunden,

    #[error("App nicht gefunden")]
    AppNichtGefunden,

    #[error("Benutzer mit dieser E-Mail existiert bereits")]
    BenutzerExistiert,

    #[error("SQLx-Fehler: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration-Fehler: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Klassifiziert einen Fehler beim Einfuegen eines Benutzers.
///
/// Die Eindeutigkeit wird ueber den nativen Constraint-Code erkannt,
/// nicht ueber den Meldungstext.
pub(crate) fn einfuege_fehler(e: sqlx::Error) -> DbError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => DbError::BenutzerExistiert,
        _ => DbError::Sqlx(e),
    }
}
