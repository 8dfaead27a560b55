//! Fehlertypen fuer den Auth-Service
//!
//! Jede Variante ist eine eigenstaendige Fehlerart, auf die Aufrufer
//! verzweigen koennen. Fehler aus dem Speicher werden im Service explizit
//! auf diese Varianten abgebildet; es gibt kein `From<DbError>`.

use sso_core::UserId;
use thiserror::Error;

/// Alle moeglichen Fehler im Auth-Service
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Authentifizierung ---
    /// E-Mail unbekannt oder Passwort falsch; beide Faelle sind fuer den
    /// Aufrufer nicht unterscheidbar.
    #[error("E-Mail oder Passwort falsch")]
    UngueltigeAnmeldedaten,

    #[error("Ungueltige App-ID")]
    UngueltigeAppId,

    // --- Benutzerverwaltung ---
    #[error("Benutzer existiert bereits")]
    BenutzerExistiert,

    #[error("Benutzer nicht gefunden: {0}")]
    BenutzerNichtGefunden(UserId),

    // --- Frist / Abbruch ---
    #[error("Zeitlimit ueberschritten")]
    Zeitlimit,

    #[error("Anfrage abgebrochen")]
    Abgebrochen,

    // --- Intern ---
    /// Hashing-, Signatur- und nicht klassifizierte Speicherfehler.
    /// Die Ursache ist nur fuer Logs bestimmt.
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Gibt true zurueck wenn ein erneuter Versuch sinnvoll sein koennte
    pub fn ist_wiederholbar(&self) -> bool {
        matches!(self, Self::Zeitlimit | Self::Abgebrochen)
    }
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthError>;
