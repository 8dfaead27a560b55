//! Datenbankmodelle
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank und dienen als
//! reine Datenuebertragungsobjekte zwischen Speicher und Auth-Service.

use sso_core::{AppId, UserId};

// ---------------------------------------------------------------------------
// Benutzer
// ---------------------------------------------------------------------------

/// Benutzer-Datensatz aus der Datenbank
#[derive(Clone)]
pub struct BenutzerRecord {
    pub id: UserId,
    pub email: String,
    /// PHC-String des Passwort-Hashes, nie das Klartext-Passwort
    pub pass_hash: String,
    pub is_admin: bool,
}

impl std::fmt::Debug for BenutzerRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenutzerRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("pass_hash", &"<redacted>")
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

/// Daten zum Erstellen eines neuen Benutzers
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub email: &'a str,
    pub pass_hash: &'a str,
}

// ---------------------------------------------------------------------------
// Apps (Mandanten)
// ---------------------------------------------------------------------------

/// App-Datensatz aus der Datenbank
///
/// `secret` ist der Signaturschluessel des Mandanten und wird weder
/// geloggt noch ueber `Debug` ausgegeben.
#[derive(Clone)]
pub struct AppRecord {
    pub id: AppId,
    pub name: String,
    pub secret: String,
}

impl std::fmt::Debug for AppRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .finish()
    }
}
