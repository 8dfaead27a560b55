//! Gemeinsame Identifikationstypen
//!
//! Benutzer- und App-IDs verwenden das Newtype-Pattern, damit eine App-ID
//! nie versehentlich als Benutzer-ID in eine Abfrage gelangt.

use serde::{Deserialize, Serialize};

/// Benutzer-ID (Surrogatschluessel, vom Speicher vergeben)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Gibt den inneren Zahlenwert zurueck
    pub fn inner(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// App-ID eines Mandanten (ausserhalb dieses Dienstes vergeben)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(pub i32);

impl AppId {
    /// Gibt den inneren Zahlenwert zurueck
    pub fn inner(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "app:{}", self.0)
    }
}
