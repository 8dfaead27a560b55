//! sso-core – Gemeinsame Typen
//!
//! Dieses Crate stellt die Identifikationstypen bereit, die von Speicher,
//! Auth-Service und HTTP-Adapter gemeinsam genutzt werden.

pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use types::{AppId, UserId};
