//! sso-db – Speicher-Gateway
//!
//! Dieses Crate kapselt die Persistenz von Benutzern und Mandanten-Apps
//! hinter dem Repository-Pattern. Fehler des Speichers werden hier in ein
//! festes Vokabular ([`DbError`]) uebersetzt, damit der Auth-Service nie
//! Fehlermeldungen auswerten muss.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use models::{AppRecord, BenutzerRecord, NeuerBenutzer};
pub use repository::{AppRepository, DatabaseConfig, DbResult, UserRepository};
pub use sqlite::SqliteDb;
