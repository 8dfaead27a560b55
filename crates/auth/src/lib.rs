//! sso-auth – Authentifizierungs- und Token-Service
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit Argon2id
//! - Token-Ausstellung pro Mandant (HS256-JWT mit dem App-Secret)
//! - Anfragekontext mit Frist und Abbruchsignal
//! - AuthService (Registrierung, Login, Admin-Abfrage)

pub mod error;
pub mod kontext;
pub mod password;
pub mod service;
pub mod token;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult};
pub use kontext::Anfragekontext;
pub use password::{passwort_hashen, passwort_verifizieren};
pub use service::{AuthKonfig, AuthService};
pub use token::{token_pruefen, Claims, JwtAussteller, TokenAussteller};
