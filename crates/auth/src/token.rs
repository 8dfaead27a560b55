//! Token-Ausstellung pro Mandant
//!
//! Ein Token ist ein HS256-signiertes JWT ueber die Claims
//! `uid`, `email`, `app_id` und `exp`. Signiert wird mit dem Secret der
//! ausstellenden App; ohne dieses Secret ist das Token wertlos. Die App-ID
//! steht im Token, damit ein Pruefer das passende Secret findet.
//!
//! Tokens werden weder gespeichert noch widerrufen. `iat` und `jti` sorgen
//! dafuer, dass zwei Logins in derselben Sekunde verschiedene Tokens liefern.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sso_core::{AppId, UserId};
use sso_db::{AppRecord, BenutzerRecord};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Claims eines Session-Tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Benutzer-ID
    pub uid: i64,
    /// E-Mail des Benutzers
    pub email: String,
    /// ID der ausstellenden App
    pub app_id: i32,
    /// Ausstellungszeitpunkt (Unix-Sekunden)
    pub iat: i64,
    /// Absoluter Ablaufzeitpunkt (Unix-Sekunden)
    pub exp: i64,
    /// Zufaellige Token-ID
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> UserId {
        UserId(self.uid)
    }

    pub fn app(&self) -> AppId {
        AppId(self.app_id)
    }
}

/// Stellt signierte Tokens fuer einen Benutzer und eine App aus
pub trait TokenAussteller: Send + Sync {
    fn ausstellen(
        &self,
        benutzer: &BenutzerRecord,
        app: &AppRecord,
        ttl: Duration,
    ) -> AuthResult<String>;
}

/// JWT-Aussteller mit HS256 und dem App-Secret als Schluessel
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtAussteller;

impl JwtAussteller {
    pub fn neu() -> Self {
        Self
    }
}

impl TokenAussteller for JwtAussteller {
    fn ausstellen(
        &self,
        benutzer: &BenutzerRecord,
        app: &AppRecord,
        ttl: Duration,
    ) -> AuthResult<String> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AuthError::intern(format!("Token-TTL ausserhalb des Bereichs: {e}")))?;

        let jetzt = Utc::now();
        let ablauf = jetzt
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::intern("Token-Ablauf liegt ausserhalb des Datumsbereichs"))?;
        let claims = Claims {
            uid: benutzer.id.inner(),
            email: benutzer.email.clone(),
            app_id: app.id.inner(),
            iat: jetzt.timestamp(),
            exp: ablauf.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(app.secret.as_bytes()),
        )
        .map_err(|e| AuthError::intern(format!("Token-Signatur fehlgeschlagen: {e}")))
    }
}

/// Prueft Signatur und Ablauf eines Tokens mit dem Secret der App
///
/// Fuer Dienste, die Tokens dieses Dienstes verifizieren.
pub fn token_pruefen(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|daten| daten.claims)
}
