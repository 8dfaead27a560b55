//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sso_db::DatabaseConfig;

/// Obergrenze fuer die Token-Lebensdauer: ein Jahr
pub const MAX_TOKEN_TTL_SEKUNDEN: u64 = 365 * 24 * 60 * 60;

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// Token-Einstellungen
    pub auth: AuthEinstellungen,
    /// Grenzen pro Anfrage
    pub anfrage: AnfrageEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer die HTTP-API
    pub bind_adresse: String,
    /// Port fuer die HTTP-API
    pub port: u16,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    /// WAL-Modus aktivieren
    pub sqlite_wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_verbindungen: db.max_verbindungen,
            sqlite_wal: db.sqlite_wal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthEinstellungen {
    /// Gueltigkeitsdauer ausgestellter Tokens in Sekunden
    pub token_ttl_sekunden: u64,
}

impl Default for AuthEinstellungen {
    fn default() -> Self {
        Self {
            token_ttl_sekunden: 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnfrageEinstellungen {
    /// Frist pro Anfrage in Millisekunden
    pub timeout_ms: u64,
}

impl Default for AnfrageEinstellungen {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                config.pruefen()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Lehnt Werte ab, mit denen der Dienst nicht sinnvoll laufen kann
    pub fn pruefen(&self) -> anyhow::Result<()> {
        if self.auth.token_ttl_sekunden == 0 {
            anyhow::bail!("auth.token_ttl_sekunden muss groesser als 0 sein");
        }
        if self.auth.token_ttl_sekunden > MAX_TOKEN_TTL_SEKUNDEN {
            anyhow::bail!(
                "auth.token_ttl_sekunden darf hoechstens {MAX_TOKEN_TTL_SEKUNDEN} sein"
            );
        }
        if self.anfrage.timeout_ms == 0 {
            anyhow::bail!("anfrage.timeout_ms muss groesser als 0 sein");
        }
        if self.datenbank.max_verbindungen == 0 {
            anyhow::bail!("datenbank.max_verbindungen muss groesser als 0 sein");
        }
        if !crate::logging::log_format_gueltig(&self.logging.format) {
            anyhow::bail!(
                "logging.format '{}' unbekannt (erlaubt: text, json)",
                self.logging.format
            );
        }
        Ok(())
    }

    /// Gibt die vollstaendige Bind-Adresse fuer die HTTP-API zurueck
    pub fn api_bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.port)
    }

    /// Wie [`Self::api_bind_adresse`], aber als `SocketAddr`
    pub fn api_socket_adresse(&self) -> anyhow::Result<SocketAddr> {
        let adresse = self.api_bind_adresse();
        adresse
            .parse()
            .with_context(|| format!("Ungueltige Bind-Adresse '{adresse}'"))
    }

    pub fn datenbank_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.datenbank.url.clone(),
            max_verbindungen: self.datenbank.max_verbindungen,
            sqlite_wal: self.datenbank.sqlite_wal,
        }
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.token_ttl_sekunden)
    }

    pub fn anfrage_timeout(&self) -> Duration {
        Duration::from_millis(self.anfrage.timeout_ms)
    }
}
