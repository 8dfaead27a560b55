//! sso-server – Bibliotheks-Root
//!
//! Verdrahtet Datenbank, Auth-Service und HTTP-Adapter und stellt den
//! oeffentlichen Einstiegspunkt fuer Integrationstests bereit.

pub mod config;
pub mod logging;

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use config::ServerConfig;
use sso_api::{ApiServer, ApiServerKonfig, ApiState};
use sso_auth::{AuthKonfig, AuthService, JwtAussteller};
use sso_db::SqliteDb;
use tokio_util::sync::CancellationToken;

/// Haelt den Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet den Server und laeuft bis Ctrl-C / SIGTERM
    pub async fn starten(self) -> Result<()> {
        self.starten_bis(shutdown_signal()).await
    }

    /// Startet den Server und laeuft, bis `shutdown` abgeschlossen ist
    ///
    /// Reihenfolge:
    /// 1. Datenbank oeffnen und Migrationen ausfuehren
    /// 2. Auth-Service aufbauen
    /// 3. HTTP-API starten
    /// 4. Beim Shutdown laufende Anfragen abbrechen und den Pool schliessen
    pub async fn starten_bis<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.api_socket_adresse()?;

        tracing::info!(
            api = %bind_addr,
            datenbank = %self.config.datenbank.url,
            token_ttl_s = self.config.auth.token_ttl_sekunden,
            "Server startet"
        );

        let db = Arc::new(SqliteDb::oeffnen(&self.config.datenbank_config()).await?);

        let service = AuthService::neu(
            Arc::clone(&db),
            Arc::clone(&db),
            Arc::new(JwtAussteller::neu()),
            AuthKonfig {
                token_ttl: self.config.token_ttl(),
            },
        );

        let abbruch = CancellationToken::new();
        let state = ApiState::neu(
            Arc::new(service),
            self.config.anfrage_timeout(),
            abbruch.clone(),
        );

        let signal = async move {
            shutdown.await;
            tracing::info!("Shutdown-Signal empfangen, laufende Anfragen werden abgebrochen");
            abbruch.cancel();
        };

        let ergebnis = ApiServer::neu(ApiServerKonfig { bind_addr })
            .starten(state, signal)
            .await;

        db.schliessen().await;
        ergebnis
    }
}

/// Wartet auf Ctrl-C oder (unter Unix) SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(fehler = %e, "Ctrl-C-Handler konnte nicht installiert werden");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(fehler = %e, "SIGTERM-Handler konnte nicht installiert werden");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
