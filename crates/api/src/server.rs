//! Axum HTTP-Server fuer den SSO-Dienst

use std::future::Future;
use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::{routes::v1_router, ApiState};

/// REST-Server-Konfiguration
#[derive(Debug, Clone)]
pub struct ApiServerKonfig {
    pub bind_addr: SocketAddr,
}

impl Default for ApiServerKonfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

/// Baut die fertige Anwendung mit Tracing-Layer und State
pub fn app(state: ApiState) -> Router {
    v1_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Axum HTTP-Server fuer den SSO-Dienst
pub struct ApiServer {
    konfig: ApiServerKonfig,
}

impl ApiServer {
    pub fn neu(konfig: ApiServerKonfig) -> Self {
        Self { konfig }
    }

    /// Startet den Server und laeuft, bis `shutdown` abgeschlossen ist.
    ///
    /// Neue Verbindungen werden danach abgelehnt, laufende Anfragen duerfen
    /// noch zu Ende laufen. Ihr Kontext haengt am Abbruch-Token des States.
    pub async fn starten<F>(self, state: ApiState, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = app(state);

        let listener = tokio::net::TcpListener::bind(self.konfig.bind_addr).await?;
        tracing::info!(addr = %listener.local_addr()?, "SSO-API-Server gestartet");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("SSO-API-Server beendet");
        Ok(())
    }
}
