//! Anfragekontext mit Frist und Abbruchsignal
//!
//! Jede Service-Operation erhaelt einen [`Anfragekontext`]. Alle Schritte,
//! die auf den Speicher oder das Hashing warten, laufen ueber
//! [`Anfragekontext::begrenzen`] und werden bei Fristablauf oder Abbruch
//! verworfen, bevor ein veralteter Schreibvorgang abgeschlossen wird.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{AuthError, AuthResult};

/// Frist und Abbruchsignal einer einzelnen Anfrage
#[derive(Debug, Clone, Default)]
pub struct Anfragekontext {
    frist: Option<Instant>,
    abbruch: CancellationToken,
}

impl Anfragekontext {
    /// Kontext ohne Frist, der nur explizit abgebrochen werden kann
    pub fn neu() -> Self {
        Self::default()
    }

    /// Kontext mit Frist relativ zu jetzt
    pub fn mit_timeout(timeout: Duration) -> Self {
        Self::neu().frist(Instant::now() + timeout)
    }

    /// Setzt eine absolute Frist
    pub fn frist(mut self, frist: Instant) -> Self {
        self.frist = Some(frist);
        self
    }

    /// Koppelt den Kontext an ein uebergeordnetes Abbruchsignal
    ///
    /// Ein Abbruch des Elternsignals bricht auch diesen Kontext ab.
    pub fn unter(mut self, eltern: &CancellationToken) -> Self {
        self.abbruch = eltern.child_token();
        self
    }

    /// Bricht alle laufenden Schritte dieses Kontexts ab
    pub fn abbrechen(&self) {
        self.abbruch.cancel();
    }

    pub fn ist_abgebrochen(&self) -> bool {
        self.abbruch.is_cancelled()
    }

    /// Verbleibende Zeit bis zur Frist
    pub fn verbleibend(&self) -> Option<Duration> {
        self.frist
            .map(|f| f.saturating_duration_since(Instant::now()))
    }

    /// Fuehrt `fut` aus, solange weder Frist noch Abbruch eingetreten sind
    ///
    /// Ist die Frist bereits abgelaufen, wird `fut` nie gepollt.
    pub async fn begrenzen<F>(&self, fut: F) -> AuthResult<F::Output>
    where
        F: Future,
    {
        match self.frist {
            Some(frist) => tokio::select! {
                biased;
                _ = self.abbruch.cancelled() => Err(AuthError::Abgebrochen),
                _ = tokio::time::sleep_until(frist) => Err(AuthError::Zeitlimit),
                wert = fut => Ok(wert),
            },
            None => tokio::select! {
                biased;
                _ = self.abbruch.cancelled() => Err(AuthError::Abgebrochen),
                wert = fut => Ok(wert),
            },
        }
    }
}
