//! sso-api – HTTP/JSON-Adapter fuer den SSO-Dienst
//!
//! Bildet die drei Operationen des Auth-Service auf eine REST-Schnittstelle
//! ab (/v1/...):
//! - `POST /v1/auth/register`
//! - `POST /v1/auth/login`
//! - `GET  /v1/users/:id/admin`
//!
//! Der Adapter prueft nur, ob Pflichtfelder gesetzt sind, und uebersetzt
//! Fehlerarten in HTTP-Statuscodes. Interne Fehlerursachen verlassen den
//! Prozess nie.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use sso_auth::{Anfragekontext, AuthResult, AuthService, TokenAussteller};
use sso_core::{AppId, UserId};
use sso_db::{AppRepository, UserRepository};

pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, ApiServerKonfig};

/// Die Operationen, die der Adapter vom Auth-Service benoetigt
#[async_trait]
pub trait AuthOperationen: Send + Sync {
    async fn registrieren(
        &self,
        ctx: &Anfragekontext,
        email: &str,
        passwort: &str,
    ) -> AuthResult<UserId>;

    async fn anmelden(
        &self,
        ctx: &Anfragekontext,
        email: &str,
        passwort: &str,
        app_id: AppId,
    ) -> AuthResult<String>;

    async fn ist_admin(&self, ctx: &Anfragekontext, user_id: UserId) -> AuthResult<bool>;
}

#[async_trait]
impl<U, A, T> AuthOperationen for AuthService<U, A, T>
where
    U: UserRepository + ?Sized,
    A: AppRepository + ?Sized,
    T: TokenAussteller + ?Sized,
{
    async fn registrieren(
        &self,
        ctx: &Anfragekontext,
        email: &str,
        passwort: &str,
    ) -> AuthResult<UserId> {
        AuthService::registrieren(self, ctx, email, passwort).await
    }

    async fn anmelden(
        &self,
        ctx: &Anfragekontext,
        email: &str,
        passwort: &str,
        app_id: AppId,
    ) -> AuthResult<String> {
        AuthService::anmelden(self, ctx, email, passwort, app_id).await
    }

    async fn ist_admin(&self, ctx: &Anfragekontext, user_id: UserId) -> AuthResult<bool> {
        AuthService::ist_admin(self, ctx, user_id).await
    }
}

/// Axum-State fuer den HTTP-Adapter
#[derive(Clone)]
pub struct ApiState {
    pub auth: Arc<dyn AuthOperationen>,
    /// Frist pro Anfrage
    pub anfrage_timeout: Duration,
    /// Wird beim Herunterfahren ausgeloest und bricht laufende Anfragen ab
    pub abbruch: CancellationToken,
}

impl ApiState {
    pub fn neu(
        auth: Arc<dyn AuthOperationen>,
        anfrage_timeout: Duration,
        abbruch: CancellationToken,
    ) -> Self {
        Self {
            auth,
            anfrage_timeout,
            abbruch,
        }
    }

    /// Erzeugt den Kontext fuer eine einzelne Anfrage
    pub fn kontext(&self) -> Anfragekontext {
        Anfragekontext::mit_timeout(self.anfrage_timeout).unter(&self.abbruch)
    }
}
