//! Fehlertypen fuer den HTTP-Adapter

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use sso_auth::AuthError;
use thiserror::Error;

/// Alle Fehler, die ein Handler zurueckgeben kann
#[derive(Debug, Error)]
pub enum ApiError {
    /// Pflichtfeld fehlt oder ist leer
    #[error("{0}")]
    UngueltigeEingabe(&'static str),

    /// Request-Body ist kein gueltiges JSON fuer den Endpunkt
    #[error("{}", .0.body_text())]
    Koerper(#[from] JsonRejection),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Ergebnis-Typ der Handler
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP-Statuscode fuer REST-Fehler
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::UngueltigeEingabe(_) => StatusCode::BAD_REQUEST,
            Self::Koerper(rejection) => rejection.status(),
            Self::Auth(e) => match e {
                AuthError::UngueltigeAnmeldedaten => StatusCode::UNAUTHORIZED,
                AuthError::UngueltigeAppId => StatusCode::BAD_REQUEST,
                AuthError::BenutzerExistiert => StatusCode::CONFLICT,
                AuthError::BenutzerNichtGefunden(_) => StatusCode::NOT_FOUND,
                AuthError::Zeitlimit => StatusCode::GATEWAY_TIMEOUT,
                AuthError::Abgebrochen => StatusCode::SERVICE_UNAVAILABLE,
                AuthError::Intern(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Meldung fuer den Aufrufer; interne Ursachen werden ersetzt
    pub fn oeffentliche_meldung(&self) -> String {
        match self {
            Self::Auth(AuthError::Intern(_)) => "Interner Serverfehler".to_string(),
            andere => andere.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if let Self::Auth(AuthError::Intern(ursache)) = &self {
            tracing::error!(fehler = %ursache, "Anfrage mit internem Fehler beendet");
        }

        (
            status,
            Json(json!({ "error": { "code": status.as_u16(), "message": self.oeffentliche_meldung() } })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sso_core::UserId;

    #[test]
    fn statuscodes() {
        let fall = |e: AuthError| ApiError::from(e).http_status();
        assert_eq!(fall(AuthError::UngueltigeAnmeldedaten), StatusCode::UNAUTHORIZED);
        assert_eq!(fall(AuthError::UngueltigeAppId), StatusCode::BAD_REQUEST);
        assert_eq!(fall(AuthError::BenutzerExistiert), StatusCode::CONFLICT);
        assert_eq!(fall(AuthError::BenutzerNichtGefunden(UserId(1))), StatusCode::NOT_FOUND);
        assert_eq!(fall(AuthError::Zeitlimit), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(fall(AuthError::Abgebrochen), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(fall(AuthError::intern("x")), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::UngueltigeEingabe("email required").http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn interne_ursache_wird_verborgen() {
        let e = ApiError::from(AuthError::intern("SQLx-Fehler: database is locked"));
        assert_eq!(e.oeffentliche_meldung(), "Interner Serverfehler");
    }
}
