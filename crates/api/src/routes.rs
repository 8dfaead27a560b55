//! Route-Definitionen fuer die REST-API (/v1/...)

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, ApiState};

/// Erstellt den vollstaendigen /v1/-Router inklusive Health-Check
pub fn v1_router() -> Router<ApiState> {
    Router::new()
        // Authentifizierung
        .route("/v1/auth/register", post(handlers::register))
        .route("/v1/auth/login", post(handlers::login))
        // Benutzer
        .route("/v1/users/:id/admin", get(handlers::is_admin))
        .route("/health", get(handlers::health))
}
