//! REST-Handler fuer die Auth-Endpunkte

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use sso_core::{AppId, UserId};

use crate::{
    error::{ApiError, ApiResult},
    ApiState,
};

// Fehlende Felder werden zu Leerwerten, damit die Pflichtfeldpruefung
// einheitliche Fehlermeldungen liefert.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegistrierenBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegistrierenAntwort {
    pub user_id: UserId,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnmeldenBody {
    pub email: String,
    pub password: String,
    pub app_id: i32,
}

#[derive(Debug, Serialize)]
pub struct AnmeldenAntwort {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct IstAdminAntwort {
    pub is_admin: bool,
}

/// POST /v1/auth/register
pub async fn register(
    State(state): State<ApiState>,
    body: Result<Json<RegistrierenBody>, JsonRejection>,
) -> ApiResult<Json<RegistrierenAntwort>> {
    let Json(body) = body?;
    if body.email.is_empty() {
        return Err(ApiError::UngueltigeEingabe("email required"));
    }
    if body.password.is_empty() {
        return Err(ApiError::UngueltigeEingabe("password required"));
    }

    let ctx = state.kontext();
    let user_id = state
        .auth
        .registrieren(&ctx, &body.email, &body.password)
        .await?;

    Ok(Json(RegistrierenAntwort { user_id }))
}

/// POST /v1/auth/login
pub async fn login(
    State(state): State<ApiState>,
    body: Result<Json<AnmeldenBody>, JsonRejection>,
) -> ApiResult<Json<AnmeldenAntwort>> {
    let Json(body) = body?;
    if body.email.is_empty() {
        return Err(ApiError::UngueltigeEingabe("email required"));
    }
    if body.password.is_empty() {
        return Err(ApiError::UngueltigeEingabe("password required"));
    }
    if body.app_id == 0 {
        return Err(ApiError::UngueltigeEingabe("app_id required"));
    }

    let ctx = state.kontext();
    let token = state
        .auth
        .anmelden(&ctx, &body.email, &body.password, AppId(body.app_id))
        .await?;

    Ok(Json(AnmeldenAntwort { token }))
}

/// GET /v1/users/:id/admin
pub async fn is_admin(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<IstAdminAntwort>> {
    if id == 0 {
        return Err(ApiError::UngueltigeEingabe("user_id required"));
    }

    let ctx = state.kontext();
    let is_admin = state.auth.ist_admin(&ctx, UserId(id)).await?;

    Ok(Json(IstAdminAntwort { is_admin }))
}

/// GET /health – Health-Check-Endpunkt
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
