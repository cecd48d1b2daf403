//! Handlers for `/login` and `/accounts`.

use alumnet_core::{
  account::Account,
  accounts::NewAccount,
  store::AlumnetStore,
};
use axum::{
  Json,
  extract::State,
  http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState,
  envelope::Envelope,
  error::ApiError,
  extract::{Admin, JsonBody, parse_id},
};

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub token:      String,
  pub expires_at: DateTime<Utc>,
  pub user:       Account,
}

/// `POST /login`, body: `{"email":"…","password":"…"}`
pub async fn login<S: AlumnetStore + 'static>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<LoginBody>,
) -> Result<Json<Envelope<LoginResponse>>, ApiError> {
  if body.email.trim().is_empty() || body.password.is_empty() {
    return Err(ApiError::BadRequest("email and password are required".into()));
  }

  let account = state.accounts.authenticate(&body.email, &body.password).await?;
  let (token, claims) = state.issuer.issue(&account)?;
  let expires_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_default();

  tracing::info!(account = %account.id, "login succeeded");
  Ok(Json(Envelope::ok("login succeeded", LoginResponse {
    token,
    expires_at,
    user: account,
  })))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateBody {
  pub username:  String,
  pub email:     String,
  pub password:  String,
  pub role_id:   String,
  pub alumni_id: Option<String>,
}

/// `POST /accounts` (admin)
pub async fn create<S: AlumnetStore + 'static>(
  Admin(_): Admin,
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<(StatusCode, Json<Envelope<Account>>), ApiError> {
  let role_id = if body.role_id.trim().is_empty() {
    Uuid::nil()
  } else {
    parse_id(&body.role_id, "role_id")?
  };
  let alumni_id = body
    .alumni_id
    .filter(|s| !s.trim().is_empty())
    .map(|s| parse_id(&s, "alumni_id"))
    .transpose()?;

  let account = state
    .accounts
    .create(NewAccount {
      username: body.username,
      email: body.email,
      password: body.password,
      role_id,
      alumni_id,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(Envelope::ok("account created", account))))
}
