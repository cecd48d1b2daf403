//! Request extractors: bearer identity, admin gate, and a JSON body whose
//! rejections render through [`ApiError`].

use alumnet_core::{Error, credential::IdentityClaims, store::AlumnetStore};
use axum::{
  extract::{FromRequest, FromRequestParts},
  http::{header, request::Parts},
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Verified identity of the caller. Rejects with 401 when the `Authorization`
/// header is absent or does not verify.
pub struct Authenticated(pub IdentityClaims);

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: AlumnetStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let header = parts
      .headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or(Error::Unauthenticated("missing bearer credential"))?;
    Ok(Authenticated(state.verifier.verify(header)?))
  }
}

/// An authenticated caller holding the admin role. Rejects with 401 or 403.
pub struct Admin(pub IdentityClaims);

impl<S> FromRequestParts<AppState<S>> for Admin
where
  S: AlumnetStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let Authenticated(claims) = Authenticated::from_request_parts(parts, state).await?;
    state.authorizer.require_admin(&claims).await?;
    Ok(Admin(claims))
  }
}

/// `axum::Json`, with malformed bodies reported as 400 in the usual envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Parse a path segment as a record, account or role id.
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw.trim()).map_err(|_| ApiError::BadRequest(format!("invalid {what} {raw:?}")))
}
