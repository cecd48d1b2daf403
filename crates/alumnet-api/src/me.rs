//! Owner self-service: `/me/jobs/{id}`.
//!
//! Both handlers pass the caller through [`OwnershipGuard::check`] before
//! touching the record. The owner may edit the record's fields but not move
//! it to another alumnus.
//!
//! [`OwnershipGuard::check`]: alumnet_core::ownership::OwnershipGuard::check

use alumnet_core::{
  Error,
  employment::{EmploymentRecord, Lifecycle},
  store::AlumnetStore,
};
use axum::{
  Json,
  extract::{Path, State},
};

use crate::{
  AppState,
  envelope::Envelope,
  error::ApiError,
  extract::{Authenticated, JsonBody, parse_id},
  jobs::UpdateBody,
};

/// `GET /me/jobs/{id}`
pub async fn get_one<S: AlumnetStore + 'static>(
  Authenticated(claims): Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Envelope<EmploymentRecord>>, ApiError> {
  let record = state.guard.check(&claims, parse_id(&id, "id")?).await?;
  if record.lifecycle != Lifecycle::Active {
    return Err(Error::NotFound("employment record not found".into()).into());
  }
  Ok(Json(Envelope::ok("employment record", record)))
}

/// `PUT /me/jobs/{id}`
pub async fn update<S: AlumnetStore + 'static>(
  Authenticated(claims): Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  JsonBody(body): JsonBody<UpdateBody>,
) -> Result<Json<Envelope<EmploymentRecord>>, ApiError> {
  let id = parse_id(&id, "id")?;
  state.guard.check(&claims, id).await?;

  let patch = body.into_patch()?;
  if patch.alumni_id.is_some() {
    return Err(ApiError::BadRequest("alumni_id cannot be changed by the owner".into()));
  }
  let record = state.jobs.update(id, patch).await?;
  Ok(Json(Envelope::ok("employment record updated", record)))
}
