//! Handlers for `/jobs` endpoints.
//!
//! | Method   | Path | Gate |
//! |----------|------|------|
//! | `GET`    | `/jobs` | authenticated |
//! | `POST`   | `/jobs` | admin |
//! | `GET`    | `/jobs/trash` | admin |
//! | `DELETE` | `/jobs/trash/{id}` | admin; permanent |
//! | `PUT`    | `/jobs/trash/{id}/restore` | admin |
//! | `GET`    | `/jobs/alumni/{alumni_id}` | authenticated |
//! | `GET`    | `/jobs/{id}` | authenticated; 404 unless active |
//! | `PUT`    | `/jobs/{id}` | admin |
//! | `DELETE` | `/jobs/{id}` | admin; moves to trash |
//! | `PATCH`  | `/jobs/{id}/lifecycle` | admin; body `{"is_delete":"hapus"\|"tidak"}` |

use alumnet_core::{
  employment::{EmploymentRecord, JobPatch, Lifecycle, NewJob, parse_date},
  store::AlumnetStore,
};
use axum::{
  Json,
  body::Bytes,
  extract::{Path, State},
  http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
  AppState,
  envelope::Envelope,
  error::ApiError,
  extract::{Admin, Authenticated, JsonBody, parse_id},
};

type JobResponse = Result<Json<Envelope<EmploymentRecord>>, ApiError>;
type JobsResponse = Result<Json<Envelope<Vec<EmploymentRecord>>>, ApiError>;

// ─── Bodies ───────────────────────────────────────────────────────────────────

/// `POST /jobs` body. Dates accept `YYYY-MM-DD` or RFC 3339.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateBody {
  pub alumni_id:    String,
  pub company:      String,
  pub title:        String,
  pub industry:     String,
  pub location:     String,
  pub salary_range: String,
  pub start_date:   Option<String>,
  pub end_date:     Option<String>,
  pub status:       Option<String>,
  pub description:  String,
}

impl CreateBody {
  fn into_new_job(self) -> Result<NewJob, ApiError> {
    Ok(NewJob {
      alumni_id:    self.alumni_id,
      company:      self.company,
      title:        self.title,
      industry:     self.industry,
      location:     self.location,
      salary_range: self.salary_range,
      start_date:   optional_date(self.start_date)?,
      end_date:     optional_date(self.end_date)?,
      status:       present(self.status),
      description:  self.description,
    })
  }
}

/// `PUT /jobs/{id}` body. Absent or blank fields are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateBody {
  pub alumni_id:    Option<String>,
  pub company:      Option<String>,
  pub title:        Option<String>,
  pub industry:     Option<String>,
  pub location:     Option<String>,
  pub salary_range: Option<String>,
  pub start_date:   Option<String>,
  pub end_date:     Option<String>,
  pub status:       Option<String>,
  pub description:  Option<String>,
}

impl UpdateBody {
  pub(crate) fn into_patch(self) -> Result<JobPatch, ApiError> {
    Ok(JobPatch {
      alumni_id:    present(self.alumni_id)
        .map(|raw| parse_id(&raw, "alumni_id"))
        .transpose()?,
      company:      present(self.company),
      title:        present(self.title),
      industry:     present(self.industry),
      location:     present(self.location),
      salary_range: present(self.salary_range),
      start_date:   optional_date(self.start_date)?,
      end_date:     optional_date(self.end_date)?,
      status:       present(self.status),
      description:  present(self.description),
    })
  }
}

#[derive(Debug, Deserialize)]
pub struct LifecycleBody {
  #[serde(default = "default_flag")]
  pub is_delete: String,
}

fn default_flag() -> String { Lifecycle::TRASH_FLAG.to_owned() }

fn present(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

fn optional_date(raw: Option<String>) -> Result<Option<NaiveDate>, ApiError> {
  Ok(present(raw).map(|s| parse_date(&s)).transpose()?)
}

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /jobs`
pub async fn list<S: AlumnetStore + 'static>(
  Authenticated(_): Authenticated,
  State(state): State<AppState<S>>,
) -> JobsResponse {
  let records = state.jobs.list_active().await?;
  Ok(Json(Envelope::ok("employment records", records)))
}

/// `GET /jobs/alumni/{alumni_id}`
pub async fn list_for_alumni<S: AlumnetStore + 'static>(
  Authenticated(_): Authenticated,
  State(state): State<AppState<S>>,
  Path(alumni_id): Path<String>,
) -> JobsResponse {
  let alumni_id = parse_id(&alumni_id, "alumni_id")?;
  let records = state.jobs.list_for_alumni(alumni_id).await?;
  Ok(Json(Envelope::ok("employment records", records)))
}

/// `GET /jobs/{id}`
pub async fn get_one<S: AlumnetStore + 'static>(
  Authenticated(_): Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> JobResponse {
  let record = state.jobs.get(parse_id(&id, "id")?).await?;
  Ok(Json(Envelope::ok("employment record", record)))
}

/// `GET /jobs/trash`
pub async fn list_trash<S: AlumnetStore + 'static>(
  Admin(_): Admin,
  State(state): State<AppState<S>>,
) -> JobsResponse {
  let records = state.jobs.list_trashed().await?;
  Ok(Json(Envelope::ok("trashed employment records", records)))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `POST /jobs`
pub async fn create<S: AlumnetStore + 'static>(
  Admin(_): Admin,
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<(StatusCode, Json<Envelope<EmploymentRecord>>), ApiError> {
  let record = state.jobs.create(body.into_new_job()?).await?;
  Ok((StatusCode::CREATED, Json(Envelope::ok("employment record created", record))))
}

/// `PUT /jobs/{id}`
pub async fn update<S: AlumnetStore + 'static>(
  Admin(_): Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  JsonBody(body): JsonBody<UpdateBody>,
) -> JobResponse {
  let id = parse_id(&id, "id")?;
  let record = state.jobs.update(id, body.into_patch()?).await?;
  Ok(Json(Envelope::ok("employment record updated", record)))
}

/// `PATCH /jobs/{id}/lifecycle`. An empty body counts as `{"is_delete":"hapus"}`.
pub async fn set_lifecycle<S: AlumnetStore + 'static>(
  Admin(_): Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  body: Bytes,
) -> JobResponse {
  let id = parse_id(&id, "id")?;
  let body: LifecycleBody = if body.iter().all(u8::is_ascii_whitespace) {
    LifecycleBody { is_delete: default_flag() }
  } else {
    serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
  };
  let record = state.jobs.set_lifecycle(id, &body.is_delete).await?;
  Ok(Json(Envelope::ok("lifecycle updated", record)))
}

/// `DELETE /jobs/{id}`
pub async fn trash<S: AlumnetStore + 'static>(
  Admin(_): Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> JobResponse {
  let record = state.jobs.trash(parse_id(&id, "id")?).await?;
  Ok(Json(Envelope::ok("employment record moved to trash", record)))
}

/// `PUT /jobs/trash/{id}/restore`
pub async fn restore<S: AlumnetStore + 'static>(
  Admin(_): Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> JobResponse {
  let record = state.jobs.restore(parse_id(&id, "id")?).await?;
  Ok(Json(Envelope::ok("employment record restored", record)))
}

/// `DELETE /jobs/trash/{id}`
pub async fn purge<S: AlumnetStore + 'static>(
  Admin(_): Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> JobResponse {
  let record = state.jobs.hard_delete(parse_id(&id, "id")?).await?;
  Ok(Json(Envelope::ok("employment record permanently deleted", record)))
}
