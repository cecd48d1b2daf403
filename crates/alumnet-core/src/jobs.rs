//! The employment-record lifecycle: create, edit, trash, restore, purge.
//!
//! ```text
//!            create
//!              │
//!              ▼
//!   ┌──────► Active ──── set_lifecycle(hapus) / trash ───┐
//!   │                                                     ▼
//!   └── restore / set_lifecycle(tidak) ─────────────── Trashed
//!                                                         │
//!                                                    hard_delete
//!                                                         ▼
//!                                                      removed
//! ```
//!
//! Each transition is a single conditional store write. There is no version
//! check, so concurrent transitions on one record are last-write-wins.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  Error, Result,
  deadline::Deadline,
  employment::{DEFAULT_STATUS, EmploymentRecord, JobPatch, Lifecycle, NewJob, OwnerRef},
  store::AlumnetStore,
};

pub struct JobLifecycle<S> {
  store:    Arc<S>,
  deadline: Deadline,
}

impl<S> Clone for JobLifecycle<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), deadline: self.deadline }
  }
}

impl<S: AlumnetStore> JobLifecycle<S> {
  pub fn new(store: Arc<S>, deadline: Deadline) -> Self { Self { store, deadline } }

  // ── Writes ────────────────────────────────────────────────────────────

  /// Validate `input` and persist it as a new `Active` record.
  pub async fn create(&self, input: NewJob) -> Result<EmploymentRecord> {
    let alumni_id = validate_new(&input)?;
    let start_date = input
      .start_date
      .ok_or_else(|| Error::invalid("start_date is required"))?;

    let now = Utc::now();
    let record = EmploymentRecord {
      id: Uuid::new_v4(),
      alumni_id: OwnerRef::from(alumni_id),
      company: input.company,
      title: input.title,
      industry: input.industry,
      location: input.location,
      salary_range: input.salary_range,
      start_date,
      end_date: input.end_date,
      status: input
        .status
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_STATUS.to_owned()),
      description: input.description,
      lifecycle: Lifecycle::Active,
      created_at: now,
      updated_at: now,
    };

    self
      .deadline
      .run("insert_job", self.store.insert_job(record.clone()))
      .await?;
    tracing::info!(id = %record.id, alumni_id = %alumni_id, "employment record created");
    Ok(record)
  }

  /// Edit an `Active` record. Trashed records cannot be edited.
  pub async fn update(&self, id: Uuid, patch: JobPatch) -> Result<EmploymentRecord> {
    if patch.is_empty() {
      return Err(Error::invalid("no fields to update"));
    }
    if patch.alumni_id.is_some_and(|owner| !OwnerRef::from(owner).is_well_formed()) {
      return Err(Error::invalid("alumni_id is not a valid id"));
    }
    check_order(patch.start_date, patch.end_date)?;

    // The patch may carry only one of the two dates; check it against the
    // stored counterpart so the invariant holds after the write.
    let current = self.get(id).await?;
    let mut merged = current;
    patch.apply(&mut merged);
    check_order(Some(merged.start_date), merged.end_date)?;

    let updated = self
      .deadline
      .run("update_job", self.store.update_job(id, patch, Utc::now()))
      .await?
      .ok_or_else(|| active_not_found(id))?;
    tracing::info!(%id, "employment record updated");
    Ok(updated)
  }

  /// Soft-delete toggle: apply the lifecycle named by a canonical flag
  /// (`"hapus"` or `"tidak"`) to a record in either state.
  pub async fn set_lifecycle(&self, id: Uuid, flag: &str) -> Result<EmploymentRecord> {
    let target = Lifecycle::from_flag(flag)?;
    self.apply_lifecycle(id, target).await
  }

  /// Move a record into the trash, whatever its current state.
  pub async fn trash(&self, id: Uuid) -> Result<EmploymentRecord> {
    self.apply_lifecycle(id, Lifecycle::Trashed).await
  }

  /// Bring a `Trashed` record back to `Active`.
  pub async fn restore(&self, id: Uuid) -> Result<EmploymentRecord> {
    let record = self
      .deadline
      .run(
        "set_lifecycle",
        self.store.set_lifecycle(id, Lifecycle::Active, Some(Lifecycle::Trashed), Utc::now()),
      )
      .await?
      .ok_or_else(|| trashed_not_found(id))?;
    tracing::info!(%id, "employment record restored");
    Ok(record)
  }

  /// Permanently remove a `Trashed` record, returning it as it was just
  /// before removal.
  pub async fn hard_delete(&self, id: Uuid) -> Result<EmploymentRecord> {
    let record = self
      .deadline
      .run("delete_job", self.store.delete_job(id, Lifecycle::Trashed))
      .await?
      .ok_or_else(|| trashed_not_found(id))?;
    tracing::info!(%id, "employment record permanently removed");
    Ok(record)
  }

  async fn apply_lifecycle(&self, id: Uuid, target: Lifecycle) -> Result<EmploymentRecord> {
    let record = self
      .deadline
      .run("set_lifecycle", self.store.set_lifecycle(id, target, None, Utc::now()))
      .await?
      .ok_or_else(|| Error::not_found(format!("employment record {id} not found")))?;
    tracing::info!(%id, lifecycle = ?target, "employment record lifecycle set");
    Ok(record)
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Fetch one `Active` record.
  pub async fn get(&self, id: Uuid) -> Result<EmploymentRecord> {
    self
      .deadline
      .run("get_job", self.store.get_job(id))
      .await?
      .filter(|r| r.lifecycle == Lifecycle::Active && r.alumni_id.is_well_formed())
      .ok_or_else(|| active_not_found(id))
  }

  pub async fn list_active(&self) -> Result<Vec<EmploymentRecord>> {
    self.list(Lifecycle::Active, None).await
  }

  pub async fn list_trashed(&self) -> Result<Vec<EmploymentRecord>> {
    self.list(Lifecycle::Trashed, None).await
  }

  /// `Active` records owned by one alumni subject.
  pub async fn list_for_alumni(&self, alumni_id: Uuid) -> Result<Vec<EmploymentRecord>> {
    self.list(Lifecycle::Active, Some(alumni_id)).await
  }

  async fn list(
    &self,
    lifecycle: Lifecycle,
    owner: Option<Uuid>,
  ) -> Result<Vec<EmploymentRecord>> {
    let mut records = self
      .deadline
      .run("list_jobs", self.store.list_jobs(lifecycle))
      .await?;

    let before = records.len();
    records.retain(|r| r.lifecycle == lifecycle && r.alumni_id.is_well_formed());
    if records.len() != before {
      tracing::warn!(
        skipped = before - records.len(),
        "skipped records with malformed owner references"
      );
    }

    // Owners compare by parsed id, so legacy spellings of the same UUID match.
    if let Some(owner) = owner {
      records.retain(|r| r.alumni_id.id() == Some(owner));
    }
    Ok(records)
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

fn validate_new(input: &NewJob) -> Result<Uuid> {
  if input.alumni_id.trim().is_empty() {
    return Err(Error::invalid("alumni_id is required"));
  }
  let alumni_id = OwnerRef::from_raw(input.alumni_id.trim())
    .id()
    .ok_or_else(|| Error::invalid("alumni_id is not a valid id"))?;

  for (name, value) in [
    ("company", &input.company),
    ("title", &input.title),
    ("location", &input.location),
  ] {
    if value.trim().is_empty() {
      return Err(Error::invalid(format!("{name} is required")));
    }
  }

  check_order(input.start_date, input.end_date)?;
  Ok(alumni_id)
}

fn check_order(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
  match (start, end) {
    (Some(start), Some(end)) if end < start => {
      Err(Error::invalid("end_date is before start_date"))
    }
    _ => Ok(()),
  }
}

fn active_not_found(id: Uuid) -> Error {
  Error::not_found(format!("employment record {id} not found"))
}

fn trashed_not_found(id: Uuid) -> Error {
  Error::not_found(format!("employment record {id} not found in trash"))
}
