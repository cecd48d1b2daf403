//! Employment records: one job-history entry belonging to an alumni subject.
//!
//! A record's lifecycle is a closed two-valued tag. The third state, removed,
//! is represented by the record no longer existing in the store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Employment status assigned on create when the caller supplies none.
pub const DEFAULT_STATUS: &str = "employed";

// ─── Lifecycle ───────────────────────────────────────────────────────────────

/// Visibility tag of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
  /// Visible in listings and fetch-by-id.
  Active,
  /// Visible only in the trash listing; eligible for restore or hard delete.
  Trashed,
}

impl Lifecycle {
  /// Flag value that moves a record into the trash.
  pub const TRASH_FLAG: &'static str = "hapus";
  /// Flag value that moves a record back to active.
  pub const KEEP_FLAG: &'static str = "tidak";

  /// Parse one of the two canonical soft-delete flag values.
  pub fn from_flag(flag: &str) -> Result<Self> {
    match flag {
      Self::TRASH_FLAG => Ok(Self::Trashed),
      Self::KEEP_FLAG => Ok(Self::Active),
      other => Err(Error::invalid(format!(
        "is_delete must be {:?} or {:?}, got {other:?}",
        Self::TRASH_FLAG,
        Self::KEEP_FLAG,
      ))),
    }
  }

  pub fn as_flag(self) -> &'static str {
    match self {
      Self::Active => Self::KEEP_FLAG,
      Self::Trashed => Self::TRASH_FLAG,
    }
  }
}

// ─── Owner reference ─────────────────────────────────────────────────────────

/// The owning-alumni reference exactly as persisted.
///
/// Records written through [`crate::jobs::JobLifecycle`] always carry a
/// well-formed reference, but older rows may hold anything, so the raw text is
/// kept and interpreted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerRef(String);

impl OwnerRef {
  pub fn from_raw(raw: impl Into<String>) -> Self { Self(raw.into()) }

  pub fn as_str(&self) -> &str { &self.0 }

  /// The referenced id, if the reference is a non-nil UUID.
  pub fn id(&self) -> Option<Uuid> {
    Uuid::parse_str(&self.0).ok().filter(|id| !id.is_nil())
  }

  pub fn is_well_formed(&self) -> bool { self.id().is_some() }
}

impl From<Uuid> for OwnerRef {
  fn from(id: Uuid) -> Self { Self(id.hyphenated().to_string()) }
}

// ─── Record ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentRecord {
  pub id:           Uuid,
  pub alumni_id:    OwnerRef,
  pub company:      String,
  pub title:        String,
  pub industry:     String,
  pub location:     String,
  pub salary_range: String,
  pub start_date:   NaiveDate,
  /// Never before `start_date` when present.
  pub end_date:     Option<NaiveDate>,
  pub status:       String,
  pub description:  String,
  pub lifecycle:    Lifecycle,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

/// Input for [`crate::jobs::JobLifecycle::create`].
///
/// Required fields are plain strings so that emptiness can be reported as a
/// validation failure rather than a decode failure.
#[derive(Debug, Clone, Default)]
pub struct NewJob {
  pub alumni_id:    String,
  pub company:      String,
  pub title:        String,
  pub industry:     String,
  pub location:     String,
  pub salary_range: String,
  pub start_date:   Option<NaiveDate>,
  pub end_date:     Option<NaiveDate>,
  pub status:       Option<String>,
  pub description:  String,
}

/// A partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPatch {
  pub alumni_id:    Option<Uuid>,
  pub company:      Option<String>,
  pub title:        Option<String>,
  pub industry:     Option<String>,
  pub location:     Option<String>,
  pub salary_range: Option<String>,
  pub start_date:   Option<NaiveDate>,
  pub end_date:     Option<NaiveDate>,
  pub status:       Option<String>,
  pub description:  Option<String>,
}

impl JobPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  /// Apply the present fields to `record`. Timestamps and lifecycle are left
  /// to the caller.
  pub fn apply(&self, record: &mut EmploymentRecord) {
    if let Some(id) = self.alumni_id {
      record.alumni_id = OwnerRef::from(id);
    }
    set(&mut record.company, &self.company);
    set(&mut record.title, &self.title);
    set(&mut record.industry, &self.industry);
    set(&mut record.location, &self.location);
    set(&mut record.salary_range, &self.salary_range);
    set(&mut record.status, &self.status);
    set(&mut record.description, &self.description);
    if let Some(start) = self.start_date {
      record.start_date = start;
    }
    if let Some(end) = self.end_date {
      record.end_date = Some(end);
    }
  }
}

fn set(field: &mut String, value: &Option<String>) {
  if let Some(v) = value {
    field.clone_from(v);
  }
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Parse a calendar date given either as `YYYY-MM-DD` or as an RFC 3339
/// timestamp (whose date part in its own offset is kept).
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
  let raw = raw.trim();
  if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
    return Ok(date);
  }
  DateTime::parse_from_rfc3339(raw)
    .map(|dt| dt.date_naive())
    .map_err(|_| Error::invalid(format!("invalid date {raw:?}")))
}
