//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates are `YYYY-MM-DD`, UUIDs are
//! hyphenated lowercase strings.

use alumnet_core::{
  account::{Account, Role},
  employment::{EmploymentRecord, Lifecycle, OwnerRef},
};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Lifecycle ────────────────────────────────────────────────────────────────

pub fn encode_lifecycle(l: Lifecycle) -> &'static str {
  match l {
    Lifecycle::Active => "active",
    Lifecycle::Trashed => "trashed",
  }
}

pub fn decode_lifecycle(s: &str) -> Result<Lifecycle> {
  match s {
    "active" => Ok(Lifecycle::Active),
    "trashed" => Ok(Lifecycle::Trashed),
    other => Err(Error::UnknownLifecycle(other.to_owned())),
  }
}

// ─── Raw row types ────────────────────────────────────────────────────────────

/// Columns selected for every role query, in [`RawRole`] order.
pub const ROLE_COLUMNS: &str = "role_id, name";

pub struct RawRole {
  pub role_id: String,
  pub name:    String,
}

impl RawRole {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { role_id: row.get(0)?, name: row.get(1)? })
  }

  pub fn into_role(self) -> Result<Role> {
    Ok(Role { id: decode_uuid(&self.role_id)?, name: self.name })
  }
}

/// Columns selected for every account query, in [`RawAccount`] order.
pub const ACCOUNT_COLUMNS: &str =
  "account_id, username, email, password_hash, role_id, alumni_id, created_at";

pub struct RawAccount {
  pub account_id:    String,
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
  pub role_id:       String,
  pub alumni_id:     Option<String>,
  pub created_at:    String,
}

impl RawAccount {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      account_id:    row.get(0)?,
      username:      row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      role_id:       row.get(4)?,
      alumni_id:     row.get(5)?,
      created_at:    row.get(6)?,
    })
  }

  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      id:            decode_uuid(&self.account_id)?,
      username:      self.username,
      email:         self.email,
      password_hash: self.password_hash,
      role_id:       decode_uuid(&self.role_id)?,
      alumni_id:     self.alumni_id.as_deref().map(decode_uuid).transpose()?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Columns selected for every employment-record query, in [`RawJob`] order.
pub const JOB_COLUMNS: &str = "record_id, alumni_id, company, title, industry, location, \
   salary_range, start_date, end_date, status, description, lifecycle, created_at, updated_at";

pub struct RawJob {
  pub record_id:    String,
  pub alumni_id:    String,
  pub company:      String,
  pub title:        String,
  pub industry:     String,
  pub location:     String,
  pub salary_range: String,
  pub start_date:   String,
  pub end_date:     Option<String>,
  pub status:       String,
  pub description:  String,
  pub lifecycle:    String,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawJob {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:    row.get(0)?,
      alumni_id:    row.get(1)?,
      company:      row.get(2)?,
      title:        row.get(3)?,
      industry:     row.get(4)?,
      location:     row.get(5)?,
      salary_range: row.get(6)?,
      start_date:   row.get(7)?,
      end_date:     row.get(8)?,
      status:       row.get(9)?,
      description:  row.get(10)?,
      lifecycle:    row.get(11)?,
      created_at:   row.get(12)?,
      updated_at:   row.get(13)?,
    })
  }

  /// The owner reference is carried through verbatim, even when malformed.
  pub fn into_record(self) -> Result<EmploymentRecord> {
    Ok(EmploymentRecord {
      id:           decode_uuid(&self.record_id)?,
      alumni_id:    OwnerRef::from_raw(self.alumni_id),
      company:      self.company,
      title:        self.title,
      industry:     self.industry,
      location:     self.location,
      salary_range: self.salary_range,
      start_date:   decode_date(&self.start_date)?,
      end_date:     self.end_date.as_deref().map(decode_date).transpose()?,
      status:       self.status,
      description:  self.description,
      lifecycle:    decode_lifecycle(&self.lifecycle)?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}
