//! Accounts and roles: the principals a bearer credential refers to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named permission bucket. Names are stored case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
  pub id:   Uuid,
  pub name: String,
}

/// A registered principal. `email` and `username` are unique in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
  pub id:            Uuid,
  pub username:      String,
  /// Always stored trimmed and lower-cased.
  pub email:         String,
  /// PHC string produced by argon2. Never serialised into responses.
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub role_id:       Uuid,
  pub alumni_id:     Option<Uuid>,
  pub created_at:    DateTime<Utc>,
}

/// Trim and lower-case an email address the way accounts store it.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }
