//! The `{success, message, data}` body every successful response carries.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub success: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
}

impl<T> Envelope<T> {
  pub fn ok(message: impl Into<String>, data: T) -> Self {
    Self { success: true, message: message.into(), data: Some(data) }
  }
}
