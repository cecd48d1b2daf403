//! Error type for server bootstrap.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid configuration: {0}")]
  Config(String),

  #[error("cannot prepare store directory {path:?}: {source}")]
  StoreDir {
    path:   std::path::PathBuf,
    source: std::io::Error,
  },

  #[error(transparent)]
  Core(#[from] alumnet_core::Error),
}
