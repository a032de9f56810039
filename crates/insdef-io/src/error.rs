//! Error types for instrument definition file I/O.
//!
//! Only I/O and configuration problems are errors here; malformed content is
//! reported as [`insdef_core::Anomaly`] values alongside a best-effort result.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Core(#[from] insdef_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
