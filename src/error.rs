//! Centralized error type for the insdef umbrella crate.
//!
//! Wraps the subsystem errors so `?` propagates naturally across crate boundaries.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] insdef_core::Error),

    #[cfg(feature = "io")]
    #[error(transparent)]
    Io(#[from] insdef_io::Error),

    #[error("File is not part of the library: {}", .0.display())]
    FileNotOpen(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
