//! Error types for the instrument definition data model.

use crate::registry::ListKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("BasedOn cycle while resolving '{list}': {}", .chain.join(" -> "))]
    BasedOnCycle { list: String, chain: Vec<String> },

    #[error("Unknown {kind} list: {name}")]
    UnknownList { kind: ListKind, name: String },

    #[error("Unknown bank select method: {0}")]
    UnknownBankSelectMethod(i32),
}

pub type Result<T> = std::result::Result<T, Error>;
