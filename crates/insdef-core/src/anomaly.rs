//! Content-level anomalies.
//!
//! An [`Anomaly`] never aborts anything: parsing and resolution carry on with a
//! best-effort result and hand the anomalies back alongside it.

use std::fmt;

/// What kind of problem was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnomalyKind {
    /// Line could not be interpreted at all.
    MalformedLine,
    /// `.Something` header that is not one of the known sections.
    UnknownSection,
    /// Entry line with no enclosing `[Name]` block.
    OrphanEntry,
    /// Entry key is not an integer code.
    InvalidCode,
    /// Same code defined twice in one list (last one wins).
    DuplicateCode,
    /// Instrument key that is not recognised.
    UnknownKey,
    /// Recognised key with a value that cannot be parsed.
    InvalidValue,
    /// `BasedOn` names a list that is not in the registry.
    DanglingBasedOn,
    /// `BasedOn` chain loops back on itself.
    BasedOnCycle,
    /// Instrument refers to a list name that is not defined.
    UnknownListReference,
    /// Instrument holds a copy of a registered list that no longer matches it.
    DivergentList,
}

/// A recoverable problem found in definition content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    /// 1-based source line, when the anomaly comes from a file.
    pub line: Option<usize>,
    pub message: String,
}

impl Anomaly {
    pub fn new(kind: AnomalyKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            line: None,
            message: message.into(),
        }
    }

    pub fn at_line(kind: AnomalyKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line: Some(line),
            message: message.into(),
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "[line {}] {:?}: {}", line, self.kind, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}
