//! # insdef - MIDI Instrument Definitions
//!
//! Names for the numbers a sequencer deals in: patches per bank, controllers,
//! RPNs, NRPNs, drum keys.
//!
//! ## Architecture
//!
//! insdef is an umbrella crate that coordinates:
//! - **insdef-core** - Data model (value lists, instrument profiles, catalog, merge)
//! - **insdef-io** - Cakewalk `.ins` reader and writer
//!
//! and adds [`InstrumentLibrary`], a lockable catalog backed by a set of files.
//!
//! ## Quick Start
//!
//! ```ignore
//! use insdef::prelude::*;
//!
//! let library = InstrumentLibrary::builder()
//!     .file("Roland SC-88.ins")
//!     .build()?;
//!
//! assert_eq!(
//!     library.patch_label("Roland SC-88", 0, 0).as_deref(),
//!     Some("Piano 1")
//! );
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - `io`
//! - `io` - `.ins` file support and [`InstrumentLibrary`]

/// Re-export of insdef-core for direct access
pub use insdef_core as core;

pub use insdef_core::{
    Anomaly, AnomalyKind, Bank, BankSelectMethod, CatalogMerger, Code, DefinitionCatalog,
    InstrumentProfile, LabelMap, ListKind, ListRegistry, MergeSummary, NamedValueList, Program,
    WILDCARD,
};

#[cfg(feature = "io")]
pub use insdef_io as io;

#[cfg(feature = "io")]
pub use insdef_io::{CodecConfig, InsCodec, LineEnding, LoadReport, TextEncoding};

pub mod error;
pub use error::{Error, Result};

#[cfg(feature = "io")]
mod builder;
#[cfg(feature = "io")]
mod library;

#[cfg(feature = "io")]
pub use builder::InstrumentLibraryBuilder;
#[cfg(feature = "io")]
pub use library::InstrumentLibrary;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{
        Bank, BankSelectMethod, DefinitionCatalog, InstrumentProfile, ListKind, NamedValueList,
        Program, WILDCARD,
    };

    #[cfg(feature = "io")]
    pub use crate::{
        CodecConfig, InsCodec, InstrumentLibrary, InstrumentLibraryBuilder, LineEnding,
        TextEncoding,
    };
}
