//! Instrument definition data model.
//!
//! Provides the pieces a sequencer needs to show names instead of numbers:
//!
//! - **[`NamedValueList`]**: code → label list with `BasedOn` inheritance
//! - **[`InstrumentProfile`]**: one device's patch banks, controller/RPN/NRPN
//!   names, per-(bank, program) note names and drum flags
//! - **[`DefinitionCatalog`]**: all profiles plus the shared list registries
//! - **[`CatalogMerger`]**: folds one catalog into another
//!
//! Lists and profiles are copy-on-write: cloning is cheap and clones stay
//! independent once written to. They are not a substitute for a lock when a
//! catalog is shared between threads.
//!
//! # Example
//!
//! ```ignore
//! use insdef_core::{DefinitionCatalog, InstrumentProfile, WILDCARD};
//!
//! let mut catalog = DefinitionCatalog::new();
//! catalog.patches_mut().entry("General MIDI").insert(0, "Acoustic Grand Piano");
//!
//! let mut synth = InstrumentProfile::new("My Synth");
//! synth.set_patch(WILDCARD, catalog.patches().get("General MIDI").unwrap().clone());
//! catalog.set_instrument("My Synth", synth);
//!
//! assert_eq!(
//!     catalog.patch_label("My Synth", 0, 0).as_deref(),
//!     Some("Acoustic Grand Piano")
//! );
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod anomaly;
pub use anomaly::{Anomaly, AnomalyKind};

mod value_list;
pub use value_list::{Code, LabelMap, NamedValueList};

mod registry;
pub use registry::{ListKind, ListRegistry};

mod profile;
pub use profile::{Bank, BankSelectMethod, InstrumentProfile, Program, WILDCARD};

mod catalog;
pub use catalog::DefinitionCatalog;

mod merge;
pub use merge::{CatalogMerger, MergeSummary};

mod serde_support;
