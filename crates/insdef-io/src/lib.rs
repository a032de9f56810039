//! Instrument definition file I/O.
//!
//! Reads and writes the Cakewalk `.ins` format. Reading is tolerant: content
//! problems come back as [`Anomaly`](insdef_core::Anomaly) values next to the
//! best-effort catalog, and only I/O or configuration failures are errors.
//!
//! ```ignore
//! let report = insdef_io::load("Roland SC-88.ins")?;
//! let catalog = report.catalog;
//! insdef_io::save("copy.ins", &catalog)?;
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{CodecConfig, LineEnding, TextEncoding};

mod codec;
pub use codec::{load, save, InsCodec, LoadReport};

mod reader;
mod section;
mod writer;
