//! Builder for configuring and constructing an `InstrumentLibrary`.

use crate::{InstrumentLibrary, Result};
use insdef_io::CodecConfig;
use std::path::PathBuf;

/// Files are loaded in the order they were added; a later file overrides
/// lists and instruments of an earlier one.
///
/// # Example
///
/// ```ignore
/// use insdef::prelude::*;
///
/// let library = InstrumentLibrary::builder()
///     .file("General MIDI.ins")
///     .file("Roland SC-88.ins")
///     .config(CodecConfig {
///         line_ending: LineEnding::Lf,
///         ..Default::default()
///     })
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InstrumentLibraryBuilder {
    files: Vec<PathBuf>,
    config: CodecConfig,
}

impl InstrumentLibraryBuilder {
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    pub fn files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Default: [`CodecConfig::default`]
    pub fn config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// Fails on the first file that cannot be read. Content anomalies are
    /// logged and do not fail the build.
    pub fn build(self) -> Result<InstrumentLibrary> {
        let library = InstrumentLibrary::with_config(self.config)?;
        for file in &self.files {
            library.open(file)?;
        }
        Ok(library)
    }
}
