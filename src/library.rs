//! File-backed live catalog shared between the parts of an application.

use crate::{Error, InstrumentLibraryBuilder, Result};
use insdef_core::{
    Anomaly, Bank, Code, DefinitionCatalog, InstrumentProfile, LabelMap, ListKind, Program,
};
use insdef_io::{CodecConfig, InsCodec};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// The definitions an application currently knows about, and the files they
/// came from.
///
/// Cloning the library clones the handle; every clone sees the same catalog.
/// [`read`](Self::read) and [`write`](Self::write) hold the lock for the
/// whole closure, so a read-modify-write done inside one call is atomic.
///
/// # Example
///
/// ```ignore
/// use insdef::prelude::*;
///
/// let library = InstrumentLibrary::builder()
///     .file("Roland SC-88.ins")
///     .build()?;
///
/// let name = library.patch_label("Roland SC-88", 0, 25);
/// library.write(|catalog| {
///     catalog.patches_mut().entry("User").insert(0, "My Piano");
/// });
/// library.save("merged.ins")?;
/// ```
#[derive(Clone, Default)]
pub struct InstrumentLibrary {
    catalog: Arc<RwLock<DefinitionCatalog>>,
    codec: InsCodec,
}

impl std::fmt::Debug for InstrumentLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let catalog = self.catalog.read();
        f.debug_struct("InstrumentLibrary")
            .field("instruments", &catalog.len())
            .field("files", &catalog.files())
            .field("config", self.codec.config())
            .finish()
    }
}

impl InstrumentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> InstrumentLibraryBuilder {
        InstrumentLibraryBuilder::default()
    }

    pub fn with_config(config: CodecConfig) -> Result<Self> {
        Ok(Self {
            catalog: Arc::default(),
            codec: InsCodec::with_config(config)?,
        })
    }

    pub fn config(&self) -> &CodecConfig {
        self.codec.config()
    }

    // --- Files ---

    /// Load `path` and merge it into the live catalog. The catalog is left
    /// untouched when the file cannot be read.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<Vec<Anomaly>> {
        let path = path.as_ref();
        let report = self.codec.load(path)?;

        let summary = self.catalog.write().merge(&report.catalog);
        info!(
            "Opened {}: {} instrument(s) added, {} replaced, {} anomaly(ies)",
            path.display(),
            summary.instruments_added,
            summary.instruments_replaced,
            report.anomalies.len()
        );
        Ok(report.anomalies)
    }

    /// Forget `path` and rebuild the catalog from the remaining files.
    ///
    /// In-memory edits not saved to one of those files are lost.
    pub fn close(&self, path: impl AsRef<Path>) -> Result<Vec<Anomaly>> {
        let path = path.as_ref();
        let remaining: Vec<PathBuf> = {
            let catalog = self.catalog.read();
            if !catalog.files().iter().any(|f| f == path) {
                return Err(Error::FileNotOpen(path.to_path_buf()));
            }
            catalog
                .files()
                .iter()
                .filter(|f| *f != path)
                .cloned()
                .collect()
        };

        let (rebuilt, anomalies) = self.load_all(&remaining)?;
        *self.catalog.write() = rebuilt;
        info!(
            "Closed {}; {} file(s) remain",
            path.display(),
            remaining.len()
        );
        Ok(anomalies)
    }

    /// Re-read every file from scratch, discarding in-memory edits.
    pub fn reload(&self) -> Result<Vec<Anomaly>> {
        let files = self.files();
        let (rebuilt, anomalies) = self.load_all(&files)?;
        *self.catalog.write() = rebuilt;
        info!("Reloaded {} file(s)", files.len());
        Ok(anomalies)
    }

    fn load_all(&self, files: &[PathBuf]) -> Result<(DefinitionCatalog, Vec<Anomaly>)> {
        let mut catalog = DefinitionCatalog::new();
        let mut anomalies = Vec::new();
        for file in files {
            let report = self.codec.load(file)?;
            catalog.merge(&report.catalog);
            anomalies.extend(report.anomalies);
        }
        Ok((catalog, anomalies))
    }

    /// Write the whole live catalog to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let catalog = self.catalog.read();
        self.codec.save(path, &catalog)?;
        Ok(())
    }

    /// Drop every definition and file.
    pub fn clear(&self) {
        self.catalog.write().clear_all();
    }

    pub fn files(&self) -> Vec<PathBuf> {
        self.catalog.read().files().to_vec()
    }

    // --- Access ---

    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&DefinitionCatalog) -> R,
    {
        f(&*self.catalog.read())
    }

    pub fn write<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut DefinitionCatalog) -> R,
    {
        f(&mut *self.catalog.write())
    }

    /// Copy-on-write copy of the current catalog, detached from the library.
    pub fn snapshot(&self) -> DefinitionCatalog {
        self.catalog.read().clone()
    }

    pub fn instrument(&self, name: &str) -> Option<InstrumentProfile> {
        self.catalog.read().instrument(name).cloned()
    }

    pub fn instrument_names(&self) -> Vec<String> {
        self.catalog
            .read()
            .instrument_names()
            .map(str::to_string)
            .collect()
    }

    pub fn anomalies(&self) -> Vec<Anomaly> {
        self.catalog.read().anomalies()
    }

    /// Every label of a registered list, with its `BasedOn` chain applied.
    pub fn resolve(&self, kind: ListKind, name: &str) -> Result<LabelMap> {
        Ok(self.catalog.read().registry(kind).resolve(name, kind)?)
    }

    // --- Display lookups ---

    pub fn patch_label(&self, instrument: &str, bank: Bank, program: Program) -> Option<String> {
        self.catalog.read().patch_label(instrument, bank, program)
    }

    pub fn note_label(
        &self,
        instrument: &str,
        bank: Bank,
        program: Program,
        note: Code,
    ) -> Option<String> {
        self.catalog
            .read()
            .note_label(instrument, bank, program, note)
    }

    pub fn controller_label(&self, instrument: &str, controller: Code) -> Option<String> {
        self.catalog.read().controller_label(instrument, controller)
    }

    pub fn rpn_label(&self, instrument: &str, rpn: Code) -> Option<String> {
        self.catalog.read().rpn_label(instrument, rpn)
    }

    pub fn nrpn_label(&self, instrument: &str, nrpn: Code) -> Option<String> {
        self.catalog.read().nrpn_label(instrument, nrpn)
    }

    pub fn is_drum(&self, instrument: &str, bank: Bank, program: Program) -> bool {
        self.catalog.read().is_drum(instrument, bank, program)
    }
}
