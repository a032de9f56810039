//! Loading and saving catalogs as `.ins` files.

use crate::config::CodecConfig;
use crate::reader::{decode, InsReader};
use crate::writer::write_catalog;
use crate::Result;
use insdef_core::{Anomaly, DefinitionCatalog};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Result of reading an `.ins` source.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub catalog: DefinitionCatalog,
    /// Content problems that were skipped over.
    pub anomalies: Vec<Anomaly>,
}

impl LoadReport {
    /// `true` when the source was read without any anomaly.
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

/// Reader and writer for the Cakewalk instrument definition format.
///
/// ```ignore
/// let codec = InsCodec::new();
/// let report = codec.load("gm.ins")?;
/// for anomaly in &report.anomalies {
///     eprintln!("{anomaly}");
/// }
/// codec.save("copy.ins", &report.catalog)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InsCodec {
    config: CodecConfig,
}

impl InsCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Read a file. The path is recorded in the catalog's file list.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let mut report = self.parse_bytes(&bytes);
        report.catalog.append_file(path);

        debug!(
            "Loaded {}: {} instrument(s), {} anomaly(ies)",
            path.display(),
            report.catalog.len(),
            report.anomalies.len()
        );
        Ok(report)
    }

    /// Parse raw file content, auto-detecting UTF-8 or Latin-1.
    pub fn parse_bytes(&self, bytes: &[u8]) -> LoadReport {
        self.parse(&decode(bytes))
    }

    pub fn parse(&self, text: &str) -> LoadReport {
        let (catalog, anomalies) = InsReader::new().read(text);
        LoadReport { catalog, anomalies }
    }

    /// Write `catalog` to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>, catalog: &DefinitionCatalog) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let file_name = path.file_name().map(|name| name.to_string_lossy());
        write_catalog(
            catalog,
            BufWriter::new(file),
            &self.config,
            file_name.as_deref(),
        )?;

        debug!(
            "Saved {}: {} instrument(s)",
            path.display(),
            catalog.len()
        );
        Ok(())
    }

    pub fn write(&self, catalog: &DefinitionCatalog, out: impl Write) -> Result<()> {
        write_catalog(catalog, out, &self.config, None)?;
        Ok(())
    }

    pub fn to_bytes(&self, catalog: &DefinitionCatalog) -> Vec<u8> {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = write_catalog(catalog, &mut out, &self.config, None);
        out
    }
}

/// Load a file with the default configuration.
pub fn load(path: impl AsRef<Path>) -> Result<LoadReport> {
    InsCodec::new().load(path)
}

/// Save a catalog with the default configuration.
pub fn save(path: impl AsRef<Path>, catalog: &DefinitionCatalog) -> Result<()> {
    InsCodec::new().save(path, catalog)
}
