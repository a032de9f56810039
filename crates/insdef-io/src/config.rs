//! Codec configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Line terminator used when writing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnding {
    Lf,
    /// Windows convention used by the original Cakewalk tools.
    #[default]
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Character encoding used when writing. Reading auto-detects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// One byte per character; anything above U+00FF is written as `?`.
    Latin1,
}

/// Configuration for reading and writing `.ins` files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Emit the leading `;` comment block.
    pub write_header: bool,
    /// Tool name written into the header.
    pub generator: String,
    pub line_ending: LineEnding,
    pub encoding: TextEncoding,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            write_header: true,
            generator: "insdef".to_string(),
            line_ending: LineEnding::default(),
            encoding: TextEncoding::default(),
        }
    }
}

impl CodecConfig {
    pub fn validate(&self) -> Result<()> {
        if self.generator.contains(['\r', '\n']) {
            return Err(Error::InvalidConfig(format!(
                "generator {:?} must be a single line",
                self.generator
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert!(config.write_header);
        assert_eq!(config.generator, "insdef");
        assert_eq!(config.line_ending, LineEnding::CrLf);
        assert_eq!(config.encoding, TextEncoding::Utf8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_multiline_generator_rejected() {
        let config = CodecConfig {
            generator: "two\nlines".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_config_deserialize() {
        let config: CodecConfig =
            serde_json::from_str(r#"{ "line_ending": "Lf", "encoding": "Latin1" }"#).unwrap();
        assert_eq!(config.line_ending, LineEnding::Lf);
        assert_eq!(config.encoding, TextEncoding::Latin1);
        assert!(config.write_header);
        assert_eq!(config.generator, "insdef");
    }
}
