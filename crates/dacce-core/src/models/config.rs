//! Configuration structures for rendering.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::record::IssuerInfo;

/// Main configuration for the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DacceConfig {
    /// Page and document settings.
    pub document: DocumentConfig,

    /// Access-key barcode settings.
    pub barcode: BarcodeConfig,

    /// Issuer printed in the header when the caller passes none.
    pub issuer: Option<IssuerInfo>,
}

/// Document-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Title stored in the PDF metadata.
    pub title: String,

    /// Font family for every text element.
    pub font_family: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: "DACCe".to_string(),
            font_family: "Helvetica".to_string(),
        }
    }
}

/// Barcode settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeConfig {
    /// Print the encoded key under the bars.
    pub human_readable: bool,
}

impl DacceConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = DacceConfig::default();
        assert_eq!(config.document.title, "DACCe");
        assert_eq!(config.document.font_family, "Helvetica");
        assert!(!config.barcode.human_readable);
        assert!(config.issuer.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: DacceConfig =
            serde_json::from_str(r#"{"barcode": {"human_readable": true}}"#).unwrap();
        assert!(config.barcode.human_readable);
        assert_eq!(config.document, DocumentConfig::default());
    }

    #[test]
    fn test_unknown_document_keys_are_ignored() {
        let config: DacceConfig = serde_json::from_str(
            r#"{"document": {"title": "CC-e", "auto_page_break": true, "page_break_margin": 5.0}}"#,
        )
        .unwrap();
        assert_eq!(config.document.title, "CC-e");
        assert_eq!(config.document.font_family, "Helvetica");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dacce.json");

        let mut config = DacceConfig::default();
        config.document.title = "Carta de Correcao".to_string();
        config.issuer = Some(IssuerInfo {
            name: "ACME LTDA".to_string(),
            state: "SP".to_string(),
            ..Default::default()
        });

        config.save(&path).unwrap();
        let loaded = DacceConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = DacceConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
