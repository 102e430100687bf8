//! Correction-event field extraction.

mod parser;
pub mod query;
pub mod rules;
pub mod xml;

pub use parser::CorrectionEventParser;
pub use query::NamespaceQuery;
pub use xml::XmlElement;

use crate::error::XmlError;
use crate::models::record::ResolvedRecord;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, XmlError>;

/// Trait for correction-event extractors.
pub trait EventExtractor {
    /// Resolve the display fields of a correction-event document.
    fn extract(&self, xml: &[u8]) -> Result<ResolvedRecord>;
}

/// Extract with the default parser.
pub fn extract(xml: &[u8]) -> Result<ResolvedRecord> {
    CorrectionEventParser::new().extract(xml)
}
