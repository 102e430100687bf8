//! Core library for DACCe correction-letter rendering.
//!
//! This crate provides:
//! - Field extraction from NF-e and CT-e correction events (CC-e XML)
//! - Tax id, access key and timestamp formatting rules
//! - The fixed single-page layout, drawn onto any [`Canvas`]
//! - [`render_pdf`]: XML bytes in, finished PDF bytes out

pub mod error;
pub mod event;
pub mod layout;
pub mod models;

pub use error::{DacceError, Result, XmlError};
pub use event::{extract, CorrectionEventParser, EventExtractor, NamespaceQuery};
pub use layout::LetterRenderer;
#[cfg(feature = "pdf")]
pub use layout::render_pdf;
pub use models::config::{BarcodeConfig, DacceConfig, DocumentConfig};
pub use models::record::{DocumentKind, IssuerInfo, LocalDateTime, ResolvedRecord};

/// Re-export drawing types.
pub use dacce_canvas::{BarcodeEncoder, Canvas, Code128Encoder, RecordingCanvas};

#[cfg(feature = "pdf")]
pub use dacce_canvas::PdfCanvas;
