//! Page drawing abstraction for dacce.
//!
//! This crate provides the drawing capabilities the correction-letter
//! layout is written against:
//! - [`Canvas`]: absolute-position page primitives in millimeters,
//!   top-left origin
//! - [`PdfCanvas`]: a PDF writer built on `lopdf`
//! - [`RecordingCanvas`]: captures the drawing commands as data
//! - [`BarcodeEncoder`] / [`Code128Encoder`]: linear barcode symbols

mod backend;
mod barcode;
mod error;

pub use backend::recording::{DrawCommand, RecordingCanvas};
pub use backend::{Align, BarcodeImage, Canvas, FontStyle, Image, Orientation, PageSize};
pub use barcode::{BarcodeEncoder, Code128Encoder};
pub use error::CanvasError;

#[cfg(feature = "pdf")]
pub use backend::pdf::PdfCanvas;

/// Result type for canvas operations.
pub type Result<T> = std::result::Result<T, CanvasError>;
