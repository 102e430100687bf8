//! Error types for the canvas layer.

use thiserror::Error;

/// Errors that can occur while drawing or serializing a page.
#[derive(Error, Debug)]
pub enum CanvasError {
    /// An embedded image could not be decoded.
    #[error("failed to decode image: {0}")]
    Image(String),

    /// The barcode symbol could not be built from the input.
    #[error("failed to encode barcode: {0}")]
    Barcode(String),

    /// A drawing operation was issued before any page was started.
    #[error("no page has been started")]
    NoPage,

    /// Serializing the finished document failed.
    #[error("failed to write document: {0}")]
    Output(String),

    /// I/O error when writing the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
