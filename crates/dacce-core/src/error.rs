//! Error types for the dacce-core library.

use thiserror::Error;

/// Main error type for the dacce library.
#[derive(Error, Debug)]
pub enum DacceError {
    /// The event document is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    /// Drawing or serializing the page failed.
    #[error("canvas error: {0}")]
    Canvas(#[from] dacce_canvas::CanvasError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while parsing the event XML.
///
/// These are the only fatal extraction failures: every missing or
/// malformed field inside a well-formed document degrades to blank text.
#[derive(Error, Debug)]
pub enum XmlError {
    /// The reader rejected the markup.
    #[error("malformed XML: {0}")]
    Syntax(String),

    /// The input contains no element at all.
    #[error("document has no root element")]
    NoRoot,

    /// The input ended inside an open element.
    #[error("unexpected end of document inside <{0}>")]
    UnclosedElement(String),

    /// A second top-level element follows the root.
    #[error("document has more than one root element")]
    MultipleRoots,
}

/// Result type for the dacce library.
pub type Result<T> = std::result::Result<T, DacceError>;
