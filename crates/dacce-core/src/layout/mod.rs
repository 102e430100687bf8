//! Page layout of the correction letter.

mod renderer;
pub mod text;

pub use renderer::LetterRenderer;

#[cfg(feature = "pdf")]
pub use renderer::render_pdf;
