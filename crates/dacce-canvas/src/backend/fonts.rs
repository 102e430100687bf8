//! Standard-font selection and text measurement on top of oxidize-pdf.
//!
//! Widths come from oxidize-pdf's core-14 metrics, which work in points;
//! everything here is converted to millimeters for the canvas.

use oxidize_pdf::text::{measure_text, split_into_words, Font, FontFamily, TextEncoding};

use crate::FontStyle;

/// Points per millimeter.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Horizontal padding applied on both sides of a wrapped-text box, in mm.
pub const CELL_MARGIN: f32 = 1.0;

/// Resolve a family name; unknown families fall back to Helvetica.
fn family_of(name: &str) -> FontFamily {
    match name.to_ascii_lowercase().as_str() {
        "courier" | "monospace" => FontFamily::Courier,
        "times" | "times-roman" | "serif" => FontFamily::Times,
        _ => FontFamily::Helvetica,
    }
}

/// A concrete standard font at a given size.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSelection {
    font: Font,
    /// Size in points.
    size: f32,
}

impl FontSelection {
    pub fn new(family: &str, style: FontStyle, size: f32) -> Self {
        let family = family_of(family);
        let font = match style {
            FontStyle::Regular => family.regular(),
            FontStyle::Bold => family.bold(),
            FontStyle::Italic => family.italic(),
            FontStyle::BoldItalic => family.bold_italic(),
        };
        Self { font, size }
    }

    /// PostScript name of the face.
    pub fn base_font(&self) -> String {
        self.font.pdf_name()
    }

    /// Font size in millimeters.
    pub fn size_mm(&self) -> f32 {
        self.size / PT_PER_MM
    }

    /// Width of `text` in millimeters.
    pub fn text_width(&self, text: &str) -> f32 {
        measure_text(text, self.font.clone(), f64::from(self.size)) as f32 / PT_PER_MM
    }

    /// Break `text` into lines no wider than `max_width` millimeters.
    ///
    /// Explicit newlines always start a new line. Words wider than the box
    /// are split between characters.
    pub fn wrap(&self, text: &str, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let paragraph = paragraph.trim_end_matches('\r');
            let first = lines.len();
            let mut current = String::new();

            for token in split_into_words(paragraph) {
                let is_space = token.trim().is_empty();
                if is_space && current.is_empty() {
                    continue;
                }
                if self.text_width(&format!("{current}{token}")) <= max_width {
                    current.push_str(token);
                    continue;
                }

                if !current.is_empty() {
                    lines.push(current.trim_end().to_string());
                    current.clear();
                }
                if is_space {
                    continue;
                }

                // Start the word on a fresh line, splitting it if still too wide.
                for c in token.chars() {
                    current.push(c);
                    if self.text_width(&current) > max_width && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    }
                }
            }

            // An empty paragraph still takes one line.
            if !current.is_empty() || lines.len() == first {
                lines.push(current.trim_end().to_string());
            }
        }

        lines
    }
}

/// Encode text as WinAnsi (cp1252) bytes for the standard fonts.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    TextEncoding::WinAnsiEncoding.encode(text)
}
