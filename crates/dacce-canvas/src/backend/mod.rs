//! Canvas backend implementations.

#[cfg(feature = "pdf")]
mod fonts;
#[cfg(feature = "pdf")]
pub mod pdf;

pub mod recording;

use crate::Result;

/// Font style variants understood by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    /// Whether the style uses the bold weight.
    pub fn is_bold(self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    /// Whether the style is slanted.
    pub fn is_italic(self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }
}

/// Horizontal alignment of wrapped text inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page size in millimeters (portrait dimensions).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageSize {
    A4,
    Letter,
    Custom { width: f32, height: f32 },
}

impl PageSize {
    /// Width and height in millimeters for the given orientation.
    pub fn dimensions(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Custom { width, height } => (width, height),
        };
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// A linear barcode symbol: one entry per module, `1` = bar, `0` = space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeImage {
    pub modules: Vec<u8>,
    /// Human-readable text printed under the bars, when enabled.
    pub caption: Option<String>,
}

impl BarcodeImage {
    /// Runs of consecutive bars as `(start_module, width_in_modules)`.
    pub fn bar_runs(&self) -> Vec<(usize, usize)> {
        let mut runs = Vec::new();
        let mut start = None;
        for (i, &module) in self.modules.iter().enumerate() {
            match (module == 1, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    runs.push((s, i - s));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push((s, self.modules.len() - s));
        }
        runs
    }
}

/// An image that can be placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Image {
    /// Encoded raster bytes (PNG, JPEG, ...).
    Raster(Vec<u8>),
    /// Vector barcode drawn as filled bars.
    Barcode(BarcodeImage),
}

/// Drawing surface for one document.
///
/// All coordinates and sizes are in millimeters with the origin at the
/// top-left corner of the page. Font sizes are in points.
pub trait Canvas {
    /// Set the document title.
    fn set_title(&mut self, title: &str);

    /// Configure automatic page breaks for wrapped text.
    ///
    /// With `auto` set, a wrapped line that would cross `margin` millimeters
    /// from the bottom edge continues on a new page.
    fn set_auto_page_break(&mut self, auto: bool, margin: f32);

    /// Start a new page.
    fn add_page(&mut self, size: PageSize, orientation: Orientation);

    /// Select the font used by subsequent text operations.
    fn set_font(&mut self, family: &str, style: FontStyle, size: f32);

    /// Move the cursor used by [`Canvas::multi_cell`].
    fn set_xy(&mut self, x: f32, y: f32);

    /// Stroke a rectangle outline.
    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    /// Stroke a straight line.
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);

    /// Draw a single line of text with its baseline at `y`.
    fn text(&mut self, x: f32, y: f32, text: &str);

    /// Draw text wrapped into a box `w` wide starting at the cursor, one
    /// line every `h` millimeters. The cursor ends below the last line.
    fn multi_cell(&mut self, w: f32, h: f32, text: &str, align: Align);

    /// Place an image with its top-left corner at `(x, y)`.
    ///
    /// A height of `0.0` keeps the image's aspect ratio.
    fn image(&mut self, image: &Image, x: f32, y: f32, w: f32, h: f32) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_runs() {
        let image = BarcodeImage {
            modules: vec![1, 1, 0, 1, 0, 0, 1, 1, 1],
            caption: None,
        };
        assert_eq!(image.bar_runs(), vec![(0, 2), (3, 1), (6, 3)]);
    }

    #[test]
    fn test_page_dimensions() {
        assert_eq!(PageSize::A4.dimensions(Orientation::Portrait), (210.0, 297.0));
        assert_eq!(PageSize::A4.dimensions(Orientation::Landscape), (297.0, 210.0));
    }
}
