//! PDF canvas backed by lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::{debug, warn};

use super::{Align, BarcodeImage, Canvas, FontStyle, Image, Orientation, PageSize};
use crate::error::CanvasError;
use super::fonts::{encode_win_ansi, FontSelection, CELL_MARGIN, PT_PER_MM};
use crate::Result;

/// Default stroke width in millimeters.
const LINE_WIDTH: f32 = 0.2;

/// Top margin used when wrapped text continues on a new page.
const TOP_MARGIN: f32 = 10.0;

struct PageState {
    width: f32,
    height: f32,
    operations: Vec<Operation>,
}

/// Canvas that writes a PDF document using the standard Type 1 fonts.
pub struct PdfCanvas {
    document: Document,
    title: Option<String>,
    pages: Vec<PageState>,
    /// Registered fonts: (PostScript name, resource key).
    fonts: Vec<(String, String)>,
    /// Embedded image XObjects: (resource key, object id).
    images: Vec<(String, ObjectId)>,
    family: String,
    style: FontStyle,
    size: f32,
    font_key: Option<String>,
    x: f32,
    y: f32,
    auto_page_break: bool,
    page_break_margin: f32,
}

impl PdfCanvas {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            document: Document::with_version("1.5"),
            title: None,
            pages: Vec::new(),
            fonts: Vec::new(),
            images: Vec::new(),
            family: "Helvetica".to_string(),
            style: FontStyle::Regular,
            size: 12.0,
            font_key: None,
            x: TOP_MARGIN,
            y: TOP_MARGIN,
            auto_page_break: true,
            page_break_margin: 20.0,
        }
    }

    /// Number of pages started so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Assemble the page tree and serialize the document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        if self.pages.is_empty() {
            return Err(CanvasError::NoPage);
        }

        let pages_id = self.document.new_object_id();

        let mut font_dict = Dictionary::new();
        for (base_font, key) in &self.fonts {
            let font_id = self.document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => Object::Name(base_font.clone().into_bytes()),
                "Encoding" => "WinAnsiEncoding",
            });
            font_dict.set(key.clone(), font_id);
        }

        let mut xobject_dict = Dictionary::new();
        for (key, image_id) in &self.images {
            xobject_dict.set(key.clone(), *image_id);
        }

        let resources_id = self.document.add_object(dictionary! {
            "Font" => font_dict,
            "XObject" => xobject_dict,
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page in std::mem::take(&mut self.pages) {
            let content = Content {
                operations: page.operations,
            };
            let encoded = content
                .encode()
                .map_err(|e| CanvasError::Output(e.to_string()))?;
            let content_id = self
                .document
                .add_object(Stream::new(dictionary! {}, encoded));

            let page_id = self.document.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![
                    0.0f32.into(),
                    0.0f32.into(),
                    (page.width * PT_PER_MM).into(),
                    (page.height * PT_PER_MM).into(),
                ],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        self.document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
            }),
        );

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::String(b"dacce".to_vec(), StringFormat::Literal),
        };
        if let Some(title) = &self.title {
            info.set(
                "Title",
                Object::String(encode_win_ansi(title), StringFormat::Literal),
            );
        }
        let info_id = self.document.add_object(info);
        self.document.trailer.set("Info", info_id);

        self.document.compress();

        let mut output = Vec::new();
        self.document
            .save_to(&mut output)
            .map_err(|e| CanvasError::Output(e.to_string()))?;

        debug!("Wrote PDF: {} bytes, {} page(s)", output.len(), count);
        Ok(output)
    }

    fn current_font(&self) -> FontSelection {
        FontSelection::new(&self.family, self.style, self.size)
    }

    fn start_page(&mut self, width: f32, height: f32) {
        self.pages.push(PageState {
            width,
            height,
            operations: vec![Operation::new("w", vec![(LINE_WIDTH * PT_PER_MM).into()])],
        });
        self.x = TOP_MARGIN;
        self.y = TOP_MARGIN;
    }

    /// Operations buffer of the current page, or `None` before `add_page`.
    fn page(&mut self) -> Option<&mut PageState> {
        let page = self.pages.last_mut();
        if page.is_none() {
            warn!("Drawing ignored: no page has been started");
        }
        page
    }

    fn font_key(&mut self) -> String {
        if let Some(key) = &self.font_key {
            return key.clone();
        }
        let base_font = self.current_font().base_font();
        let key = match self.fonts.iter().find(|(name, _)| *name == base_font) {
            Some((_, key)) => key.clone(),
            None => {
                let key = format!("F{}", self.fonts.len() + 1);
                self.fonts.push((base_font, key.clone()));
                key
            }
        };
        self.font_key = Some(key.clone());
        key
    }

    fn push_text(&mut self, x: f32, y: f32, text: &str) {
        let key = self.font_key();
        let size = self.size;
        let Some(page) = self.page() else {
            return;
        };
        let baseline = page.height - y;
        page.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(key.into_bytes()), size.into()]),
            Operation::new("Td", vec![(x * PT_PER_MM).into(), (baseline * PT_PER_MM).into()]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn draw_barcode(&mut self, barcode: &BarcodeImage, x: f32, y: f32, w: f32, h: f32) {
        if barcode.modules.is_empty() {
            return;
        }
        let module_width = w / barcode.modules.len() as f32;
        let Some(page) = self.page() else {
            return;
        };
        let bottom = page.height - y - h;

        page.operations.push(Operation::new("q", vec![]));
        page.operations.push(Operation::new("g", vec![0.0f32.into()]));
        for (start, run) in barcode.bar_runs() {
            page.operations.push(Operation::new(
                "re",
                vec![
                    ((x + start as f32 * module_width) * PT_PER_MM).into(),
                    (bottom * PT_PER_MM).into(),
                    (run as f32 * module_width * PT_PER_MM).into(),
                    (h * PT_PER_MM).into(),
                ],
            ));
        }
        page.operations.push(Operation::new("f", vec![]));
        page.operations.push(Operation::new("Q", vec![]));

        if let Some(caption) = &barcode.caption {
            let font = self.current_font();
            let cx = x + (w - font.text_width(caption)) / 2.0;
            self.push_text(cx, y + h + font.size_mm(), caption);
        }
    }

    fn draw_raster(&mut self, bytes: &[u8], x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        if self.pages.is_empty() {
            return Err(CanvasError::NoPage);
        }

        let decoded = image::load_from_memory(bytes)
            .map_err(|e| CanvasError::Image(e.to_string()))?
            .to_rgb8();
        let (pixels_w, pixels_h) = decoded.dimensions();
        if pixels_w == 0 || pixels_h == 0 {
            return Err(CanvasError::Image("image has no pixels".to_string()));
        }
        let h = if h > 0.0 {
            h
        } else {
            w * pixels_h as f32 / pixels_w as f32
        };

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(pixels_w),
                "Height" => i64::from(pixels_h),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8i64,
            },
            decoded.into_raw(),
        );
        let image_id = self.document.add_object(stream);
        let key = format!("Im{}", self.images.len() + 1);
        self.images.push((key.clone(), image_id));

        let Some(page) = self.page() else {
            return Err(CanvasError::NoPage);
        };
        let bottom = page.height - y - h;
        page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    (w * PT_PER_MM).into(),
                    0.0f32.into(),
                    0.0f32.into(),
                    (h * PT_PER_MM).into(),
                    (x * PT_PER_MM).into(),
                    (bottom * PT_PER_MM).into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(key.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);

        debug!("Embedded {}x{} image at ({}, {})", pixels_w, pixels_h, x, y);
        Ok(())
    }
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for PdfCanvas {
    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn set_auto_page_break(&mut self, auto: bool, margin: f32) {
        self.auto_page_break = auto;
        self.page_break_margin = margin;
    }

    fn add_page(&mut self, size: PageSize, orientation: Orientation) {
        let (width, height) = size.dimensions(orientation);
        self.start_page(width, height);
    }

    fn set_font(&mut self, family: &str, style: FontStyle, size: f32) {
        self.family = family.to_string();
        self.style = style;
        self.size = size;
        self.font_key = None;
    }

    fn set_xy(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let Some(page) = self.page() else {
            return;
        };
        let bottom = page.height - y - h;
        page.operations.push(Operation::new(
            "re",
            vec![
                (x * PT_PER_MM).into(),
                (bottom * PT_PER_MM).into(),
                (w * PT_PER_MM).into(),
                (h * PT_PER_MM).into(),
            ],
        ));
        page.operations.push(Operation::new("S", vec![]));
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let Some(page) = self.page() else {
            return;
        };
        let height = page.height;
        page.operations.extend([
            Operation::new("m", vec![(x1 * PT_PER_MM).into(), ((height - y1) * PT_PER_MM).into()]),
            Operation::new("l", vec![(x2 * PT_PER_MM).into(), ((height - y2) * PT_PER_MM).into()]),
            Operation::new("S", vec![]),
        ]);
    }

    fn text(&mut self, x: f32, y: f32, text: &str) {
        if !text.is_empty() {
            self.push_text(x, y, text);
        }
    }

    fn multi_cell(&mut self, w: f32, h: f32, text: &str, align: Align) {
        let font = self.current_font();
        let left = self.x;

        for line in font.wrap(text, w - 2.0 * CELL_MARGIN) {
            if let Some(page) = self.pages.last() {
                let (width, height) = (page.width, page.height);
                if self.auto_page_break && self.y + h > height - self.page_break_margin {
                    self.start_page(width, height);
                }
            }

            if !line.is_empty() {
                let line_width = font.text_width(&line);
                let dx = match align {
                    Align::Left => CELL_MARGIN,
                    Align::Center => (w - line_width) / 2.0,
                    Align::Right => w - CELL_MARGIN - line_width,
                };
                let baseline = self.y + 0.5 * h + 0.3 * font.size_mm();
                self.push_text(left + dx, baseline, &line);
            }
            self.y += h;
        }

        self.x = left;
    }

    fn image(&mut self, image: &Image, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        match image {
            Image::Raster(bytes) => self.draw_raster(bytes, x, y, w, h),
            Image::Barcode(barcode) => {
                if self.pages.is_empty() {
                    return Err(CanvasError::NoPage);
                }
                let h = if h > 0.0 { h } else { w * 0.15 };
                self.draw_barcode(barcode, x, y, w, h);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BarcodeEncoder, Code128Encoder};

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 2, image::Rgb([200, 10, 10]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_finish_without_page_fails() {
        let canvas = PdfCanvas::new();
        assert!(matches!(canvas.finish(), Err(CanvasError::NoPage)));
    }

    #[test]
    fn test_single_page_document() {
        let mut canvas = PdfCanvas::new();
        canvas.set_title("DACCe");
        canvas.add_page(PageSize::A4, Orientation::Portrait);
        canvas.set_font("Helvetica", FontStyle::Bold, 10.0);
        canvas.rect(10.0, 10.0, 190.0, 33.0);
        canvas.line(90.0, 10.0, 90.0, 43.0);
        canvas.text(118.0, 16.0, "Título");
        canvas.set_xy(11.0, 48.0);
        canvas.multi_cell(185.0, 4.0, "wrapped body text", Align::Left);

        let bytes = canvas.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_cell_text_is_wrapped_and_win_ansi() {
        let mut canvas = PdfCanvas::new();
        canvas.add_page(PageSize::A4, Orientation::Portrait);
        canvas.set_font("Helvetica", FontStyle::Regular, 8.0);
        canvas.set_xy(11.0, 110.0);
        canvas.multi_cell(40.0, 4.0, &"Correção de campo ".repeat(6), Align::Left);

        let shown: Vec<Vec<u8>> = canvas.pages[0]
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| op.operands[0].as_str().ok().map(<[u8]>::to_vec))
            .collect();
        assert!(shown.len() > 1);
        assert!(shown[0].starts_with(&[b'C', b'o', b'r', b'r', b'e', 0xe7, 0xe3, b'o']));
        assert_eq!(canvas.y, 110.0 + 4.0 * shown.len() as f32);
    }

    #[test]
    fn test_auto_page_break() {
        let mut canvas = PdfCanvas::new();
        canvas.set_auto_page_break(true, 10.0);
        canvas.add_page(PageSize::A4, Orientation::Portrait);
        canvas.set_font("Helvetica", FontStyle::Regular, 8.0);
        canvas.set_xy(10.0, 280.0);
        canvas.multi_cell(100.0, 4.0, "one\ntwo\nthree\nfour\nfive", Align::Left);

        assert_eq!(canvas.page_count(), 2);
    }

    #[test]
    fn test_no_page_break_when_disabled() {
        let mut canvas = PdfCanvas::new();
        canvas.set_auto_page_break(false, 10.0);
        canvas.add_page(PageSize::A4, Orientation::Portrait);
        canvas.set_xy(10.0, 280.0);
        canvas.multi_cell(100.0, 4.0, "one\ntwo\nthree\nfour\nfive", Align::Left);

        assert_eq!(canvas.page_count(), 1);
    }

    #[test]
    fn test_embed_raster_and_barcode() {
        let mut canvas = PdfCanvas::new();
        canvas.add_page(PageSize::A4, Orientation::Portrait);
        canvas
            .image(&Image::Raster(png_bytes()), 12.0, 12.0, 12.0, 0.0)
            .unwrap();
        let barcode = Code128Encoder::new().encode("12345678").unwrap();
        canvas
            .image(&Image::Barcode(barcode), 127.0, 60.0, 73.0, 8.0)
            .unwrap();

        let bytes = canvas.finish().unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_invalid_raster_is_an_error() {
        let mut canvas = PdfCanvas::new();
        canvas.add_page(PageSize::A4, Orientation::Portrait);
        let result = canvas.image(&Image::Raster(vec![1, 2, 3]), 0.0, 0.0, 10.0, 10.0);
        assert!(matches!(result, Err(CanvasError::Image(_))));
    }
}
