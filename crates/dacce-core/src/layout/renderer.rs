//! Fixed-position layout of a correction letter on one A4 page.

use dacce_canvas::{Align, BarcodeEncoder, Canvas, FontStyle, Image, Orientation, PageSize};
use tracing::{debug, warn};

use crate::models::config::DacceConfig;
use crate::models::record::{IssuerInfo, ResolvedRecord};

use super::text;

const ISSUER_BOX: (f32, f32, f32, f32) = (10.0, 10.0, 190.0, 33.0);
const ISSUER_DIVIDER_X: f32 = 90.0;
const ADVISORY_BOX: (f32, f32, f32, f32) = (10.0, 47.0, 190.0, 50.0);
const ADVISORY_DIVIDER_Y: f32 = 83.0;
const CORRECTIONS_BOX: (f32, f32, f32, f32) = (10.0, 104.0, 190.0, 170.0);

const LOGO_POSITION: (f32, f32) = (12.0, 12.0);
const LOGO_WIDTH: f32 = 12.0;

const BARCODE_POSITION: (f32, f32) = (127.0, 60.0);
const BARCODE_SIZE: (f32, f32) = (73.0, 8.0);

/// Bottom margin handed to the canvas; automatic page breaks stay off so
/// the letter is always a single page.
const PAGE_BREAK_MARGIN: f32 = 10.0;

/// Text block width used by every full-width section.
const BODY_WIDTH: f32 = 185.0;

/// Horizontal placement of the issuer name and address.
struct IssuerColumn {
    name_x: f32,
    name_width: f32,
    address_y: f32,
}

impl IssuerColumn {
    fn new(with_logo: bool) -> Self {
        if with_logo {
            Self {
                name_x: 23.0,
                name_width: 67.0,
                address_y: 28.0,
            }
        } else {
            Self {
                name_x: 11.0,
                name_width: 80.0,
                address_y: 24.0,
            }
        }
    }
}

/// Lays a [`ResolvedRecord`] out on a [`Canvas`].
///
/// Rendering never fails: fields are already blank when missing, and a
/// logo or barcode that cannot be drawn is logged and left out.
#[derive(Debug, Clone)]
pub struct LetterRenderer {
    title: String,
    font_family: String,
}

impl Default for LetterRenderer {
    fn default() -> Self {
        Self::from_config(&DacceConfig::default())
    }
}

impl LetterRenderer {
    /// Create a renderer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer from the document section of `config`.
    pub fn from_config(config: &DacceConfig) -> Self {
        let document = &config.document;
        Self {
            title: document.title.clone(),
            font_family: document.font_family.clone(),
        }
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the font family used for all text.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Draw the letter for `record` onto `canvas`.
    pub fn render(
        &self,
        record: &ResolvedRecord,
        issuer: Option<&IssuerInfo>,
        logo: Option<&[u8]>,
        canvas: &mut dyn Canvas,
        barcodes: &dyn BarcodeEncoder,
    ) {
        canvas.set_title(&self.title);
        canvas.set_auto_page_break(false, PAGE_BREAK_MARGIN);
        canvas.add_page(PageSize::A4, Orientation::Portrait);

        self.draw_issuer(canvas, issuer, logo);
        self.draw_event_header(canvas, record);
        self.draw_advisory(canvas, record, barcodes);
        self.draw_corrections(canvas, record);
        self.draw_footer(canvas);

        debug!("Rendered correction letter for event {:?}", record.event_id);
    }

    fn font(&self, canvas: &mut dyn Canvas, style: FontStyle, size: f32) {
        canvas.set_font(&self.font_family, style, size);
    }

    fn draw_issuer(&self, canvas: &mut dyn Canvas, issuer: Option<&IssuerInfo>, logo: Option<&[u8]>) {
        let (x, y, w, h) = ISSUER_BOX;
        canvas.rect(x, y, w, h);
        canvas.line(ISSUER_DIVIDER_X, y, ISSUER_DIVIDER_X, y + h);

        let (name, address) = match issuer {
            Some(issuer) => (issuer.name.clone(), issuer.address_block()),
            None => (String::new(), String::new()),
        };

        if let Some(bytes) = logo {
            let (logo_x, logo_y) = LOGO_POSITION;
            let image = Image::Raster(bytes.to_vec());
            if let Err(e) = canvas.image(&image, logo_x, logo_y, LOGO_WIDTH, 0.0) {
                warn!("Skipping logo: {}", e);
            }
        }

        let column = IssuerColumn::new(logo.is_some());
        canvas.set_xy(column.name_x, 16.0);
        self.font(canvas, FontStyle::Bold, 10.0);
        canvas.multi_cell(column.name_width, 4.0, &name, Align::Center);

        canvas.set_xy(11.0, column.address_y);
        self.font(canvas, FontStyle::Regular, 8.0);
        canvas.multi_cell(80.0, 4.0, &address, Align::Center);
    }

    fn draw_event_header(&self, canvas: &mut dyn Canvas, record: &ResolvedRecord) {
        self.font(canvas, FontStyle::Bold, 10.0);
        canvas.text(118.0, 16.0, text::TITLE);
        self.font(canvas, FontStyle::Italic, 9.0);
        canvas.text(123.0, 20.0, &text::subtitle(record.document_kind));

        self.font(canvas, FontStyle::Regular, 8.0);
        canvas.text(92.0, 30.0, &text::event_id_line(record));
        canvas.text(92.0, 35.0, &text::created_at_line(record));
        match text::protocol_line(record) {
            Some(line) => canvas.text(92.0, 40.0, &line),
            None => debug!("Protocol or registration time missing, omitting protocol line"),
        }
    }

    fn draw_advisory(
        &self,
        canvas: &mut dyn Canvas,
        record: &ResolvedRecord,
        barcodes: &dyn BarcodeEncoder,
    ) {
        let (x, y, w, h) = ADVISORY_BOX;
        canvas.rect(x, y, w, h);
        canvas.line(x, ADVISORY_DIVIDER_Y, x + w, ADVISORY_DIVIDER_Y);

        canvas.set_xy(11.0, 48.0);
        self.font(canvas, FontStyle::Regular, 8.0);
        canvas.multi_cell(BODY_WIDTH, 4.0, text::ADVISORY_NOTICE, Align::Left);

        self.draw_barcode(canvas, &record.access_key, barcodes);

        self.font(canvas, FontStyle::Regular, 7.0);
        canvas.text(130.0, 78.0, &record.access_key_display);

        self.font(canvas, FontStyle::Bold, 9.0);
        canvas.text(12.0, 71.0, &text::party_line(record));
        canvas.text(12.0, 76.0, &text::document_line(record));

        canvas.set_xy(11.0, 84.0);
        self.font(canvas, FontStyle::Italic, 7.0);
        canvas.multi_cell(BODY_WIDTH, 3.0, &record.condition_of_use_text, Align::Left);
    }

    fn draw_barcode(&self, canvas: &mut dyn Canvas, key: &str, barcodes: &dyn BarcodeEncoder) {
        let symbol = match barcodes.encode(key) {
            Ok(symbol) => symbol,
            Err(e) => {
                warn!("Skipping access key barcode: {}", e);
                return;
            }
        };

        let (x, y) = BARCODE_POSITION;
        let (w, h) = BARCODE_SIZE;
        if let Err(e) = canvas.image(&Image::Barcode(symbol), x, y, w, h) {
            warn!("Skipping access key barcode: {}", e);
        }
    }

    fn draw_corrections(&self, canvas: &mut dyn Canvas, record: &ResolvedRecord) {
        self.font(canvas, FontStyle::Bold, 9.0);
        canvas.text(11.0, 103.0, text::CORRECTIONS_HEADER);

        let (x, y, w, h) = CORRECTIONS_BOX;
        canvas.rect(x, y, w, h);

        canvas.set_xy(11.0, 106.0);
        self.font(canvas, FontStyle::Regular, 8.0);
        canvas.multi_cell(BODY_WIDTH, 4.0, &record.correction_text, Align::Left);
    }

    fn draw_footer(&self, canvas: &mut dyn Canvas) {
        canvas.set_xy(11.0, 265.0);
        self.font(canvas, FontStyle::Italic, 8.0);
        canvas.multi_cell(BODY_WIDTH, 4.0, text::FOOTER, Align::Center);
    }
}

/// Extract `xml` and render it into a finished PDF.
///
/// `issuer` falls back to the issuer configured in `config`. Fails only
/// when the XML is not well-formed or the PDF cannot be serialized.
#[cfg(feature = "pdf")]
pub fn render_pdf(
    xml: &[u8],
    issuer: Option<&IssuerInfo>,
    logo: Option<&[u8]>,
    config: &DacceConfig,
) -> crate::Result<Vec<u8>> {
    use dacce_canvas::{Code128Encoder, PdfCanvas};

    let record = crate::event::extract(xml)?;
    let issuer = issuer.or(config.issuer.as_ref());

    let encoder = Code128Encoder::new().with_human_readable(config.barcode.human_readable);
    let mut canvas = PdfCanvas::new();
    LetterRenderer::from_config(config).render(&record, issuer, logo, &mut canvas, &encoder);

    Ok(canvas.finish()?)
}
