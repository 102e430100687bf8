//! Linear barcode encoding using the barcoders crate.

use barcoders::sym::code128::Code128;
use tracing::trace;

use crate::{BarcodeImage, CanvasError, Result};

/// Code 128 code set A/B/C selectors understood by barcoders.
const CODE_SET_B: char = '\u{0181}';
const CODE_SET_C: char = '\u{0106}';

/// Trait for barcode symbol encoders.
pub trait BarcodeEncoder {
    /// Encode `data` into a barcode symbol.
    fn encode(&self, data: &str) -> Result<BarcodeImage>;
}

/// Code 128 encoder.
///
/// Even-length digit strings use code set C (two digits per symbol), which
/// is how fiscal access keys are printed. Anything else uses code set B.
#[derive(Debug, Clone, Default)]
pub struct Code128Encoder {
    human_readable: bool,
}

impl Code128Encoder {
    /// Create an encoder that emits bars only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the encoded text as a caption under the bars.
    pub fn with_human_readable(mut self, enabled: bool) -> Self {
        self.human_readable = enabled;
        self
    }
}

impl BarcodeEncoder for Code128Encoder {
    fn encode(&self, data: &str) -> Result<BarcodeImage> {
        if data.is_empty() {
            return Err(CanvasError::Barcode("empty input".to_string()));
        }

        let all_digits = data.chars().all(|c| c.is_ascii_digit());
        let code_set = if all_digits && data.len() % 2 == 0 {
            CODE_SET_C
        } else {
            CODE_SET_B
        };

        let prefixed = format!("{code_set}{data}");
        let symbol = Code128::new(&prefixed)
            .map_err(|e| CanvasError::Barcode(e.to_string()))?;
        let modules = symbol.encode();

        trace!("Encoded {} chars into {} modules", data.len(), modules.len());

        Ok(BarcodeImage {
            modules,
            caption: self.human_readable.then(|| data.to_string()),
        })
    }
}
