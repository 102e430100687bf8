//! Brazilian taxpayer id formatting (CNPJ for companies, CPF for individuals).

use super::patterns::NON_DIGIT;

/// Kind of taxpayer id, decided by its digit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxIdKind {
    /// 14-digit company id (CNPJ).
    Company,
    /// Individual id (CPF), 11 digits when well formed.
    Individual,
}

impl TaxIdKind {
    /// Classify a digit string.
    pub fn of(digits: &str) -> Self {
        if digits.chars().count() == 14 {
            TaxIdKind::Company
        } else {
            TaxIdKind::Individual
        }
    }
}

/// Punctuate a taxpayer id.
///
/// 14 digits become `NN.NNN.NNN/NNNN-NN`; anything else uses the individual
/// pattern `NNN.NNN.NNN-NN` over the digits available. Empty input stays
/// empty.
pub fn format_tax_id(id: &str) -> String {
    let digits = NON_DIGIT.replace_all(id, "").into_owned();
    if digits.is_empty() {
        return String::new();
    }

    let part = |from: usize, to: usize| {
        digits.get(from.min(digits.len())..to.min(digits.len())).unwrap_or("")
    };

    match TaxIdKind::of(&digits) {
        TaxIdKind::Company => format!(
            "{}.{}.{}/{}-{}",
            part(0, 2),
            part(2, 5),
            part(5, 8),
            part(8, 12),
            part(12, 14)
        ),
        TaxIdKind::Individual => format!(
            "{}.{}.{}-{}",
            part(0, 3),
            part(3, 6),
            part(6, 9),
            part(9, digits.len().max(9))
        ),
    }
}
