//! Access key (chave de acesso) derivations.
//!
//! Layout of the 44 digits: state (2), year/month (4), issuer id (14),
//! model (2), series (3), document number (9), emission type (1),
//! random code (8), check digit (1).

use tracing::warn;

use super::patterns::ACCESS_KEY;

const SERIES: std::ops::Range<usize> = 22..25;
const NUMBER: std::ops::Range<usize> = 25..34;

/// Series and number of the referenced document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyParts {
    pub series: String,
    /// Zero-padded to nine digits and grouped by thousands: `000.004.567`.
    pub number: String,
}

/// Slice the series and document number out of a 44-digit key.
///
/// Returns `None` unless the key is exactly 44 ASCII digits.
pub fn split_access_key(key: &str) -> Option<KeyParts> {
    if !ACCESS_KEY.is_match(key) {
        if !key.is_empty() {
            warn!("Access key {:?} is not 44 digits, omitting number and series", key);
        }
        return None;
    }

    let number: u64 = key.get(NUMBER)?.parse().ok()?;
    Some(KeyParts {
        series: key.get(SERIES)?.to_string(),
        number: group_thousands(number, 9),
    })
}

/// Zero-pad `value` to `width` digits and separate thousands with dots.
pub fn group_thousands(value: u64, width: usize) -> String {
    let digits = format!("{value:0width$}");
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

/// Split a key into space-separated groups of four characters.
pub fn group_access_key(key: &str) -> String {
    key.chars()
        .collect::<Vec<_>>()
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
