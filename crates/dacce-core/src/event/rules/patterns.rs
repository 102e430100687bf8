//! Common regex patterns for fiscal identifiers.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // 44-digit access key (chave de acesso) of an NF-e or CT-e.
    // ASCII only: `\d` would also accept other scripts' digits.
    pub static ref ACCESS_KEY: Regex = Regex::new(r"^[0-9]{44}$").unwrap();

    // Anything that is not an ASCII digit, stripped before punctuating ids
    pub static ref NON_DIGIT: Regex = Regex::new(r"[^0-9]").unwrap();
}
