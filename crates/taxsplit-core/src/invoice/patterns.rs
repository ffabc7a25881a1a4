//! Regex patterns for locating the invoice number label.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Horizontal whitespace runs (newlines are kept)
    pub static ref HORIZONTAL_WS: Regex = Regex::new(r"[ \t]+").unwrap();

    // "Tax Invoice No", optional ".", optional ":", then one unbroken digit run
    pub static ref TAX_INVOICE_NO: Regex = Regex::new(
        r"(?i)\bTax\s+Invoice\s+No\.?\s*:?\s*([0-9]{4,})\b"
    ).unwrap();

    // Same label, but the digit run may be split by spaces or tabs (OCR output)
    pub static ref TAX_INVOICE_NO_SPACED: Regex = Regex::new(
        r"(?i)\bTax\s+Invoice\s+No\.?\s*:?\s*([0-9](?:[ \t]*[0-9])*)\b"
    ).unwrap();
}
