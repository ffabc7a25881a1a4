//! Invoice number extraction.

mod extractor;
pub mod patterns;

pub use extractor::{
    extract_invoice_number, InvoiceNumberExtractor, MIN_INVOICE_DIGITS,
};
