//! "Tax Invoice No" extraction.

use regex::Regex;
use tracing::trace;

use super::patterns::{HORIZONTAL_WS, TAX_INVOICE_NO, TAX_INVOICE_NO_SPACED};

/// Minimum number of digits an invoice number must have.
pub const MIN_INVOICE_DIGITS: usize = 4;

/// How strictly the digit run after the label is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DigitMode {
    /// One unbroken run of digits.
    Strict,
    /// Digits may be separated by spaces or tabs; separators are removed.
    Tolerant,
}

/// Locates the invoice number following the "Tax Invoice No" label.
#[derive(Debug, Clone, Copy)]
pub struct InvoiceNumberExtractor {
    mode: DigitMode,
}

impl InvoiceNumberExtractor {
    /// Extractor requiring an unbroken digit run.
    pub fn strict() -> Self {
        Self {
            mode: DigitMode::Strict,
        }
    }

    /// Extractor that joins digit runs split by whitespace.
    pub fn tolerant() -> Self {
        Self {
            mode: DigitMode::Tolerant,
        }
    }

    /// Build an extractor from the `tolerant_digits` setting.
    pub fn from_tolerance(tolerant: bool) -> Self {
        if tolerant {
            Self::tolerant()
        } else {
            Self::strict()
        }
    }

    /// Return the first invoice number in `text`, digits only.
    pub fn extract(&self, text: &str) -> Option<String> {
        let normalized = normalize_text(text);

        for caps in self.pattern().captures_iter(&normalized) {
            let raw = &caps[1];
            let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

            if digits.len() >= MIN_INVOICE_DIGITS && digits.chars().all(|c| c.is_ascii_digit()) {
                trace!("Matched invoice number {} from {:?}", digits, raw);
                return Some(digits);
            }
        }

        None
    }

    fn pattern(&self) -> &'static Regex {
        match self.mode {
            DigitMode::Strict => &TAX_INVOICE_NO,
            DigitMode::Tolerant => &TAX_INVOICE_NO_SPACED,
        }
    }
}

impl Default for InvoiceNumberExtractor {
    fn default() -> Self {
        Self::tolerant()
    }
}

/// Extract the invoice number from page text (tolerant of split digit runs).
pub fn extract_invoice_number(text: &str) -> Option<String> {
    InvoiceNumberExtractor::tolerant().extract(text)
}

/// Turn non-breaking spaces into spaces and collapse horizontal whitespace.
fn normalize_text(text: &str) -> String {
    let text = text.replace('\u{00a0}', " ");
    HORIZONTAL_WS.replace_all(&text, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_forms() {
        for text in [
            "Tax Invoice No: 1007585",
            "TAX INVOICE NO. 1007585",
            "Tax Invoice No:1007585",
            "Tax Invoice No 1007585",
            "tax invoice no.: 1007585",
        ] {
            assert_eq!(extract_invoice_number(text), Some("1007585".to_string()), "{}", text);
        }
    }

    #[test]
    fn test_spaced_digits_are_joined() {
        assert_eq!(
            extract_invoice_number("Tax Invoice No: 1 0 0 7 5 8 5"),
            Some("1007585".to_string())
        );
        assert_eq!(
            extract_invoice_number("Tax Invoice No:\t100\t7585"),
            Some("1007585".to_string())
        );
    }

    #[test]
    fn test_strict_mode_keeps_first_run() {
        let strict = InvoiceNumberExtractor::strict();
        assert_eq!(
            strict.extract("Tax Invoice No: 1007 585"),
            Some("1007".to_string())
        );
        assert_eq!(strict.extract("Tax Invoice No: 1 0 0 7 5 8 5"), None);
    }

    #[test]
    fn test_strict_mode_stops_before_same_line_date() {
        let strict = InvoiceNumberExtractor::strict();
        for text in [
            "Tax Invoice No: 1007585 01/02/2024",
            "Tax Invoice No: 1007585 12 Mar 2024",
        ] {
            assert_eq!(strict.extract(text), Some("1007585".to_string()), "{}", text);
        }
    }

    #[test]
    fn test_minimum_digits() {
        assert_eq!(extract_invoice_number("Tax Invoice No: 123"), None);
        assert_eq!(
            extract_invoice_number("Tax Invoice No: 1234"),
            Some("1234".to_string())
        );
    }

    #[test]
    fn test_label_missing() {
        assert_eq!(extract_invoice_number("Invoice 1007585"), None);
        assert_eq!(extract_invoice_number("Tax Receipt No: 1007585"), None);
        assert_eq!(extract_invoice_number(""), None);
    }

    #[test]
    fn test_digits_glued_to_letters_rejected() {
        assert_eq!(extract_invoice_number("Tax Invoice No: 1007585AB"), None);
    }

    #[test]
    fn test_non_breaking_space() {
        assert_eq!(
            extract_invoice_number("Tax\u{00a0}Invoice\u{00a0}No:\u{00a0}1007585"),
            Some("1007585".to_string())
        );
    }

    #[test]
    fn test_first_match_wins() {
        let text = "Tax Invoice No: 1111111\nTax Invoice No: 2222222";
        assert_eq!(extract_invoice_number(text), Some("1111111".to_string()));
    }

    #[test]
    fn test_short_first_label_skipped() {
        let text = "Tax Invoice No: 12\nTax Invoice No: 2222222";
        assert_eq!(extract_invoice_number(text), Some("2222222".to_string()));
    }

    #[test]
    fn test_digit_run_does_not_cross_lines() {
        let text = "Tax Invoice No: 1007585\n2024";
        assert_eq!(extract_invoice_number(text), Some("1007585".to_string()));
    }

    #[test]
    fn test_surrounding_text() {
        let text = "ACME Pty Ltd\nABN 12 345 678 901\nTax Invoice No: 1007585   Date: 01/02/2024\nTotal $1,200.00";
        assert_eq!(extract_invoice_number(text), Some("1007585".to_string()));
    }

    #[test]
    fn test_idempotent() {
        let text = "Tax Invoice No: 1 0 0 7 5 8 5";
        let first = extract_invoice_number(text);
        for _ in 0..5 {
            assert_eq!(extract_invoice_number(text), first);
        }
    }
}
