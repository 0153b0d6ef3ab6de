//! Pull a GST query out of free text.
//!
//! Lightweight pattern extraction, first match only:
//!   amount: optional currency marker, digits with optional comma grouping,
//!           optional decimal fraction
//!   rate:   1-2 digit integer or decimal immediately followed by `%`
//!   mode:   the literal word "inclusive" anywhere in the text
//!
//! The mode test is a keyword heuristic: "not inclusive" still reads as
//! inclusive.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::calc::DEFAULT_RATE;

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?P<cur>₹|\$|rs\.?|inr)?\s*",
        r"(?P<num>\d+(?:,\d+)*(?:\.\d+)?)"
    ))
    .expect("amount pattern is valid")
});

static RATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<rate>\d{1,2}(?:\.\d+)?)%").expect("rate pattern is valid"));

/// Symbol used when the text names no currency.
pub const DEFAULT_CURRENCY: &str = "₹";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GstMode {
    /// Stated amount already contains the tax.
    Inclusive,
    /// Tax is added on top of the stated amount.
    Exclusive,
}

impl GstMode {
    pub fn label(&self) -> &'static str {
        match self {
            GstMode::Inclusive => "inclusive",
            GstMode::Exclusive => "exclusive",
        }
    }
}

/// A GST request derived from raw text. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstQuery {
    pub amount: f64,
    pub rate: f64,
    pub mode: GstMode,
    /// Currency symbol echoed back in the answer.
    pub currency: String,
}

/// First amount in the text, with grouping commas removed.
pub fn extract_amount(text: &str) -> Option<f64> {
    find_amount(&text.to_lowercase()).map(|(amount, _)| amount)
}

fn find_amount(lower: &str) -> Option<(f64, &'static str)> {
    let caps = AMOUNT_RE.captures(lower)?;
    let amount: f64 = caps["num"].replace(',', "").parse().ok()?;
    let currency = match caps.name("cur").map(|m| m.as_str()) {
        Some("$") => "$",
        _ => DEFAULT_CURRENCY,
    };
    Some((amount, currency))
}

/// First `NN%` / `NN.N%` rate in the text, if any.
pub fn extract_rate(text: &str) -> Option<f64> {
    RATE_RE
        .captures(text)
        .and_then(|caps| caps["rate"].parse().ok())
}

pub fn detect_mode(text: &str) -> GstMode {
    if text.to_lowercase().contains("inclusive") {
        GstMode::Inclusive
    } else {
        GstMode::Exclusive
    }
}

/// Build a query from free text. Returns `None` when no amount is present;
/// the rate falls back to 18% instead of failing.
pub fn parse_query(text: &str) -> Option<GstQuery> {
    let lower = text.to_lowercase();
    let (amount, currency) = find_amount(&lower)?;

    Some(GstQuery {
        amount,
        rate: extract_rate(&lower).unwrap_or(DEFAULT_RATE),
        mode: detect_mode(&lower),
        currency: currency.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_plain_and_grouped() {
        assert_eq!(extract_amount("gst on 1000 please"), Some(1000.0));
        assert_eq!(extract_amount("GST on 1,18,000"), Some(118000.0));
        assert_eq!(extract_amount("price ₹2,499.50 incl"), Some(2499.50));
        assert_eq!(extract_amount("gst for rs. 750"), Some(750.0));
    }

    #[test]
    fn test_amount_missing_is_none() {
        assert_eq!(extract_amount("calculate gst"), None);
        assert!(parse_query("what is gst inclusive pricing?").is_none());
    }

    #[test]
    fn test_amount_takes_first_number() {
        // First match wins, even when it is the rate.
        assert_eq!(extract_amount("18% gst on 500"), Some(18.0));
    }

    #[test]
    fn test_rate_needs_percent_sign() {
        assert_eq!(extract_rate("1000 at 18% exclusive"), Some(18.0));
        assert_eq!(extract_rate("1000 at 12.5%"), Some(12.5));
        assert_eq!(extract_rate("1000 at 18 percent"), None);
        assert_eq!(extract_rate("1000 at 5 %"), None);
    }

    #[test]
    fn test_rate_defaults_to_18() {
        let q = parse_query("GST for 500").unwrap();
        assert_eq!(q.rate, 18.0);
        assert_eq!(q.mode, GstMode::Exclusive);
    }

    #[test]
    fn test_mode_is_literal_keyword() {
        assert_eq!(detect_mode("GST INCLUSIVE price"), GstMode::Inclusive);
        assert_eq!(detect_mode("exclusive of tax"), GstMode::Exclusive);
        // Known heuristic limitation.
        assert_eq!(detect_mode("not inclusive"), GstMode::Inclusive);
    }

    #[test]
    fn test_currency_marker() {
        assert_eq!(parse_query("gst on $40 at 5%").unwrap().currency, "$");
        assert_eq!(parse_query("gst on 40 at 5%").unwrap().currency, "₹");
    }
}
