//! Turn a solved query into the text shown to the user.

use serde::{Deserialize, Serialize};

use crate::calc::{compute, GstResult};
use crate::parse::{parse_query, GstMode, GstQuery};

/// Fixed confidence for any query whose amount parsed.
pub const GST_CONFIDENCE: f64 = 0.95;

/// Phrases that mark a message as a GST request.
pub const GST_TRIGGERS: &[&str] = &[
    "gst",
    "goods and services tax",
    "calculate gst",
    "inclusive",
    "exclusive",
];

/// Solved GST request plus its rendered explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstAnswer {
    pub query: GstQuery,
    pub result: GstResult,
    pub text: String,
}

/// Case-insensitive check against [`GST_TRIGGERS`].
pub fn mentions_gst(text: &str) -> bool {
    let lower = text.to_lowercase();
    GST_TRIGGERS.iter().any(|p| lower.contains(p))
}

/// Parse, compute and explain. `None` when the text carries no amount.
pub fn solve(text: &str) -> Option<GstAnswer> {
    let query = parse_query(text)?;
    let result = compute(&query);
    let text = explain(&query, &result);
    tracing::debug!(
        amount = query.amount,
        rate = query.rate,
        mode = query.mode.label(),
        "solved gst query"
    );
    Some(GstAnswer { query, result, text })
}

pub fn explain(query: &GstQuery, result: &GstResult) -> String {
    let rate = fmt_rate(query.rate);
    let half = fmt_rate(query.rate / 2.0);
    let cur = query.currency.as_str();

    let formula = match query.mode {
        GstMode::Exclusive => format!("GST = amount × {rate} / 100, total = amount + GST"),
        GstMode::Inclusive => format!("base = amount / (1 + {rate}/100), GST = amount − base"),
    };

    format!(
        "GST ({mode}) at {rate}%\n\
Formula: {formula}\n\
Base amount: {cur}{base:.2}\n\
GST: {cur}{tax:.2}\n\
Total: {cur}{total:.2}\n\
Split: CGST {half}% {cur}{cgst:.2} + SGST {half}% {cur}{sgst:.2}",
        mode = query.mode.label(),
        base = result.base,
        tax = result.tax,
        total = result.total,
        cgst = result.cgst(),
        sgst = result.sgst(),
    )
}

fn fmt_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{rate:.0}")
    } else {
        format!("{rate}")
    }
}
