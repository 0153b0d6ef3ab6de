//! GST arithmetic.
//!
//! exclusive: tax = amount * rate / 100, total = amount + tax, base = amount
//! inclusive: base = amount / (1 + rate / 100), tax = amount - base, total = amount

use serde::{Deserialize, Serialize};

use crate::parse::{GstMode, GstQuery};

/// Most common real-world slab, used when the text names no rate.
pub const DEFAULT_RATE: f64 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GstResult {
    pub base: f64,
    pub tax: f64,
    pub total: f64,
}

impl GstResult {
    /// Central half of intra-state GST.
    pub fn cgst(&self) -> f64 {
        round2(self.tax / 2.0)
    }

    /// State half; takes the remainder so the halves always sum to `tax`.
    pub fn sgst(&self) -> f64 {
        round2(self.tax - self.cgst())
    }
}

/// Round to 2 places, half away from zero.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub fn compute(query: &GstQuery) -> GstResult {
    let factor = query.rate / 100.0;

    let (base, tax, total) = match query.mode {
        GstMode::Exclusive => {
            let tax = query.amount * factor;
            (query.amount, tax, query.amount + tax)
        }
        GstMode::Inclusive => {
            let base = query.amount / (1.0 + factor);
            (base, query.amount - base, query.amount)
        }
    };

    GstResult {
        base: round2(base),
        tax: round2(tax),
        total: round2(total),
    }
}
