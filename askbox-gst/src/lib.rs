//! askbox-gst: GST query extraction, computation and answer text

pub mod answer;
pub mod calc;
pub mod parse;

pub use answer::{mentions_gst, solve, GstAnswer, GST_CONFIDENCE, GST_TRIGGERS};
pub use calc::{compute, round2, GstResult, DEFAULT_RATE};
pub use parse::{detect_mode, extract_amount, extract_rate, parse_query, GstMode, GstQuery};
