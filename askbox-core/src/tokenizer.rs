//! Query normalization.
//!
//! Lowercase, then drop punctuation except the symbols money and rates are
//! written with: currency signs, `%`, and `.` when it sits between two digits.

const KEPT_SYMBOLS: &[char] = &['₹', '$', '€', '£', '%'];

pub fn tokenize(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.to_lowercase().chars().collect();

    let mut cleaned = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        if c.is_whitespace() {
            cleaned.push(' ');
        } else if c.is_alphanumeric() || KEPT_SYMBOLS.contains(&c) || is_decimal_point(&chars, i) {
            cleaned.push(c);
        }
    }

    cleaned
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}

fn is_decimal_point(chars: &[char], i: usize) -> bool {
    chars[i] == '.'
        && i > 0
        && chars[i - 1].is_ascii_digit()
        && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
        assert_eq!(tokenize("What's GST?"), vec!["whats", "gst"]);
    }

    #[test]
    fn test_keeps_money_notation() {
        assert_eq!(
            tokenize("GST on ₹1,000.50 at 18%."),
            vec!["gst", "on", "₹1000.50", "at", "18%"]
        );
        assert_eq!(tokenize("$9.99"), vec!["$9.99"]);
    }

    #[test]
    fn test_trailing_dot_is_not_decimal() {
        assert_eq!(tokenize("hello."), vec!["hello"]);
        assert_eq!(tokenize("v1. next"), vec!["v1", "next"]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \t\n ").is_empty());
        assert!(tokenize("?!...").is_empty());
    }
}
