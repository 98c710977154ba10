// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Splitting of text lines into whitespace-separated tokens.

use std::sync::OnceLock;

use regex::Regex;

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r#""([^"]*)"|'([^']*)'|(\S+)"#).expect(
            "FATAL MATSTUDIO ERROR | tokenize::token_regex | Could not construct regular expression.",
        )
    })
}

/// Split a line into tokens separated by whitespace.
/// Text enclosed in single or double quotes forms a single token (without the quotes).
pub fn tokenize(line: &str) -> Vec<&str> {
    token_regex()
        .captures_iter(line)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| m.as_str())
        .collect()
}

/// Parse tokens `from..to` of a line as floats. Returns `None` if any of them is missing or is not a number.
pub(crate) fn parse_floats<const N: usize>(tokens: &[&str], from: usize) -> Option<[f64; N]> {
    let mut values = [0.0; N];
    for (i, value) in values.iter_mut().enumerate() {
        *value = tokens.get(from + i)?.parse::<f64>().ok()?;
    }

    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace() {
        assert_eq!(
            tokenize("  PBC   12.8083   12.8083\t28.1569 (P1)  "),
            vec!["PBC", "12.8083", "12.8083", "28.1569", "(P1)"]
        );
    }

    #[test]
    fn quotes() {
        assert_eq!(
            tokenize(r#"Pt1 "two words" 'single quoted' x"#),
            vec!["Pt1", "two words", "single quoted", "x"]
        );
        assert_eq!(tokenize(r#"a "" b"#), vec!["a", "", "b"]);
    }

    #[test]
    fn empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn floats() {
        let tokens = tokenize("Pt1 0.5 -1.25 3e2 XXXX");
        assert_eq!(parse_floats::<3>(&tokens, 1), Some([0.5, -1.25, 300.0]));
        assert_eq!(parse_floats::<2>(&tokens, 3), None);
        assert_eq!(parse_floats::<3>(&tokens, 3), None);
    }
}
