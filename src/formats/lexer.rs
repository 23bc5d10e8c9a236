//! Numeric token scanning for the text formats.
//!
//! Header and geometry lines mix labels and numbers freely, so values are
//! found by scanning a line left to right for numeric runs rather than by
//! parsing a fixed grammar.

use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{opt, recognize},
    IResult, Parser,
};

/// A signed decimal: `[-+]?(\d*\.\d+|\d+)`.
fn decimal(input: &str) -> IResult<&str, &str> {
    recognize((
        opt(one_of("+-")),
        alt((recognize((digit0, char('.'), digit1)), digit1)),
    ))
    .parse(input)
}

fn unsigned(input: &str) -> IResult<&str, &str> {
    digit1(input)
}

/// Scan `line` with `token`, returning every match with its byte offset.
fn scan<'a, F>(line: &'a str, mut token: F) -> Vec<(usize, &'a str)>
where
    F: FnMut(&'a str) -> IResult<&'a str, &'a str>,
{
    let mut found = Vec::new();
    let mut rest = line;
    while let Some(c) = rest.chars().next() {
        match token(rest) {
            Ok((remaining, tok)) => {
                found.push((line.len() - rest.len(), tok));
                rest = remaining;
            }
            Err(_) => rest = &rest[c.len_utf8()..],
        }
    }
    found
}

/// All signed decimal tokens of a line, in order.
pub fn decimals(line: &str) -> Vec<&str> {
    scan(line, decimal).into_iter().map(|(_, tok)| tok).collect()
}

/// The first signed decimal token of a line.
pub fn first_decimal(line: &str) -> Option<&str> {
    decimals(line).into_iter().next()
}

/// The first run of ASCII digits of a line, with its byte offset.
pub fn first_unsigned(line: &str) -> Option<(usize, &str)> {
    scan(line, unsigned).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimals() {
        assert_eq!(decimals("1 120 0.50 60.0 -3.5"), vec!["1", "120", "0.50", "60.0", "-3.5"]);
        assert_eq!(decimals("FREQUENCY:1023.567"), vec!["1023.567"]);
        assert_eq!(decimals(".25 +4"), vec![".25", "+4"]);
        assert!(decimals("no numbers here").is_empty());
    }

    #[test]
    fn test_trailing_dot_is_integer() {
        assert_eq!(decimals("5. x"), vec!["5"]);
    }

    #[test]
    fn test_first_unsigned() {
        assert_eq!(first_unsigned("ANTENNAS:250 MHz"), Some((9, "250")));
        assert_eq!(first_unsigned("LAST TRACE:-12"), Some((12, "12")));
        assert_eq!(first_unsigned("OPERATOR:"), None);
    }

    #[test]
    fn test_first_decimal() {
        assert_eq!(first_decimal("x=-0.5, y=2"), Some("-0.5"));
        assert_eq!(first_decimal(""), None);
    }

    #[test]
    fn test_non_ascii_is_skipped() {
        assert_eq!(decimals("Malå 100 MHz"), vec!["100"]);
    }
}
