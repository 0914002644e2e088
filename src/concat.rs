//! Fixed-point string-concatenation folding
//!
//! After substitution the source is littered with expressions like
//! `"b" + "ter"` and `+ ("ob")`. Each line is folded until a full round
//! changes nothing; every fold strictly shrinks the line, so the fixed
//! point is always reached in a bounded number of rounds.

use once_cell::sync::Lazy;
use regex::Regex;

/// `"A" + "B"` — two adjacent quoted literals around a plus.
static ADJACENT_LITERALS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)" \+ "([^"]*)""#).unwrap());

/// `+ ("C")` — parenthesized single operand on the right of a plus.
static PAREN_RIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\+ \("([^"]*)"\)"#).unwrap());

/// `("C") +` — parenthesized single operand on the left of a plus.
static PAREN_LEFT: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\("([^"]*)"\) \+"#).unwrap());

/// Fold one line to its fixed point.
pub fn fold_line(line: &str) -> String {
    let mut current = line.to_string();
    loop {
        let mut next = ADJACENT_LITERALS
            .replace_all(&current, "\"${1}${2}\"")
            .into_owned();
        next = PAREN_RIGHT.replace_all(&next, "+ \"${1}\"").into_owned();
        next = PAREN_LEFT.replace_all(&next, "\"${1}\" +").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}
