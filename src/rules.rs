//! Single-pass rule filter
//!
//! An independent text filter complementing the scope-aware engine: a
//! fixed, ordered set of regex rules that undo the shallow layers of
//! malware-style obfuscation — unicode escapes, comment noise, string
//! concatenation chains, single-string variable indirection, associative
//! member access, and unreadable variable names. Where the original rules
//! relied on lookaround (which the `regex` crate does not support), a
//! find-and-filter scan with an explicit preceding-character check is used
//! instead.

use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex};
use std::collections::HashSet;

/// `\u00XX` escape with two significant hex digits.
static UNICODE_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\u(0*[0-9a-fA-F]{2})").unwrap());

/// Whole-line `//` comments, terminator included.
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*//.+\n?").unwrap());

/// Parenthesized string list — the comma-operator idiom evaluating to its
/// last element.
static STRING_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\((?:['"][^"']+['"],)+(['"][^"']+['"])\)"#).unwrap());

/// Two quoted literals joined by `+` with no surrounding space. The left
/// capture keeps its opening quote, the right capture its closing quote,
/// so gluing the captures yields the merged literal.
static ADJACENT_STRINGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\B(["'][^'"]+)["']\B\+\B["']([^'"]+["'])\B"#).unwrap());

/// Assignment of a single string literal to a bare name.
static STRING_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([ \t]*(?:var)?\s*)\b([A-Za-z_]\w*)(\s*=\s*)('[^']+'|"[^"]+")(\s*;?.*)"#)
        .unwrap()
});

/// Any assignment to a bare name (for renaming).
static ASSIGNMENT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([ \t]*(?:var)?\s*)\b([A-Za-z_]\w*)(\s*=)").unwrap());

/// `obj["member"]` associative access.
static ASSOCIATIVE_ACCESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\w+)\[['"](\w+)['"]\]"#).unwrap());

/// Chunk ending in `{`, for putting block openers on their own line.
static BLOCK_OPENER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^\n{]+\{)").unwrap());

/// Apply the full rule set once, in order.
pub fn apply_rules(source: &str) -> String {
    let mut out = unescape_unicode(source);
    out = LINE_COMMENT.replace_all(&out, "").into_owned();
    out = break_after_semicolons(&out);
    out = STRING_LIST.replace_all(&out, "${1}").into_owned();

    // Concatenation folding and variable inlining feed each other, so they
    // loop together to a fixed point.
    loop {
        let mut next = ADJACENT_STRINGS
            .replace_all(&out, "${1}${2}")
            .into_owned();
        next = inline_string_assignments(&next);
        if next == out {
            break;
        }
        out = next;
    }

    out = ASSOCIATIVE_ACCESS.replace_all(&out, "${1}.${2}").into_owned();
    out = remove_blank_lines(&out);
    out = rename_variables(&out);
    BLOCK_OPENER.replace_all(&out, "\n${1}").into_owned()
}

/// Rule 1: decode `\u00XX` escapes to their character.
fn unescape_unicode(text: &str) -> String {
    UNICODE_ESCAPE
        .replace_all(text, |caps: &Captures<'_>| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Rule 3: break the line after every `;` not already followed by one.
fn break_after_semicolons(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == ';' && chars.peek() != Some(&'\n') {
            out.push('\n');
        }
    }
    out
}

/// Rule 6: substitute single-string variables by their literal and erase
/// the then-redundant assignment.
fn inline_string_assignments(text: &str) -> String {
    let snapshot = text.to_string();
    let mut out = text.to_string();
    for caps in STRING_ASSIGNMENT.captures_iter(&snapshot) {
        let name_match = caps.get(2).expect("assignment name group");
        if preceded_by_dot(&snapshot, name_match.start()) {
            continue;
        }
        let name = name_match.as_str();
        let value = &caps[4];
        let name_pattern = word_pattern(name);
        out = name_pattern.replace_all(&out, NoExpand(value)).into_owned();
        // After substitution the assignment reads `value = value ...`;
        // drop that exact text.
        let leftover = format!("{}{}{}{}{}", &caps[1], value, &caps[3], value, &caps[5]);
        out = out.replace(&leftover, "");
    }
    out
}

/// Rule 8: drop blank lines.
fn remove_blank_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rule 9: rename every assigned name to `variable_<n>`, in order of first
/// assignment.
fn rename_variables(text: &str) -> String {
    let snapshot = text.to_string();
    let mut out = text.to_string();
    let mut seen = HashSet::new();
    let mut counter = 1;
    for caps in ASSIGNMENT_NAME.captures_iter(&snapshot) {
        let name_match = caps.get(2).expect("assignment name group");
        if preceded_by_dot(&snapshot, name_match.start()) {
            continue;
        }
        let name = name_match.as_str();
        if name.starts_with("variable_") || !seen.insert(name.to_string()) {
            continue;
        }
        let replacement = format!("variable_{}", counter);
        counter += 1;
        let name_pattern = word_pattern(name);
        out = name_pattern
            .replace_all(&out, NoExpand(&replacement))
            .into_owned();
    }
    out
}

fn preceded_by_dot(text: &str, index: usize) -> bool {
    text[..index].chars().last() == Some('.')
}

fn word_pattern(name: &str) -> Regex {
    // Built from an escaped identifier; cannot fail to compile.
    Regex::new(&format!(r"\b{}\b", regex::escape(name))).unwrap()
}
