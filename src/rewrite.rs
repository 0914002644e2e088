//! Indexed-reference substitution
//!
//! Replaces `name[3]` occurrences with the literal the scope stack resolves
//! for them. Names are scanned longest first so a short name never matches
//! as a prefix of a longer one, and unresolvable references are left
//! byte-for-byte untouched — obfuscated sources routinely index arrays this
//! engine never saw, and partial rewriting is still useful.

use crate::scope::ScopeStack;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Rewrites indexed accesses on single lines, caching one compiled pattern
/// per declared name.
#[derive(Debug, Default)]
pub struct ReferenceRewriter {
    patterns: HashMap<String, Regex>,
}

impl ReferenceRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite every resolvable `<name>[<integer>]` occurrence on `line`,
    /// for every name the scope stack has ever registered. Resolution uses
    /// the scope depth current at the time of the call.
    pub fn rewrite_line(&mut self, scope: &ScopeStack, line: &str) -> String {
        let mut out = line.to_string();
        for name in scope.keys_longest_first() {
            let pattern = self
                .patterns
                .entry(name.to_string())
                .or_insert_with(|| reference_pattern(name));
            if !pattern.is_match(&out) {
                continue;
            }
            out = pattern
                .replace_all(&out, |caps: &Captures<'_>| {
                    let resolved = caps[1]
                        .parse::<usize>()
                        .ok()
                        .and_then(|index| scope.resolve(name, index));
                    match resolved {
                        Some(value) => value.to_string(),
                        // Leave the reference untouched rather than
                        // corrupting the line.
                        None => caps[0].to_string(),
                    }
                })
                .into_owned();
        }
        out
    }
}

/// `<name>[<digits>]` with the name taken literally.
fn reference_pattern(name: &str) -> Regex {
    // The pattern is built from an escaped identifier; it cannot fail to
    // compile.
    Regex::new(&format!(r"{}\[(\d+)\]", regex::escape(name))).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope_with(entries: &[(&str, &[&str])]) -> ScopeStack {
        let mut scope = ScopeStack::new();
        scope.track("{");
        for (name, values) in entries {
            scope.insert(*name, values.iter().map(|s| s.to_string()).collect());
        }
        scope
    }

    #[test]
    fn test_single_reference_is_replaced() {
        let scope = scope_with(&[("a", &["\"w\"", "\"x\""])]);
        let mut rewriter = ReferenceRewriter::new();
        assert_eq!(rewriter.rewrite_line(&scope, "foo(a[1]);"), "foo(\"x\");");
    }

    #[test]
    fn test_multiple_references_on_one_line() {
        let scope = scope_with(&[("a", &["\"w\"", "\"x\"", "\"y\""])]);
        let mut rewriter = ReferenceRewriter::new();
        assert_eq!(
            rewriter.rewrite_line(&scope, "foo(a[0], a[2]);"),
            "foo(\"w\", \"y\");"
        );
    }

    #[test]
    fn test_out_of_range_reference_is_left_alone() {
        let scope = scope_with(&[("a", &["\"w\""])]);
        let mut rewriter = ReferenceRewriter::new();
        assert_eq!(rewriter.rewrite_line(&scope, "foo(a[9]);"), "foo(a[9]);");
    }

    #[test]
    fn test_unknown_name_is_left_alone() {
        let scope = scope_with(&[("a", &["\"w\""])]);
        let mut rewriter = ReferenceRewriter::new();
        assert_eq!(rewriter.rewrite_line(&scope, "foo(b[0]);"), "foo(b[0]);");
    }

    #[test]
    fn test_longer_name_wins_over_prefix() {
        // `ab` must be rewritten by the `ab` entry, not mangled by `a`.
        let scope = scope_with(&[("a", &["\"short\""]), ("ab", &["\"long\""])]);
        let mut rewriter = ReferenceRewriter::new();
        assert_eq!(
            rewriter.rewrite_line(&scope, "use(ab[0], a[0]);"),
            "use(\"long\", \"short\");"
        );
    }

    #[test]
    fn test_regex_metacharacters_in_name_are_escaped() {
        let scope = scope_with(&[("a$b", &["\"v\""])]);
        let mut rewriter = ReferenceRewriter::new();
        assert_eq!(rewriter.rewrite_line(&scope, "f(a$b[0]);"), "f(\"v\");");
    }

    #[test]
    fn test_resolution_uses_current_depth() {
        let mut scope = ScopeStack::new();
        scope.track("{");
        scope.insert("x", vec!["\"outer\"".to_string(); 5]);
        scope.track("{");
        scope.insert("x", vec!["\"inner\"".to_string(); 2]);

        let mut rewriter = ReferenceRewriter::new();
        assert_eq!(rewriter.rewrite_line(&scope, "f(x[1]);"), "f(\"inner\");");
        assert_eq!(rewriter.rewrite_line(&scope, "f(x[3]);"), "f(\"outer\");");
    }
}
