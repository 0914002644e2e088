//! Block-comment stripping
//!
//! Runs before everything else so brace characters and declaration-shaped
//! text inside `/* ... */` spans never reach the depth tracker or the
//! extractor. Tracking is a single boolean: first opening marker wins,
//! first closing marker after it ends the span, and both marker lines are
//! themselves dropped. Nested or malformed markers get no special
//! handling.

/// Remove every line inside a block-comment span, markers included.
pub fn strip_block_comments<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut inside = false;
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let line = line.as_ref();
        if line.contains("/*") {
            inside = true;
        }
        if !inside {
            out.push(line.to_string());
        }
        if line.contains("*/") {
            inside = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(source: &str) -> Vec<String> {
        let lines: Vec<&str> = source.lines().collect();
        strip_block_comments(&lines)
    }

    #[test]
    fn test_no_comments_passes_through() {
        assert_eq!(strip("a\nb\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_single_span_removed_inclusively() {
        let out = strip("keep\n/* start\ninside\nend */\nkeep too");
        assert_eq!(out, vec!["keep", "keep too"]);
    }

    #[test]
    fn test_multiple_spans() {
        let out = strip("a\n/*\nx\n*/\nb\n/*\ny\n*/\nc");
        assert_eq!(out, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_single_line_span_dropped() {
        let out = strip("a\n/* gone */\nb");
        assert_eq!(out, vec!["a", "b"]);
    }

    #[test]
    fn test_unclosed_span_swallows_rest() {
        let out = strip("a\n/*\nb\nc");
        assert_eq!(out, vec!["a"]);
    }
}
