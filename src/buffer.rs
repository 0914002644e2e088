//! Line buffer with explicit consumed markers
//!
//! The rewrite engine mutates the source one line at a time. Lines absorbed
//! into an array declaration are marked *consumed* rather than overwritten
//! with an empty string, so "blank line" and "already extracted" stay
//! distinct in the data model. Consumed lines read as empty text (they must
//! never be re-scanned) and are omitted entirely when the buffer is
//! rendered back into source text.

/// A single line of source plus its consumption state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    text: String,
    consumed: bool,
}

/// Ordered, mutable sequence of source lines.
///
/// Created once per processing run from the raw input and discarded after
/// the output is rendered. Whether the input ended with a newline is
/// remembered so rendering can reproduce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    lines: Vec<SourceLine>,
    trailing_newline: bool,
}

impl SourceBuffer {
    /// Build a buffer from raw source text.
    pub fn from_source(source: &str) -> Self {
        let lines = source.lines().map(str::to_string).collect();
        Self::from_lines(lines, source.ends_with('\n'))
    }

    /// Build a buffer from pre-split lines (without terminators).
    pub fn from_lines(lines: Vec<String>, trailing_newline: bool) -> Self {
        SourceBuffer {
            lines: lines
                .into_iter()
                .map(|text| SourceLine {
                    text,
                    consumed: false,
                })
                .collect(),
            trailing_newline,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text of the line at `index`. Consumed lines read as empty.
    pub fn text(&self, index: usize) -> &str {
        let line = &self.lines[index];
        if line.consumed {
            ""
        } else {
            &line.text
        }
    }

    /// Replace the text of a live line (used by the reference rewriter).
    pub fn set_text(&mut self, index: usize, text: String) {
        self.lines[index].text = text;
    }

    /// Mark a line as consumed; its content has been absorbed elsewhere.
    pub fn consume(&mut self, index: usize) {
        self.lines[index].consumed = true;
    }

    pub fn is_consumed(&self, index: usize) -> bool {
        self.lines[index].consumed
    }

    /// Apply a rewrite to every live line.
    pub fn map_lines<F>(&mut self, f: F)
    where
        F: Fn(&str) -> String,
    {
        for line in &mut self.lines {
            if !line.consumed {
                line.text = f(&line.text);
            }
        }
    }

    /// Join the live lines back into source text, skipping consumed lines.
    pub fn render(&self) -> String {
        let mut out = self
            .lines
            .iter()
            .filter(|line| !line.consumed)
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if self.trailing_newline && !out.is_empty() {
            out.push('\n');
        }
        out
    }
}
