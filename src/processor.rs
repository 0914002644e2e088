//! Processing orchestration
//!
//! [`SourceProcessor`] sequences the full rewrite: strip block comments,
//! walk the line buffer with a forward-only cursor — depth tracking and
//! declaration extraction for the current span, then reference rewriting
//! on the new cursor line — and finally fold string concatenations to a
//! fixed point before rendering. All scanning state lives in an explicit
//! [`ScopeStack`] owned by the single run; a fresh run gets fresh state.

use crate::buffer::SourceBuffer;
use crate::concat::fold_line;
use crate::config::RewriteConfig;
use crate::extract::{extract_at, ExtractError};
use crate::rewrite::ReferenceRewriter;
use crate::scope::ScopeStack;
use crate::strip::strip_block_comments;
use serde::Serialize;

/// One registered array declaration, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredArray {
    pub name: String,
    pub depth: usize,
    pub elements: usize,
}

/// What a run recorded: every registered array and how often the depth
/// clamp fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    pub arrays: Vec<RegisteredArray>,
    pub clamped_closings: u32,
}

/// Result of a processing run.
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub output: String,
    pub report: RewriteReport,
}

/// Orchestrator for a full deobfuscation run.
#[derive(Debug, Clone, Default)]
pub struct SourceProcessor {
    config: RewriteConfig,
}

impl SourceProcessor {
    pub fn new(config: RewriteConfig) -> Self {
        SourceProcessor { config }
    }

    /// Rewrite `source` and return the output together with the report.
    pub fn process(&self, source: &str) -> Result<Rewrite, ExtractError> {
        let raw_lines: Vec<&str> = source.lines().collect();
        let lines = strip_block_comments(&raw_lines);
        let mut buffer = SourceBuffer::from_lines(lines, source.ends_with('\n'));

        let scope = Self::substitute(&mut buffer, &self.config)?;
        buffer.map_lines(fold_line);

        let arrays = scope
            .entries()
            .into_iter()
            .map(|(depth, name, elements)| RegisteredArray {
                name: name.to_string(),
                depth,
                elements,
            })
            .collect();
        Ok(Rewrite {
            output: buffer.render(),
            report: RewriteReport {
                arrays,
                clamped_closings: scope.clamped_closings(),
            },
        })
    }

    /// Run the extraction/rewriting cursor loop over a prepared buffer.
    ///
    /// The cursor only moves forward; lines consumed into a declaration
    /// are never revisited. Returns the scope stack the run accumulated so
    /// callers can report on it.
    pub fn substitute(
        buffer: &mut SourceBuffer,
        config: &RewriteConfig,
    ) -> Result<ScopeStack, ExtractError> {
        let mut scope = ScopeStack::with_legacy_depth(config.compat.legacy_depth);
        let mut rewriter = ReferenceRewriter::new();

        let mut current = 0;
        while current < buffer.len() {
            tracing::debug!(
                line = current,
                depth = scope.depth(),
                text = buffer.text(current),
                "scan"
            );
            current = extract_at(buffer, &mut scope, current, config.rewrite.threshold)?;
            if current < buffer.len() {
                let rewritten = rewriter.rewrite_line(&scope, buffer.text(current));
                buffer.set_text(current, rewritten);
            }
        }
        Ok(scope)
    }
}
