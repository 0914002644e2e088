//! Individual transformation stages
//!
//! Thin `Runnable` wrappers over the leaf modules, so the comment
//! stripper, the substitution loop, and the concatenation folder can be
//! mixed into custom pipelines.

use crate::buffer::SourceBuffer;
use crate::concat::fold_line;
use crate::config::RewriteConfig;
use crate::processor::SourceProcessor;
use crate::rules::apply_rules;
use crate::strip::strip_block_comments;
use crate::transforms::{Runnable, TransformError};

/// String → SourceBuffer: drop block-comment spans and split into lines.
pub struct StripComments;

impl Runnable<String, SourceBuffer> for StripComments {
    fn run(&self, input: String) -> Result<SourceBuffer, TransformError> {
        let raw: Vec<&str> = input.lines().collect();
        let lines = strip_block_comments(&raw);
        Ok(SourceBuffer::from_lines(lines, input.ends_with('\n')))
    }
}

/// SourceBuffer → SourceBuffer: extract declarations and rewrite
/// references, scope-aware.
pub struct SubstituteArrays {
    config: RewriteConfig,
}

impl SubstituteArrays {
    pub fn new(config: RewriteConfig) -> Self {
        SubstituteArrays { config }
    }
}

impl Default for SubstituteArrays {
    fn default() -> Self {
        Self::new(RewriteConfig::default())
    }
}

impl Runnable<SourceBuffer, SourceBuffer> for SubstituteArrays {
    fn run(&self, mut input: SourceBuffer) -> Result<SourceBuffer, TransformError> {
        SourceProcessor::substitute(&mut input, &self.config)?;
        Ok(input)
    }
}

/// SourceBuffer → SourceBuffer: fold string concatenations to a fixed
/// point on every live line.
pub struct FoldConcats;

impl Runnable<SourceBuffer, SourceBuffer> for FoldConcats {
    fn run(&self, mut input: SourceBuffer) -> Result<SourceBuffer, TransformError> {
        input.map_lines(fold_line);
        Ok(input)
    }
}

/// SourceBuffer → String: join the live lines back into source text.
pub struct Render;

impl Runnable<SourceBuffer, String> for Render {
    fn run(&self, input: SourceBuffer) -> Result<String, TransformError> {
        Ok(input.render())
    }
}

/// String → String: the standalone single-pass rule filter.
pub struct RuleFilter;

impl Runnable<String, String> for RuleFilter {
    fn run(&self, input: String) -> Result<String, TransformError> {
        Ok(apply_rules(&input))
    }
}
