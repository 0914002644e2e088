//! Array-declaration extraction
//!
//! Detects `var <name> = [ ... ];` declarations — single-line or spanning
//! several lines — absorbs their element lists into the scope stack, and
//! marks the consumed lines so they never reach the output. Detection and
//! parsing are regex-driven; the element body goes through the
//! split-and-repair pass in [`crate::values`].

use crate::buffer::SourceBuffer;
use crate::scope::ScopeStack;
use crate::values::{repair_elements, split_elements};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// A line opening an array declaration: `var <ident> = [`.
static DECL_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"var \w+ = \[").unwrap());

/// Full accumulated declaration. The body capture is greedy, so it runs to
/// the last `];`, which must terminate the accumulated text — trailing
/// content after the terminator makes the declaration malformed.
static DECL_FULL: Lazy<Regex> = Lazy::new(|| Regex::new(r"var (\w+) = \[(.*)\];$").unwrap());

/// Marker terminating an array literal.
const DECL_END: &str = "];";

/// Hard failures while consuming a declaration.
///
/// Both variants carry the line number of the declaration start and the
/// depth at the time of failure, so the diagnostic pinpoints the offending
/// source. Continuing after either would corrupt downstream depth
/// tracking, so the run stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The buffer ended before the `];` terminator was found.
    UnterminatedDeclaration { line: usize, depth: i32 },
    /// The accumulated text does not form a complete declaration.
    MalformedDeclaration {
        line: usize,
        depth: i32,
        text: String,
    },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::UnterminatedDeclaration { line, depth } => write!(
                f,
                "unterminated array declaration starting at line {} (depth {})",
                line, depth
            ),
            ExtractError::MalformedDeclaration { line, depth, text } => write!(
                f,
                "malformed array declaration at line {} (depth {}): {}",
                line, depth, text
            ),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Run depth tracking and declaration extraction for the line at `current`.
///
/// Depth tracking always runs for the current line, declaration or not.
/// When a declaration starts here, every line through the `];` terminator
/// is appended to a working text and marked consumed; the repaired element
/// list is registered at the current depth when it is longer than
/// `threshold`, and silently dropped otherwise. Lines inside the consumed
/// span are never depth-tracked — their braces belong to the literal, not
/// to control flow.
///
/// Returns the index of the first line after the consumed span, where the
/// caller resumes scanning.
pub fn extract_at(
    buffer: &mut SourceBuffer,
    scope: &mut ScopeStack,
    current: usize,
    threshold: usize,
) -> Result<usize, ExtractError> {
    let line = buffer.text(current).to_string();
    let starts = DECL_START.is_match(&line);
    scope.track(&line);
    if !starts {
        return Ok(current + 1);
    }

    let mut declaration = String::new();
    let mut at = current;
    while !buffer.text(at).contains(DECL_END) {
        declaration.push_str(buffer.text(at));
        buffer.consume(at);
        at += 1;
        if at >= buffer.len() {
            return Err(ExtractError::UnterminatedDeclaration {
                line: current,
                depth: scope.depth(),
            });
        }
    }
    declaration.push_str(buffer.text(at));
    buffer.consume(at);

    let captures =
        DECL_FULL
            .captures(&declaration)
            .ok_or_else(|| ExtractError::MalformedDeclaration {
                line: current,
                depth: scope.depth(),
                text: declaration.clone(),
            })?;
    let name = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let body = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

    let elements = repair_elements(split_elements(body));
    if elements.len() > threshold {
        tracing::debug!(
            name,
            depth = scope.depth(),
            elements = elements.len(),
            "registered array declaration"
        );
        scope.insert(name, elements);
    }

    Ok(at + 1)
}
