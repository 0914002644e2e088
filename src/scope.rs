//! Scope-aware symbol table for extracted array declarations
//!
//! Tracks lexical nesting by brace counting, one frame per depth, and
//! resolves `name[index]` lookups with a depth-descending fallback: the
//! search starts at the depth of the reference and walks outward until a
//! frame both knows the name and holds enough elements. That models
//! shadowing without real variable binding, which is all the loose,
//! machine-generated sources we target can support.

use std::collections::{HashMap, HashSet};

/// Lines carrying this marker are documentation comments; brace characters
/// on them must not disturb depth tracking.
const DOC_COMMENT_MARKER: &str = "* @";

/// One mapping per lexical depth from declared name to its element list.
type Frame = HashMap<String, Vec<String>>;

/// Scope stack plus the depth tracker that grows it.
///
/// Frame 0 exists but is never consulted; top-level declarations land in
/// frame 1. Frames are appended lazily as depth increases and never
/// removed, so a name declared in a closed block stays resolvable from a
/// sibling block at the same depth. That matches the original tool and is
/// harmless for substitution purposes.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    frames: Vec<Frame>,
    keys: HashSet<String>,
    depth: i32,
    legacy_depth: bool,
    clamped_closings: u32,
}

impl ScopeStack {
    /// A stack with the default (clamped) depth policy.
    pub fn new() -> Self {
        Self::with_legacy_depth(false)
    }

    /// `legacy_depth` restores the historical unclamped decrement: an extra
    /// closing brace then drives the depth negative and every lookup made
    /// there resolves nothing.
    pub fn with_legacy_depth(legacy_depth: bool) -> Self {
        ScopeStack {
            frames: vec![Frame::new()],
            keys: HashSet::new(),
            depth: 0,
            legacy_depth,
            clamped_closings: 0,
        }
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// How many closing braces were ignored by the clamp policy.
    pub fn clamped_closings(&self) -> u32 {
        self.clamped_closings
    }

    /// Depth tracker: inspect one line for brace tokens and adjust depth.
    ///
    /// Documentation-comment lines are skipped entirely. When both braces
    /// appear on one line, opening wins and the line counts as an opening
    /// event only — this tie-break is load-bearing for reproducing the
    /// original rewrite ordering, so it is kept unconditionally.
    pub fn track(&mut self, line: &str) {
        if line.contains(DOC_COMMENT_MARKER) {
            return;
        }
        if line.contains('{') {
            self.depth += 1;
            // Under the legacy policy the depth may still be negative here;
            // frame growth only applies once it is positive.
            if self.depth > 0 {
                while self.frames.len() <= self.depth as usize {
                    self.frames.push(Frame::new());
                }
            }
        } else if line.contains('}') {
            if self.depth == 0 && !self.legacy_depth {
                self.clamped_closings += 1;
                tracing::warn!("unbalanced closing brace; depth stays at 0");
            } else {
                self.depth -= 1;
            }
        }
    }

    /// Register a declaration at the current depth and remember its name
    /// in the global key set. Frame 1 is the floor: declarations made
    /// outside any brace (and, under the legacy policy, at negative depth)
    /// count as top level.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        let name = name.into();
        let index = self.depth.max(1) as usize;
        while self.frames.len() <= index {
            self.frames.push(Frame::new());
        }
        self.keys.insert(name.clone());
        self.frames[index].insert(name, values);
    }

    /// Scoped lookup from the current depth.
    pub fn resolve(&self, name: &str, index: usize) -> Option<&str> {
        self.resolve_at(name, index, self.depth)
    }

    /// Scoped lookup from an explicit depth.
    ///
    /// Searches frames from `depth` down to 1 inclusive and returns the
    /// element at `index` from the first frame that contains `name` with
    /// more than `index` elements. An inner declaration that is too short
    /// therefore falls back to an outer one. Lookups made outside any
    /// brace start at frame 1, mirroring the registration floor.
    pub fn resolve_at(&self, name: &str, index: usize, depth: i32) -> Option<&str> {
        let top = depth.max(1).min(self.frames.len() as i32 - 1);
        let mut d = top;
        while d >= 1 {
            if let Some(values) = self.frames[d as usize].get(name) {
                if values.len() > index {
                    return Some(&values[index]);
                }
            }
            d -= 1;
        }
        None
    }

    /// Every name ever declared, longest first (ties lexicographic), the
    /// order substitution must scan in so a short name never matches inside
    /// a longer one.
    pub fn keys_longest_first(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys.iter().map(String::as_str).collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        keys
    }

    /// All registered declarations as `(depth, name, element count)`,
    /// ordered by depth then name.
    pub fn entries(&self) -> Vec<(usize, &str, usize)> {
        let mut entries: Vec<(usize, &str, usize)> = self
            .frames
            .iter()
            .enumerate()
            .flat_map(|(depth, frame)| {
                frame
                    .iter()
                    .map(move |(name, values)| (depth, name.as_str(), values.len()))
            })
            .collect();
        entries.sort();
        entries
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
