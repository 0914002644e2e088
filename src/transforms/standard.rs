//! Pre-built transform pipelines
//!
//! Shared by the CLI, the loader, and tests. The statics run with the
//! embedded default configuration; [`rewrite_pipeline`] builds the same
//! chain for a custom [`RewriteConfig`].

use crate::config::RewriteConfig;
use crate::transforms::stages::{FoldConcats, Render, RuleFilter, StripComments, SubstituteArrays};
use crate::transforms::Transform;
use once_cell::sync::Lazy;

/// Type alias for source-to-source transforms.
pub type SourceTransform = Transform<String, String>;

/// Build the full rewrite chain for an explicit configuration:
/// strip comments → substitute arrays → fold concatenations → render.
pub fn rewrite_pipeline(config: RewriteConfig) -> SourceTransform {
    Transform::from_fn(Ok)
        .then(StripComments)
        .then(SubstituteArrays::new(config))
        .then(FoldConcats)
        .then(Render)
}

/// The full rewrite with default configuration.
pub static DEOBFUSCATE: Lazy<SourceTransform> =
    Lazy::new(|| rewrite_pipeline(RewriteConfig::default()));

/// Comment stripping only — useful to inspect what the engine scans.
pub static STRIP_ONLY: Lazy<SourceTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(StripComments).then(Render));

/// The standalone single-pass rule filter.
pub static RULE_FILTER: Lazy<SourceTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(RuleFilter));
