//! Source loading and output writing
//!
//! [`SourceLoader`] reads obfuscated source from a file or string and runs
//! transforms on it; it is used by both the CLI and tests. Output is
//! written atomically — a temporary file in the destination directory,
//! persisted into place once the full text is on disk — so a failing run
//! never leaves a partially rewritten file behind.

use crate::transforms::standard::{DEOBFUSCATE, RULE_FILTER};
use crate::transforms::{Transform, TransformError};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Error that can occur when loading sources or writing output.
#[derive(Debug, Clone)]
pub enum LoaderError {
    /// IO error when reading or writing a file.
    IoError(String),
    /// Transform/rewrite error.
    TransformError(TransformError),
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::IoError(msg) => write!(f, "IO error: {}", msg),
            LoaderError::TransformError(err) => write!(f, "Transform error: {}", err),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::IoError(err.to_string())
    }
}

impl From<TransformError> for LoaderError {
    fn from(err: TransformError) -> Self {
        LoaderError::TransformError(err)
    }
}

/// Source loader with transform shortcuts.
pub struct SourceLoader {
    source: String,
}

impl SourceLoader {
    /// Load from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let source = fs::read_to_string(path)?;
        Ok(SourceLoader { source })
    }

    /// Load from a string.
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        SourceLoader {
            source: source.into(),
        }
    }

    /// Run a custom transform on the source.
    pub fn with<O: 'static>(&self, transform: &Transform<String, O>) -> Result<O, LoaderError> {
        Ok(transform.run(self.source.clone())?)
    }

    /// Rewrite with the default pipeline. Shortcut for `.with(&DEOBFUSCATE)`.
    pub fn deobfuscate(&self) -> Result<String, LoaderError> {
        self.with(&DEOBFUSCATE)
    }

    /// Apply the single-pass rule filter. Shortcut for `.with(&RULE_FILTER)`.
    pub fn filter(&self) -> Result<String, LoaderError> {
        self.with(&RULE_FILTER)
    }

    /// Get a reference to the raw source string.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Write `contents` to `path` atomically.
///
/// The text is staged in a temporary file next to the destination and
/// moved into place only once fully written, so readers never observe a
/// half-written output.
pub fn write_atomic<P: AsRef<Path>>(path: P, contents: &str) -> Result<(), LoaderError> {
    let path = path.as_ref();
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut staged = match dir {
        Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
        None => tempfile::NamedTempFile::new_in(".")?,
    };
    staged.write_all(contents.as_bytes())?;
    staged
        .persist(path)
        .map_err(|err| LoaderError::IoError(err.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string() {
        let loader = SourceLoader::from_string("foo();\n");
        assert_eq!(loader.source(), "foo();\n");
    }

    #[test]
    fn test_from_path_nonexistent() {
        let result = SourceLoader::from_path("nonexistent.js");
        assert!(matches!(result, Err(LoaderError::IoError(_))));
    }

    #[test]
    fn test_deobfuscate_shortcut() {
        let loader =
            SourceLoader::from_string("var a = [\"w\",\"x\",\"y\",\"z\",\"q\"];\nfoo(a[0]);\n");
        assert_eq!(loader.deobfuscate().unwrap(), "foo(\"w\");\n");
    }

    #[test]
    fn test_filter_shortcut() {
        let loader = SourceLoader::from_string("go(\"a\"+\"b\");");
        assert!(loader.filter().unwrap().contains("go(\"ab\");"));
    }

    #[test]
    fn test_loader_is_reusable() {
        let loader = SourceLoader::from_string("f();\n");
        let _once = loader.deobfuscate().unwrap();
        let _twice = loader.deobfuscate().unwrap();
        assert_eq!(loader.source(), "f();\n");
    }

    #[test]
    fn test_write_atomic_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.js");
        write_atomic(&path, "rewritten();\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "rewritten();\n");
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.js");
        fs::write(&path, "old").unwrap();
        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }
}
