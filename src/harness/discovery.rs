//! Descriptor discovery
//!
//! Expands a shell-style glob into the list of profiles to run. The pattern
//! is split into a literal base directory and a glob tail; only the base is
//! walked, and only as deep as the tail has components unless it contains
//! `**`. Results are sorted by path.

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use walkdir::WalkDir;

use crate::common::{Error, Result};

/// A single descriptor file to hand to the benchmark
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TestCase(PathBuf);

impl TestCase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Resolve `pattern` against the filesystem
///
/// An empty match is not an error. A pattern without glob metacharacters
/// names one path and matches only if that path exists.
pub fn discover(pattern: &str) -> Result<Vec<TestCase>> {
    if pattern.is_empty() {
        return Ok(Vec::new());
    }

    // "dir/*/" selects directories only, like the shell
    let (body, dirs_only) = match pattern.strip_suffix('/') {
        Some(body) if has_glob_meta(body) => (body.trim_end_matches('/'), true),
        _ => (pattern, false),
    };

    let components: Vec<&str> = body.split('/').collect();
    let literal = components
        .iter()
        .position(|c| has_glob_meta(c))
        .unwrap_or(components.len());

    let tail = &components[literal..];
    if tail.is_empty() {
        let path = PathBuf::from(pattern);
        return Ok(if path.exists() {
            vec![TestCase(path)]
        } else {
            Vec::new()
        });
    }

    let base = base_dir(&components[..literal]);
    let matcher = compile(pattern, &tail.join("/"))?;
    let recursive = tail.iter().any(|c| c.contains("**"));

    let root = if base.as_os_str().is_empty() {
        Path::new(".")
    } else {
        base.as_path()
    };
    if !root.is_dir() {
        tracing::debug!(base = %root.display(), "pattern base is not a directory");
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(root).min_depth(1).follow_links(false);
    if !recursive {
        walker = walker.max_depth(tail.len());
    }

    let mut cases = Vec::new();
    for entry in walker.sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            Error::discovery(&path, e)
        })?;

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if !hidden_allowed(relative, tail, recursive) {
            continue;
        }
        if dirs_only && !entry.path().is_dir() {
            continue;
        }
        if matcher.is_match(relative) {
            let path = base.join(relative);
            cases.push(TestCase(if dirs_only {
                with_trailing_slash(path)
            } else {
                path
            }));
        }
    }

    cases.sort();
    tracing::debug!(pattern, count = cases.len(), "discovered descriptors");
    Ok(cases)
}

fn has_glob_meta(component: &str) -> bool {
    component
        .chars()
        .any(|c| matches!(c, '*' | '?' | '[' | '{'))
}

fn base_dir(literal: &[&str]) -> PathBuf {
    match literal {
        [] => PathBuf::new(),
        // "/foo*" splits into ["", "foo*"]
        [""] => PathBuf::from("/"),
        _ => PathBuf::from(literal.join("/")),
    }
}

fn with_trailing_slash(path: PathBuf) -> PathBuf {
    let mut raw = path.into_os_string();
    raw.push("/");
    PathBuf::from(raw)
}

fn compile(pattern: &str, tail: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(tail)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| Error::invalid_pattern(pattern, e.kind()))
}

/// Dotfiles only match when the pattern spells out the leading dot
fn hidden_allowed(relative: &Path, tail: &[&str], recursive: bool) -> bool {
    relative.components().enumerate().all(|(i, component)| {
        let is_hidden = component.as_os_str().to_string_lossy().starts_with('.');
        if !is_hidden {
            return true;
        }
        if recursive {
            tail.iter().any(|c| c.starts_with('.'))
        } else {
            tail.get(i).is_some_and(|c| c.starts_with('.'))
        }
    })
}
