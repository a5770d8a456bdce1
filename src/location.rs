//! Install location canonicalization.
//!
//! Every location recorded in the map is absolute and has no trailing
//! separator, otherwise prefix lookups against runtime file paths would miss.
//! Two strategies:
//! - [`RealPathCanonicalizer`]: resolves symlinks on disk (the location must exist)
//! - [`LexicalCanonicalizer`]: purely lexical, for graphs describing locations
//!   that are not materialized on this machine

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Turns a manifest location into the form stored in the map.
#[async_trait]
pub trait LocationCanonicalizer: Send + Sync {
    async fn canonicalize(&self, location: &Path) -> Result<String>;
}

/// Resolves the real path of each location via the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealPathCanonicalizer;

#[async_trait]
impl LocationCanonicalizer for RealPathCanonicalizer {
    async fn canonicalize(&self, location: &Path) -> Result<String> {
        let real = tokio::fs::canonicalize(location)
            .await
            .with_context(|| format!("Failed to resolve real path of {}", location.display()))?;
        Ok(normalize_location(&real))
    }
}

/// Absolutizes against `base` and folds `.`/`..` without touching the disk.
#[derive(Debug, Clone, Default)]
pub struct LexicalCanonicalizer {
    base: Option<PathBuf>,
}

impl LexicalCanonicalizer {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }
}

#[async_trait]
impl LocationCanonicalizer for LexicalCanonicalizer {
    async fn canonicalize(&self, location: &Path) -> Result<String> {
        if location.is_absolute() {
            return Ok(normalize_location(location));
        }
        let base = self.base.as_ref().ok_or_else(|| {
            anyhow!(
                "Relative location {} cannot be resolved without a base directory",
                location.display()
            )
        })?;
        Ok(normalize_location(&base.join(location)))
    }
}

/// Lexically clean a path and render it without a trailing separator.
///
/// ```
/// use pnp_map::location::normalize_location;
/// use std::path::Path;
///
/// assert_eq!(normalize_location(Path::new("/store/./a/../left-pad/")), "/store/left-pad");
/// assert_eq!(normalize_location(Path::new("/")), "/");
/// ```
pub fn normalize_location(path: &Path) -> String {
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` above the root stays at the root
                if !matches!(
                    clean.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    clean.pop();
                }
            }
            other => clean.push(other.as_os_str()),
        }
    }

    let rendered = clean.to_string_lossy().into_owned();
    let trimmed = rendered.trim_end_matches(std::path::is_separator);
    if trimmed.is_empty() {
        rendered
    } else {
        trimmed.to_string()
    }
}
