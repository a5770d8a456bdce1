//! Builder configuration.

use pnp_types::env_utils::{env_bool_or, env_var};
use std::path::PathBuf;

/// Directory registered as owned by the top-level project.
pub const ENV_PROJECT_ROOT: &str = "PNP_MAP_PROJECT_ROOT";
/// Resolve symlinks of install locations on disk (default: on).
pub const ENV_RESOLVE_SYMLINKS: &str = "PNP_MAP_RESOLVE_SYMLINKS";
/// Let a later package silently take over an already registered location.
pub const ENV_ALLOW_DUPLICATE_LOCATIONS: &str = "PNP_MAP_ALLOW_DUPLICATE_LOCATIONS";

/// Options controlling one map build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Files under this directory are issued by the top-level project.
    pub project_root: Option<PathBuf>,
    /// Canonicalize locations through the filesystem instead of lexically.
    pub resolve_symlinks: bool,
    /// Last writer wins on duplicate locations instead of failing the build.
    pub allow_duplicate_locations: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            project_root: None,
            resolve_symlinks: true,
            allow_duplicate_locations: false,
        }
    }
}

impl BuildOptions {
    /// Defaults overridden by `PNP_MAP_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            project_root: env_var(ENV_PROJECT_ROOT),
            resolve_symlinks: env_bool_or(ENV_RESOLVE_SYMLINKS, defaults.resolve_symlinks),
            allow_duplicate_locations: env_bool_or(
                ENV_ALLOW_DUPLICATE_LOCATIONS,
                defaults.allow_duplicate_locations,
            ),
        }
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    pub fn with_resolve_symlinks(mut self, resolve_symlinks: bool) -> Self {
        self.resolve_symlinks = resolve_symlinks;
        self
    }

    pub fn with_allow_duplicate_locations(mut self, allow: bool) -> Self {
        self.allow_duplicate_locations = allow;
        self
    }
}
