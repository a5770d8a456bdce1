//! Dependency graph input.
//!
//! The map builder does not resolve versions itself: it consumes an already
//! resolved graph through [`GraphSource`]. [`JsonGraphSource`] reads such a
//! graph from a lockfile-like JSON document:
//!
//! ```json
//! {
//!   "packages": [
//!     { "name": "left-pad", "version": "1.0.0",
//!       "location": "/store/left-pad-1.0.0", "dependencies": [] }
//!   ],
//!   "patterns": {
//!     "left-pad@^1.0.0": { "name": "left-pad", "version": "1.0.0" }
//!   }
//! }
//! ```
//!
//! A pattern missing from `patterns` still resolves when it is an exact
//! `name@version` of a listed package.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// A resolved package as handed out by the graph resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    pub reference: ManifestReference,
}

/// Install-side facts about a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestReference {
    /// Where the package is installed, if it is installed at all.
    pub location: Option<PathBuf>,
    /// Whether the package takes part in the plug'n'play map.
    pub pnp_eligible: bool,
    /// Dependency patterns as declared by the package.
    pub patterns: Vec<String>,
}

/// Exact resolution of a dependency pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPattern {
    pub name: String,
    pub version: String,
}

/// Read-only view of a resolved dependency graph.
pub trait GraphSource: Send + Sync {
    /// Every package reachable from `seed_patterns`, dependencies before
    /// their dependents.
    fn topological_manifests(&self, seed_patterns: &[String]) -> Result<Vec<Manifest>>;

    /// Resolve a pattern to a concrete package; fails when it is unknown.
    fn strict_resolved_pattern(&self, pattern: &str) -> Result<ResolvedPattern>;
}

/// On-disk graph document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub packages: Vec<GraphPackage>,
    #[serde(default)]
    pub patterns: HashMap<String, ResolvedPattern>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphPackage {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,
    #[serde(default = "default_pnp")]
    pub pnp: bool,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

fn default_pnp() -> bool {
    true
}

/// [`GraphSource`] backed by a [`GraphDocument`].
#[derive(Debug, Clone)]
pub struct JsonGraphSource {
    document: GraphDocument,
    /// `name@version` -> index into `document.packages`
    by_locator: HashMap<String, usize>,
}

impl JsonGraphSource {
    pub fn new(document: GraphDocument) -> Self {
        let by_locator = document
            .packages
            .iter()
            .enumerate()
            .map(|(idx, pkg)| (format!("{}@{}", pkg.name, pkg.version), idx))
            .collect();
        Self {
            document,
            by_locator,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: GraphDocument =
            serde_json::from_str(json).context("Failed to parse dependency graph JSON")?;
        Ok(Self::new(document))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dependency graph {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid dependency graph {}", path.display()))
    }

    fn package_index(&self, resolved: &ResolvedPattern) -> Result<usize> {
        self.by_locator
            .get(&format!("{}@{}", resolved.name, resolved.version))
            .copied()
            .ok_or_else(|| {
                anyhow!(
                    "Pattern resolved to {}@{}, which is not in the graph",
                    resolved.name,
                    resolved.version
                )
            })
    }

    fn visit(&self, idx: usize, seen: &mut HashSet<usize>, out: &mut Vec<Manifest>) -> Result<()> {
        if !seen.insert(idx) {
            return Ok(());
        }
        let pkg = &self.document.packages[idx];
        for pattern in &pkg.dependencies {
            let resolved = self.strict_resolved_pattern(pattern).with_context(|| {
                format!("While walking dependencies of {}@{}", pkg.name, pkg.version)
            })?;
            self.visit(self.package_index(&resolved)?, seen, out)?;
        }
        out.push(Manifest {
            name: pkg.name.clone(),
            version: pkg.version.clone(),
            reference: ManifestReference {
                location: pkg.location.clone(),
                pnp_eligible: pkg.pnp,
                patterns: pkg.dependencies.clone(),
            },
        });
        Ok(())
    }
}

impl GraphSource for JsonGraphSource {
    fn topological_manifests(&self, seed_patterns: &[String]) -> Result<Vec<Manifest>> {
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(self.document.packages.len());
        for pattern in seed_patterns {
            let resolved = self.strict_resolved_pattern(pattern)?;
            self.visit(self.package_index(&resolved)?, &mut seen, &mut out)?;
        }
        Ok(out)
    }

    fn strict_resolved_pattern(&self, pattern: &str) -> Result<ResolvedPattern> {
        if let Some(resolved) = self.document.patterns.get(pattern) {
            return Ok(resolved.clone());
        }
        self.by_locator
            .get(pattern)
            .map(|&idx| {
                let pkg = &self.document.packages[idx];
                ResolvedPattern {
                    name: pkg.name.clone(),
                    version: pkg.version.clone(),
                }
            })
            .ok_or_else(|| anyhow!("Couldn't find a resolved package for pattern \"{}\"", pattern))
    }
}
