//! Per-package resolution records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What the map knows about one package instance.
///
/// `dependencies` only ever holds the direct dependencies the package declared,
/// keyed by dependency name, valued by the reference that name resolved to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInformation {
    /// Canonical absolute install root (no trailing separator).
    /// `None` for the top-level project.
    pub location: Option<String>,
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
}

impl PackageInformation {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            dependencies: IndexMap::new(),
        }
    }

    /// Record of the top-level project: no location of its own.
    pub fn top_level() -> Self {
        Self::default()
    }

    /// Builder-style helper used when assembling records by hand.
    pub fn with_dependency(mut self, name: impl Into<String>, reference: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), reference.into());
        self
    }

    /// Reference the package resolved `name` to, if it declared it.
    pub fn dependency(&self, name: &str) -> Option<&str> {
        self.dependencies.get(name).map(String::as_str)
    }

    /// Declared dependency names, sorted (diagnostics).
    pub fn declared_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.dependencies.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_names_sorted() {
        let info = PackageInformation::new("/store/app")
            .with_dependency("zlib", "1.0.0")
            .with_dependency("chalk", "2.4.1")
            .with_dependency("@types/node", "10.0.0");
        assert_eq!(
            info.declared_names(),
            vec!["@types/node", "chalk", "zlib"]
        );
        // insertion order is preserved in the record itself
        let keys: Vec<&String> = info.dependencies.keys().collect();
        assert_eq!(keys, vec!["zlib", "chalk", "@types/node"]);
    }

    #[test]
    fn test_dependency_lookup() {
        let info = PackageInformation::top_level().with_dependency("left-pad", "1.0.0");
        assert_eq!(info.location, None);
        assert_eq!(info.dependency("left-pad"), Some("1.0.0"));
        assert_eq!(info.dependency("right-pad"), None);
    }
}
