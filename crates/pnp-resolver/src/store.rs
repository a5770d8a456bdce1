//! Package information store - `name -> reference -> PackageInformation`.
//!
//! The same package name may be resolved to several references in one graph
//! (e.g. two majors of `chalk` required by different packages), so records are
//! keyed by name first and reference second. The top-level project has no name,
//! so it lives in its own slot instead of under a sentinel key.
//!
//! Iteration follows insertion order, which keeps serialized snapshots
//! byte-for-byte reproducible for the same graph.

use indexmap::IndexMap;
use pnp_types::{PackageInformation, PackageLocator};
use serde::{Deserialize, Serialize};

/// Resolution records for every package eligible for the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInformationStore {
    top_level: PackageInformation,
    packages: IndexMap<String, IndexMap<String, PackageInformation>>,
}

impl PackageInformationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the record for a locator.
    ///
    /// A half-filled locator (name without reference) is treated as a package
    /// with an empty reference rather than silently routed to the top level.
    pub fn insert(&mut self, locator: &PackageLocator, info: PackageInformation) {
        match &locator.name {
            None => self.top_level = info,
            Some(name) => {
                let reference = locator.reference.clone().unwrap_or_default();
                self.packages
                    .entry(name.clone())
                    .or_default()
                    .insert(reference, info);
            }
        }
    }

    /// Record for `name@reference`.
    pub fn get(&self, name: &str, reference: &str) -> Option<&PackageInformation> {
        self.packages.get(name)?.get(reference)
    }

    /// Record for any locator, including the top-level one.
    pub fn get_locator(&self, locator: &PackageLocator) -> Option<&PackageInformation> {
        match &locator.name {
            None => Some(&self.top_level),
            Some(name) => self.get(name, locator.reference.as_deref().unwrap_or_default()),
        }
    }

    pub fn top_level(&self) -> &PackageInformation {
        &self.top_level
    }

    /// All references recorded for a name, in insertion order.
    pub fn references(&self, name: &str) -> impl Iterator<Item = &str> {
        self.packages
            .get(name)
            .into_iter()
            .flat_map(|refs| refs.keys().map(String::as_str))
    }

    /// Installed packages in insertion order (the top-level record is excluded).
    pub fn iter(&self) -> impl Iterator<Item = (PackageLocator, &PackageInformation)> {
        self.packages.iter().flat_map(|(name, refs)| {
            refs.iter()
                .map(move |(reference, info)| (PackageLocator::new(name.clone(), reference.clone()), info))
        })
    }

    /// Number of installed package records (the top-level record is not counted).
    pub fn len(&self) -> usize {
        self.packages.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
