//! The resolution map: package information store + reverse location index.
//!
//! Built once per install run and never mutated afterwards, so a published
//! map can be shared between any number of readers (`Arc<ResolutionMap>`)
//! without locking.

use indexmap::IndexMap;
use pnp_types::{PackageInformation, PackageLocator};
use serde::{Deserialize, Serialize};

use crate::locator_index::LocatorIndex;
use crate::store::PackageInformationStore;

/// Immutable snapshot of one resolution run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionMap {
    store: PackageInformationStore,
    locations: LocatorIndex,
}

/// Summary figures for logs and `inspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapStats {
    pub packages: usize,
    pub locations: usize,
    pub top_level_dependencies: usize,
    /// Prefix lengths in probe order
    pub candidate_lengths: Vec<usize>,
}

impl ResolutionMap {
    pub fn new(store: PackageInformationStore, locations: LocatorIndex) -> Self {
        Self { store, locations }
    }

    pub fn store(&self) -> &PackageInformationStore {
        &self.store
    }

    pub fn locations(&self) -> &LocatorIndex {
        &self.locations
    }

    /// Package owning the file at `path`, if any.
    pub fn find_owner(&self, path: &str) -> Option<&PackageLocator> {
        self.locations.find_owner(path)
    }

    /// Install location recorded for `locator` (`None` for the top level or
    /// an unknown locator).
    pub fn package_location(&self, locator: &PackageLocator) -> Option<&str> {
        self.store.get_locator(locator)?.location.as_deref()
    }

    /// Declared dependencies of `locator`.
    pub fn package_dependencies(&self, locator: &PackageLocator) -> Option<&IndexMap<String, String>> {
        self.store
            .get_locator(locator)
            .map(|info| &info.dependencies)
    }

    pub fn package_information(&self, locator: &PackageLocator) -> Option<&PackageInformation> {
        self.store.get_locator(locator)
    }

    pub fn stats(&self) -> MapStats {
        MapStats {
            packages: self.store.len(),
            locations: self.locations.len(),
            top_level_dependencies: self.store.top_level().dependencies.len(),
            candidate_lengths: self.locations.candidate_lengths().to_vec(),
        }
    }
}
