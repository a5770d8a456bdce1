//! Reverse location index - install location -> owning package.
//!
//! Answers "which package does this file belong to?". Rather than a trie, the
//! index remembers the distinct lengths of all recorded locations and how often
//! each length occurs. A lookup probes the path's prefixes at those lengths,
//! most frequent length first: in a typical install most packages sit at one or
//! two directory depths, so the common case hits on the first probe or two.
//!
//! ```text
//!  path: /store/node_modules/chalk/lib/index.js
//!
//!  candidate lengths (most frequent first): 25, 6
//!        25 -> "/store/node_modules/chalk"   hit, followed by '/'
//! ```
//!
//! A probe only counts when it ends on a path component boundary, so
//! `/store/chalk` never claims `/store/chalk-extra/index.js`. When several
//! recorded locations are prefixes of the path the longest one wins; the scan
//! stops early once the hit is the longest length that could still match.

use indexmap::IndexMap;
use pnp_types::PackageLocator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Location -> locator index with a frequency-ordered prefix lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<String, PackageLocator>",
    into = "IndexMap<String, PackageLocator>"
)]
pub struct LocatorIndex {
    by_location: IndexMap<String, PackageLocator>,
    /// Location length -> number of recorded locations with that length.
    length_counts: BTreeMap<usize, usize>,
    /// Distinct location lengths, most frequent first (ties: longer first).
    candidate_lengths: Vec<usize>,
}

impl LocatorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `location` as owned by `locator`.
    ///
    /// Returns the previous owner if the location was already present; the new
    /// owner replaces it (last writer wins). Callers that must reject duplicate
    /// locations check the return value.
    pub fn insert(
        &mut self,
        location: impl Into<String>,
        locator: PackageLocator,
    ) -> Option<PackageLocator> {
        let location = location.into();
        let len = location.len();
        let previous = self.by_location.insert(location, locator);
        if previous.is_none() {
            *self.length_counts.entry(len).or_insert(0) += 1;
            self.candidate_lengths = order_candidate_lengths(&self.length_counts);
        }
        previous
    }

    /// Exact lookup of a recorded location.
    pub fn get(&self, location: &str) -> Option<&PackageLocator> {
        self.by_location.get(location)
    }

    /// Find the package owning `path`.
    ///
    /// Pure function of the index and the path. A path that *is* a recorded
    /// location matches exactly like a file inside it.
    pub fn find_owner(&self, path: &str) -> Option<&PackageLocator> {
        let longest_applicable = self
            .candidate_lengths
            .iter()
            .copied()
            .filter(|&len| len <= path.len())
            .max()?;

        let mut best: Option<(usize, &PackageLocator)> = None;
        for &len in &self.candidate_lengths {
            if len > path.len() || best.is_some_and(|(found, _)| len <= found) {
                continue;
            }
            let Some(prefix) = path.get(..len) else {
                continue;
            };
            if !ends_on_boundary(path, prefix) {
                continue;
            }
            if let Some(locator) = self.by_location.get(prefix) {
                trace!(path, location = prefix, owner = %locator, "location prefix hit");
                best = Some((len, locator));
                if len == longest_applicable {
                    break;
                }
            }
        }
        best.map(|(_, locator)| locator)
    }

    /// Candidate prefix lengths in the order `find_owner` probes them.
    pub fn candidate_lengths(&self) -> &[usize] {
        &self.candidate_lengths
    }

    /// Recorded locations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PackageLocator)> {
        self.by_location
            .iter()
            .map(|(location, locator)| (location.as_str(), locator))
    }

    pub fn len(&self) -> usize {
        self.by_location.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_location.is_empty()
    }
}

impl From<IndexMap<String, PackageLocator>> for LocatorIndex {
    fn from(by_location: IndexMap<String, PackageLocator>) -> Self {
        let length_counts = length_frequencies(by_location.keys());
        let candidate_lengths = order_candidate_lengths(&length_counts);
        Self {
            by_location,
            length_counts,
            candidate_lengths,
        }
    }
}

impl From<LocatorIndex> for IndexMap<String, PackageLocator> {
    fn from(index: LocatorIndex) -> Self {
        index.by_location
    }
}

/// Path-length frequency table: location length -> number of locations.
pub fn length_frequencies<'a>(locations: impl Iterator<Item = &'a String>) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for location in locations {
        *counts.entry(location.len()).or_insert(0) += 1;
    }
    counts
}

/// Order distinct lengths by descending frequency, longer lengths first on ties.
pub fn order_candidate_lengths(frequencies: &BTreeMap<usize, usize>) -> Vec<usize> {
    let mut lengths: Vec<(usize, usize)> = frequencies.iter().map(|(&l, &c)| (l, c)).collect();
    lengths.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
    lengths.into_iter().map(|(len, _)| len).collect()
}

fn ends_on_boundary(path: &str, prefix: &str) -> bool {
    if prefix.len() == path.len() || prefix.ends_with(is_separator) {
        return true;
    }
    path[prefix.len()..].starts_with(is_separator)
}

fn is_separator(c: char) -> bool {
    std::path::is_separator(c)
}
