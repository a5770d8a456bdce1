//! Persisted resolution maps.
//!
//! A snapshot is a self-contained JSON document: loading it needs neither the
//! graph nor the network. Layout:
//!
//! ```json
//! { "format_version": 1, "checksum": "<sha256 hex of map>", "map": { ... } }
//! ```
//!
//! The checksum covers the compact JSON encoding of `map`, which is stable
//! because every table in the map keeps insertion order.

use anyhow::{anyhow, bail, Context, Result};
use pnp_resolver::ResolutionMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    pub checksum: String,
    pub map: ResolutionMap,
}

impl Snapshot {
    pub fn new(map: ResolutionMap) -> Result<Self> {
        let checksum = map_checksum(&map)?;
        Ok(Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            checksum,
            map,
        })
    }

    pub fn into_map(self) -> ResolutionMap {
        self.map
    }

    /// Write the snapshot atomically (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize snapshot: {}", e))?;
        atomic_write(path, &json)
    }

    /// Read a snapshot and verify its format version and checksum.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            bail!(
                "Unsupported snapshot format version {} in {} (expected {})",
                snapshot.format_version,
                path.display(),
                SNAPSHOT_FORMAT_VERSION
            );
        }
        let actual = map_checksum(&snapshot.map)?;
        if actual != snapshot.checksum {
            bail!(
                "Snapshot {} is corrupted: checksum {} does not match recorded {}",
                path.display(),
                actual,
                snapshot.checksum
            );
        }
        Ok(snapshot)
    }
}

/// Hex SHA-256 of the compact JSON encoding of `map`.
pub fn map_checksum(map: &ResolutionMap) -> Result<String> {
    let json = serde_json::to_vec(map).map_err(|e| anyhow!("Failed to serialize map: {}", e))?;
    Ok(hex::encode(Sha256::digest(&json)))
}

/// Write a file atomically (write to .tmp, then rename).
fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    let tmp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|s| s.to_str()).unwrap_or("tmp")
    ));
    std::fs::write(&tmp_path, contents)
        .map_err(|e| anyhow!("Failed to write temp file {}: {}", tmp_path.display(), e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        anyhow!(
            "Failed to rename {} to {}: {}",
            tmp_path.display(),
            path.display(),
            e
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnp_resolver::{LocatorIndex, PackageInformationStore};
    use pnp_types::{PackageInformation, PackageLocator};
    use tempfile::TempDir;

    fn sample_map() -> ResolutionMap {
        let mut store = PackageInformationStore::new();
        let mut locations = LocatorIndex::new();
        let chalk = PackageLocator::new("chalk", "2.4.1");
        store.insert(
            &chalk,
            PackageInformation::new("/store/chalk-2.4.1").with_dependency("ansi", "3.0.0"),
        );
        store.insert(
            &PackageLocator::top_level(),
            PackageInformation::top_level().with_dependency("chalk", "2.4.1"),
        );
        locations.insert("/store/chalk-2.4.1", chalk);
        ResolutionMap::new(store, locations)
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("nested").join("pnp-map.json");

        let snapshot = Snapshot::new(sample_map())?;
        snapshot.save(&path)?;
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = Snapshot::load(&path)?;
        assert_eq!(loaded, snapshot);
        assert_eq!(
            loaded
                .into_map()
                .find_owner("/store/chalk-2.4.1/index.js"),
            Some(&PackageLocator::new("chalk", "2.4.1"))
        );
        Ok(())
    }

    #[test]
    fn test_checksum_is_stable() -> Result<()> {
        assert_eq!(map_checksum(&sample_map())?, map_checksum(&sample_map())?);
        assert_eq!(map_checksum(&sample_map())?.len(), 64);
        Ok(())
    }

    #[test]
    fn test_tampered_snapshot_is_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("pnp-map.json");
        Snapshot::new(sample_map())?.save(&path)?;

        let tampered = std::fs::read_to_string(&path)?.replace("ansi", "evil");
        std::fs::write(&path, tampered)?;

        let err = Snapshot::load(&path).unwrap_err();
        assert!(err.to_string().contains("corrupted"));
        Ok(())
    }

    #[test]
    fn test_unknown_format_version_is_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("pnp-map.json");
        let mut snapshot = Snapshot::new(sample_map())?;
        snapshot.format_version = 99;
        snapshot.save(&path)?;

        let err = Snapshot::load(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported snapshot format version 99"));
        Ok(())
    }
}
