//! pnp-map: plug'n'play dependency maps.
//!
//! Builds, persists and queries the map a package manager installs so that a
//! module loader can answer two questions for any file it loads:
//! - which package owns this file?
//! - which dependency (and which version of it) may that package require by name?
//!
//! ## Crates
//!
//! | Crate | Role |
//! |-------|------|
//! | `pnp-types` | [`PackageLocator`], [`PackageInformation`], env config helpers |
//! | `pnp-resolver` | store, location index, prefix lookup, [`PnpResolver`] |
//! | `pnp-map` (this crate) | [`MapBuilder`], [`GraphSource`], [`Snapshot`], CLI |
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pnp_map::{BuildOptions, JsonGraphSource, MapBuilder, PnpResolver, Snapshot};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let graph = JsonGraphSource::load("graph.json".as_ref())?;
//! let builder = MapBuilder::new(BuildOptions::from_env());
//! let map = builder.build(&["left-pad@^1.0.0".to_string()], &graph).await?;
//! Snapshot::new(map.clone())?.save("pnp-map.json".as_ref())?;
//!
//! let resolver = PnpResolver::new(Arc::new(map));
//! let resolved = resolver.resolve_request("left-pad", Some("/project/index.js"))?;
//! # let _ = resolved;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod graph;
pub mod location;
pub mod snapshot;

pub use builder::MapBuilder;
pub use config::BuildOptions;
pub use error::BuildError;
pub use graph::{
    GraphDocument, GraphPackage, GraphSource, JsonGraphSource, Manifest, ManifestReference,
    ResolvedPattern,
};
pub use location::{LexicalCanonicalizer, LocationCanonicalizer, RealPathCanonicalizer};
pub use snapshot::{Snapshot, SNAPSHOT_FORMAT_VERSION};

pub use pnp_resolver::{
    LocatorIndex, MapStats, PackageInformationStore, PnpResolver, Resolution, ResolutionError,
    ResolutionMap,
};
pub use pnp_types::{PackageInformation, PackageLocator};
