//! PnP Resolver
//!
//! Lookup side of a plug'n'play dependency map.
//!
//! This crate provides:
//! - [`store`]: `name -> reference -> PackageInformation` records
//! - [`locator_index`]: install location -> owning package, with the
//!   frequency-ordered prefix lookup behind [`ResolutionMap::find_owner`]
//! - [`map`]: the immutable [`ResolutionMap`] tying both together
//! - [`specifier`]: splitting `require()` requests into name + subpath
//! - [`enforcement`]: [`PnpResolver`], which only lets a package resolve the
//!   dependencies it declared
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pnp_resolver::{LocatorIndex, PackageInformationStore, PnpResolver, ResolutionMap};
//! use pnp_types::{PackageInformation, PackageLocator};
//!
//! let left_pad = PackageLocator::new("left-pad", "1.0.0");
//! let mut store = PackageInformationStore::new();
//! store.insert(&left_pad, PackageInformation::new("/store/left-pad-1.0.0"));
//! store.insert(
//!     &PackageLocator::top_level(),
//!     PackageInformation::top_level().with_dependency("left-pad", "1.0.0"),
//! );
//! let mut locations = LocatorIndex::new();
//! locations.insert("/store/left-pad-1.0.0", left_pad);
//!
//! let resolver = PnpResolver::new(Arc::new(ResolutionMap::new(store, locations)));
//! let resolved = resolver.resolve_request("left-pad", None).unwrap();
//! assert_eq!(resolved.path(), Some("/store/left-pad-1.0.0"));
//! assert!(resolver.resolve_request("right-pad", None).is_err());
//! ```

pub mod enforcement;
pub mod error;
pub mod locator_index;
pub mod map;
pub mod specifier;
pub mod store;

pub use enforcement::{PnpResolver, Resolution};
pub use error::ResolutionError;
pub use locator_index::LocatorIndex;
pub use map::{MapStats, ResolutionMap};
pub use specifier::{is_path_request, parse_request, RequestKind};
pub use store::PackageInformationStore;
