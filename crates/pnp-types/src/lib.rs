//! Shared types for the pnp-map workspace.
//!
//! - [`PackageLocator`]: `(name, reference)` identity of a resolved package,
//!   with a dedicated top-level value
//! - [`PackageInformation`]: install location plus declared dependencies
//! - [`env_utils`]: typed parsing of `PNP_MAP_*` environment variables

pub mod env_utils;
pub mod information;
pub mod locator;

pub use information::PackageInformation;
pub use locator::PackageLocator;
