//! Build-time errors.
//!
//! Any of these aborts the whole build; no partial map is ever returned.

use pnp_types::PackageLocator;
use std::path::PathBuf;

#[derive(Debug)]
pub enum BuildError {
    /// The graph source could not produce the package list.
    Graph { source: anyhow::Error },

    /// A declared dependency pattern has no resolution in the graph.
    UnresolvedPattern {
        pattern: String,
        /// Package declaring the pattern (`None`: a seed pattern)
        required_by: Option<PackageLocator>,
        source: anyhow::Error,
    },

    /// An install location could not be canonicalized.
    Location {
        package: PackageLocator,
        location: PathBuf,
        source: anyhow::Error,
    },

    /// Two packages claim the same install location.
    DuplicateLocation {
        location: String,
        first: PackageLocator,
        second: PackageLocator,
    },
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Graph { source } => {
                write!(f, "failed to read the dependency graph: {:#}", source)
            }
            BuildError::UnresolvedPattern {
                pattern,
                required_by,
                source,
            } => {
                write!(f, "cannot resolve dependency pattern \"{}\"", pattern)?;
                match required_by {
                    Some(pkg) => write!(f, " declared by {}", pkg)?,
                    None => write!(f, " requested by the project")?,
                }
                write!(f, ": {:#}", source)
            }
            BuildError::Location {
                package,
                location,
                source,
            } => write!(
                f,
                "cannot canonicalize location {} of {}: {:#}",
                location.display(),
                package,
                source
            ),
            BuildError::DuplicateLocation {
                location,
                first,
                second,
            } => write!(
                f,
                "location {} is claimed by both {} and {}",
                location, first, second
            ),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Graph { source }
            | BuildError::UnresolvedPattern { source, .. }
            | BuildError::Location { source, .. } => Some(&**source),
            BuildError::DuplicateLocation { .. } => None,
        }
    }
}
