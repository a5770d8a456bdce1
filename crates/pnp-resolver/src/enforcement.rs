//! Dependency enforcement - turns `require(request)` from a file into a path.
//!
//! A package may only resolve, by name, the dependencies it declared. The
//! decision procedure:
//!
//! 1. path requests (`./`, `../`, `/`) are not governed here -> [`Resolution::Unmanaged`]
//! 2. split the request into package name + subpath
//! 3. find the issuer: owner of the requesting file, or the top level when the
//!    request has no file (entry process)
//! 4. look the name up in the issuer's declared dependencies
//! 5. join the dependency's install location with the subpath
//!
//! Extension and index-file probing stay with the host loader.

use std::path::Path;
use std::sync::Arc;

use pnp_types::PackageLocator;
use tracing::debug;

use crate::error::ResolutionError;
use crate::map::ResolutionMap;
use crate::specifier::{parse_request, RequestKind};

/// Outcome of a successful request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Path request; continue with ordinary path resolution.
    Unmanaged,
    /// Package request mapped onto the dependency's install location.
    Resolved {
        path: String,
        /// The dependency that satisfied the request
        locator: PackageLocator,
    },
}

impl Resolution {
    pub fn path(&self) -> Option<&str> {
        match self {
            Resolution::Unmanaged => None,
            Resolution::Resolved { path, .. } => Some(path),
        }
    }
}

/// Enforces declared dependencies against an owned, immutable map.
#[derive(Debug, Clone)]
pub struct PnpResolver {
    map: Arc<ResolutionMap>,
}

impl PnpResolver {
    pub fn new(map: Arc<ResolutionMap>) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &ResolutionMap {
        &self.map
    }

    /// Locator issuing requests from `requester` (`None`/empty: top level).
    pub fn find_issuer(&self, requester: Option<&str>) -> Option<PackageLocator> {
        match requester.filter(|path| !path.is_empty()) {
            None => Some(PackageLocator::top_level()),
            Some(path) => self.map.find_owner(path).cloned(),
        }
    }

    /// Resolve `request` as issued from the file at `requester`.
    pub fn resolve_request(
        &self,
        request: &str,
        requester: Option<&str>,
    ) -> Result<Resolution, ResolutionError> {
        let (dependency_name, subpath) = match parse_request(request)? {
            RequestKind::Path => return Ok(Resolution::Unmanaged),
            RequestKind::Bare { name, subpath } => (name, subpath),
        };

        let requester = requester.filter(|path| !path.is_empty());
        let issuer = self
            .find_issuer(requester)
            .ok_or_else(|| ResolutionError::UnknownRequester {
                request: request.to_string(),
                requester: requester.unwrap_or_default().to_string(),
            })?;

        let issuer_info = self.map.package_information(&issuer).ok_or_else(|| {
            ResolutionError::UnresolvableLocation {
                request: request.to_string(),
                dependency: issuer.clone(),
                issuer: issuer.clone(),
            }
        })?;

        let Some(reference) = issuer_info.dependency(dependency_name) else {
            debug!(%issuer, request, "rejected undeclared dependency");
            return Err(ResolutionError::UndeclaredDependency {
                request: request.to_string(),
                dependency_name: dependency_name.to_string(),
                issuer,
                requester: requester.map(str::to_string),
                declared: issuer_info.declared_names(),
            });
        };

        let dependency = PackageLocator::new(dependency_name, reference);
        let location = self.map.package_location(&dependency).ok_or_else(|| {
            ResolutionError::UnresolvableLocation {
                request: request.to_string(),
                dependency: dependency.clone(),
                issuer: issuer.clone(),
            }
        })?;

        let path = match subpath {
            Some(subpath) => Path::new(location).join(subpath).to_string_lossy().into_owned(),
            None => location.to_string(),
        };
        debug!(%issuer, %dependency, request, path = %path, "resolved request");

        Ok(Resolution::Resolved {
            path,
            locator: dependency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator_index::LocatorIndex;
    use crate::store::PackageInformationStore;
    use pnp_types::PackageInformation;

    /// top level -> left-pad@1.0.0, chalk@2.4.1 -> ansi@3.0.0 (not declared by top level)
    fn resolver() -> PnpResolver {
        let mut store = PackageInformationStore::new();
        let mut locations = LocatorIndex::new();

        let packages = [
            (
                PackageLocator::new("left-pad", "1.0.0"),
                PackageInformation::new("/store/left-pad-1.0.0"),
            ),
            (
                PackageLocator::new("chalk", "2.4.1"),
                PackageInformation::new("/store/chalk-2.4.1").with_dependency("ansi", "3.0.0"),
            ),
            (
                PackageLocator::new("ansi", "3.0.0"),
                PackageInformation::new("/store/ansi-3.0.0"),
            ),
        ];
        for (locator, info) in packages {
            if let Some(location) = &info.location {
                locations.insert(location.clone(), locator.clone());
            }
            store.insert(&locator, info);
        }
        store.insert(
            &PackageLocator::top_level(),
            PackageInformation::top_level()
                .with_dependency("left-pad", "1.0.0")
                .with_dependency("chalk", "2.4.1")
                .with_dependency("ghost", "0.0.0"),
        );
        PnpResolver::new(Arc::new(ResolutionMap::new(store, locations)))
    }

    #[test]
    fn test_top_level_resolves_declared() {
        let resolver = resolver();
        let resolution = resolver.resolve_request("left-pad", None).unwrap();
        assert_eq!(resolution.path(), Some("/store/left-pad-1.0.0"));

        let resolution = resolver.resolve_request("chalk/lib/index.js", Some("")).unwrap();
        assert_eq!(
            resolution,
            Resolution::Resolved {
                path: "/store/chalk-2.4.1/lib/index.js".to_string(),
                locator: PackageLocator::new("chalk", "2.4.1"),
            }
        );
    }

    #[test]
    fn test_transitive_dependency_is_phantom_for_top_level() {
        let err = resolver().resolve_request("ansi", None).unwrap_err();
        match err {
            ResolutionError::UndeclaredDependency {
                issuer, declared, ..
            } => {
                assert!(issuer.is_top_level());
                assert_eq!(declared, vec!["chalk", "ghost", "left-pad"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_package_resolves_own_dependency() {
        let resolution = resolver()
            .resolve_request("ansi", Some("/store/chalk-2.4.1/index.js"))
            .unwrap();
        assert_eq!(resolution.path(), Some("/store/ansi-3.0.0"));
    }

    #[test]
    fn test_package_cannot_require_sibling() {
        let err = resolver()
            .resolve_request("left-pad", Some("/store/chalk-2.4.1/index.js"))
            .unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::UndeclaredDependency { ref issuer, .. }
                if *issuer == PackageLocator::new("chalk", "2.4.1")
        ));
    }

    #[test]
    fn test_unknown_requester() {
        let err = resolver()
            .resolve_request("left-pad", Some("/tmp/stray.js"))
            .unwrap_err();
        assert_eq!(
            err,
            ResolutionError::UnknownRequester {
                request: "left-pad".to_string(),
                requester: "/tmp/stray.js".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_record_is_unresolvable() {
        let err = resolver().resolve_request("ghost", None).unwrap_err();
        assert_eq!(err.code(), "UNRESOLVABLE_LOCATION");
    }

    #[test]
    fn test_path_requests_are_unmanaged() {
        let resolver = resolver();
        assert_eq!(
            resolver.resolve_request("./local", Some("/tmp/stray.js")),
            Ok(Resolution::Unmanaged)
        );
        assert_eq!(resolver.resolve_request("/abs", None), Ok(Resolution::Unmanaged));
    }

    #[test]
    fn test_subpath_cannot_leave_dependency_location() {
        let resolver = resolver();
        for request in ["left-pad//etc/passwd", "left-pad/../chalk-2.4.1/index.js"] {
            let err = resolver.resolve_request(request, None).unwrap_err();
            assert_eq!(err.code(), "INVALID_SPECIFIER", "{request}");
        }

        let resolution = resolver
            .resolve_request("left-pad/./lib/index.js", None)
            .unwrap();
        let path = resolution.path().unwrap();
        assert!(path.starts_with("/store/left-pad-1.0.0/"), "{path}");
    }
}
