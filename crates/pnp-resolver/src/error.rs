//! Resolution-time errors.
//!
//! Each variant is fatal to the single request that raised it, never to the
//! process. They carry enough context (issuer, request, declared names) to
//! diagnose a misdeclared dependency without re-running the resolver.

use pnp_types::PackageLocator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The specifier is neither a path nor a well-formed package name.
    InvalidSpecifier {
        request: String,
    },

    /// The requesting file does not belong to any package in the map.
    UnknownRequester {
        request: String,
        /// Path of the file that issued the request
        requester: String,
    },

    /// The issuer asked for a name it never declared (phantom dependency).
    UndeclaredDependency {
        request: String,
        /// Package name extracted from the request
        dependency_name: String,
        /// Package that issued the request
        issuer: PackageLocator,
        /// File that issued the request, when known
        requester: Option<String>,
        /// The issuer's declared dependency names, sorted
        declared: Vec<String>,
    },

    /// The dependency resolved to a reference with no usable record.
    UnresolvableLocation {
        request: String,
        dependency: PackageLocator,
        issuer: PackageLocator,
    },
}

impl ResolutionError {
    /// Short machine-friendly code, mirrored by the CLI's JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            ResolutionError::InvalidSpecifier { .. } => "INVALID_SPECIFIER",
            ResolutionError::UnknownRequester { .. } => "UNKNOWN_REQUESTER",
            ResolutionError::UndeclaredDependency { .. } => "UNDECLARED_DEPENDENCY",
            ResolutionError::UnresolvableLocation { .. } => "UNRESOLVABLE_LOCATION",
        }
    }
}

impl std::fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionError::InvalidSpecifier { request } => {
                write!(f, "INVALID_SPECIFIER: \"{}\" is not a valid package request", request)
            }
            ResolutionError::UnknownRequester { request, requester } => write!(
                f,
                "UNKNOWN_REQUESTER: cannot resolve \"{}\": the file \"{}\" does not belong to any package of the dependency map",
                request, requester
            ),
            ResolutionError::UndeclaredDependency {
                request,
                dependency_name,
                issuer,
                requester,
                declared,
            } => {
                if issuer.is_top_level() {
                    write!(
                        f,
                        "UNDECLARED_DEPENDENCY: the project cannot require \"{}\" (via \"{}\") because it is not declared in its dependencies",
                        dependency_name, request
                    )?;
                } else {
                    write!(
                        f,
                        "UNDECLARED_DEPENDENCY: package \"{}\" is trying to require \"{}\" (via \"{}\") without it being listed in its dependencies",
                        issuer, dependency_name, request
                    )?;
                }
                if let Some(path) = requester {
                    write!(f, " (required from {})", path)?;
                }
                write!(f, "; declared: [{}]", declared.join(", "))
            }
            ResolutionError::UnresolvableLocation {
                request,
                dependency,
                issuer,
            } => write!(
                f,
                "UNRESOLVABLE_LOCATION: \"{}\" required by {} resolved to {}, which has no install location in the map",
                request, issuer, dependency
            ),
        }
    }
}

impl std::error::Error for ResolutionError {}
