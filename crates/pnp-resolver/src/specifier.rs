//! Module specifier parsing.
//!
//! A request is either a path (`./x`, `../x`, `/abs/x`), which the map does not
//! govern, or a bare package request:
//! - `left-pad` -> name `left-pad`
//! - `lodash/fp/map` -> name `lodash`, subpath `fp/map`
//! - `@babel/core/lib/index` -> name `@babel/core`, subpath `lib/index`
//!
//! A subpath must stay inside the package: absolute subpaths (`left-pad//etc`)
//! and `..` segments are rejected.

use std::path::{Component, Path};

use crate::error::ResolutionError;

/// Classified module request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind<'a> {
    /// Relative or absolute path; left to ordinary path resolution.
    Path,
    /// Package request by name.
    Bare {
        name: &'a str,
        subpath: Option<&'a str>,
    },
}

/// Check whether a request is a relative or absolute path.
///
/// # Examples
///
/// ```
/// use pnp_resolver::specifier::is_path_request;
///
/// assert!(is_path_request("./lib/util"));
/// assert!(is_path_request("../index.js"));
/// assert!(is_path_request("/abs/file.js"));
/// assert!(!is_path_request("left-pad"));
/// assert!(!is_path_request("@scope/pkg"));
/// ```
pub fn is_path_request(request: &str) -> bool {
    request == "."
        || request == ".."
        || request.starts_with("./")
        || request.starts_with("../")
        || request.starts_with('/')
        || Path::new(request).is_absolute()
}

/// Split a request into package name and optional subpath.
///
/// # Examples
///
/// ```
/// use pnp_resolver::specifier::{parse_request, RequestKind};
///
/// assert_eq!(
///     parse_request("@babel/core/lib/index").unwrap(),
///     RequestKind::Bare { name: "@babel/core", subpath: Some("lib/index") }
/// );
/// assert_eq!(parse_request("./local").unwrap(), RequestKind::Path);
/// assert!(parse_request("@scope").is_err());
/// ```
pub fn parse_request(request: &str) -> Result<RequestKind<'_>, ResolutionError> {
    if is_path_request(request) {
        return Ok(RequestKind::Path);
    }

    let invalid = || ResolutionError::InvalidSpecifier {
        request: request.to_string(),
    };

    // Scoped names span two segments.
    let name_end = if request.starts_with('@') {
        let scope_end = request.find('/').ok_or_else(invalid)?;
        if scope_end == 1 {
            return Err(invalid());
        }
        match request[scope_end + 1..].find('/') {
            Some(offset) => scope_end + 1 + offset,
            None => request.len(),
        }
    } else {
        request.find('/').unwrap_or(request.len())
    };

    let name = &request[..name_end];
    if name.is_empty() || name.ends_with('/') {
        return Err(invalid());
    }

    let subpath = request
        .get(name_end + 1..)
        .filter(|rest| !rest.is_empty());
    if subpath.is_some_and(|subpath| !is_contained_subpath(subpath)) {
        return Err(invalid());
    }

    Ok(RequestKind::Bare { name, subpath })
}

fn is_contained_subpath(subpath: &str) -> bool {
    Path::new(subpath)
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}
