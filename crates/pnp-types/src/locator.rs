//! Package locators.
//!
//! A locator identifies one resolved package instance in the dependency graph:
//! - `name@reference` for an installed package (the same name may appear with
//!   several references)
//! - `(None, None)` for the top-level project, which consumes dependencies but
//!   is not itself installed anywhere

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a resolved package instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageLocator {
    pub name: Option<String>,
    pub reference: Option<String>,
}

impl PackageLocator {
    /// Locator of an installed package.
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            reference: Some(reference.into()),
        }
    }

    /// The synthetic locator standing for the top-level project.
    pub fn top_level() -> Self {
        Self {
            name: None,
            reference: None,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.name.is_none()
    }

    /// Borrow the `(name, reference)` pair of an installed package.
    ///
    /// Returns `None` for the top-level locator (or a half-filled one).
    pub fn as_pair(&self) -> Option<(&str, &str)> {
        match (&self.name, &self.reference) {
            (Some(name), Some(reference)) => Some((name.as_str(), reference.as_str())),
            _ => None,
        }
    }
}

impl fmt::Display for PackageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.reference) {
            (Some(name), Some(reference)) => write!(f, "{}@{}", name, reference),
            (Some(name), None) => write!(f, "{}", name),
            _ => write!(f, "<top-level>"),
        }
    }
}
