//! Environment variable parsing utilities.
//!
//! Every `PNP_MAP_*` knob goes through these helpers so that unset and
//! malformed values fall back the same way everywhere.
//!
//! # Example
//!
//! ```
//! use pnp_types::env_utils::{env_bool_or, env_var};
//! use std::path::PathBuf;
//!
//! let root: Option<PathBuf> = env_var("PNP_MAP_PROJECT_ROOT");
//! let resolve_symlinks = env_bool_or("PNP_MAP_RESOLVE_SYMLINKS", true);
//! # let _ = (root, resolve_symlinks);
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is unset, empty, or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| v.trim().parse().ok())
}

/// Check if an environment variable is set to a truthy value, with a default.
///
/// Truthy: "1", "true", "yes", "on". Falsy: anything else that is set and
/// not blank. Unset or blank values yield `default`.
pub fn env_bool_or(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().filter(|v| !v.trim().is_empty()) {
        Some(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}

/// Get an environment variable as a string with a default value.
pub fn env_string_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a comma-separated environment variable into a vector.
///
/// Empty items are dropped; an unset variable yields an empty vector.
///
/// ```
/// use pnp_types::env_utils::env_list;
///
/// // PNP_MAP_SEEDS="left-pad@^1.0.0, chalk@^2.0.0"
/// let seeds: Vec<String> = env_list("PNP_MAP_SEEDS");
/// # let _ = seeds;
/// ```
pub fn env_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .ok()
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_env_var_parsing() {
        std::env::set_var("PNP_TEST_PATH", "/tmp/project");
        let val: Option<PathBuf> = env_var("PNP_TEST_PATH");
        assert_eq!(val, Some(PathBuf::from("/tmp/project")));

        std::env::set_var("PNP_TEST_BLANK", "  ");
        let blank: Option<PathBuf> = env_var("PNP_TEST_BLANK");
        assert_eq!(blank, None);

        let missing: Option<u64> = env_var("PNP_NONEXISTENT_VAR_12345");
        assert_eq!(missing, None);

        std::env::remove_var("PNP_TEST_PATH");
        std::env::remove_var("PNP_TEST_BLANK");
    }

    #[test]
    fn test_env_bool_or() {
        std::env::set_var("PNP_TEST_BOOL_YES", "YES");
        std::env::set_var("PNP_TEST_BOOL_OFF", "off");

        assert!(env_bool_or("PNP_TEST_BOOL_YES", false));
        assert!(!env_bool_or("PNP_TEST_BOOL_OFF", true));
        assert!(env_bool_or("PNP_NONEXISTENT_VAR_12346", true));
        assert!(!env_bool_or("PNP_NONEXISTENT_VAR_12346", false));

        std::env::remove_var("PNP_TEST_BOOL_YES");
        std::env::remove_var("PNP_TEST_BOOL_OFF");
    }

    #[test]
    fn test_env_bool_or_blank_uses_default() {
        std::env::set_var("PNP_TEST_BOOL_EMPTY", "");
        std::env::set_var("PNP_TEST_BOOL_SPACES", "   ");

        assert!(env_bool_or("PNP_TEST_BOOL_EMPTY", true));
        assert!(env_bool_or("PNP_TEST_BOOL_SPACES", true));
        assert!(!env_bool_or("PNP_TEST_BOOL_EMPTY", false));

        std::env::remove_var("PNP_TEST_BOOL_EMPTY");
        std::env::remove_var("PNP_TEST_BOOL_SPACES");
    }

    #[test]
    fn test_env_string_or() {
        std::env::set_var("PNP_TEST_STRING", "pnp_map=debug");
        assert_eq!(env_string_or("PNP_TEST_STRING", "info"), "pnp_map=debug");
        assert_eq!(env_string_or("PNP_NONEXISTENT_VAR_12347", "info"), "info");
        std::env::remove_var("PNP_TEST_STRING");
    }

    #[test]
    fn test_env_list() {
        std::env::set_var("PNP_TEST_LIST", "a@1, ,b@2,");
        assert_eq!(env_list("PNP_TEST_LIST"), vec!["a@1", "b@2"]);
        assert!(env_list("PNP_NONEXISTENT_VAR_12348").is_empty());
        std::env::remove_var("PNP_TEST_LIST");
    }
}
