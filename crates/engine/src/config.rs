//! Engine configuration.
//!
//! Can be constructed programmatically or loaded from environment variables.

use std::env;

/// Runtime switches for a [`crate::SelectorEngine`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Try the host's `select_all` before interpreting.
    pub native_fast_path: bool,
    /// Allow class retrieval through the host's class index.
    pub class_index: bool,
    /// Compare tag names exactly as written (XML documents).
    pub case_sensitive: bool,
}

impl Default for EngineConfig {
    #[inline]
    fn default() -> Self {
        Self::new(true, true, false)
    }
}

impl EngineConfig {
    #[inline]
    #[must_use]
    pub const fn new(native_fast_path: bool, class_index: bool, case_sensitive: bool) -> Self {
        Self {
            native_fast_path,
            class_index,
            case_sensitive,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables, each `"1"` or `"0"`:
    /// - `QUERY_NATIVE`: native fast path (default: enabled)
    /// - `QUERY_CLASS_INDEX`: class index retrieval (default: enabled)
    /// - `QUERY_CASE_SENSITIVE`: exact tag comparison (default: disabled)
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable lookup.
    #[must_use]
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |name: &str, default: bool| match lookup(name).as_deref().map(str::trim) {
            Some("1") => true,
            Some("0") => false,
            _ => default,
        };
        Self {
            native_fast_path: flag("QUERY_NATIVE", defaults.native_fast_path),
            class_index: flag("QUERY_CLASS_INDEX", defaults.class_index),
            case_sensitive: flag("QUERY_CASE_SENSITIVE", defaults.case_sensitive),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variables_keep_defaults() {
        assert_eq!(EngineConfig::from_vars(|_| None), EngineConfig::default());
    }

    #[test]
    fn flags_are_read_from_variables() {
        let config = EngineConfig::from_vars(|name| match name {
            "QUERY_NATIVE" => Some("0".to_owned()),
            "QUERY_CASE_SENSITIVE" => Some(" 1 ".to_owned()),
            "QUERY_CLASS_INDEX" => Some("yes".to_owned()),
            _ => None,
        });
        assert_eq!(config, EngineConfig::new(false, true, true));
    }
}
