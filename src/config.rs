//! Solver configuration, loadable from TOML.
//!
//! ```
//! use gridcsp::SolverConfig;
//!
//! let config = SolverConfig::from_toml_str("restore_on_backtrack = false").unwrap();
//! assert!(!config.restore_on_backtrack);
//! assert!(config.eliminate_duplicates);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Knobs for the backtracking search. The defaults are what you want; the switches exist to
/// reproduce the behavior of simpler fillers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    /// Undo the domain narrowing done while exploring a candidate when the search backs out of it.
    /// With this off, narrowing from a failed branch leaks into its siblings and can hide valid
    /// fills.
    pub restore_on_backtrack: bool,

    /// After assigning a word, strike it from every other unfilled slot of the same length before
    /// propagating.
    pub eliminate_duplicates: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            restore_on_backtrack: true,
            eliminate_duplicates: true,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn with_restore_on_backtrack(mut self, restore: bool) -> Self {
        self.restore_on_backtrack = restore;
        self
    }

    pub fn with_eliminate_duplicates(mut self, eliminate: bool) -> Self {
        self.eliminate_duplicates = eliminate;
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ConfigError;
    use crate::SolverConfig;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = SolverConfig::from_toml_str("").unwrap();

        assert_eq!(config, SolverConfig::default());
        assert!(config.restore_on_backtrack);
        assert!(config.eliminate_duplicates);
    }

    #[test]
    fn test_toml_overrides_fields() {
        let config = SolverConfig::from_toml_str(
            "restore_on_backtrack = false\neliminate_duplicates = false\n",
        ).unwrap();

        assert_eq!(
            config,
            SolverConfig::new().with_restore_on_backtrack(false).with_eliminate_duplicates(false),
        );
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let err = SolverConfig::from_toml_str("restore_on_backtrack = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = SolverConfig::load("/nonexistent/gridcsp/solver.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
