//! Local libSQL database configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".cooper/cooper.db".to_string()
}

/// How long a writer waits on a locked database before giving up.
const fn default_busy_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the database file, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_project_dir() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, ".cooper/cooper.db");
        assert_eq!(config.busy_timeout_ms, 5_000);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn memory_detection() {
        let config = DatabaseConfig {
            path: ":memory:".into(),
            ..Default::default()
        };
        assert!(config.is_in_memory());
    }
}
