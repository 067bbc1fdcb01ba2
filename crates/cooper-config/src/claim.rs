//! Ownership claim window configuration.

use serde::{Deserialize, Serialize};

/// Days of inactivity before another user may claim an opportunity.
const fn default_window_days() -> u32 {
    90
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClaimConfig {
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_ninety_days() {
        assert_eq!(ClaimConfig::default().window_days, 90);
    }
}
