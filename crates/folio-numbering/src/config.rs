use serde::{Deserialize, Serialize};

/// Tuning for the number allocator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Maximum number of candidates probed before giving up.
    pub max_attempts: u32,
    /// Minimum zero-padded width of the numeric suffix.
    pub sequence_width: usize,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1000,
            sequence_width: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = AllocatorConfig::default();
        assert_eq!(c.max_attempts, 1000);
        assert_eq!(c.sequence_width, 4);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let c: AllocatorConfig = toml::from_str("max_attempts = 50").unwrap();
        assert_eq!(c.max_attempts, 50);
        assert_eq!(c.sequence_width, 4);
    }
}
