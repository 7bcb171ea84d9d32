use serde::{Deserialize, Serialize};

use folio_numbering::AllocatorConfig;

/// Configuration for the [`Books`](crate::Books) service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooksConfig {
    pub allocator: AllocatorConfig,
    /// How many times a create re-runs allocation after losing a number to a
    /// concurrent writer.
    pub max_create_retries: u32,
    /// How many times a status change or edit is re-applied after a
    /// concurrent write to the same document.
    pub max_update_retries: u32,
}

impl Default for BooksConfig {
    fn default() -> Self {
        Self {
            allocator: AllocatorConfig::default(),
            max_create_retries: 3,
            max_update_retries: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = BooksConfig::default();
        assert_eq!(c.max_create_retries, 3);
        assert_eq!(c.max_update_retries, 3);
        assert_eq!(c.allocator.max_attempts, 1000);
    }

    #[test]
    fn nested_partial_json() {
        let c: BooksConfig =
            serde_json::from_str(r#"{"allocator":{"sequence_width":5}}"#).unwrap();
        assert_eq!(c.allocator.sequence_width, 5);
        assert_eq!(c.allocator.max_attempts, 1000);
        assert_eq!(c.max_create_retries, 3);
    }
}
