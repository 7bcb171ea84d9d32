use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use folio_ledger::BooksConfig;

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// JSON snapshot the books are loaded from and written back to after
    /// every change. `None` keeps everything in memory.
    pub data_file: Option<PathBuf>,
    /// Upper bound on `limit` for listing endpoints.
    pub max_page_size: usize,
    pub books: BooksConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 7878)),
            data_file: None,
            max_page_size: 500,
            books: BooksConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:7878".parse::<SocketAddr>().unwrap());
        assert!(c.data_file.is_none());
        assert_eq!(c.max_page_size, 500);
        assert_eq!(c.books.max_create_retries, 3);
    }

    #[test]
    fn partial_toml() {
        let c = ServerConfig::from_toml(
            r#"
            bind_addr = "0.0.0.0:9000"
            data_file = "books.json"

            [books]
            max_create_retries = 5

            [books.allocator]
            max_attempts = 10
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
        assert_eq!(c.data_file, Some(PathBuf::from("books.json")));
        assert_eq!(c.books.max_create_retries, 5);
        assert_eq!(c.books.allocator.max_attempts, 10);
        assert_eq!(c.books.allocator.sequence_width, 4);
        assert_eq!(c.max_page_size, 500);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = ServerConfig::from_toml("bind_addr = 12").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
