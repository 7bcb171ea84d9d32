use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use folio_ledger::BooksConfig;
use folio_server::ServerConfig;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "folio.toml";

/// `folio.toml`.
///
/// ```toml
/// data_file = "books.json"
///
/// [books]
/// max_create_retries = 5
///
/// [server]
/// bind_addr = "0.0.0.0:7878"
/// ```
///
/// `[books]` applies to every command including `serve`; the server
/// section's own `books` and `data_file` are replaced by the top-level ones.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub data_file: Option<PathBuf>,
    pub books: BooksConfig,
    pub server: ServerConfig,
}

impl CliConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read `path`, or `folio.toml` if present, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Server settings for serving `data_file`.
    pub fn server_for(&self, data_file: &Path) -> ServerConfig {
        ServerConfig {
            data_file: Some(data_file.to_path_buf()),
            books: self.books.clone(),
            ..self.server.clone()
        }
    }
}
