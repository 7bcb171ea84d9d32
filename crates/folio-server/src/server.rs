use std::sync::Arc;

use tokio::net::TcpListener;

use folio_ledger::{Books, BooksSnapshot};
use folio_store::{load_json, SnapshotLock};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Folio HTTP server.
pub struct FolioServer {
    config: ServerConfig,
    state: AppState,
    _lock: Option<SnapshotLock>,
}

impl FolioServer {
    /// Open the books named by `config.data_file` (empty if the file does
    /// not exist yet) and prepare the server. The data file stays locked
    /// against other folio processes until the server is dropped.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let lock = config
            .data_file
            .as_deref()
            .map(SnapshotLock::acquire)
            .transpose()?;
        let books = match &config.data_file {
            Some(path) if path.exists() => {
                let snapshot: BooksSnapshot = load_json(path)?;
                tracing::info!(
                    path = %path.display(),
                    transactions = snapshot.transactions.len(),
                    receipts = snapshot.receipts.len(),
                    payments = snapshot.payments.len(),
                    "books loaded"
                );
                Books::from_snapshot(snapshot, config.books.clone())?
            }
            _ => Books::in_memory(config.books.clone()),
        };
        let mut server = Self::with_books(config, Arc::new(books));
        server._lock = lock;
        Ok(server)
    }

    /// Serve existing books.
    pub fn with_books(config: ServerConfig, books: Arc<Books>) -> Self {
        let state = AppState::new(books, &config);
        Self {
            config,
            state,
            _lock: None,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "folio server listening");
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_ledger::{BooksConfig, NewPayment};
    use folio_store::save_json;
    use folio_types::PaymentMethod;

    #[test]
    fn server_construction() {
        let server = FolioServer::open(ServerConfig::default()).unwrap();
        assert_eq!(server.config().bind_addr.port(), 7878);
        let _router = server.router();
    }

    #[test]
    fn opens_existing_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");

        let books = Books::in_memory(BooksConfig::default());
        books
            .create_payment(NewPayment {
                date: chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                supplier_name: "Initech".into(),
                description: String::new(),
                account: None,
                bank: None,
                amount: 12.into(),
                payment_method: PaymentMethod::Cash,
            })
            .unwrap();
        save_json(&path, &books.snapshot().unwrap()).unwrap();

        let config = ServerConfig {
            data_file: Some(path),
            ..ServerConfig::default()
        };
        let server = FolioServer::open(config).unwrap();
        let next = server
            .state
            .books()
            .allocate_payment_voucher_number()
            .unwrap();
        assert_eq!(next, "PV0002");
    }

    #[test]
    fn data_file_is_locked_while_serving() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            data_file: Some(dir.path().join("books.json")),
            ..ServerConfig::default()
        };
        let first = FolioServer::open(config.clone()).unwrap();

        let err = FolioServer::open(config.clone()).err().unwrap();
        assert!(matches!(
            err,
            ServerError::Store(folio_store::StoreError::FileLocked { .. })
        ));

        drop(first);
        assert!(FolioServer::open(config).is_ok());
    }
}
