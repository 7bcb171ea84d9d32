use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use folio_ledger::Books;
use folio_store::save_json;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    books: Arc<Books>,
    data_file: Option<Arc<PathBuf>>,
    save_lock: Arc<Mutex<()>>,
    max_page_size: usize,
}

impl AppState {
    pub fn new(books: Arc<Books>, config: &ServerConfig) -> Self {
        Self {
            books,
            data_file: config.data_file.clone().map(Arc::new),
            save_lock: Arc::new(Mutex::new(())),
            max_page_size: config.max_page_size,
        }
    }

    pub fn books(&self) -> &Books {
        &self.books
    }

    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    /// Run a read against the books on the blocking pool. Store calls may
    /// block on I/O and must not stall the runtime.
    pub async fn read<T, F>(&self, f: F) -> ServerResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Books) -> folio_ledger::Result<T> + Send + 'static,
    {
        let books = Arc::clone(&self.books);
        tokio::task::spawn_blocking(move || f(&books))
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?
            .map_err(ServerError::from)
    }

    /// Like [`read`](Self::read), then write a fresh snapshot to the data
    /// file if one is configured.
    ///
    /// Once `f` has succeeded the change is live, so a failed save is logged
    /// and the call still succeeds. The next successful write saves it.
    pub async fn write<T, F>(&self, f: F) -> ServerResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Books) -> folio_ledger::Result<T> + Send + 'static,
    {
        let books = Arc::clone(&self.books);
        let data_file = self.data_file.clone();
        let save_lock = Arc::clone(&self.save_lock);
        tokio::task::spawn_blocking(move || -> ServerResult<T> {
            let out = f(&books)?;
            if let Some(path) = data_file {
                if let Err(err) = save_snapshot(&books, &path, &save_lock) {
                    tracing::error!(
                        path = %path.display(),
                        error = %err,
                        "books changed but snapshot save failed"
                    );
                }
            }
            Ok(out)
        })
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
    }
}

fn save_snapshot(books: &Books, path: &Path, save_lock: &Mutex<()>) -> ServerResult<()> {
    let _guard = save_lock
        .lock()
        .map_err(|_| ServerError::Internal("snapshot lock poisoned".into()))?;
    save_json(path, &books.snapshot()?)?;
    tracing::debug!(path = %path.display(), "books saved");
    Ok(())
}
