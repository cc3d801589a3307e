use crate::models::AppData;
use crate::storage::DataPaths;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handler context: where the documents live and the in-memory copy
/// they mirror. Every mutation persists while still holding the lock.
#[derive(Clone)]
pub struct AppState {
    pub paths: DataPaths,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(paths: DataPaths, data: AppData) -> Self {
        Self {
            paths,
            data: Arc::new(Mutex::new(data)),
        }
    }
}
