pub mod app;
pub mod completions;
pub mod errors;
pub mod habits;
pub mod handlers;
pub mod models;
pub mod period;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use period::{Frequency, friendly_label, period_key};
pub use state::AppState;
pub use storage::{DataPaths, load_data, resolve_data_dir};
