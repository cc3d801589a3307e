use crate::completions::CompletionStore;
use crate::errors::AppError;
use crate::habits::HabitStore;
use crate::models::AppData;
use serde::{Serialize, de::DeserializeOwned};
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

const HABITS_FILE: &str = "habits.json";
const COMPLETIONS_FILE: &str = "completions.json";

/// Locations of the two independently persisted documents.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub habits: PathBuf,
    pub completions: PathBuf,
}

impl DataPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            habits: dir.join(HABITS_FILE),
            completions: dir.join(COMPLETIONS_FILE),
        }
    }
}

pub fn resolve_data_dir() -> PathBuf {
    match env::var("APP_DATA_DIR") {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from("data"),
    }
}

pub async fn load_data(paths: &DataPaths) -> AppData {
    let habits: HabitStore = load_document(&paths.habits).await;
    let completions: CompletionStore = load_document(&paths.completions).await;
    AppData::new(habits, completions)
}

/// Reads a JSON document, falling back to the empty value when the file is
/// missing, unreadable or does not match the expected shape.
pub async fn load_document<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse {}: {err}", path.display());
                T::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => T::default(),
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            T::default()
        }
    }
}

/// Writes the whole document to a sibling temp file and renames it into place.
pub async fn persist_document<T: Serialize>(path: &Path, data: &T) -> Result<(), AppError> {
    let tmp = stage_document(path, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

async fn stage_document<T: Serialize>(path: &Path, data: &T) -> Result<PathBuf, AppError> {
    let payload = serde_json::to_vec_pretty(data)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, payload).await?;
    Ok(tmp)
}

pub async fn persist_habits(paths: &DataPaths, habits: &HabitStore) -> Result<(), AppError> {
    persist_document(&paths.habits, habits).await
}

pub async fn persist_completions(
    paths: &DataPaths,
    completions: &CompletionStore,
) -> Result<(), AppError> {
    persist_document(&paths.completions, completions).await
}

/// Writes both documents. Neither is replaced unless both staged cleanly.
pub async fn persist_data(paths: &DataPaths, data: &AppData) -> Result<(), AppError> {
    let habits_tmp = stage_document(&paths.habits, &data.habits).await?;
    let completions_tmp = match stage_document(&paths.completions, &data.completions).await {
        Ok(tmp) => tmp,
        Err(err) => {
            let _ = fs::remove_file(&habits_tmp).await;
            return Err(err);
        }
    };
    fs::rename(&habits_tmp, &paths.habits).await?;
    fs::rename(&completions_tmp, &paths.completions).await?;
    Ok(())
}
