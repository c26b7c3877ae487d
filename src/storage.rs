use crate::errors::AppError;
use crate::models::{CalendarStore, DayRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

pub const STORE_VERSION: u32 = 1;

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/state.json"))
}

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    days: &'a BTreeMap<String, DayRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredData {
    Versioned {
        version: u32,
        days: BTreeMap<String, DayRecord>,
    },
    Legacy(BTreeMap<String, DayRecord>),
}

/// Decodes a stored file, accepting both the versioned envelope and the
/// bare date map written before versioning.
pub fn decode_store(bytes: &[u8]) -> Result<CalendarStore, String> {
    match serde_json::from_slice::<StoredData>(bytes) {
        Ok(StoredData::Versioned { version, days }) if version <= STORE_VERSION => {
            Ok(CalendarStore { days })
        }
        Ok(StoredData::Versioned { version, .. }) => {
            Err(format!("unsupported data version {version}"))
        }
        Ok(StoredData::Legacy(days)) => {
            warn!("migrating unversioned data file ({} days)", days.len());
            Ok(CalendarStore { days })
        }
        Err(err) => Err(err.to_string()),
    }
}

pub fn encode_store(store: &CalendarStore) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(&Envelope {
        version: STORE_VERSION,
        days: &store.days,
    })
}

pub async fn load_data(path: &Path) -> CalendarStore {
    match fs::read(path).await {
        Ok(bytes) => match decode_store(&bytes) {
            Ok(store) => {
                info!("loaded {} days from {}", store.len(), path.display());
                store
            }
            Err(err) => {
                error!("failed to parse data file: {err}");
                CalendarStore::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => CalendarStore::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            CalendarStore::default()
        }
    }
}

pub async fn persist_data(path: &Path, store: &CalendarStore) -> Result<(), AppError> {
    let payload = encode_store(store).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
