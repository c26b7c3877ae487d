use crate::milestone::MilestoneNotifier;
use crate::models::CalendarStore;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Shared handles for request handlers. Lock `store` before `milestones`.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub store: Arc<Mutex<CalendarStore>>,
    pub milestones: Arc<Mutex<MilestoneNotifier>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, store: CalendarStore) -> Self {
        Self {
            data_path,
            store: Arc::new(Mutex::new(store)),
            milestones: Arc::new(Mutex::new(MilestoneNotifier::new())),
        }
    }
}
