// lib/src/storage_engine/mod.rs

pub mod config;
pub mod inmemory_storage;
pub mod sled_storage;
pub mod storage_engine;
pub mod storage_utils;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use config::{StorageConfig, StorageEngineType};
pub use inmemory_storage::InMemoryStore;
pub use sled_storage::{open_sled_db, SledStore};
pub use storage_engine::{PrescriptionStore, SlotClaim};

use std::sync::Arc;

use log::info;
use models::errors::{StoreError, StoreResult};

/// Creates a storage engine instance based on the provided configuration.
pub fn create_storage(config: &StorageConfig) -> StoreResult<Arc<dyn PrescriptionStore>> {
    let store: Arc<dyn PrescriptionStore> = match config.storage_engine_type {
        StorageEngineType::Sled => {
            let path = config.data_directory.as_ref().ok_or_else(|| {
                StoreError::Storage("Sled storage requires a data directory path.".to_string())
            })?;
            Arc::new(SledStore::open(path, config.cache_capacity)?)
        }
        StorageEngineType::InMemory => Arc::new(InMemoryStore::new()),
    };
    info!("Using {} storage engine", store.get_type());
    Ok(store)
}
