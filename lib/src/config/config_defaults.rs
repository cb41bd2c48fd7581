// lib/src/config/config_defaults.rs

use std::path::PathBuf;

use crate::engine::SlotPolicy;
use crate::storage_engine::StorageEngineType;

pub const DEFAULT_DATA_DIRECTORY: &str = "./data/rx";
pub const DEFAULT_CONFIG_FILE: &str = "rx.yaml";

pub fn default_data_directory() -> Option<PathBuf> {
    Some(PathBuf::from(DEFAULT_DATA_DIRECTORY))
}
pub fn default_storage_engine_type() -> StorageEngineType { StorageEngineType::Sled }
pub fn default_cache_capacity() -> u64 { 64 * 1024 * 1024 }
pub fn default_slot_policy() -> SlotPolicy { SlotPolicy::Legacy }
