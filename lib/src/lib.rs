// lib/src/lib.rs

//! Prescription lifecycle and referential-integrity engine.
//!
//! [`PrescriptionService`] validates and persists prescriptions against a
//! [`PrescriptionStore`]; [`Resolver`] turns foreign keys into records.

pub mod boundary;
pub mod config;
pub mod engine;
pub mod errors;
pub mod resolver;
pub mod storage_engine;

pub use crate::boundary::ErrorResponse;
pub use crate::config::AppConfig;
pub use crate::engine::{EngineConfig, PrescriptionService, SlotPolicy};
pub use crate::errors::*;
pub use crate::resolver::Resolver;
pub use crate::storage_engine::{create_storage, InMemoryStore, PrescriptionStore, SledStore, SlotClaim, StorageConfig, StorageEngineType};

pub use models;
