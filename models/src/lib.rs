// models/src/lib.rs

//! Data model shared by the prescription engine and its adapters.

pub mod errors;
pub mod identifiers;
pub mod medical;

pub use errors::{ErrorCode, PrescriptionError, PrescriptionResult, StoreError, StoreResult};
pub use identifiers::{Entity, EntityId, EntityKind, EntityRecord, EntityRef, UNASSIGNED_ID};
pub use medical::{Patient, Prescription, PrescriptionDraft, RelationIds, Slot, SlotStatus, User};
