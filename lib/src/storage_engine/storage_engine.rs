// lib/src/storage_engine/storage_engine.rs

use async_trait::async_trait;
use chrono::NaiveDate;

use models::errors::StoreResult;
use models::{EntityId, EntityKind, EntityRecord, Prescription};

/// How a prescription write treats other holders of its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotClaim {
    /// Fail with `SlotTaken` if any other prescription holds the slot.
    Exclusive,
    /// Write regardless of other holders.
    Shared,
}

/// Durable storage for users, slots, patients and prescriptions.
///
/// Implementations must be safe to share across concurrent requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrescriptionStore: Send + Sync {
    /// Looks up a referenced record. `kind` must be User, Slot or Patient.
    async fn find_by_id(&self, kind: EntityKind, id: EntityId) -> StoreResult<Option<EntityRecord>>;

    /// Inserts or replaces a referenced record under its own id.
    async fn put_entity(&self, record: EntityRecord) -> StoreResult<()>;

    async fn find_prescription(&self, id: EntityId) -> StoreResult<Option<Prescription>>;

    /// Every prescription in ascending id order.
    async fn find_all_prescriptions(&self) -> StoreResult<Vec<Prescription>>;

    async fn find_by_user_id_and_date(&self, user_id: EntityId, date: NaiveDate) -> StoreResult<Vec<Prescription>>;

    async fn exists_by_id(&self, id: EntityId) -> StoreResult<bool>;

    async fn exists_by_slot_id(&self, slot_id: EntityId) -> StoreResult<bool>;

    /// Assigns a fresh id and persists the prescription, but only if no other
    /// prescription holds its slot. Nothing is written on `SlotTaken`.
    async fn insert_prescription(&self, prescription: Prescription) -> StoreResult<Prescription>;

    /// Overwrites an existing prescription under its current id.
    async fn save_prescription(&self, prescription: Prescription, claim: SlotClaim) -> StoreResult<Prescription>;

    /// Returns whether a record was removed.
    async fn delete_prescription(&self, id: EntityId) -> StoreResult<bool>;

    async fn flush(&self) -> StoreResult<()> {
        Ok(())
    }

    fn get_type(&self) -> &'static str;
}
