// lib/src/storage_engine/inmemory_storage.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use tokio::sync::RwLock;

use super::storage_engine::{PrescriptionStore, SlotClaim};
use models::errors::{StoreError, StoreResult};
use models::{EntityId, EntityKind, EntityRecord, Patient, Prescription, Slot, User};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<EntityId, User>,
    slots: BTreeMap<EntityId, Slot>,
    patients: BTreeMap<EntityId, Patient>,
    prescriptions: BTreeMap<EntityId, Prescription>,
    last_id: EntityId,
}

impl Tables {
    fn slot_holder(&self, slot_id: EntityId, except: Option<EntityId>) -> Option<EntityId> {
        self.prescriptions
            .values()
            .find(|p| p.slot_id() == slot_id && Some(p.id) != except)
            .map(|p| p.id)
    }
}

/// Volatile store. Every write happens under one lock, so the slot check and
/// the insert cannot interleave with another writer.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn prescription_count(&self) -> usize {
        self.tables.read().await.prescriptions.len()
    }
}

#[async_trait]
impl PrescriptionStore for InMemoryStore {
    async fn find_by_id(&self, kind: EntityKind, id: EntityId) -> StoreResult<Option<EntityRecord>> {
        let tables = self.tables.read().await;
        let record = match kind {
            EntityKind::User => tables.users.get(&id).cloned().map(EntityRecord::User),
            EntityKind::Slot => tables.slots.get(&id).cloned().map(EntityRecord::Slot),
            EntityKind::Patient => tables.patients.get(&id).cloned().map(EntityRecord::Patient),
            EntityKind::Prescription => {
                return Err(StoreError::Storage("prescriptions are not looked up as entities".to_string()))
            }
        };
        Ok(record)
    }

    async fn put_entity(&self, record: EntityRecord) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        match record {
            EntityRecord::User(user) => {
                tables.users.insert(user.id, user);
            }
            EntityRecord::Slot(slot) => {
                tables.slots.insert(slot.id, slot);
            }
            EntityRecord::Patient(patient) => {
                tables.patients.insert(patient.id, patient);
            }
        }
        Ok(())
    }

    async fn find_prescription(&self, id: EntityId) -> StoreResult<Option<Prescription>> {
        Ok(self.tables.read().await.prescriptions.get(&id).cloned())
    }

    async fn find_all_prescriptions(&self) -> StoreResult<Vec<Prescription>> {
        Ok(self.tables.read().await.prescriptions.values().cloned().collect())
    }

    async fn find_by_user_id_and_date(&self, user_id: EntityId, date: NaiveDate) -> StoreResult<Vec<Prescription>> {
        let tables = self.tables.read().await;
        Ok(tables
            .prescriptions
            .values()
            .filter(|p| p.user_id() == user_id && p.date == Some(date))
            .cloned()
            .collect())
    }

    async fn exists_by_id(&self, id: EntityId) -> StoreResult<bool> {
        Ok(self.tables.read().await.prescriptions.contains_key(&id))
    }

    async fn exists_by_slot_id(&self, slot_id: EntityId) -> StoreResult<bool> {
        Ok(self.tables.read().await.slot_holder(slot_id, None).is_some())
    }

    async fn insert_prescription(&self, mut prescription: Prescription) -> StoreResult<Prescription> {
        let mut tables = self.tables.write().await;
        let slot_id = prescription.slot_id();
        if let Some(holder) = tables.slot_holder(slot_id, None) {
            return Err(StoreError::SlotTaken { slot_id, holder });
        }
        tables.last_id += 1;
        prescription.id = tables.last_id;
        tables.prescriptions.insert(prescription.id, prescription.clone());
        debug!("Inserted prescription {} for slot {}", prescription.id, slot_id);
        Ok(prescription)
    }

    async fn save_prescription(&self, prescription: Prescription, claim: SlotClaim) -> StoreResult<Prescription> {
        let mut tables = self.tables.write().await;
        if !tables.prescriptions.contains_key(&prescription.id) {
            return Err(StoreError::MissingRecord(prescription.id));
        }
        if claim == SlotClaim::Exclusive {
            let slot_id = prescription.slot_id();
            if let Some(holder) = tables.slot_holder(slot_id, Some(prescription.id)) {
                return Err(StoreError::SlotTaken { slot_id, holder });
            }
        }
        tables.prescriptions.insert(prescription.id, prescription.clone());
        debug!("Saved prescription {}", prescription.id);
        Ok(prescription)
    }

    async fn delete_prescription(&self, id: EntityId) -> StoreResult<bool> {
        Ok(self.tables.write().await.prescriptions.remove(&id).is_some())
    }

    fn get_type(&self) -> &'static str {
        "InMemory"
    }
}
