// lib/src/storage_engine/sled_storage.rs

use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use sled::transaction::{
    ConflictableTransactionError, ConflictableTransactionResult, TransactionError, TransactionResult,
    TransactionalTree,
};
use sled::{Db, Transactional, Tree};

use super::storage_engine::{PrescriptionStore, SlotClaim};
use super::storage_utils::{deserialize, id_from_key, id_key, serialize, user_date_key};
use models::errors::{StoreError, StoreResult};
use models::{EntityId, EntityKind, EntityRecord, Patient, Prescription, Slot, User};

/// Opens (or creates) the sled database backing a [`SledStore`].
pub fn open_sled_db<P: AsRef<Path>>(path: P, cache_capacity: u64) -> StoreResult<Db> {
    let path = path.as_ref();
    info!("Opening sled database at {:?}", path);
    let db = sled::Config::new()
        .path(path)
        .cache_capacity(cache_capacity)
        .open()?;
    Ok(db)
}

/// Durable store on sled.
///
/// Prescriptions live in one tree keyed by id. Two index trees map a slot id
/// and a (user id, day) pair to the ids referencing them; all three are only
/// written together inside a sled transaction, which is what makes the slot
/// check and the insert atomic.
#[derive(Debug, Clone)]
pub struct SledStore {
    db: Db,
    users: Tree,
    slots: Tree,
    patients: Tree,
    prescriptions: Tree,
    by_slot: Tree,
    by_user_date: Tree,
}

impl SledStore {
    pub fn new(db: Db) -> StoreResult<Self> {
        Ok(Self {
            users: db.open_tree("users")?,
            slots: db.open_tree("slots")?,
            patients: db.open_tree("patients")?,
            prescriptions: db.open_tree("prescriptions")?,
            by_slot: db.open_tree("prescriptions_by_slot")?,
            by_user_date: db.open_tree("prescriptions_by_user_date")?,
            db,
        })
    }

    pub fn open<P: AsRef<Path>>(path: P, cache_capacity: u64) -> StoreResult<Self> {
        Self::new(open_sled_db(path, cache_capacity)?)
    }

    fn entity_tree(&self, kind: EntityKind) -> StoreResult<&Tree> {
        match kind {
            EntityKind::User => Ok(&self.users),
            EntityKind::Slot => Ok(&self.slots),
            EntityKind::Patient => Ok(&self.patients),
            EntityKind::Prescription => Err(StoreError::Storage(
                "prescriptions are not looked up as entities".to_string(),
            )),
        }
    }

    fn load(&self, id: EntityId) -> StoreResult<Option<Prescription>> {
        match self.prescriptions.get(id_key(id))? {
            Some(bytes) => Ok(Some(deserialize(&bytes)?)),
            None => Ok(None),
        }
    }
}

fn abort<T>(err: StoreError) -> ConflictableTransactionResult<T, StoreError> {
    Err(ConflictableTransactionError::Abort(err))
}

fn finish<T>(result: TransactionResult<T, StoreError>) -> StoreResult<T> {
    result.map_err(|e| match e {
        TransactionError::Abort(err) => err,
        TransactionError::Storage(err) => StoreError::Sled(err),
    })
}

fn read_ids(tree: &TransactionalTree, key: &[u8]) -> ConflictableTransactionResult<Vec<EntityId>, StoreError> {
    match tree.get(key)? {
        Some(bytes) => deserialize(&bytes).map_err(ConflictableTransactionError::Abort),
        None => Ok(Vec::new()),
    }
}

// Empty lists are removed so that key presence alone answers "is it held".
fn write_ids(tree: &TransactionalTree, key: &[u8], ids: &[EntityId]) -> ConflictableTransactionResult<(), StoreError> {
    if ids.is_empty() {
        tree.remove(key)?;
    } else {
        let bytes = serialize(&ids).map_err(ConflictableTransactionError::Abort)?;
        tree.insert(key, bytes)?;
    }
    Ok(())
}

fn add_id(tree: &TransactionalTree, key: &[u8], id: EntityId) -> ConflictableTransactionResult<(), StoreError> {
    let mut ids = read_ids(tree, key)?;
    if !ids.contains(&id) {
        ids.push(id);
    }
    write_ids(tree, key, &ids)
}

fn remove_id(tree: &TransactionalTree, key: &[u8], id: EntityId) -> ConflictableTransactionResult<(), StoreError> {
    let mut ids = read_ids(tree, key)?;
    ids.retain(|held| *held != id);
    write_ids(tree, key, &ids)
}

fn date_index_key(prescription: &Prescription) -> Option<[u8; 12]> {
    prescription.date.map(|date| user_date_key(prescription.user_id(), date))
}

#[async_trait]
impl PrescriptionStore for SledStore {
    async fn find_by_id(&self, kind: EntityKind, id: EntityId) -> StoreResult<Option<EntityRecord>> {
        let Some(bytes) = self.entity_tree(kind)?.get(id_key(id))? else {
            return Ok(None);
        };
        let record = match kind {
            EntityKind::User => EntityRecord::User(deserialize::<User>(&bytes)?),
            EntityKind::Slot => EntityRecord::Slot(deserialize::<Slot>(&bytes)?),
            EntityKind::Patient => EntityRecord::Patient(deserialize::<Patient>(&bytes)?),
            EntityKind::Prescription => {
                return Err(StoreError::Storage("prescriptions are not looked up as entities".to_string()))
            }
        };
        Ok(Some(record))
    }

    async fn put_entity(&self, record: EntityRecord) -> StoreResult<()> {
        let key = id_key(record.id());
        let tree = self.entity_tree(record.kind())?;
        let bytes = match &record {
            EntityRecord::User(user) => serialize(user)?,
            EntityRecord::Slot(slot) => serialize(slot)?,
            EntityRecord::Patient(patient) => serialize(patient)?,
        };
        tree.insert(key, bytes)?;
        debug!("Stored {} {}", record.kind(), record.id());
        Ok(())
    }

    async fn find_prescription(&self, id: EntityId) -> StoreResult<Option<Prescription>> {
        self.load(id)
    }

    async fn find_all_prescriptions(&self) -> StoreResult<Vec<Prescription>> {
        let mut all = Vec::new();
        for item in self.prescriptions.iter() {
            let (_key, value) = item?;
            all.push(deserialize(&value)?);
        }
        Ok(all)
    }

    async fn find_by_user_id_and_date(&self, user_id: EntityId, date: NaiveDate) -> StoreResult<Vec<Prescription>> {
        let Some(bytes) = self.by_user_date.get(user_date_key(user_id, date))? else {
            return Ok(Vec::new());
        };
        let ids: Vec<EntityId> = deserialize(&bytes)?;
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            let prescription = self
                .load(id)?
                .ok_or_else(|| StoreError::Corrupt(format!("user/date index points at missing prescription {}", id)))?;
            found.push(prescription);
        }
        Ok(found)
    }

    async fn exists_by_id(&self, id: EntityId) -> StoreResult<bool> {
        Ok(self.prescriptions.contains_key(id_key(id))?)
    }

    async fn exists_by_slot_id(&self, slot_id: EntityId) -> StoreResult<bool> {
        Ok(self.by_slot.contains_key(id_key(slot_id))?)
    }

    async fn insert_prescription(&self, mut prescription: Prescription) -> StoreResult<Prescription> {
        // generate_id starts at zero; ids handed out are strictly positive.
        prescription.id = self.db.generate_id()? as EntityId + 1;
        let id = prescription.id;
        let slot_id = prescription.slot_id();
        let record_key = id_key(id);
        let slot_key = id_key(slot_id);
        let date_key = date_index_key(&prescription);
        let bytes = serialize(&prescription)?;

        let result = (&self.prescriptions, &self.by_slot, &self.by_user_date).transaction(
            |(records, by_slot, by_user_date)| {
                if let Some(&holder) = read_ids(by_slot, &slot_key)?.first() {
                    return abort(StoreError::SlotTaken { slot_id, holder });
                }
                write_ids(by_slot, &slot_key, &[id])?;
                if let Some(key) = date_key {
                    add_id(by_user_date, &key, id)?;
                }
                records.insert(&record_key[..], bytes.clone())?;
                Ok(())
            },
        );
        finish(result)?;
        debug!("Inserted prescription {} for slot {}", id, slot_id);
        Ok(prescription)
    }

    async fn save_prescription(&self, prescription: Prescription, claim: SlotClaim) -> StoreResult<Prescription> {
        let id = prescription.id;
        let record_key = id_key(id);
        let slot_id = prescription.slot_id();
        let slot_key = id_key(slot_id);
        let date_key = date_index_key(&prescription);
        let bytes = serialize(&prescription)?;

        let result = (&self.prescriptions, &self.by_slot, &self.by_user_date).transaction(
            |(records, by_slot, by_user_date)| {
                let previous: Prescription = match records.get(&record_key[..])? {
                    Some(old) => deserialize(&old).map_err(ConflictableTransactionError::Abort)?,
                    None => return abort(StoreError::MissingRecord(id)),
                };

                if previous.slot_id() != slot_id {
                    remove_id(by_slot, &id_key(previous.slot_id()), id)?;
                }
                let mut holders = read_ids(by_slot, &slot_key)?;
                if claim == SlotClaim::Exclusive {
                    if let Some(&holder) = holders.iter().find(|held| **held != id) {
                        return abort(StoreError::SlotTaken { slot_id, holder });
                    }
                }
                if !holders.contains(&id) {
                    holders.push(id);
                }
                write_ids(by_slot, &slot_key, &holders)?;

                let previous_date_key = date_index_key(&previous);
                if previous_date_key != date_key {
                    if let Some(key) = previous_date_key {
                        remove_id(by_user_date, &key, id)?;
                    }
                    if let Some(key) = date_key {
                        add_id(by_user_date, &key, id)?;
                    }
                }

                records.insert(&record_key[..], bytes.clone())?;
                Ok(())
            },
        );
        finish(result)?;
        debug!("Saved prescription {}", id);
        Ok(prescription)
    }

    async fn delete_prescription(&self, id: EntityId) -> StoreResult<bool> {
        let record_key = id_key(id);
        let result = (&self.prescriptions, &self.by_slot, &self.by_user_date).transaction(
            |(records, by_slot, by_user_date)| {
                let previous: Prescription = match records.remove(&record_key[..])? {
                    Some(old) => deserialize(&old).map_err(ConflictableTransactionError::Abort)?,
                    None => return Ok(false),
                };
                remove_id(by_slot, &id_key(previous.slot_id()), id)?;
                if let Some(key) = date_index_key(&previous) {
                    remove_id(by_user_date, &key, id)?;
                }
                Ok(true)
            },
        );
        let removed = finish(result)?;
        if removed {
            debug!("Deleted prescription {}", id);
        }
        Ok(removed)
    }

    async fn flush(&self) -> StoreResult<()> {
        self.db.flush_async().await?;
        Ok(())
    }

    fn get_type(&self) -> &'static str {
        "Sled"
    }
}

impl SledStore {
    /// Ids of the prescriptions currently holding `slot_id`.
    pub fn slot_holders(&self, slot_id: EntityId) -> StoreResult<Vec<EntityId>> {
        match self.by_slot.get(id_key(slot_id))? {
            Some(bytes) => deserialize(&bytes),
            None => Ok(Vec::new()),
        }
    }

    pub fn prescription_ids(&self) -> StoreResult<Vec<EntityId>> {
        let mut ids = Vec::new();
        for key in self.prescriptions.iter().keys() {
            let key = key?;
            let id = id_from_key(&key).ok_or_else(|| StoreError::Corrupt(format!("bad prescription key {:?}", key)))?;
            ids.push(id);
        }
        Ok(ids)
    }
}
