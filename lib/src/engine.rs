// lib/src/engine.rs

//! The prescription lifecycle engine.
//!
//! Every operation is a short chain of fallible store calls. Relations are
//! resolved in the fixed order user, slot, patient and the first failure is
//! returned as is. The engine keeps no state between calls.

use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use models::errors::{PrescriptionError, PrescriptionResult};
use models::{EntityId, Patient, Prescription, PrescriptionDraft, RelationIds, Slot, User};

use crate::config::config_defaults::default_slot_policy;
use crate::resolver::Resolver;
use crate::storage_engine::{PrescriptionStore, SlotClaim};

/// Whether update re-checks that the target slot is free.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotPolicy {
    /// Update may move a prescription onto a slot that already has one.
    #[default]
    Legacy,
    /// Update fails with `DuplicatePrescription` if another prescription
    /// holds the target slot.
    Strict,
}

impl SlotPolicy {
    fn claim(self) -> SlotClaim {
        match self {
            SlotPolicy::Legacy => SlotClaim::Shared,
            SlotPolicy::Strict => SlotClaim::Exclusive,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_slot_policy")]
    pub slot_policy: SlotPolicy,
}

struct Relations {
    user: User,
    slot: Slot,
    patient: Patient,
}

pub struct PrescriptionService {
    store: Arc<dyn PrescriptionStore>,
    resolver: Resolver,
    config: EngineConfig,
}

impl PrescriptionService {
    pub fn new(store: Arc<dyn PrescriptionStore>, config: EngineConfig) -> Self {
        let resolver = Resolver::new(Arc::clone(&store));
        Self { store, resolver, config }
    }

    async fn resolve_relations(&self, ids: RelationIds) -> PrescriptionResult<Relations> {
        let user = self.resolver.resolve::<User>(ids.user_id).await?;
        let slot = self.resolver.resolve::<Slot>(ids.slot_id).await?;
        let patient = self.resolver.resolve::<Patient>(ids.patient_id).await?;
        Ok(Relations { user, slot, patient })
    }

    pub async fn create_prescription(&self, draft: PrescriptionDraft) -> PrescriptionResult<Prescription> {
        let ids = draft.relation_ids()?;
        let Relations { user, slot, patient } = self.resolve_relations(ids).await?;

        if self.store.exists_by_slot_id(slot.id).await? {
            return Err(PrescriptionError::DuplicatePrescription(slot.id));
        }

        // The store repeats the slot check atomically with the insert, so a
        // concurrent create on the same slot still ends as a duplicate.
        let saved = self
            .store
            .insert_prescription(Prescription::from_draft(draft, user, slot, patient))
            .await?;
        info!("Created prescription {} for slot {}", saved.id, saved.slot_id());
        Ok(saved)
    }

    pub async fn update_prescription(&self, id: EntityId, draft: PrescriptionDraft) -> PrescriptionResult<Prescription> {
        let mut prescription = self
            .store
            .find_prescription(id)
            .await?
            .ok_or(PrescriptionError::PrescriptionNotFound(id))?;
        let ids = draft.relation_ids()?;

        draft.apply_to(&mut prescription);
        let Relations { user, slot, patient } = self.resolve_relations(ids).await?;
        prescription.user = user;
        prescription.slot = slot;
        prescription.patient = patient;

        let saved = self
            .store
            .save_prescription(prescription, self.config.slot_policy.claim())
            .await?;
        info!("Updated prescription {}", saved.id);
        Ok(saved)
    }

    pub async fn get_prescription_by_id(&self, id: EntityId) -> PrescriptionResult<Prescription> {
        self.store
            .find_prescription(id)
            .await?
            .ok_or(PrescriptionError::PrescriptionNotFound(id))
    }

    pub async fn get_all_prescriptions(&self) -> PrescriptionResult<Vec<Prescription>> {
        Ok(self.store.find_all_prescriptions().await?)
    }

    pub async fn get_prescriptions_by_user_id_and_date(
        &self,
        user_id: EntityId,
        date: NaiveDate,
    ) -> PrescriptionResult<Vec<Prescription>> {
        let found = self.store.find_by_user_id_and_date(user_id, date).await?;
        debug!("Found {} prescriptions for user {} on {}", found.len(), user_id, date);
        Ok(found)
    }

    pub async fn delete_prescription(&self, id: EntityId) -> PrescriptionResult<()> {
        if !self.store.exists_by_id(id).await? {
            return Err(PrescriptionError::PrescriptionNotFound(id));
        }
        // Lost a race with another delete.
        if !self.store.delete_prescription(id).await? {
            return Err(PrescriptionError::PrescriptionNotFound(id));
        }
        info!("Deleted prescription {}", id);
        Ok(())
    }
}
