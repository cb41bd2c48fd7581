// models/src/medical/prescription.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{PrescriptionError, PrescriptionResult};
use crate::identifiers::{EntityId, EntityKind, EntityRef, UNASSIGNED_ID};
use crate::medical::{Patient, Slot, User};

/// A prescription issued during an appointment slot.
///
/// The three relations hold the resolved records as they were when the
/// prescription was last written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: EntityId,
    pub fever: Option<f64>,
    pub weight: Option<f64>,
    pub bp: Option<String>,
    pub sugar: Option<f64>,
    pub date: Option<NaiveDate>,
    pub tests: Vec<String>,
    pub medicines: Vec<String>,
    pub history: Vec<String>,
    pub user: User,
    pub slot: Slot,
    pub patient: Patient,
}

/// Caller supplied payload for create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionDraft {
    #[serde(default)]
    pub fever: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub bp: Option<String>,
    #[serde(default)]
    pub sugar: Option<f64>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, alias = "test")]
    pub tests: Vec<String>,
    #[serde(default, alias = "medicine")]
    pub medicines: Vec<String>,
    #[serde(default)]
    pub history: Vec<String>,
    #[serde(default)]
    pub user: Option<EntityRef>,
    #[serde(default)]
    pub slot: Option<EntityRef>,
    #[serde(default)]
    pub patient: Option<EntityRef>,
}

/// The three foreign keys a draft must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationIds {
    pub user_id: EntityId,
    pub slot_id: EntityId,
    pub patient_id: EntityId,
}

impl PrescriptionDraft {
    /// Decodes a request body. A literal `null` is a missing draft.
    pub fn from_json(body: &str) -> PrescriptionResult<Self> {
        let draft: Option<PrescriptionDraft> = serde_json::from_str(body).map_err(|e| {
            PrescriptionError::InvalidPrescription(format!("Malformed prescription data: {}", e))
        })?;
        draft.ok_or_else(|| PrescriptionError::InvalidPrescription("Prescription data is missing.".to_string()))
    }

    pub fn with_relations(user_id: EntityId, slot_id: EntityId, patient_id: EntityId) -> Self {
        PrescriptionDraft {
            user: Some(EntityRef::new(user_id)),
            slot: Some(EntityRef::new(slot_id)),
            patient: Some(EntityRef::new(patient_id)),
            ..Default::default()
        }
    }

    /// Extracts the relation ids, failing on the first stub that is absent.
    pub fn relation_ids(&self) -> PrescriptionResult<RelationIds> {
        Ok(RelationIds {
            user_id: required_id(self.user, EntityKind::User)?,
            slot_id: required_id(self.slot, EntityKind::Slot)?,
            patient_id: required_id(self.patient, EntityKind::Patient)?,
        })
    }

    /// Overwrites the vitals and the three lists. The date and relations of
    /// the target are left alone.
    pub fn apply_to(&self, prescription: &mut Prescription) {
        prescription.fever = self.fever;
        prescription.weight = self.weight;
        prescription.bp = self.bp.clone();
        prescription.sugar = self.sugar;
        prescription.tests = self.tests.clone();
        prescription.medicines = self.medicines.clone();
        prescription.history = self.history.clone();
    }
}

fn required_id(reference: Option<EntityRef>, kind: EntityKind) -> PrescriptionResult<EntityId> {
    reference
        .and_then(|r| r.id)
        .ok_or_else(|| PrescriptionError::InvalidPrescription(format!("{} reference is missing.", kind)))
}

impl Prescription {
    /// Builds an unsaved prescription from a draft and its resolved relations.
    pub fn from_draft(draft: PrescriptionDraft, user: User, slot: Slot, patient: Patient) -> Self {
        Prescription {
            id: UNASSIGNED_ID,
            fever: draft.fever,
            weight: draft.weight,
            bp: draft.bp,
            sugar: draft.sugar,
            date: draft.date,
            tests: draft.tests,
            medicines: draft.medicines,
            history: draft.history,
            user,
            slot,
            patient,
        }
    }

    pub fn user_id(&self) -> EntityId {
        self.user.id
    }

    pub fn slot_id(&self) -> EntityId {
        self.slot.id
    }

    pub fn patient_id(&self) -> EntityId {
        self.patient.id
    }
}
