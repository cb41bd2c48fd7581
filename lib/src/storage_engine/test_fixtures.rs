// lib/src/storage_engine/test_fixtures.rs

use chrono::{NaiveDate, NaiveTime};

use super::storage_engine::PrescriptionStore;
use models::{Patient, Prescription, PrescriptionDraft, Slot, SlotStatus, User};

pub fn doctor(id: i64) -> User {
    User {
        id,
        email: format!("doctor{}@clinic.test", id),
        role: "DOCTOR".to_string(),
        credentials: "$2b$12$opaque".to_string(),
    }
}

pub fn slot(id: i64, doctor_id: i64) -> Slot {
    Slot {
        id,
        start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
        slot_range: "10:00 - 10:30".to_string(),
        status: SlotStatus::Available,
        date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        doctor_id,
    }
}

pub fn patient(id: i64) -> Patient {
    let mut patient = Patient::new(id, "Asha Rao");
    patient.age = Some(41);
    patient
}

/// One doctor, one patient and two free slots.
pub async fn seed_refs(store: &dyn PrescriptionStore) -> (User, Patient, Vec<Slot>) {
    let user = doctor(1);
    let patient = patient(5);
    let slots = vec![slot(10, user.id), slot(11, user.id)];
    store.put_entity(user.clone().into()).await.unwrap();
    store.put_entity(patient.clone().into()).await.unwrap();
    for slot in &slots {
        store.put_entity(slot.clone().into()).await.unwrap();
    }
    (user, patient, slots)
}

pub fn prescription_for(user: &User, slot: &Slot, patient: &Patient) -> Prescription {
    let mut draft = PrescriptionDraft::with_relations(user.id, slot.id, patient.id);
    draft.fever = Some(99.1);
    draft.medicines = vec!["Paracetamol".to_string()];
    Prescription::from_draft(draft, user.clone(), slot.clone(), patient.clone())
}
