// lib/tests/lifecycle.rs

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tempfile::TempDir;

use rx_lib::models::{
    EntityId, ErrorCode, Patient, PrescriptionDraft, PrescriptionError, Slot, SlotStatus, User,
};
use rx_lib::{EngineConfig, InMemoryStore, PrescriptionService, PrescriptionStore, SledStore};

const DOCTOR: EntityId = 1;
const OTHER_DOCTOR: EntityId = 2;
const PATIENT: EntityId = 20;
const SLOT_A: EntityId = 100;
const SLOT_B: EntityId = 101;
const SLOT_C: EntityId = 102;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

struct Harness {
    _dir: Option<TempDir>,
    store: Arc<dyn PrescriptionStore>,
    service: PrescriptionService,
}

async fn seed(store: &dyn PrescriptionStore) {
    for id in [DOCTOR, OTHER_DOCTOR] {
        let user = User {
            id,
            email: format!("dr{}@clinic.test", id),
            role: "DOCTOR".to_string(),
            credentials: "opaque".to_string(),
        };
        store.put_entity(user.into()).await.unwrap();
    }
    for id in [SLOT_A, SLOT_B, SLOT_C] {
        let slot = Slot {
            id,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
            slot_range: "09:00 - 09:15".to_string(),
            status: SlotStatus::Available,
            date: day(),
            doctor_id: DOCTOR,
        };
        store.put_entity(slot.into()).await.unwrap();
    }
    store.put_entity(Patient::new(PATIENT, "Ravi Kumar").into()).await.unwrap();
}

async fn harnesses() -> Vec<Harness> {
    let memory: Arc<dyn PrescriptionStore> = Arc::new(InMemoryStore::new());
    let dir = TempDir::new().unwrap();
    let sled: Arc<dyn PrescriptionStore> = Arc::new(SledStore::open(dir.path().join("rx"), 1024 * 1024).unwrap());

    let mut out = Vec::new();
    for (dir, store) in [(None, memory), (Some(dir), sled)] {
        seed(store.as_ref()).await;
        let service = PrescriptionService::new(store.clone(), EngineConfig::default());
        out.push(Harness { _dir: dir, store, service });
    }
    out
}

fn draft(user: EntityId, slot: EntityId, patient: EntityId) -> PrescriptionDraft {
    let mut draft = PrescriptionDraft::with_relations(user, slot, patient);
    draft.fever = Some(100.4);
    draft.weight = Some(62.0);
    draft.sugar = Some(110.0);
    draft.bp = Some("130/85".to_string());
    draft.date = Some(day());
    draft.tests = vec!["CBC".into(), "Urine".into(), "CBC".into()];
    draft.medicines = vec!["Amoxicillin".into(), "Paracetamol".into()];
    draft.history = vec!["penicillin allergy: none".into()];
    draft
}

async fn count(store: &dyn PrescriptionStore) -> usize {
    store.find_all_prescriptions().await.unwrap().len()
}

#[tokio::test]
async fn creates_with_fresh_id_and_round_trips() {
    for h in harnesses().await {
        let created = h.service.create_prescription(draft(DOCTOR, SLOT_A, PATIENT)).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.user.id, DOCTOR);
        assert_eq!(created.slot.id, SLOT_A);
        assert_eq!(created.patient.name, "Ravi Kumar");

        let fetched = h.service.get_prescription_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.tests, vec!["CBC", "Urine", "CBC"]);
        assert_eq!(fetched.medicines, vec!["Amoxicillin", "Paracetamol"]);
    }
}

#[tokio::test]
async fn second_prescription_on_slot_is_duplicate() {
    for h in harnesses().await {
        h.service.create_prescription(draft(DOCTOR, SLOT_A, PATIENT)).await.unwrap();

        let mut other = draft(OTHER_DOCTOR, SLOT_A, PATIENT);
        other.fever = None;
        other.medicines.clear();
        let err = h.service.create_prescription(other).await.unwrap_err();
        assert!(matches!(err, PrescriptionError::DuplicatePrescription(SLOT_A)));
        assert_eq!(count(h.store.as_ref()).await, 1);
    }
}

#[tokio::test]
async fn missing_patient_persists_nothing() {
    for h in harnesses().await {
        let before = count(h.store.as_ref()).await;
        let err = h.service.create_prescription(draft(DOCTOR, SLOT_A, 999)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::PatientNotFound);
        assert_eq!(count(h.store.as_ref()).await, before);
        assert!(!h.store.exists_by_slot_id(SLOT_A).await.unwrap());
    }
}

#[tokio::test]
async fn user_is_resolved_before_slot() {
    for h in harnesses().await {
        let err = h.service.create_prescription(draft(555, 556, PATIENT)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::UserNotFound);
        assert_eq!(err.to_string(), "User with ID 555 not found.");
    }
}

#[tokio::test]
async fn updating_unknown_id_persists_nothing() {
    for h in harnesses().await {
        let err = h.service.update_prescription(4242, draft(DOCTOR, SLOT_A, PATIENT)).await.unwrap_err();
        assert!(matches!(err, PrescriptionError::PrescriptionNotFound(4242)));
        assert_eq!(count(h.store.as_ref()).await, 0);
    }
}

#[tokio::test]
async fn update_may_move_onto_held_slot() {
    for h in harnesses().await {
        let first = h.service.create_prescription(draft(DOCTOR, SLOT_A, PATIENT)).await.unwrap();
        let second = h.service.create_prescription(draft(DOCTOR, SLOT_B, PATIENT)).await.unwrap();

        let moved = h.service.update_prescription(second.id, draft(DOCTOR, SLOT_A, PATIENT)).await.unwrap();
        assert_eq!(moved.id, second.id);
        assert_eq!(moved.slot.id, SLOT_A);
        assert_eq!(h.service.get_prescription_by_id(first.id).await.unwrap().slot.id, SLOT_A);

        // Slot B is free again.
        h.service.create_prescription(draft(DOCTOR, SLOT_B, PATIENT)).await.unwrap();
    }
}

#[tokio::test]
async fn update_revalidates_relations_from_draft() {
    for h in harnesses().await {
        let created = h.service.create_prescription(draft(DOCTOR, SLOT_A, PATIENT)).await.unwrap();
        let err = h.service.update_prescription(created.id, draft(DOCTOR, 777, PATIENT)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::SlotNotFound);

        let changed = h.service.update_prescription(created.id, draft(OTHER_DOCTOR, SLOT_C, PATIENT)).await.unwrap();
        assert_eq!(changed.user.id, OTHER_DOCTOR);
        assert!(h.store.exists_by_slot_id(SLOT_C).await.unwrap());
        assert!(!h.store.exists_by_slot_id(SLOT_A).await.unwrap());
    }
}

#[tokio::test]
async fn update_without_relation_stub_is_rejected_after_lookup() {
    for h in harnesses().await {
        let created = h.service.create_prescription(draft(DOCTOR, SLOT_A, PATIENT)).await.unwrap();

        let mut stubless = draft(DOCTOR, SLOT_A, PATIENT);
        stubless.patient = None;
        let err = h.service.update_prescription(created.id, stubless.clone()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPrescription);
        assert_eq!(err.to_string(), "Patient reference is missing.");
        assert_eq!(h.service.get_prescription_by_id(created.id).await.unwrap(), created);

        let err = h.service.update_prescription(4242, stubless).await.unwrap_err();
        assert!(matches!(err, PrescriptionError::PrescriptionNotFound(4242)));
    }
}

#[tokio::test]
async fn changing_user_moves_day_listing() {
    for h in harnesses().await {
        let created = h.service.create_prescription(draft(DOCTOR, SLOT_A, PATIENT)).await.unwrap();
        h.service.update_prescription(created.id, draft(OTHER_DOCTOR, SLOT_A, PATIENT)).await.unwrap();

        let old_user = h.service.get_prescriptions_by_user_id_and_date(DOCTOR, day()).await.unwrap();
        assert!(old_user.is_empty());
        let new_user = h.service.get_prescriptions_by_user_id_and_date(OTHER_DOCTOR, day()).await.unwrap();
        assert_eq!(new_user.len(), 1);
        assert_eq!(new_user[0].id, created.id);
    }
}

#[tokio::test]
async fn shared_slot_stays_held_until_last_holder_is_deleted() {
    for h in harnesses().await {
        let first = h.service.create_prescription(draft(DOCTOR, SLOT_A, PATIENT)).await.unwrap();
        let second = h.service.create_prescription(draft(DOCTOR, SLOT_B, PATIENT)).await.unwrap();
        h.service.update_prescription(second.id, draft(DOCTOR, SLOT_A, PATIENT)).await.unwrap();

        h.service.delete_prescription(first.id).await.unwrap();
        assert!(h.store.exists_by_slot_id(SLOT_A).await.unwrap());
        let err = h.service.create_prescription(draft(DOCTOR, SLOT_A, PATIENT)).await.unwrap_err();
        assert!(matches!(err, PrescriptionError::DuplicatePrescription(SLOT_A)));

        h.service.delete_prescription(second.id).await.unwrap();
        assert!(!h.store.exists_by_slot_id(SLOT_A).await.unwrap());
        h.service.create_prescription(draft(DOCTOR, SLOT_A, PATIENT)).await.unwrap();
    }
}

#[tokio::test]
async fn delete_is_final() {
    for h in harnesses().await {
        let created = h.service.create_prescription(draft(DOCTOR, SLOT_A, PATIENT)).await.unwrap();
        h.service.delete_prescription(created.id).await.unwrap();

        let err = h.service.get_prescription_by_id(created.id).await.unwrap_err();
        assert!(matches!(err, PrescriptionError::PrescriptionNotFound(id) if id == created.id));
        let err = h.service.delete_prescription(created.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::PrescriptionNotFound);

        // The slot can be prescribed for again.
        h.service.create_prescription(draft(DOCTOR, SLOT_A, PATIENT)).await.unwrap();
    }
}

#[tokio::test]
async fn listing_by_user_and_date_filters_exactly() {
    for h in harnesses().await {
        assert!(h.service.get_all_prescriptions().await.unwrap().is_empty());

        let a = h.service.create_prescription(draft(DOCTOR, SLOT_A, PATIENT)).await.unwrap();
        let mut later = draft(DOCTOR, SLOT_B, PATIENT);
        later.date = day().succ_opt();
        h.service.create_prescription(later).await.unwrap();
        h.service.create_prescription(draft(OTHER_DOCTOR, SLOT_C, PATIENT)).await.unwrap();

        let found = h.service.get_prescriptions_by_user_id_and_date(DOCTOR, day()).await.unwrap();
        assert_eq!(found, vec![a]);

        let none = h
            .service
            .get_prescriptions_by_user_id_and_date(DOCTOR, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .await
            .unwrap();
        assert!(none.is_empty());
        assert_eq!(h.service.get_all_prescriptions().await.unwrap().len(), 3);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_on_one_slot_yield_one_record() {
    for h in harnesses().await {
        let service = Arc::new(h.service);
        let mut tasks = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            tasks.push(tokio::spawn(async move {
                service.create_prescription(draft(DOCTOR, SLOT_A, PATIENT)).await
            }));
        }
        let mut created = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => created += 1,
                Err(err) => assert_eq!(err.code(), ErrorCode::DuplicatePrescription),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(count(h.store.as_ref()).await, 1);
    }
}
