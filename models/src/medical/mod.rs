// models/src/medical/mod.rs

pub mod patient;
pub mod prescription;
pub mod slot;
pub mod user;

pub use patient::Patient;
pub use prescription::{Prescription, PrescriptionDraft, RelationIds};
pub use slot::{Slot, SlotStatus};
pub use user::User;
