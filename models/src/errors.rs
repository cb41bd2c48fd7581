// models/src/errors.rs

use std::io;

pub use thiserror::Error;

#[cfg(feature = "bincode-errors")]
use bincode::error::{DecodeError, EncodeError};

use crate::identifiers::{EntityId, EntityKind};

/// Failures raised by a storage engine.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Corrupt record: {0}")]
    Corrupt(String),
    /// The slot is already held by another prescription.
    #[error("slot {slot_id} is already bound to prescription {holder}")]
    SlotTaken { slot_id: EntityId, holder: EntityId },
    /// A record that was expected to exist vanished before the write.
    #[error("prescription {0} does not exist")]
    MissingRecord(EntityId),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[cfg(feature = "sled-errors")]
    #[error(transparent)]
    Sled(#[from] sled::Error),
    #[cfg(feature = "bincode-errors")]
    #[error(transparent)]
    BincodeDecode(#[from] DecodeError),
    #[cfg(feature = "bincode-errors")]
    #[error(transparent)]
    BincodeEncode(#[from] EncodeError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Every condition the lifecycle engine hands back to its caller.
#[derive(Debug, Error)]
pub enum PrescriptionError {
    #[error("{0}")]
    InvalidPrescription(String),
    #[error("{kind} with ID {id} not found.")]
    NotFound { kind: EntityKind, id: EntityId },
    #[error("Prescription with ID {0} not found.")]
    PrescriptionNotFound(EntityId),
    #[error("A prescription already exists for slot ID: {0}")]
    DuplicatePrescription(EntityId),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(StoreError),
}

pub type PrescriptionResult<T> = Result<T, PrescriptionError>;

impl From<StoreError> for PrescriptionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SlotTaken { slot_id, .. } => PrescriptionError::DuplicatePrescription(slot_id),
            StoreError::MissingRecord(id) => PrescriptionError::PrescriptionNotFound(id),
            other => PrescriptionError::StoreUnavailable(other),
        }
    }
}

/// Flat classification of [`PrescriptionError`], one value per failure kind.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorCode {
    InvalidPrescription,
    UserNotFound,
    SlotNotFound,
    PatientNotFound,
    PrescriptionNotFound,
    DuplicatePrescription,
    StoreUnavailable,
}

impl PrescriptionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PrescriptionError::InvalidPrescription(_) => ErrorCode::InvalidPrescription,
            PrescriptionError::NotFound { kind, .. } => match kind {
                EntityKind::User => ErrorCode::UserNotFound,
                EntityKind::Slot => ErrorCode::SlotNotFound,
                EntityKind::Patient => ErrorCode::PatientNotFound,
                EntityKind::Prescription => ErrorCode::PrescriptionNotFound,
            },
            PrescriptionError::PrescriptionNotFound(_) => ErrorCode::PrescriptionNotFound,
            PrescriptionError::DuplicatePrescription(_) => ErrorCode::DuplicatePrescription,
            PrescriptionError::StoreUnavailable(_) => ErrorCode::StoreUnavailable,
        }
    }

    pub fn not_found(kind: EntityKind, id: EntityId) -> Self {
        PrescriptionError::NotFound { kind, id }
    }
}
