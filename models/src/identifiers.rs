// models/src/identifiers.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::medical::{Patient, Slot, User};

/// Store-assigned numeric identifier shared by every entity kind.
pub type EntityId = i64;

/// Placeholder id carried by a prescription that has not been persisted yet.
pub const UNASSIGNED_ID: EntityId = 0;

/// The kinds of records the store knows about.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum EntityKind {
    User,
    Slot,
    Patient,
    Prescription,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::User => "User",
            EntityKind::Slot => "Slot",
            EntityKind::Patient => "Patient",
            EntityKind::Prescription => "Prescription",
        };
        f.write_str(name)
    }
}

/// A reference stub inside a draft. Only the id is read; everything else is
/// loaded from the store during resolution.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityRef {
    #[serde(default, alias = "userId", alias = "slotId", alias = "patientId")]
    pub id: Option<EntityId>,
}

impl EntityRef {
    pub fn new(id: EntityId) -> Self {
        Self { id: Some(id) }
    }
}

/// A referenced record as handed out by the store's generic lookup.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum EntityRecord {
    User(User),
    Slot(Slot),
    Patient(Patient),
}

impl EntityRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRecord::User(_) => EntityKind::User,
            EntityRecord::Slot(_) => EntityKind::Slot,
            EntityRecord::Patient(_) => EntityKind::Patient,
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            EntityRecord::User(user) => user.id,
            EntityRecord::Slot(slot) => slot.id,
            EntityRecord::Patient(patient) => patient.id,
        }
    }
}

/// Implemented by every record a prescription can point at.
pub trait Entity: Sized {
    const KIND: EntityKind;

    fn id(&self) -> EntityId;

    /// Unwraps the record if it is of this kind, handing it back otherwise.
    fn from_record(record: EntityRecord) -> Result<Self, EntityRecord>;

    fn into_record(self) -> EntityRecord;
}

macro_rules! impl_entity {
    ($ty:ident) => {
        impl Entity for $ty {
            const KIND: EntityKind = EntityKind::$ty;

            fn id(&self) -> EntityId {
                self.id
            }

            fn from_record(record: EntityRecord) -> Result<Self, EntityRecord> {
                match record {
                    EntityRecord::$ty(inner) => Ok(inner),
                    other => Err(other),
                }
            }

            fn into_record(self) -> EntityRecord {
                EntityRecord::$ty(self)
            }
        }

        impl From<$ty> for EntityRecord {
            fn from(value: $ty) -> Self {
                value.into_record()
            }
        }
    };
}

impl_entity!(User);
impl_entity!(Slot);
impl_entity!(Patient);
