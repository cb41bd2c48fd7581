// models/src/medical/patient.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::identifiers::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub mobile_no: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Government issued identity number.
    #[serde(default)]
    pub national_id: Option<i64>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub registered_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub role_id: Option<i32>,
    // Back-references are plain ids; the engine never follows them.
    #[serde(default)]
    pub user_id: Option<EntityId>,
    #[serde(default)]
    pub slot_id: Option<EntityId>,
}

impl Patient {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Patient {
            id,
            name: name.into(),
            mobile_no: None,
            email: None,
            national_id: None,
            age: None,
            registered_at: None,
            address: None,
            role_id: None,
            user_id: None,
            slot_id: None,
        }
    }
}
