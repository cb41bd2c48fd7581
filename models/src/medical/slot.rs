// models/src/medical/slot.rs

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::identifiers::EntityId;

/// Availability marker of a slot. Informational only: issuing a prescription
/// does not flip it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    #[default]
    Available,
    Booked,
}

/// A doctor's bookable appointment window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: EntityId,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Human readable label, e.g. "10:00 - 10:30".
    pub slot_range: String,
    #[serde(default)]
    pub status: SlotStatus,
    pub date: NaiveDate,
    pub doctor_id: EntityId,
}
