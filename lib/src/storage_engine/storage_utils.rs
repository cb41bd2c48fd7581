// lib/src/storage_engine/storage_utils.rs

use bincode::config::{self, BigEndian, Configuration, Fixint};
use bincode::serde::{decode_from_slice, encode_to_vec};
use chrono::{Datelike, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Serialize;

use models::errors::StoreResult;
use models::EntityId;

/// Standard bincode configuration for every stored value.
pub fn bincode_config() -> Configuration<BigEndian, Fixint> {
    config::standard()
        .with_big_endian()
        .with_fixed_int_encoding()
}

pub fn serialize<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
    Ok(encode_to_vec(value, bincode_config())?)
}

pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    let (value, _) = decode_from_slice(bytes, bincode_config())?;
    Ok(value)
}

/// Big-endian so that tree order matches numeric order for positive ids.
pub fn id_key(id: EntityId) -> [u8; 8] {
    id.to_be_bytes()
}

pub fn id_from_key(key: &[u8]) -> Option<EntityId> {
    let bytes: [u8; 8] = key.try_into().ok()?;
    Some(EntityId::from_be_bytes(bytes))
}

/// Key of the user/date index: user id followed by the day number.
pub fn user_date_key(user_id: EntityId, date: NaiveDate) -> [u8; 12] {
    let mut key = [0u8; 12];
    key[..8].copy_from_slice(&user_id.to_be_bytes());
    key[8..].copy_from_slice(&date.num_days_from_ce().to_be_bytes());
    key
}
