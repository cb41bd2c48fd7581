// lib/src/resolver.rs

use std::sync::Arc;

use models::errors::{PrescriptionError, PrescriptionResult, StoreError};
use models::{Entity, EntityId};

use crate::storage_engine::PrescriptionStore;

/// Turns foreign keys into loaded records, or into a kind-specific
/// `NotFound`. Read-only.
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn PrescriptionStore>,
}

impl Resolver {
    pub fn new(store: Arc<dyn PrescriptionStore>) -> Self {
        Self { store }
    }

    pub async fn resolve<E: Entity>(&self, id: EntityId) -> PrescriptionResult<E> {
        // Store ids are strictly positive.
        if id <= 0 {
            return Err(PrescriptionError::not_found(E::KIND, id));
        }
        let record = self
            .store
            .find_by_id(E::KIND, id)
            .await?
            .ok_or_else(|| PrescriptionError::not_found(E::KIND, id))?;
        E::from_record(record).map_err(|other| {
            PrescriptionError::StoreUnavailable(StoreError::Corrupt(format!(
                "lookup of {} {} returned a {}",
                E::KIND,
                id,
                other.kind()
            )))
        })
    }
}
