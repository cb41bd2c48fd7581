// models/src/medical/user.rs

use serde::{Deserialize, Serialize};

use crate::identifiers::EntityId;

/// An account holder, usually the issuing doctor. The engine references users
/// but never writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub role: String,
    // Already-hashed secret; opaque to everything in this workspace.
    pub credentials: String,
}
