//! Simulation errors
//!
//! These are invariant violations, not recoverable gameplay conditions. The
//! simulation stops on the first one.

use thiserror::Error;

use crate::sim::entity::{EntityId, EntityKind};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("arena full: capacity of {capacity} elements exceeded")]
    CapacityExceeded { capacity: usize },
    #[error("memory pool exhausted: requested {requested} bytes, {available} available")]
    PoolExhausted { requested: usize, available: usize },
    #[error("entity {id} has more than {capacity} simultaneous contacts")]
    ContactOverflow { id: EntityId, capacity: usize },
    #[error("entity id {id} is already live")]
    DuplicateId { id: EntityId },
    #[error("entity {id} not found")]
    MissingEntity { id: EntityId },
    #[error("no player entity")]
    MissingPlayer,
    #[error("no dimensions for {kind:?}: level gives no override and no base sprite size exists")]
    MissingDimensions { kind: EntityKind },
    #[error("sprite frame {frame:?} for {kind:?} is not in the asset set")]
    UnknownSprite { kind: EntityKind, frame: String },
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
