//! World state domain model.
//!
//! These types are the validated in-memory form of a saved session. The
//! on-disk schema lives in the infrastructure crate's DTOs, which convert into
//! these types through the same constructors, so a decoded file is held to the
//! same invariants as a freshly built state.

mod artifact;
mod manifest;
mod runtime;
mod state;
mod turn;

pub use artifact::ArtifactReference;
pub use manifest::{CURRENT_SCHEMA_VERSION, Manifest, generate_session_id, is_compatible_schema};
pub use runtime::RuntimeState;
pub use state::WorldState;
pub use turn::TurnRecord;
