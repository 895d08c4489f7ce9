//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned on-disk schema of a saved world state.
//! They are private to the infrastructure layer; the domain model in
//! `hakoniwa_core::world` never sees serde.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions (new optional fields)
//! - **PATCH (1.0.X)**: Backward-compatible fixes
//!
//! Only the major component is checked when loading.
//!
//! ### WorldState Version History
//! - **1.0.0**: Initial schema

mod world_state;

pub use world_state::{
    ArtifactReferenceV1_0_0, ConfigSnapshotV1_0_0, ManifestV1_0_0, REQUIRED_FIELDS,
    RuntimeStateV1_0_0, TurnRecordV1_0_0, WorldStateDTO, WorldStateV1_0_0,
};
