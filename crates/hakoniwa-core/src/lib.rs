//! Domain layer for HAKONIWA sessions.
//!
//! - [`world`]: the persisted world state and its invariants
//! - [`matcher`]: resolution of free-text object references
//! - [`config`]: runtime configuration
//! - [`retry`]: per-turn retry budget

pub mod config;
pub mod error;
pub mod matcher;
pub mod retry;
pub mod world;

pub use error::{HakoniwaError, Result};
