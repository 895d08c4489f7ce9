//! World state persistence.
//!
//! A save is a file pair: the canonical state file and `<path>.sha256` holding
//! the hex digest of its bytes. Each file is replaced atomically on its own,
//! but the pair is not: a crash between the two writes leaves a state file
//! whose side-file is missing or stale, which the next dry-run reports.

mod diagnose;
mod load;
mod save;

pub use diagnose::diagnose_mismatch;
pub use load::{DryRunReport, load_dry_run, load_world_state};
pub use save::{hash_path, save_world_state};
