use crate::codec;
use crate::dto::WorldStateDTO;
use crate::storage::AtomicFile;
use hakoniwa_core::error::Result;
use hakoniwa_core::world::WorldState;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Path of the digest side-file: `<path>.sha256`.
pub fn hash_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".sha256");
    PathBuf::from(name)
}

/// Saves a world state and its digest side-file.
///
/// # Arguments
///
/// * `state` - The world state to persist
/// * `path` - Destination of the state file; parent directories are created
///
/// # Returns
///
/// The lowercase hex SHA-256 of the written state file.
pub fn save_world_state(state: &WorldState, path: &Path) -> Result<String> {
    let dto = WorldStateDTO::from(state);
    let text = codec::encode(&dto)?;
    let hash = codec::compute_hash(text.as_bytes());

    AtomicFile::new(path).write(text.as_bytes())?;
    AtomicFile::new(hash_path(path)).write(hash.as_bytes())?;

    tracing::debug!(
        "Saved world state {} ({} turns) to {:?}",
        state.manifest().session_id(),
        state.turn_count(),
        path
    );
    Ok(hash)
}
