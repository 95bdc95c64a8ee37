// I/O utilities for reading audio files

use std::path::Path;

use tracing::trace;

/// Load a whole file into memory.
///
/// This is the only blocking step of a read; all parsing afterwards works on
/// the returned buffer.
pub fn load_file(path: &Path) -> std::io::Result<Vec<u8>> {
    let bytes = std::fs::read(path)?;
    trace!(path = %path.display(), len = bytes.len(), "Loaded file");
    Ok(bytes)
}
