use std::{
    fs,
    io::{Cursor, Write},
    path::Path,
};

use anyhow::{Context, Result};
use zip::{ZipWriter, write::SimpleFileOptions};

/// Mode bits for the packaged script entry; the runtime needs it readable
/// and executable
const SCRIPT_ENTRY_MODE: u32 = 0o755;

/// Package the canary script into a single-entry in-memory zip archive.
/// The entry is named by the script's base filename, as the runtime expects.
pub fn package_script(path: &Path) -> Result<Vec<u8>> {
    let contents = fs::read(path)
        .with_context(|| format!("Failed to read canary script {}", path.display()))?;

    let entry_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Canary script path {} has no file name", path.display()))?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().unix_permissions(SCRIPT_ENTRY_MODE);
    writer
        .start_file(entry_name, options)
        .with_context(|| format!("Failed to add {entry_name} to the canary archive"))?;
    writer
        .write_all(&contents)
        .context("Failed to write canary script into archive")?;

    let cursor = writer
        .finish()
        .context("Failed to finalize canary archive")?;
    Ok(cursor.into_inner())
}
