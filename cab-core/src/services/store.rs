use crate::error::Result;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Pretty JSON, UTF-8 as-is (serde_json never escapes non-ASCII).
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_atomic(path, json.as_bytes())?;
    debug!(path = %path.display(), "saved");
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

pub fn save_text(path: &Path, text: &str) -> Result<()> {
    write_atomic(path, text.as_bytes())
}

/// Removes every regular file directly inside `dir`. Returns how many went.
pub fn clear_directory(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut removed = 0usize;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}

pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&tmp, bytes)?;

    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&tmp, path)?;

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "out".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}
