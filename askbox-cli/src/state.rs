use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Data directory: `$ASKBOX_HOME`, else `~/.askbox`.
pub fn askbox_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("ASKBOX_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".askbox"))
}

pub fn ensure_askbox_home() -> Result<PathBuf> {
    let dir = askbox_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Key/value blobs written by the chat session (history, welcome flag).
pub fn store_path() -> Result<PathBuf> {
    Ok(ensure_askbox_home()?.join("store.json"))
}

/// Imported knowledge base, loaded at startup when present.
pub fn knowledge_path() -> Result<PathBuf> {
    Ok(ensure_askbox_home()?.join("knowledge.json"))
}

pub fn log_path() -> Result<PathBuf> {
    Ok(ensure_askbox_home()?.join("askbox.log"))
}
