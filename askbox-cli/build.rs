//! Stamps `ASKBOX_BUILD_SHA` for `askbox --version`.
//!
//! Order: an explicit `ASKBOX_BUILD_SHA` from the packager, the workspace git
//! HEAD, then the crate version for source tarballs without `.git`.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

fn git_head(workspace: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["rev-parse", "--short=10", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8(out.stdout).ok()?.trim().to_owned();
    (!sha.is_empty()).then_some(sha)
}

fn main() {
    println!("cargo:rerun-if-env-changed=ASKBOX_BUILD_SHA");

    let workspace = env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .and_then(|dir| dir.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from(".."));
    println!("cargo:rerun-if-changed={}", workspace.join(".git/HEAD").display());

    let stamp = env::var("ASKBOX_BUILD_SHA")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| git_head(&workspace))
        .unwrap_or_else(|| format!("v{}", env::var("CARGO_PKG_VERSION").unwrap_or_default()));

    println!("cargo:rustc-env=ASKBOX_BUILD_SHA={stamp}");
}
