//! Where the demo keeps its settings and log.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::debug;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "overlay", "overlay-demo")
}

/// `settings.json` in the platform config dir
/// (`~/.config/overlay-demo` on Linux).
pub fn settings_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("settings.json"))
}

/// `latest.log` in the platform cache dir, created if missing.
/// None when there is no home directory or the dir cannot be created.
pub fn log_file() -> Option<PathBuf> {
    let dir = project_dirs()?.cache_dir().to_path_buf();
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join("latest.log"))
}

/// Move the last run's log next to `latest` as `previous.log`, replacing
/// the one before it.
pub fn keep_previous_log(latest: &Path) {
    if !latest.exists() {
        return;
    }
    let previous = latest.with_file_name("previous.log");
    if let Err(e) = fs::rename(latest, &previous) {
        debug!("[paths] could not keep {}: {}", latest.display(), e);
    }
}
