//! Platform-specific directories for logs and episode recordings.
use std::path::PathBuf;

use directories::ProjectDirs;

fn project() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "playtest")
}

/// Where the client's own tracing output goes.
///
/// `~/.cache/playtest/logs` on Linux, `/tmp/playtest/logs` when no home
/// directory is known.
pub fn log_dir() -> PathBuf {
    project()
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/playtest"))
        .join("logs")
}

/// Default root for episode recordings, one subdirectory per session.
pub fn recordings_dir() -> PathBuf {
    project()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./recordings"))
        .join("sessions")
}

/// `session_<unix seconds>`.
pub fn new_session_id() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!("session_{secs}")
}
