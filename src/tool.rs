//! Locating and launching the yt-dlp binary.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::errors::{AppError, Result};

#[cfg(windows)]
pub const TOOL_FILE_NAME: &str = "yt-dlp.exe";
#[cfg(not(windows))]
pub const TOOL_FILE_NAME: &str = "yt-dlp";

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Finds yt-dlp: an explicit override, then PATH, then the directory of
/// the running executable.
pub fn find_ytdlp(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        log::info!("Using configured yt-dlp: {}", path.display());
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = which::which("yt-dlp") {
        log::info!("Using yt-dlp from PATH: {}", path.display());
        return Ok(path);
    }

    let exe = std::env::current_exe()?;
    if let Some(bundled) = exe.parent().and_then(|dir| beside(dir)) {
        log::info!("Using bundled yt-dlp: {}", bundled.display());
        return Ok(bundled);
    }

    log::warn!("yt-dlp not found");
    Err(AppError::ToolNotFound)
}

fn beside(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(TOOL_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// A `Command` that never pops up a console window on Windows.
pub fn hidden_command(program: impl AsRef<OsStr>) -> Command {
    #[allow(unused_mut)]
    let mut command = Command::new(program);
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        command.creation_flags(CREATE_NO_WINDOW);
    }
    command
}

/// `<Videos>/Youtube`, falling back to `~/Videos/Youtube`.
pub fn default_download_dir() -> PathBuf {
    dirs::video_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Videos")))
        .unwrap_or_else(|| PathBuf::from("Videos"))
        .join("Youtube")
}
