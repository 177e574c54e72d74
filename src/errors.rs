use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("yt-dlp not found on PATH or next to the executable")]
    ToolNotFound,

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("yt-dlp exited with {status}: {stderr}")]
    ToolFailed { status: ExitStatus, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, AppError>;
