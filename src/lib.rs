//! Desktop front-end for yt-dlp: look up a video, pick codec families and a
//! resolution, then download merged or as separate video and audio files.

pub mod app;
pub mod codecs;
pub mod config;
pub mod download;
pub mod errors;
pub mod localizations;
pub mod metadata;
pub mod models;
pub mod session;
pub mod theme;
pub mod tool;
pub mod ui;
