//! `yt-dlp -j` lookups and thumbnail loading.

use std::path::Path;
use std::process::Stdio;

use bytes::Bytes;

use crate::codecs::{self, CodecCatalog};
use crate::errors::{AppError, Result};
use crate::models::VideoMetadata;
use crate::tool::hidden_command;

/// Decoded RGBA thumbnail, ready to be turned into a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub size: [usize; 2],
    pub rgba: Vec<u8>,
}

/// Everything a successful lookup produces.
#[derive(Debug)]
pub struct FetchedVideo {
    pub video: VideoMetadata,
    pub catalog: CodecCatalog,
    pub thumbnail: Option<Thumbnail>,
}

/// Decodes the JSON document. Malformed input yields an empty value.
pub fn parse_metadata(json: &[u8]) -> VideoMetadata {
    match serde_json::from_slice(json) {
        Ok(video) => video,
        Err(e) => {
            log::warn!("could not decode yt-dlp metadata: {}", e);
            VideoMetadata::default()
        }
    }
}

/// Runs `<tool> -j <url>` and parses its output.
pub fn fetch_metadata(tool: &Path, url: &str) -> Result<VideoMetadata> {
    log::info!("fetching metadata for {}", url);

    let output = hidden_command(tool)
        .arg("-j")
        .arg(url)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| AppError::Spawn {
            program: tool.display().to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        log::error!("metadata lookup failed: {}", stderr);
        return Err(AppError::ToolFailed {
            status: output.status,
            stderr,
        });
    }

    Ok(parse_metadata(&output.stdout))
}

pub fn decode_thumbnail(bytes: &[u8]) -> Result<Thumbnail> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(Thumbnail {
        size,
        rgba: image.into_raw(),
    })
}

fn download_bytes(url: &str) -> Result<Bytes> {
    Ok(reqwest::blocking::get(url)?.bytes()?)
}

/// Fetches and decodes a thumbnail. Any failure just means no image.
pub fn fetch_thumbnail(url: &str) -> Option<Thumbnail> {
    match download_bytes(url).and_then(|bytes| decode_thumbnail(&bytes)) {
        Ok(thumbnail) => Some(thumbnail),
        Err(e) => {
            log::debug!("no thumbnail from {}: {}", url, e);
            None
        }
    }
}

/// Metadata, codec catalog and thumbnail for one URL.
pub fn fetch_video(tool: &Path, url: &str) -> Result<FetchedVideo> {
    let video = fetch_metadata(tool, url)?;
    let catalog = codecs::classify(&video.formats);
    let thumbnail = fetch_thumbnail(&video.thumbnail_url());

    log::info!(
        "found \"{}\" with {} formats",
        video.fulltitle,
        video.formats.len()
    );
    Ok(FetchedVideo {
        video,
        catalog,
        thumbnail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn malformed_json_gives_empty_metadata() {
        assert_eq!(parse_metadata(b"{\"id\": \"abc\", "), VideoMetadata::default());
        assert_eq!(parse_metadata(b""), VideoMetadata::default());
    }

    #[test]
    fn parses_the_fields_yt_dlp_prints() {
        let json = br#"{
            "id": "dQw4w9WgXcQ",
            "fulltitle": "Some title",
            "webpage_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "duration": 212,
            "formats": [
                {"format_id": "140", "vcodec": "none", "acodec": "mp4a.40.2", "ext": "m4a",
                 "abr": 129.5, "asr": 44100, "width": null, "height": null, "filesize": 3433514},
                {"format_id": "137", "vcodec": "avc1.640028", "acodec": "none", "ext": "mp4",
                 "width": 1920, "height": 1080, "fps": 25, "dynamic_range": "SDR", "filesize": null}
            ]
        }"#;
        let video = parse_metadata(json);
        assert_eq!(video.id, "dQw4w9WgXcQ");
        assert_eq!(video.formats.len(), 2);
        assert_eq!(video.formats[0].asr, 44100);
        assert_eq!(video.formats[0].extension, "m4a");
        assert_eq!(video.formats[1].height, 1080);
        assert_eq!(video.formats[1].fps, 25.0);
        assert_eq!(video.formats[1].filesize, 0);
        assert_eq!(video.formats[1].dynamic_range, "SDR");
    }

    #[test]
    fn garbage_image_bytes_fail_to_decode() {
        assert!(decode_thumbnail(b"not a jpeg").is_err());
    }

    #[test]
    fn missing_tool_is_a_spawn_error() {
        let err = fetch_metadata(Path::new("/definitely/not/yt-dlp"), "https://example.com")
            .unwrap_err();
        assert!(matches!(err, AppError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_reported() {
        let err = fetch_metadata(Path::new("false"), "nope").unwrap_err();
        assert!(matches!(err, AppError::ToolFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn tool_output_is_parsed() {
        // `echo -j <url>` prints "-j <url>", which is not JSON
        let video = fetch_metadata(Path::new("echo"), "https://youtu.be/x").unwrap();
        assert_eq!(video, VideoMetadata::default());
    }
}
