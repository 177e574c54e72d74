//! Codec classification over the format list reported by yt-dlp.
//!
//! Raw codec identifiers such as `avc1.64001f` or `vp09.00.40.08` are grouped
//! into families ("H.264", "VP9") and each family gets a filter fragment for
//! yt-dlp's format selection syntax (`bestvideo[<fragment>]`).

use crate::models::{StreamVariant, BEST};

const VIDEO_PREFERENCE: [&str; 3] = ["AV1", "VP9", "H.264"];
const AUDIO_PREFERENCE: [&str; 4] = ["Dolby Digital Plus", "Dolby Digital", "OPUS", "AAC"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFamily {
    pub name: String,
    pub fragment: String,
    /// Distinct heights in order of first sight.
    pub heights: Vec<u32>,
    /// Width of the variant that contributed each height.
    pub widths: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFamily {
    pub name: String,
    pub fragment: String,
}

/// Families found in one video's formats, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecCatalog {
    video: Vec<VideoFamily>,
    audio: Vec<AudioFamily>,
}

impl CodecCatalog {
    pub fn video_families(&self) -> &[VideoFamily] {
        &self.video
    }

    pub fn audio_families(&self) -> &[AudioFamily] {
        &self.audio
    }

    pub fn video_family(&self, name: &str) -> Option<&VideoFamily> {
        self.video.iter().find(|family| family.name == name)
    }

    pub fn audio_family(&self, name: &str) -> Option<&AudioFamily> {
        self.audio.iter().find(|family| family.name == name)
    }

    /// Filter fragment for a video family, empty if the family is unknown.
    pub fn video_fragment(&self, name: &str) -> &str {
        self.video_family(name)
            .map(|family| family.fragment.as_str())
            .unwrap_or("")
    }

    /// Filter fragment for an audio family, empty if the family is unknown.
    pub fn audio_fragment(&self, name: &str) -> &str {
        self.audio_family(name)
            .map(|family| family.fragment.as_str())
            .unwrap_or("")
    }

    pub fn heights(&self, name: &str) -> Option<&[u32]> {
        self.video_family(name).map(|family| family.heights.as_slice())
    }

    pub fn widths(&self, name: &str) -> Option<&[u32]> {
        self.video_family(name).map(|family| family.widths.as_slice())
    }

    /// Video codec selector entries: every family followed by the sentinel.
    pub fn video_options(&self) -> Vec<String> {
        self.video
            .iter()
            .map(|family| family.name.clone())
            .chain(std::iter::once(BEST.to_string()))
            .collect()
    }

    /// Audio codec selector entries: every family followed by the sentinel.
    pub fn audio_options(&self) -> Vec<String> {
        self.audio
            .iter()
            .map(|family| family.name.clone())
            .chain(std::iter::once(BEST.to_string()))
            .collect()
    }

    fn record_video(&mut self, name: String, fragment: String, width: u32, height: u32) {
        let index = match self.video.iter().position(|family| family.name == name) {
            Some(index) => index,
            None => {
                self.video.push(VideoFamily {
                    name,
                    fragment,
                    heights: Vec::new(),
                    widths: Vec::new(),
                });
                self.video.len() - 1
            }
        };
        let family = &mut self.video[index];
        if !family.heights.contains(&height) {
            family.heights.push(height);
            family.widths.push(width);
        }
    }

    fn record_audio(&mut self, name: String, fragment: String) {
        if self.audio_family(&name).is_none() {
            self.audio.push(AudioFamily { name, fragment });
        }
    }
}

fn codec_token(codec: &str) -> &str {
    codec.split('.').next().unwrap_or(codec)
}

/// Maps a raw video codec token to its family name and filter fragment.
pub fn video_family_for(token: &str) -> (String, String) {
    match token {
        "av01" => ("AV1".to_string(), "vcodec*=av01".to_string()),
        "avc1" => ("H.264".to_string(), "vcodec*=avc1".to_string()),
        vp if vp.starts_with("vp") => {
            // vp09 and vp9 are the same codec
            let version = vp.chars().last().unwrap_or_default();
            (
                format!("VP{version}"),
                format!("vcodec~='^vp(0{version}|{version})'"),
            )
        }
        other => (other.to_uppercase(), format!("vcodec*={other}")),
    }
}

/// Maps a raw audio codec token to its family name and filter fragment.
pub fn audio_family_for(token: &str) -> (String, String) {
    let name = match token {
        "mp4a" => "AAC".to_string(),
        "ac-3" => "Dolby Digital".to_string(),
        "ec-3" => "Dolby Digital Plus".to_string(),
        other => other.to_uppercase(),
    };
    (name, format!("acodec*={token}"))
}

/// Groups video-only and audio-only variants into codec families.
///
/// Variants carrying both audio and video are skipped: yt-dlp offers split
/// streams for every quality that can be picked separately.
pub fn classify(formats: &[StreamVariant]) -> CodecCatalog {
    let mut catalog = CodecCatalog::default();

    for format in formats {
        match (format.has_video(), format.has_audio()) {
            (true, false) => {
                let (name, fragment) = video_family_for(codec_token(&format.vcodec));
                catalog.record_video(name, fragment, format.width, format.height);
            }
            (false, true) => {
                let (name, fragment) = audio_family_for(codec_token(&format.acodec));
                catalog.record_audio(name, fragment);
            }
            _ => {}
        }
    }

    log::debug!(
        "classified {} formats into {} video and {} audio families",
        formats.len(),
        catalog.video.len(),
        catalog.audio.len()
    );
    catalog
}

/// Resolution selector entries for a video codec choice.
///
/// Heights keep the order they were first seen in, followed by the sentinel.
/// For the sentinel only AV1, VP9 and H.264 are considered.
pub fn resolutions_for(choice: &str, catalog: &CodecCatalog) -> Vec<String> {
    let family = if choice == BEST {
        VIDEO_PREFERENCE
            .iter()
            .find_map(|name| catalog.video_family(name))
    } else {
        catalog.video_family(choice)
    };

    match family {
        Some(family) => family
            .heights
            .iter()
            .map(|height| height.to_string())
            .chain(std::iter::once(BEST.to_string()))
            .collect(),
        None => Vec::new(),
    }
}

/// Preferred video family: AV1, then VP9, then H.264. Empty if none exist.
pub fn best_video_family(catalog: &CodecCatalog) -> &'static str {
    VIDEO_PREFERENCE
        .iter()
        .copied()
        .find(|name| catalog.video_family(name).is_some())
        .unwrap_or("")
}

/// Preferred audio family: Dolby Digital Plus, Dolby Digital, Opus, AAC.
pub fn best_audio_family(catalog: &CodecCatalog) -> &'static str {
    AUDIO_PREFERENCE
        .iter()
        .copied()
        .find(|name| catalog.audio_family(name).is_some())
        .unwrap_or("")
}

/// The concrete height a resolution choice stands for.
///
/// The sentinel means the entry right before it in `options`, which is the
/// last height seen rather than the largest one.
pub fn resolve_resolution<'a>(options: &'a [String], selected: &'a str) -> &'a str {
    if selected != BEST {
        return selected;
    }
    match options.iter().position(|option| option == BEST) {
        Some(index) if index > 0 => options[index - 1].as_str(),
        _ => "",
    }
}
