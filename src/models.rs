use serde::{Deserialize, Deserializer};

/// Sentinel option shown at the end of every selector.
pub const BEST: &str = "best";

/// Any missing, `null` or mistyped field falls back to its default value
/// instead of failing the whole document.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

fn is_present(codec: &str) -> bool {
    !codec.is_empty() && codec != "none"
}

/// One entry of the `formats` array printed by `yt-dlp -j`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamVariant {
    #[serde(default, deserialize_with = "lenient")]
    pub format_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub vcodec: String,
    #[serde(default, deserialize_with = "lenient")]
    pub acodec: String,
    #[serde(default, deserialize_with = "lenient")]
    pub width: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub height: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub fps: f32,
    #[serde(default, deserialize_with = "lenient")]
    pub protocol: String,
    #[serde(default, deserialize_with = "lenient")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub vbr: f32,
    #[serde(default, deserialize_with = "lenient")]
    pub abr: f32,
    #[serde(default, deserialize_with = "lenient")]
    pub tbr: f32,
    #[serde(default, deserialize_with = "lenient")]
    pub asr: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub filesize: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub filesize_approx: u64,
    #[serde(default, rename = "ext", deserialize_with = "lenient")]
    pub extension: String,
    #[serde(default, deserialize_with = "lenient")]
    pub dynamic_range: String,
}

impl StreamVariant {
    pub fn has_video(&self) -> bool {
        is_present(&self.vcodec)
    }

    pub fn has_audio(&self) -> bool {
        is_present(&self.acodec)
    }
}

/// A single fetched video. Replaced wholesale on every lookup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VideoMetadata {
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub fulltitle: String,
    #[serde(default, deserialize_with = "lenient")]
    pub webpage_url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub formats: Vec<StreamVariant>,
}

impl VideoMetadata {
    pub fn thumbnail_url(&self) -> String {
        format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", self.id)
    }
}

/// What the user picked in the option panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSelection {
    pub video_codec: String,
    pub resolution: String,
    pub audio_codec: String,
    pub merge: bool,
    pub download_dir: String,
}

impl UserSelection {
    pub fn new(download_dir: impl Into<String>) -> Self {
        Self {
            video_codec: BEST.to_string(),
            resolution: BEST.to_string(),
            audio_codec: BEST.to_string(),
            merge: true,
            download_dir: download_dir.into(),
        }
    }
}

/// Which progress label a line of tool output belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sink {
    Primary,
    Audio,
}

/// Mutable UI state. Lives on the UI thread only.
#[derive(Default)]
pub struct AppState {
    pub url: String,
    pub selection: Option<UserSelection>,
    pub resolution_options: Vec<String>,
    pub is_fetching: bool,
    pub active_streams: usize,
    pub progress: String,
    pub audio_progress: String,
    pub show_progress: bool,
    pub show_audio_progress: bool,
}

impl AppState {
    pub fn is_downloading(&self) -> bool {
        self.active_streams > 0
    }

    pub fn sink_text(&mut self, sink: Sink) -> &mut String {
        match sink {
            Sink::Primary => &mut self.progress,
            Sink::Audio => &mut self.audio_progress,
        }
    }

    pub fn reset_progress(&mut self) {
        self.progress.clear();
        self.audio_progress.clear();
        self.show_progress = false;
        self.show_audio_progress = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn none_and_empty_codecs_are_absent() {
        let variant = StreamVariant {
            vcodec: "none".into(),
            acodec: String::new(),
            ..Default::default()
        };
        assert!(!variant.has_video());
        assert!(!variant.has_audio());
    }

    #[test]
    fn null_and_mistyped_fields_fall_back_to_defaults() {
        let json = r#"{
            "id": "abc",
            "fulltitle": 42,
            "formats": [{"vcodec": "avc1.64001f", "acodec": null, "width": null, "height": 720, "fps": "n/a"}]
        }"#;
        let video: VideoMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(video.id, "abc");
        assert_eq!(video.fulltitle, "");
        assert_eq!(video.formats[0].height, 720);
        assert_eq!(video.formats[0].width, 0);
        assert_eq!(video.formats[0].acodec, "");
        assert_eq!(video.formats[0].fps, 0.0);
    }

    #[test]
    fn thumbnail_url_uses_video_id() {
        let video = VideoMetadata {
            id: "rJNBGqiBI7s".into(),
            ..Default::default()
        };
        assert_eq!(
            video.thumbnail_url(),
            "https://img.youtube.com/vi/rJNBGqiBI7s/maxresdefault.jpg"
        );
    }

    #[test]
    fn new_selection_starts_on_best_and_merged() {
        let selection = UserSelection::new("/tmp/Videos/Youtube");
        assert_eq!(selection.video_codec, BEST);
        assert_eq!(selection.resolution, BEST);
        assert_eq!(selection.audio_codec, BEST);
        assert!(selection.merge);
    }
}
