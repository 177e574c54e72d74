//! Startup settings: defaults plus environment overrides.

use std::env;
use std::path::PathBuf;

use crate::tool;

pub const ENV_YTDLP: &str = "YTDL_GUI_YTDLP";
pub const ENV_DOWNLOAD_DIR: &str = "YTDL_GUI_DOWNLOAD_DIR";
pub const ENV_LANG: &str = "YTDL_GUI_LANG";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Explicit yt-dlp binary. Discovery runs when unset.
    pub ytdlp_path: Option<PathBuf>,
    pub download_dir: PathBuf,
    /// Language tag such as `es-ES`. Desktop locale is used when unset.
    pub language: Option<String>,
    pub window_size: [f32; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            download_dir: tool::default_download_dir(),
            language: None,
            window_size: [800.0, 500.0],
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Empty values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut settings = Self::default();

        if let Some(path) = get(ENV_YTDLP) {
            settings.ytdlp_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = get(ENV_DOWNLOAD_DIR) {
            settings.download_dir = PathBuf::from(dir);
        }
        settings.language = get(ENV_LANG);

        log::debug!("settings: {:?}", settings);
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_point_into_youtube_folder() {
        let settings = Settings::default();
        assert!(settings.download_dir.ends_with("Youtube"));
        assert!(settings.ytdlp_path.is_none());
        assert_eq!(settings.window_size, [800.0, 500.0]);
    }

    #[test]
    fn overrides_are_read_and_blank_values_skipped() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_YTDLP, "/opt/bin/yt-dlp"),
            (ENV_DOWNLOAD_DIR, "  "),
            (ENV_LANG, "es-ES"),
        ]);
        let settings = Settings::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(settings.ytdlp_path, Some(PathBuf::from("/opt/bin/yt-dlp")));
        assert_eq!(settings.download_dir, tool::default_download_dir());
        assert_eq!(settings.language.as_deref(), Some("es-ES"));
    }
}
