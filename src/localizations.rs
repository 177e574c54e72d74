use std::collections::HashMap;

use i18n_embed::DesktopLanguageRequester;
use unic_langid::{langid, LanguageIdentifier};

// Simple in-memory translations
#[derive(Default)]
pub struct Translations {
    strings: HashMap<&'static str, &'static str>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &'static str, value: &'static str) {
        self.strings.insert(key, value);
    }

    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.strings.get(key).copied()
    }
}

pub struct Localizations {
    translations: HashMap<LanguageIdentifier, Translations>,
    current_lang: LanguageIdentifier,
}

impl Default for Localizations {
    fn default() -> Self {
        Self::new(None)
    }
}

fn english() -> Translations {
    let mut en = Translations::new();
    en.insert("app-title", "Youtube Media Downloader");
    en.insert("url-placeholder", "URL");
    en.insert("get-video", "Get Video");
    en.insert("loading", "Loading..");
    en.insert("video-settings", "Video Settings:");
    en.insert("audio-settings", "Audio Settings:");
    en.insert("codec", "Codec:");
    en.insert("resolution", "Resolution:");
    en.insert("best-option", "BEST");
    en.insert("merge", "Merge video and audio");
    en.insert("download-folder", "Download folder:");
    en.insert("browse-button", "Browse...");
    en.insert("download-button", "Download");
    en.insert("download-finished", "Download Finished!");
    en.insert("no-thumbnail", "No thumbnail");
    en
}

fn spanish() -> Translations {
    let mut es = Translations::new();
    es.insert("app-title", "Descargador de medios de Youtube");
    es.insert("url-placeholder", "URL");
    es.insert("get-video", "Obtener video");
    es.insert("loading", "Cargando..");
    es.insert("video-settings", "Ajustes de video:");
    es.insert("audio-settings", "Ajustes de audio:");
    es.insert("codec", "Códec:");
    es.insert("resolution", "Resolución:");
    es.insert("best-option", "MEJOR");
    es.insert("merge", "Unir video y audio");
    es.insert("download-folder", "Carpeta de descarga:");
    es.insert("browse-button", "Examinar...");
    es.insert("download-button", "Descargar");
    es.insert("download-finished", "¡Descarga completada!");
    es.insert("no-thumbnail", "Sin miniatura");
    es
}

impl Localizations {
    /// `preferred` is a language tag like `es-ES`; the desktop locale is
    /// asked when it is `None` or unparsable.
    pub fn new(preferred: Option<&str>) -> Self {
        let mut translations = HashMap::new();
        translations.insert(langid!("en-US"), english());
        translations.insert(langid!("es-ES"), spanish());

        let mut localizer = Self {
            translations,
            current_lang: langid!("en-US"),
        };

        let requested: Vec<LanguageIdentifier> = match preferred.and_then(|tag| tag.parse().ok()) {
            Some(lang) => vec![lang],
            None => DesktopLanguageRequester::requested_languages(),
        };
        if let Some(lang) = requested.iter().find(|lang| localizer.supports(lang)) {
            localizer.select(lang);
        }
        log::debug!("UI language: {}", localizer.current_lang);

        localizer
    }

    fn supports(&self, lang: &LanguageIdentifier) -> bool {
        self.translations
            .keys()
            .any(|known| known.language == lang.language)
    }

    pub fn current_language(&self) -> &LanguageIdentifier {
        &self.current_lang
    }

    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.translations
            .get(&self.current_lang)
            .and_then(|t| t.lookup(key))
            .or_else(|| {
                // Fallback to English if the current language doesn't have the key
                self.translations
                    .get(&langid!("en-US"))
                    .and_then(|t| t.lookup(key))
            })
    }

    /// Like `lookup`, but shows the key itself when nothing matches.
    pub fn text(&self, key: &str) -> String {
        self.lookup(key).unwrap_or(key).to_string()
    }

    pub fn select(&mut self, lang: &LanguageIdentifier) {
        // Try exact match first, then language code only
        if self.translations.contains_key(lang) {
            self.current_lang = lang.clone();
            return;
        }
        if let Some(known) = self
            .translations
            .keys()
            .find(|known| known.language == lang.language)
        {
            self.current_lang = known.clone();
            return;
        }
        self.current_lang = langid!("en-US");
    }
}
