//! Language, text direction and color theme, plus the localized message
//! catalog used for every user-facing string.

use crate::{
    error::{Result, RimagenError},
    store::Preferences,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[serde(rename = "ar")]
    Arabic,
    #[default]
    #[serde(rename = "en")]
    English,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
        }
    }

    pub fn direction(&self) -> TextDirection {
        match self {
            Language::Arabic => TextDirection::Rtl,
            Language::English => TextDirection::Ltr,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Language::Arabic => Language::English,
            Language::English => Language::Arabic,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = RimagenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ar" | "arabic" => Ok(Language::Arabic),
            "en" | "english" => Ok(Language::English),
            other => Err(RimagenError::ValidationError(format!(
                "Unknown language: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = RimagenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(RimagenError::ValidationError(format!(
                "Unknown theme: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    InvalidApiKey,
    EmptyPrompt,
    PromptTooLong,
    MissingApiKey,
    AllServicesUnavailable,
    Generating,
    GenerationSucceeded,
    GenerationFailed,
    AlreadyGenerating,
    ResetDone,
    LinkCopied,
    ImageDownloaded,
    DownloadFailed,
    NoImage,
    HistoryCleared,
    ThemeChanged,
    LanguageChanged,
}

impl MessageKey {
    pub fn text(&self, language: Language) -> &'static str {
        match language {
            Language::English => self.english(),
            Language::Arabic => self.arabic(),
        }
    }

    fn english(&self) -> &'static str {
        match self {
            MessageKey::InvalidApiKey => "Invalid API key format",
            MessageKey::EmptyPrompt => "Please enter a description for the image",
            MessageKey::PromptTooLong => "The description is too long (500 characters maximum)",
            MessageKey::MissingApiKey => "Please enter your API key",
            MessageKey::AllServicesUnavailable => {
                "All image services are currently unavailable. Please try again later"
            }
            MessageKey::Generating => "Generating your image...",
            MessageKey::GenerationSucceeded => "Image generated successfully!",
            MessageKey::GenerationFailed => "Image generation failed",
            MessageKey::AlreadyGenerating => "An image is already being generated",
            MessageKey::ResetDone => "Ready for a new image",
            MessageKey::LinkCopied => "Image link copied",
            MessageKey::ImageDownloaded => "Image downloaded",
            MessageKey::DownloadFailed => "Could not download the image",
            MessageKey::NoImage => "There is no image yet",
            MessageKey::HistoryCleared => "History cleared",
            MessageKey::ThemeChanged => "Theme changed",
            MessageKey::LanguageChanged => "Language changed",
        }
    }

    fn arabic(&self) -> &'static str {
        match self {
            MessageKey::InvalidApiKey => "صيغة مفتاح API غير صحيحة",
            MessageKey::EmptyPrompt => "يرجى إدخال وصف للصورة",
            MessageKey::PromptTooLong => "الوصف طويل جداً (الحد الأقصى 500 حرف)",
            MessageKey::MissingApiKey => "يرجى إدخال مفتاح API",
            MessageKey::AllServicesUnavailable => {
                "جميع خدمات توليد الصور غير متاحة حالياً. يرجى المحاولة لاحقاً"
            }
            MessageKey::Generating => "جاري توليد الصورة...",
            MessageKey::GenerationSucceeded => "تم توليد الصورة بنجاح!",
            MessageKey::GenerationFailed => "فشل توليد الصورة",
            MessageKey::AlreadyGenerating => "جاري توليد صورة بالفعل",
            MessageKey::ResetDone => "جاهز لصورة جديدة",
            MessageKey::LinkCopied => "تم نسخ رابط الصورة",
            MessageKey::ImageDownloaded => "تم تحميل الصورة",
            MessageKey::DownloadFailed => "تعذر تحميل الصورة",
            MessageKey::NoImage => "لا توجد صورة بعد",
            MessageKey::HistoryCleared => "تم مسح السجل",
            MessageKey::ThemeChanged => "تم تغيير المظهر",
            MessageKey::LanguageChanged => "تم تغيير اللغة",
        }
    }
}

/// What a front end needs to render the page chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appearance {
    pub language: Language,
    pub direction: TextDirection,
    pub theme: Theme,
}

impl Default for Appearance {
    fn default() -> Self {
        Self::new(Language::default(), Theme::default())
    }
}

impl Appearance {
    pub fn new(language: Language, theme: Theme) -> Self {
        Self {
            language,
            direction: language.direction(),
            theme,
        }
    }
}

/// Applies language and theme choices and persists them.
pub struct AppearanceController {
    appearance: Appearance,
}

impl AppearanceController {
    /// Restores the persisted choices, falling back to English/light.
    pub fn load(prefs: &Preferences) -> Self {
        let language = prefs.language().unwrap_or_default();
        let theme = prefs.theme().unwrap_or_default();
        Self {
            appearance: Appearance::new(language, theme),
        }
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    pub fn language(&self) -> Language {
        self.appearance.language
    }

    pub fn theme(&self) -> Theme {
        self.appearance.theme
    }

    pub fn set_language(&mut self, prefs: &Preferences, language: Language) -> Result<()> {
        self.appearance = Appearance::new(language, self.appearance.theme);
        prefs.set_language(language)?;
        log::debug!(
            "Language set to {} ({})",
            language,
            language.direction().as_str()
        );
        Ok(())
    }

    pub fn set_theme(&mut self, prefs: &Preferences, theme: Theme) -> Result<()> {
        self.appearance.theme = theme;
        prefs.set_theme(theme)?;
        log::debug!("Theme set to {}", theme);
        Ok(())
    }

    pub fn toggle_language(&mut self, prefs: &Preferences) -> Result<Language> {
        let next = self.appearance.language.toggled();
        self.set_language(prefs, next)?;
        Ok(next)
    }

    pub fn toggle_theme(&mut self, prefs: &Preferences) -> Result<Theme> {
        let next = self.appearance.theme.toggled();
        self.set_theme(prefs, next)?;
        Ok(next)
    }
}
