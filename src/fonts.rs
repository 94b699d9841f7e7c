//! Font selection during layout.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_FONT_FAMILY: &str = "Helvetica";
pub const NORMAL_WEIGHT: u16 = 400;
pub const BOLD_WEIGHT: u16 = 700;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// What the layout asks for: family, style, weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontCharacteristics {
    pub family: String,
    pub style: FontStyle,
    pub weight: u16,
}

impl FontCharacteristics {
    pub fn new(family: &str) -> Self {
        FontCharacteristics {
            family: family.to_string(),
            style: FontStyle::Normal,
            weight: NORMAL_WEIGHT,
        }
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }
}

/// A usable font resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontInfo {
    pub family: String,
    #[serde(default)]
    pub style: FontStyle,
    #[serde(default = "default_weight")]
    pub weight: u16,
    /// Font program location; `None` for built-in fonts.
    #[serde(default)]
    pub source: Option<PathBuf>,
}

fn default_weight() -> u16 {
    NORMAL_WEIGHT
}

impl FontInfo {
    pub fn builtin(family: &str, style: FontStyle, weight: u16) -> Self {
        FontInfo {
            family: family.to_string(),
            style,
            weight,
            source: None,
        }
    }
}

/// Resolves font requests to font resources.
pub trait FontProvider: fmt::Debug + Send + Sync {
    /// Best match for `request`, or `None` when nothing usable is registered.
    fn get_font(&self, request: &FontCharacteristics) -> Option<FontInfo>;

    /// Family used when a requested family is unavailable.
    fn default_font_family(&self) -> &str;
}

/// In-memory font provider.
///
/// Matches the family case-insensitively, prefers the requested style, then the
/// nearest weight. Requests for unknown families fall back to the default family.
#[derive(Debug, Clone)]
pub struct BasicFontProvider {
    fonts: Vec<FontInfo>,
    default_family: String,
}

impl Default for BasicFontProvider {
    fn default() -> Self {
        let mut provider = Self::empty(DEFAULT_FONT_FAMILY);
        for (style, weight) in [
            (FontStyle::Normal, NORMAL_WEIGHT),
            (FontStyle::Normal, BOLD_WEIGHT),
            (FontStyle::Oblique, NORMAL_WEIGHT),
            (FontStyle::Oblique, BOLD_WEIGHT),
        ] {
            provider.add_font(FontInfo::builtin(DEFAULT_FONT_FAMILY, style, weight));
        }
        provider
    }
}

impl BasicFontProvider {
    /// A provider with no fonts registered.
    pub fn empty(default_family: &str) -> Self {
        BasicFontProvider {
            fonts: Vec::new(),
            default_family: default_family.to_string(),
        }
    }

    pub fn add_font(&mut self, font: FontInfo) -> &mut Self {
        self.fonts.push(font);
        self
    }

    pub fn fonts(&self) -> &[FontInfo] {
        &self.fonts
    }

    fn best_in_family(&self, family: &str, request: &FontCharacteristics) -> Option<&FontInfo> {
        self.fonts
            .iter()
            .filter(|f| f.family.eq_ignore_ascii_case(family))
            .min_by_key(|f| {
                let style_penalty = u32::from(f.style != request.style);
                let weight_distance = u32::from(f.weight.abs_diff(request.weight));
                (style_penalty, weight_distance)
            })
    }
}

impl FontProvider for BasicFontProvider {
    fn get_font(&self, request: &FontCharacteristics) -> Option<FontInfo> {
        if let Some(font) = self.best_in_family(&request.family, request) {
            return Some(font.clone());
        }
        debug!(
            "Font family '{}' not registered, falling back to '{}'",
            request.family, self.default_family
        );
        self.best_in_family(&self.default_family, request).cloned()
    }

    fn default_font_family(&self) -> &str {
        &self.default_family
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_with_serif() -> BasicFontProvider {
        let mut provider = BasicFontProvider::default();
        provider
            .add_font(FontInfo {
                family: "Noto Serif".to_string(),
                style: FontStyle::Normal,
                weight: 400,
                source: Some(PathBuf::from("fonts/NotoSerif-Regular.ttf")),
            })
            .add_font(FontInfo {
                family: "Noto Serif".to_string(),
                style: FontStyle::Italic,
                weight: 700,
                source: Some(PathBuf::from("fonts/NotoSerif-BoldItalic.ttf")),
            });
        provider
    }

    #[test]
    fn test_family_match_is_case_insensitive() {
        let provider = provider_with_serif();
        let font = provider
            .get_font(&FontCharacteristics::new("noto serif"))
            .unwrap();
        assert_eq!(font.family, "Noto Serif");
        assert_eq!(font.weight, 400);
    }

    #[test]
    fn test_style_wins_over_weight() {
        let provider = provider_with_serif();
        let font = provider
            .get_font(&FontCharacteristics::new("Noto Serif").with_style(FontStyle::Italic))
            .unwrap();
        assert_eq!(font.style, FontStyle::Italic);
        assert_eq!(font.weight, 700);
    }

    #[test]
    fn test_nearest_weight() {
        let provider = BasicFontProvider::default();
        let font = provider
            .get_font(&FontCharacteristics::new(DEFAULT_FONT_FAMILY).with_weight(600))
            .unwrap();
        assert_eq!(font.weight, BOLD_WEIGHT);
    }

    #[test]
    fn test_unknown_family_falls_back_to_default() {
        let provider = BasicFontProvider::default();
        let font = provider
            .get_font(&FontCharacteristics::new("Comic Sans MS"))
            .unwrap();
        assert_eq!(font.family, DEFAULT_FONT_FAMILY);
        assert_eq!(provider.default_font_family(), DEFAULT_FONT_FAMILY);
    }

    #[test]
    fn test_empty_provider_resolves_nothing() {
        let provider = BasicFontProvider::empty("Times");
        assert!(provider.get_font(&FontCharacteristics::new("Times")).is_none());
        assert!(provider.fonts().is_empty());
    }
}
