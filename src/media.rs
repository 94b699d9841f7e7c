//! Media device descriptions used to evaluate media-dependent styling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ConfigError;

/// The media type a document is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    All,
    #[default]
    Print,
    Screen,
    Speech,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::All => "all",
            MediaType::Print => "print",
            MediaType::Screen => "screen",
            MediaType::Speech => "speech",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(MediaType::All),
            "print" => Ok(MediaType::Print),
            "screen" => Ok(MediaType::Screen),
            "speech" => Ok(MediaType::Speech),
            other => Err(ConfigError::InvalidValue(format!(
                "unknown media type '{}'",
                other
            ))),
        }
    }
}

/// Orientation derived from the viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Evaluation context for conditional (media-dependent) styling rules.
///
/// Dimensions are in CSS pixels; `0.0` means "unknown". Values are carried as
/// given, nothing is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaDeviceDescription {
    pub media_type: MediaType,
    pub width: f32,
    pub height: f32,
    /// Resolution in dots per inch.
    pub resolution: f32,
    /// Bits per color component, `0` for a monochrome device.
    pub color_depth: u32,
    /// Bits per pixel on a monochrome device, `0` otherwise.
    pub monochrome: u32,
    pub grid: bool,
    pub scan: Option<String>,
}

impl Default for MediaDeviceDescription {
    fn default() -> Self {
        MediaDeviceDescription {
            media_type: MediaType::default(),
            width: 0.0,
            height: 0.0,
            resolution: 300.0,
            color_depth: 8,
            monochrome: 0,
            grid: false,
            scan: None,
        }
    }
}

impl MediaDeviceDescription {
    pub fn new(media_type: MediaType) -> Self {
        MediaDeviceDescription {
            media_type,
            ..Default::default()
        }
    }

    /// The description used by the pipeline when none was configured: print media.
    pub fn create_default() -> Self {
        Self::new(MediaType::Print)
    }

    pub fn set_media_type(&mut self, media_type: MediaType) -> &mut Self {
        self.media_type = media_type;
        self
    }

    pub fn set_width(&mut self, width: f32) -> &mut Self {
        self.width = width;
        self
    }

    pub fn set_height(&mut self, height: f32) -> &mut Self {
        self.height = height;
        self
    }

    pub fn set_resolution(&mut self, resolution: f32) -> &mut Self {
        self.resolution = resolution;
        self
    }

    pub fn set_color_depth(&mut self, color_depth: u32) -> &mut Self {
        self.color_depth = color_depth;
        self
    }

    pub fn set_monochrome(&mut self, monochrome: u32) -> &mut Self {
        self.monochrome = monochrome;
        self
    }

    pub fn set_grid(&mut self, grid: bool) -> &mut Self {
        self.grid = grid;
        self
    }

    pub fn set_scan(&mut self, scan: Option<String>) -> &mut Self {
        self.scan = scan;
        self
    }

    /// Portrait unless the viewport is strictly wider than it is tall.
    pub fn orientation(&self) -> Orientation {
        if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Whether this device matches a media query type list entry.
    pub fn matches_media_type(&self, media_type: MediaType) -> bool {
        media_type == MediaType::All || self.media_type == media_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_print() {
        let media = MediaDeviceDescription::create_default();
        assert_eq!(media.media_type, MediaType::Print);
        assert!(media.matches_media_type(MediaType::All));
        assert!(media.matches_media_type(MediaType::Print));
        assert!(!media.matches_media_type(MediaType::Screen));
    }

    #[test]
    fn test_chained_setters_and_orientation() {
        let mut media = MediaDeviceDescription::new(MediaType::Screen);
        media.set_width(1024.0).set_height(768.0).set_grid(true);
        assert_eq!(media.orientation(), Orientation::Landscape);
        assert!(media.grid);

        media.set_height(2048.0);
        assert_eq!(media.orientation(), Orientation::Portrait);
    }

    #[test]
    fn test_media_type_parsing() {
        assert_eq!("Screen".parse::<MediaType>().unwrap(), MediaType::Screen);
        assert_eq!(" all ".parse::<MediaType>().unwrap(), MediaType::All);
        assert!(matches!(
            "tv".parse::<MediaType>(),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_deserialize_partial_description() {
        let media: MediaDeviceDescription =
            serde_json::from_str(r#"{"media_type": "screen", "width": 800}"#).unwrap();
        assert_eq!(media.media_type, MediaType::Screen);
        assert_eq!(media.width, 800.0);
        assert_eq!(media.resolution, 300.0);
    }
}
