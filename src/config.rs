//! Resize configuration.
//!
//! Settings are resolved in three layers, each overriding the one before:
//!
//! ```text
//! stock defaults  →  --config FILE  →  command-line flags
//! ```
//!
//! Every layer is a `toml::Value`; they are folded together with
//! [`merge_toml`] and only then deserialized into [`Settings`], so a config
//! file and the CLI share one validation path.
//!
//! ## Config File
//!
//! ```toml
//! # All keys are optional - defaults shown below
//!
//! side_length = 256          # Required somewhere: file or --length
//! output_extension = ".png"  # Leading "." is added if missing
//! stretch = false            # true = stretch, false = scale and pad
//! background_color = 127     # Pad intensity, or [r, g, b]
//! workers = 10               # Images processed at the same time
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Missing required option: {0}")]
    MissingOption(&'static str),
    #[error("Config validation error: {0}")]
    Validation(String),
}

pub const DEFAULT_EXTENSION: &str = ".png";
pub const DEFAULT_BACKGROUND: u8 = 127;
pub const DEFAULT_WORKERS: usize = 10;

/// How an image is brought to the target square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Resample straight to `side × side`, discarding the aspect ratio.
    Stretch,
    /// Scale to fit inside the square, then fill the rest with the pad colour.
    PadToSquare,
}

/// Border colour for [`ResizeMode::PadToSquare`].
///
/// Written as a bare intensity (`127`) or a channel triple (`[255, 0, 0]`) in
/// TOML, and as `127` or `255,0,0` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PadColor {
    Gray(u8),
    Rgb([u8; 3]),
}

impl PadColor {
    /// Colour for a three-channel image; a gray value is replicated.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            PadColor::Gray(v) => [v, v, v],
            PadColor::Rgb(c) => c,
        }
    }

    /// Intensity for a single-channel image (BT.601 luma for colours).
    pub fn luma(self) -> u8 {
        match self {
            PadColor::Gray(v) => v,
            PadColor::Rgb([r, g, b]) => {
                let y = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
                y.round().clamp(0.0, 255.0) as u8
            }
        }
    }

    fn to_toml(self) -> toml::Value {
        match self {
            PadColor::Gray(v) => toml::Value::Integer(v.into()),
            PadColor::Rgb(c) => {
                toml::Value::Array(c.iter().map(|&v| toml::Value::Integer(v.into())).collect())
            }
        }
    }
}

impl Default for PadColor {
    fn default() -> Self {
        PadColor::Gray(DEFAULT_BACKGROUND)
    }
}

impl fmt::Display for PadColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PadColor::Gray(v) => write!(f, "{v}"),
            PadColor::Rgb([r, g, b]) => write!(f, "{r},{g},{b}"),
        }
    }
}

impl FromStr for PadColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u8>()
                .map_err(|_| format!("'{}' is not an intensity in 0-255", part.trim()))
        };
        let parts: Vec<&str> = s.split(',').collect();
        match parts.as_slice() {
            [v] => Ok(PadColor::Gray(parse(v)?)),
            [r, g, b] => Ok(PadColor::Rgb([parse(r)?, parse(g)?, parse(b)?])),
            _ => Err(format!("expected V or R,G,B, got '{s}'")),
        }
    }
}

/// Raw settings as read from defaults, file and CLI.
///
/// Nothing here is checked yet; [`ResizeConfig::from_settings`] and
/// [`Settings::validate`] turn it into something the pipeline can trust.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Target square side in pixels. No default: must come from file or CLI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side_length: Option<u32>,
    /// Output format, chosen by extension.
    pub output_extension: String,
    /// Stretch instead of pad.
    pub stretch: bool,
    /// Pad colour used when not stretching.
    pub background_color: PadColor,
    /// Number of images processed concurrently.
    pub workers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            side_length: None,
            output_extension: DEFAULT_EXTENSION.to_string(),
            stretch: false,
            background_color: PadColor::default(),
            workers: DEFAULT_WORKERS,
        }
    }
}

impl Settings {
    /// Validate values that are independent of the resize itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.side_length {
            None => return Err(ConfigError::MissingOption("side_length (--length)")),
            Some(0) => {
                return Err(ConfigError::Validation(
                    "side_length must be a positive integer".into(),
                ));
            }
            Some(_) => {}
        }
        if self.output_extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Validation(
                "output_extension must not be empty".into(),
            ));
        }
        if self.workers == 0 {
            return Err(ConfigError::Validation("workers must be at least 1".into()));
        }
        Ok(())
    }
}

/// Command-line values layered over the file and the defaults.
///
/// `None` means "not given": the lower layer wins.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub side_length: Option<u32>,
    pub output_extension: Option<String>,
    pub stretch: Option<bool>,
    pub background_color: Option<PadColor>,
    pub workers: Option<usize>,
}

impl Overrides {
    /// Render the given flags as a sparse TOML table.
    pub fn to_toml(&self) -> toml::Value {
        let mut table = toml::map::Map::new();
        if let Some(n) = self.side_length {
            table.insert("side_length".into(), toml::Value::Integer(n.into()));
        }
        if let Some(ext) = &self.output_extension {
            table.insert("output_extension".into(), toml::Value::String(ext.clone()));
        }
        if let Some(stretch) = self.stretch {
            table.insert("stretch".into(), toml::Value::Boolean(stretch));
        }
        if let Some(color) = self.background_color {
            table.insert("background_color".into(), color.to_toml());
        }
        if let Some(n) = self.workers {
            let n = i64::try_from(n).unwrap_or(i64::MAX);
            table.insert("workers".into(), toml::Value::Integer(n));
        }
        toml::Value::Table(table)
    }
}

/// Immutable resize parameters shared by every task of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeConfig {
    pub side_length: u32,
    pub mode: ResizeMode,
    pub pad_color: PadColor,
    /// Always begins with ".".
    pub output_extension: String,
}

impl ResizeConfig {
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let side_length = settings
            .side_length
            .ok_or(ConfigError::MissingOption("side_length (--length)"))?;
        Ok(Self {
            side_length,
            mode: if settings.stretch {
                ResizeMode::Stretch
            } else {
                ResizeMode::PadToSquare
            },
            pad_color: settings.background_color,
            output_extension: normalize_extension(&settings.output_extension),
        })
    }
}

/// Make sure the extension includes the ".".
pub fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

// =============================================================================
// Config loading and merging
// =============================================================================

/// Returns the stock defaults as a `toml::Value::Table`, the base layer.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(Settings::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// The file was named explicitly, so a missing file is an error.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Fold the layers together and deserialize. Unknown keys are rejected here.
pub fn resolve_settings(layers: Vec<toml::Value>) -> Result<Settings, ConfigError> {
    let merged = layers
        .into_iter()
        .fold(stock_defaults_value()?, merge_toml);
    Ok(merged.try_into()?)
}

/// Resolve settings from an optional config file and CLI overrides.
pub fn load_settings(
    config_file: Option<&Path>,
    overrides: &Overrides,
) -> Result<Settings, ConfigError> {
    let mut layers = Vec::new();
    if let Some(path) = config_file {
        layers.push(load_raw_config(path)?);
    }
    layers.push(overrides.to_toml());
    let settings = resolve_settings(layers)?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings_with_side(side: u32) -> Settings {
        Settings {
            side_length: Some(side),
            ..Settings::default()
        }
    }

    // =========================================================================
    // PadColor
    // =========================================================================

    #[test]
    fn pad_color_parses_single_intensity() {
        assert_eq!("127".parse::<PadColor>(), Ok(PadColor::Gray(127)));
        assert_eq!(" 0 ".parse::<PadColor>(), Ok(PadColor::Gray(0)));
    }

    #[test]
    fn pad_color_parses_triple() {
        assert_eq!(
            "255, 0,16".parse::<PadColor>(),
            Ok(PadColor::Rgb([255, 0, 16]))
        );
    }

    #[test]
    fn pad_color_rejects_out_of_range_and_bad_arity() {
        assert!("256".parse::<PadColor>().is_err());
        assert!("-1".parse::<PadColor>().is_err());
        assert!("1,2".parse::<PadColor>().is_err());
        assert!("gray".parse::<PadColor>().is_err());
    }

    #[test]
    fn pad_color_gray_replicates_across_channels() {
        assert_eq!(PadColor::Gray(127).rgb(), [127, 127, 127]);
        assert_eq!(PadColor::Gray(127).luma(), 127);
    }

    #[test]
    fn pad_color_rgb_reduces_to_luma() {
        assert_eq!(PadColor::Rgb([255, 255, 255]).luma(), 255);
        assert_eq!(PadColor::Rgb([0, 0, 0]).luma(), 0);
        assert_eq!(PadColor::Rgb([255, 0, 0]).luma(), 76);
    }

    #[test]
    fn pad_color_display_roundtrips_through_from_str() {
        for color in [PadColor::Gray(9), PadColor::Rgb([1, 2, 3])] {
            assert_eq!(color.to_string().parse::<PadColor>(), Ok(color));
        }
    }

    // =========================================================================
    // Extension handling
    // =========================================================================

    #[test]
    fn extension_gets_leading_dot() {
        assert_eq!(normalize_extension("jpg"), ".jpg");
        assert_eq!(normalize_extension(".jpg"), ".jpg");
    }

    #[test]
    fn empty_extension_rejected() {
        let mut settings = settings_with_side(64);
        settings.output_extension = ".".into();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn missing_side_length_is_config_error() {
        let result = ResizeConfig::from_settings(&Settings::default());
        assert!(matches!(result, Err(ConfigError::MissingOption(_))));
    }

    #[test]
    fn zero_side_length_is_config_error() {
        let err = ResizeConfig::from_settings(&settings_with_side(0)).unwrap_err();
        assert!(err.to_string().contains("side_length"));
    }

    #[test]
    fn zero_workers_is_config_error() {
        let mut settings = settings_with_side(64);
        settings.workers = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn resize_config_defaults_to_pad_mode() {
        let config = ResizeConfig::from_settings(&settings_with_side(256)).unwrap();
        assert_eq!(config.side_length, 256);
        assert_eq!(config.mode, ResizeMode::PadToSquare);
        assert_eq!(config.pad_color, PadColor::Gray(127));
        assert_eq!(config.output_extension, ".png");
    }

    #[test]
    fn resize_config_stretch_and_normalized_extension() {
        let mut settings = settings_with_side(32);
        settings.stretch = true;
        settings.output_extension = "jpg".into();
        let config = ResizeConfig::from_settings(&settings).unwrap();
        assert_eq!(config.mode, ResizeMode::Stretch);
        assert_eq!(config.output_extension, ".jpg");
    }

    // =========================================================================
    // Layering
    // =========================================================================

    #[test]
    fn stock_defaults_omit_side_length() {
        let value = stock_defaults_value().unwrap();
        let table = value.as_table().unwrap();
        assert!(!table.contains_key("side_length"));
        assert_eq!(table["workers"].as_integer(), Some(10));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("workers = 10").unwrap();
        let overlay: toml::Value = toml::from_str("workers = 2").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["workers"].as_integer(), Some(2));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str("workers = 10\nstretch = true").unwrap();
        let overlay: toml::Value = toml::from_str("workers = 2").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["stretch"].as_bool(), Some(true));
    }

    #[test]
    fn cli_only_settings() {
        let overrides = Overrides {
            side_length: Some(128),
            background_color: Some(PadColor::Rgb([0, 0, 0])),
            ..Overrides::default()
        };
        let settings = load_settings(None, &overrides).unwrap();
        assert_eq!(settings.side_length, Some(128));
        assert_eq!(settings.background_color, PadColor::Rgb([0, 0, 0]));
        assert_eq!(settings.workers, 10);
        assert!(!settings.stretch);
    }

    #[test]
    fn file_values_are_overridden_by_cli() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("resquare.toml");
        fs::write(
            &path,
            r#"
side_length = 512
output_extension = "jpg"
background_color = [10, 20, 30]
workers = 4
"#,
        )
        .unwrap();

        let overrides = Overrides {
            side_length: Some(64),
            ..Overrides::default()
        };
        let settings = load_settings(Some(&path), &overrides).unwrap();
        assert_eq!(settings.side_length, Some(64));
        assert_eq!(settings.output_extension, "jpg");
        assert_eq!(settings.background_color, PadColor::Rgb([10, 20, 30]));
        assert_eq!(settings.workers, 4);
    }

    #[test]
    fn stretch_flag_overrides_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("resquare.toml");
        fs::write(&path, "side_length = 10\nstretch = false\n").unwrap();

        let overrides = Overrides {
            stretch: Some(true),
            ..Overrides::default()
        };
        let settings = load_settings(Some(&path), &overrides).unwrap();
        assert!(settings.stretch);
    }

    #[test]
    fn pad_flag_overrides_stretching_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("resquare.toml");
        fs::write(&path, "side_length = 10\nstretch = true\n").unwrap();

        let overrides = Overrides {
            stretch: Some(false),
            ..Overrides::default()
        };
        let settings = load_settings(Some(&path), &overrides).unwrap();
        assert!(!settings.stretch);
        let config = ResizeConfig::from_settings(&settings).unwrap();
        assert_eq!(config.mode, ResizeMode::PadToSquare);
    }

    #[test]
    fn absent_stretch_flag_keeps_file_value() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("resquare.toml");
        fs::write(&path, "side_length = 10\nstretch = true\n").unwrap();

        let settings = load_settings(Some(&path), &Overrides::default()).unwrap();
        assert!(settings.stretch);
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("resquare.toml");
        fs::write(&path, "side_length = 10\nsidelength = 20\n").unwrap();
        let result = load_settings(Some(&path), &Overrides::default());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("resquare.toml");
        fs::write(&path, "side_length = [").unwrap();
        let result = load_settings(Some(&path), &Overrides::default());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_settings(
            Some(&tmp.path().join("absent.toml")),
            &Overrides {
                side_length: Some(8),
                ..Overrides::default()
            },
        );
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn out_of_range_background_in_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("resquare.toml");
        fs::write(&path, "side_length = 10\nbackground_color = 300\n").unwrap();
        assert!(load_settings(Some(&path), &Overrides::default()).is_err());
    }
}
