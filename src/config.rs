// Runtime configuration: window + gradient tunables.
// Loaded from an optional JSON file; every missing field falls back to the default look.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::gradient::{CENTER_COUNT, GradientParams};

/// A color written either as `[r, g, b]` floats in [0,1] or as `"#RRGGBB"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Triple([f32; 3]),
    Hex(String),
}

impl ColorValue {
    pub fn to_rgb(&self) -> Result<Vec3, Error> {
        match self {
            ColorValue::Triple([r, g, b]) => Ok(Vec3::new(*r, *g, *b)),
            ColorValue::Hex(s) => parse_hex(s),
        }
    }
}

impl From<Vec3> for ColorValue {
    fn from(c: Vec3) -> Self {
        ColorValue::Triple(c.to_array())
    }
}

/// `"#RRGGBB"` (leading `#` optional) -> channels in [0,1].
pub fn parse_hex(s: &str) -> Result<Vec3, Error> {
    let digits = s.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(Error::InvalidColor(s.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| Error::InvalidColor(s.to_string()))
    };
    Ok(Vec3::new(channel(0)?, channel(2)?, channel(4)?))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
    /// Buffer pixels per window pixel; clamped to (0, 2].
    pub render_scale: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "Liquid Gradient".to_string(), width: 960, height: 540, render_scale: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    pub colors: [ColorValue; CENTER_COUNT],
    pub speed: f32,
    pub intensity: f32,
    pub base_color: ColorValue,
    pub grain_intensity: f32,
    pub gradient_radius: f32,
    pub color_weights: [f32; 2],
}

impl Default for GradientConfig {
    fn default() -> Self {
        let p = GradientParams::default();
        Self {
            colors: p.colors.map(ColorValue::from),
            speed: p.speed,
            intensity: p.intensity,
            base_color: p.base_color.into(),
            grain_intensity: p.grain_intensity,
            gradient_radius: p.gradient_radius,
            color_weights: p.color_weights,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub gradient: GradientConfig,
    /// `S` writes the current frame to a PNG, `T` the trail raster.
    pub snapshot_key_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            gradient: GradientConfig::default(),
            snapshot_key_enabled: true,
        }
    }
}

impl Config {
    pub fn from_json(path: &Path, text: &str) -> Result<Self, Error> {
        serde_json::from_str(text)
            .map_err(|source| Error::ConfigParse { path: path.to_path_buf(), source })
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| Error::ConfigRead { path: path.to_path_buf(), source })?;
        Self::from_json(path, &text)
    }

    /// Config from the first CLI argument if given, defaults otherwise.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self, Error> {
        match args.nth(1) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn gradient_params(&self) -> Result<GradientParams, Error> {
        let g = &self.gradient;
        let mut colors = [Vec3::ZERO; CENTER_COUNT];
        for (dst, src) in colors.iter_mut().zip(g.colors.iter()) {
            *dst = src.to_rgb()?;
        }
        Ok(GradientParams {
            colors,
            speed: g.speed,
            intensity: g.intensity,
            base_color: g.base_color.to_rgb()?,
            grain_intensity: g.grain_intensity,
            gradient_radius: g.gradient_radius,
            color_weights: g.color_weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        let c = parse_hex("#F15A22").unwrap();
        assert!((c.x - 241.0 / 255.0).abs() < 1e-6);
        assert!((c.y - 90.0 / 255.0).abs() < 1e-6);
        assert!((c.z - 34.0 / 255.0).abs() < 1e-6);
        assert_eq!(parse_hex("000000").unwrap(), Vec3::ZERO);
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(matches!(parse_hex("#12345"), Err(Error::InvalidColor(_))));
        assert!(matches!(parse_hex("#GG0000"), Err(Error::InvalidColor(_))));
        assert!(matches!(parse_hex("#ééé"), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn defaults_round_into_default_params() {
        let params = Config::default().gradient_params().unwrap();
        assert_eq!(params, GradientParams::default());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r##"{
            "window": { "width": 320 },
            "gradient": { "speed": 2.0, "base_color": "#101010" }
        }"##;
        let cfg = Config::from_json(Path::new("inline.json"), json).unwrap();
        assert_eq!(cfg.window.width, 320);
        assert_eq!(cfg.window.height, 540);
        let params = cfg.gradient_params().unwrap();
        assert_eq!(params.speed, 2.0);
        assert!((params.base_color.x - 16.0 / 255.0).abs() < 1e-6);
        assert_eq!(params.colors, GradientParams::default().colors);
    }

    #[test]
    fn mixed_color_forms() {
        let json = r##"{ "gradient": { "colors": [
            "#030303", [0.0, 0.259, 0.22], "#F15A22", "#000000", "#F15A22", [0, 0, 0]
        ] } }"##;
        let cfg = Config::from_json(Path::new("inline.json"), json).unwrap();
        let params = cfg.gradient_params().unwrap();
        assert_eq!(params.colors[1], Vec3::new(0.0, 0.259, 0.22));
        assert_eq!(params.colors[5], Vec3::ZERO);
    }

    #[test]
    fn malformed_json_reports_path() {
        let err = Config::from_json(Path::new("broken.json"), "{ nope").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn no_args_means_defaults() {
        let cfg = Config::from_args(["liquid-gradient".to_string()].into_iter()).unwrap();
        assert_eq!(cfg, Config::default());
    }
}
