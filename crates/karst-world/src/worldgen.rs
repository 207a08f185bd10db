use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Tunable terrain generation knobs. All vertical levels are expressed as
/// ratios of world height so the same config works for any chunk height.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub height: Height,
    #[serde(default)]
    pub surface: Surface,
    #[serde(default)]
    pub water: Water,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            height: Height::default(),
            surface: Surface::default(),
            water: Water::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Height {
    /// Low-frequency fBm field for base elevation.
    #[serde(default = "default_base_freq")]
    pub base_frequency: f32,
    #[serde(default = "default_base_octaves")]
    pub base_octaves: i32,
    /// Ridged field for mountain chains.
    #[serde(default = "default_ridge_freq")]
    pub ridge_frequency: f32,
    #[serde(default = "default_ridge_octaves")]
    pub ridge_octaves: i32,
    /// Higher-frequency field for local roughness.
    #[serde(default = "default_detail_freq")]
    pub detail_frequency: f32,
    /// Exponent applied to the blended height sample; values above 1 bias
    /// toward plains with occasional peaks.
    #[serde(default = "default_shaping_exponent")]
    pub shaping_exponent: f32,
    #[serde(default = "default_min_y_ratio")]
    pub min_y_ratio: f32,
    #[serde(default = "default_max_y_ratio")]
    pub max_y_ratio: f32,
}

fn default_base_freq() -> f32 {
    0.008
}
fn default_base_octaves() -> i32 {
    5
}
fn default_ridge_freq() -> f32 {
    0.003
}
fn default_ridge_octaves() -> i32 {
    4
}
fn default_detail_freq() -> f32 {
    0.03
}
fn default_shaping_exponent() -> f32 {
    2.2
}
fn default_min_y_ratio() -> f32 {
    0.15
}
fn default_max_y_ratio() -> f32 {
    0.70
}

impl Default for Height {
    fn default() -> Self {
        Self {
            base_frequency: default_base_freq(),
            base_octaves: default_base_octaves(),
            ridge_frequency: default_ridge_freq(),
            ridge_octaves: default_ridge_octaves(),
            detail_frequency: default_detail_freq(),
            shaping_exponent: default_shaping_exponent(),
            min_y_ratio: default_min_y_ratio(),
            max_y_ratio: default_max_y_ratio(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Surface {
    /// Dirt band thickness under the surface block.
    #[serde(default = "default_topsoil")]
    pub topsoil_thickness: i32,
    /// Above this ratio the subsoil turns to stone ("mountain" terrain).
    #[serde(default = "default_mountain_ratio")]
    pub mountain_ratio: f32,
    /// Above this ratio surface blocks are snow instead of grass.
    #[serde(default = "default_peak_ratio")]
    pub peak_ratio: f32,
}

fn default_topsoil() -> i32 {
    3
}
fn default_mountain_ratio() -> f32 {
    0.45
}
fn default_peak_ratio() -> f32 {
    0.58
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            topsoil_thickness: default_topsoil(),
            mountain_ratio: default_mountain_ratio(),
            peak_ratio: default_peak_ratio(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Water {
    #[serde(default = "default_water_ratio")]
    pub level_ratio: f32,
}

fn default_water_ratio() -> f32 {
    0.25
}

impl Default for Water {
    fn default() -> Self {
        Self {
            level_ratio: default_water_ratio(),
        }
    }
}

impl WorldGenConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
