//! Scene and page configuration.
//!
//! Every value has a built-in default. A page can override any subset by
//! embedding a JSON document in `<script id="scene-config" type="application/json">`.

use serde::Deserialize;

use crate::error::Result;

/// Element id of the optional JSON override block.
pub const CONFIG_ELEMENT_ID: &str = "scene-config";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub bloom: BloomConfig,
    pub black_hole: BlackHoleConfig,
    pub disk: DiskConfig,
    pub particles: ParticleConfig,
    pub stars: StarfieldConfig,
    pub popups: PopupConfig,
    pub audio: AudioConfig,
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 2.0, 6.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_zoom: bool,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            enable_zoom: true,
            auto_rotate: true,
            auto_rotate_speed: 0.5,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 1.5,
            max_distance: 60.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    pub strength: f32,
    pub radius: f32,
    /// Only pixels brighter than this glow.
    pub threshold: f32,
    pub exposure: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            strength: 2.0,
            radius: 0.4,
            threshold: 0.1,
            exposure: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlackHoleConfig {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for BlackHoleConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 64,
            height_segments: 64,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiskConfig {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub theta_segments: u32,
    pub phi_segments: u32,
    /// Planar UV remap divisor: `uv = xy / uv_scale + 0.5`.
    pub uv_scale: f32,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            inner_radius: 1.05,
            outer_radius: 3.8,
            theta_segments: 128,
            phi_segments: 1,
            uv_scale: 8.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    pub min_radius: f32,
    pub radial_spread: f32,
    pub thickness: f32,
    pub color: u32,
    pub size: f32,
    pub opacity: f32,
    /// Rotation rate about Y in radians per second.
    pub spin: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            min_radius: 2.5,
            radial_spread: 2.0,
            thickness: 0.2,
            color: 0x00ffff,
            size: 0.05,
            opacity: 0.8,
            spin: -0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub count: usize,
    /// Edge length of the cube the stars are scattered in.
    pub extent: f32,
    pub color: u32,
    pub size: f32,
    pub opacity: f32,
    pub spin: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 3000,
            extent: 200.0,
            color: 0x8888aa,
            size: 0.1,
            opacity: 0.5,
            spin: 0.02,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    pub max: u32,
    pub interval_ms: i32,
    pub lifetime_ms: i32,
    pub messages: Vec<String>,
    pub colors: Vec<String>,
    pub font_sizes: Vec<u32>,
    pub confetti: usize,
}

impl Default for PopupConfig {
    fn default() -> Self {
        let messages = [
            "Welcome to the event horizon",
            "Nothing escapes",
            "Spaghettification in progress",
            "Time is relative",
            "Hawking says hi",
            "Beyond the singularity",
            "Light bends here",
            "Gravity always wins",
            "Into the void",
            "Stay a while",
        ];
        let colors = [
            "#00ffff", "#cc00ff", "#ff66cc", "#66ffcc", "#ffffff", "#ffd166", "#7aa2ff",
        ];
        Self {
            max: 100,
            interval_ms: 150,
            lifetime_ms: 4000,
            messages: messages.iter().map(|m| m.to_string()).collect(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
            font_sizes: vec![14, 18, 22, 28, 36],
            confetti: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub element_id: String,
    pub volume: f64,
    pub looped: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            element_id: "bgm".into(),
            volume: 0.5,
            looped: true,
        }
    }
}

/// Split a packed `0xRRGGBB` color into linear `[r, g, b]` components.
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg.particles.count, 1000);
        assert_eq!(cfg.stars.count, 3000);
        assert_eq!(cfg.popups.max, 100);
        assert_eq!(cfg.camera.position, [0.0, 2.0, 6.0]);
        assert!((cfg.bloom.strength - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = Config::from_json(r#"{"popups": {"max": 10}, "bloom": {"threshold": 0.5}}"#)
            .unwrap();
        assert_eq!(cfg.popups.max, 10);
        assert_eq!(cfg.popups.interval_ms, 150);
        assert!((cfg.bloom.threshold - 0.5).abs() < f32::EPSILON);
        assert!((cfg.bloom.radius - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(Config::from_json("{\"popups\": 3").is_err());
        assert!(Config::from_json("{\"popups\": {\"max\": -1}}").is_err());
    }

    #[test]
    fn hex_colors_unpack() {
        assert_eq!(rgb(0x00ffff), [0.0, 1.0, 1.0]);
        let star = rgb(0x8888aa);
        assert!((star[0] - 136.0 / 255.0).abs() < 1e-6);
        assert!((star[2] - 170.0 / 255.0).abs() < 1e-6);
    }
}
