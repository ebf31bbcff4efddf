//! Floating text popups and the confetti burst shown once the show starts.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::PopupConfig;

const FALLBACK_COLOR: &str = "#ffffff";
const FALLBACK_FONT_PX: u32 = 20;
const CONFETTI_COLORS: [&str; 6] = ["#00ffff", "#cc00ff", "#ff66cc", "#ffd166", "#66ffcc", "#ffffff"];

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub text: String,
    pub color: String,
    pub font_px: u32,
    /// Horizontal position in viewport percent.
    pub left: f32,
    /// Vertical position in viewport percent.
    pub top: f32,
    pub tilt_deg: f32,
    pub duration_ms: i32,
}

/// Outcome of one timer tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub popup: Option<Popup>,
    /// The timer must be cleared after this tick.
    pub stop: bool,
}

/// Bounded popup source: at most `max` popups over its lifetime.
#[derive(Debug, Clone)]
pub struct PopupSpawner {
    cfg: PopupConfig,
    count: u32,
}

impl PopupSpawner {
    pub fn new(cfg: PopupConfig) -> Self {
        Self { cfg, count: 0 }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn max(&self) -> u32 {
        self.cfg.max
    }

    pub fn interval_ms(&self) -> i32 {
        self.cfg.interval_ms
    }

    /// Once true the spawn timer should be cleared.
    pub fn is_exhausted(&self) -> bool {
        self.count >= self.cfg.max || self.cfg.messages.is_empty()
    }

    pub fn spawn<R: Rng>(&mut self, rng: &mut R) -> Option<Popup> {
        if self.is_exhausted() {
            return None;
        }
        let text = self.cfg.messages.choose(rng)?.clone();
        self.count += 1;
        Some(Popup {
            text,
            color: self
                .cfg
                .colors
                .choose(rng)
                .map_or_else(|| FALLBACK_COLOR.to_string(), Clone::clone),
            font_px: self.cfg.font_sizes.choose(rng).copied().unwrap_or(FALLBACK_FONT_PX),
            left: rng.gen_range(5.0..90.0),
            top: rng.gen_range(5.0..90.0),
            tilt_deg: rng.gen_range(-12.0..12.0),
            duration_ms: self.cfg.lifetime_ms,
        })
    }

    /// One interval step: spawn if allowed, then report whether to stop.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> Tick {
        let popup = self.spawn(rng);
        Tick {
            popup,
            stop: self.is_exhausted(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    /// Start position in viewport percent.
    pub left: f32,
    /// Horizontal drift over the fall, in viewport-width percent.
    pub drift: f32,
    pub spin_deg: f32,
    pub fall_ms: u32,
    pub delay_ms: u32,
    pub width_px: u32,
    pub height_px: u32,
    pub color: &'static str,
}

pub fn confetti_burst<R: Rng>(rng: &mut R, pieces: usize) -> Vec<ConfettiPiece> {
    (0..pieces)
        .map(|_| ConfettiPiece {
            left: rng.gen_range(0.0..100.0),
            drift: rng.gen_range(-15.0..15.0),
            spin_deg: rng.gen_range(360.0..1080.0) * if rng.gen() { 1.0 } else { -1.0 },
            fall_ms: rng.gen_range(2500..5000),
            delay_ms: rng.gen_range(0..800),
            width_px: rng.gen_range(6..12),
            height_px: rng.gen_range(8..18),
            color: CONFETTI_COLORS[rng.gen_range(0..CONFETTI_COLORS.len())],
        })
        .collect()
}

/// First-trigger-wins latch for starting music and popups.
#[derive(Debug, Default, Clone)]
pub struct StartGate {
    started: bool,
}

impl StartGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// True only for the call that starts the show.
    pub fn trigger(&mut self) -> bool {
        !std::mem::replace(&mut self.started, true)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}
