//! Game settings
//!
//! Animation timing handed to the presenter. Stored as JSON next to the level
//! data; any missing field falls back to its default.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FADE_ANIMATION_TIME, DEFAULT_ROPE_ANIMATE_TIME};
use crate::easing::Easing;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds for one rope to grow to full length
    pub rope_animate_time: f32,
    /// Seconds for menu/game/error screen fades
    pub fade_animation_time: f32,
    /// Rope growth curve
    pub rope_ease: Easing,

    // === Accessibility ===
    /// Reduced motion (ropes and fades snap instead of animating)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rope_animate_time: DEFAULT_ROPE_ANIMATE_TIME,
            fade_animation_time: DEFAULT_FADE_ANIMATION_TIME,
            rope_ease: Easing::default(),
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse settings JSON, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Invalid settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Negative or non-finite durations become zero
    pub fn sanitized(mut self) -> Self {
        self.rope_animate_time = non_negative(self.rope_animate_time);
        self.fade_animation_time = non_negative(self.fade_animation_time);
        self
    }

    /// Rope duration actually used (respects reduced_motion)
    pub fn effective_rope_time(&self) -> f32 {
        if self.reduced_motion {
            0.0
        } else {
            self.rope_animate_time
        }
    }

    /// Fade duration actually used (respects reduced_motion)
    pub fn effective_fade_time(&self) -> f32 {
        if self.reduced_motion {
            0.0
        } else {
            self.fade_animation_time
        }
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
