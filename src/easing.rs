//! Rope ease curves
//!
//! The session only names a curve; presenters evaluate it while growing a rope.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Ease curve for rope growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    QuadIn,
    #[default]
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    SineIn,
    SineOut,
    SineInOut,
    /// Overshoots slightly, then settles
    BackOut,
    BounceOut,
}

impl Easing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Easing::Linear => "Linear",
            Easing::QuadIn => "QuadIn",
            Easing::QuadOut => "QuadOut",
            Easing::QuadInOut => "QuadInOut",
            Easing::CubicIn => "CubicIn",
            Easing::CubicOut => "CubicOut",
            Easing::CubicInOut => "CubicInOut",
            Easing::SineIn => "SineIn",
            Easing::SineOut => "SineOut",
            Easing::SineInOut => "SineInOut",
            Easing::BackOut => "BackOut",
            Easing::BounceOut => "BounceOut",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Some(Easing::Linear),
            "quadin" | "inquad" => Some(Easing::QuadIn),
            "quadout" | "outquad" => Some(Easing::QuadOut),
            "quadinout" | "inoutquad" => Some(Easing::QuadInOut),
            "cubicin" | "incubic" => Some(Easing::CubicIn),
            "cubicout" | "outcubic" => Some(Easing::CubicOut),
            "cubicinout" | "inoutcubic" => Some(Easing::CubicInOut),
            "sinein" | "insine" => Some(Easing::SineIn),
            "sineout" | "outsine" => Some(Easing::SineOut),
            "sineinout" | "inoutsine" => Some(Easing::SineInOut),
            "backout" | "outback" => Some(Easing::BackOut),
            "bounceout" | "outbounce" => Some(Easing::BounceOut),
            _ => None,
        }
    }

    /// Eased progress for `t` (clamped to [0, 1])
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,

            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }

            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }

            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,

            Easing::BackOut => {
                const OVERSHOOT: f32 = 1.70158;
                let u = t - 1.0;
                1.0 + (OVERSHOOT + 1.0) * u.powi(3) + OVERSHOOT * u.powi(2)
            }

            Easing::BounceOut => bounce_out(t),
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    let (shift, floor) = if t < 1.0 / D1 {
        (0.0, 0.0)
    } else if t < 2.0 / D1 {
        (1.5 / D1, 0.75)
    } else if t < 2.5 / D1 {
        (2.25 / D1, 0.9375)
    } else {
        (2.625 / D1, 0.984375)
    };
    let t = t - shift;
    N1 * t * t + floor
}
