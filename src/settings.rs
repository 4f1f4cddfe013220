//! Simulation settings and presets
//!
//! Loaded from an optional JSON file. Any key left out falls back to
//! [`Settings::default`]. Rotation speeds are given in degrees here and
//! converted to radians once, when the frame is built.

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::sim::{BodyTemplate, ReflectSpace, RotatingFrame};

/// Named starting configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Small square, steady spin, lossless bounces
    Classic,
    /// Large pulsating square, pointer-driven spin, damped bounces
    #[default]
    Quantum,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Classic => "Classic",
            Preset::Quantum => "Quantum",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Preset::Classic),
            "quantum" => Some(Preset::Quantum),
            _ => None,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Square ===
    pub center: DVec2,
    /// Half side length (before pulsation)
    pub half_extent: f64,
    /// Degrees per unit time with no input
    pub rotation_speed_deg: f64,
    /// Extra degrees per unit time per unit of spin input
    pub spin_gain_deg: f64,
    /// Pointer distance that maps to one unit of spin input
    pub pointer_span: f64,
    /// Half-extent pulsation amplitude (0 disables pulsation)
    pub pulse_amplitude: f64,
    /// Pulsation phase advance per unit time (radians)
    pub pulse_rate: f64,

    // === Balls ===
    pub ball_count: u32,
    pub ball_radius: f64,
    pub launch_velocity: DVec2,
    /// Launch direction is rotated by a random angle in ±this many degrees
    pub launch_spread_deg: f64,
    /// Speed multiplier after each bounce, in (0, 1]
    pub damping: f64,
    pub reflect_space: ReflectSpace,

    // === Run ===
    pub seed: u64,
    pub dt: f64,
    pub ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            center: DVec2::new(SQUARE_CENTER.0, SQUARE_CENTER.1),
            half_extent: SQUARE_HALF_EXTENT,
            rotation_speed_deg: ROTATION_SPEED_DEG,
            spin_gain_deg: 0.0,
            pointer_span: POINTER_SPAN,
            pulse_amplitude: 0.0,
            pulse_rate: 0.0,

            ball_count: 1,
            ball_radius: BALL_RADIUS,
            launch_velocity: DVec2::new(BALL_START_VELOCITY.0, BALL_START_VELOCITY.1),
            launch_spread_deg: 0.0,
            damping: DEFAULT_DAMPING,
            reflect_space: ReflectSpace::Global,

            seed: 0,
            dt: SIM_DT,
            ticks: 900,
        }
    }
}

impl Settings {
    /// Create settings from a preset
    pub fn from_preset(preset: Preset) -> Self {
        let defaults = Self::default();
        match preset {
            Preset::Classic => Self {
                center: DVec2::new(400.0, 300.0),
                half_extent: 100.0,
                rotation_speed_deg: 0.5,
                launch_velocity: DVec2::new(5.0, 5.0),
                ..defaults
            },
            Preset::Quantum => Self {
                half_extent: 250.0,
                rotation_speed_deg: 0.2,
                spin_gain_deg: 0.3,
                pulse_amplitude: 5.0,
                pulse_rate: 0.05,
                ball_radius: 25.0,
                launch_velocity: DVec2::new(5.0, 4.0),
                launch_spread_deg: LAUNCH_SPREAD_DEG,
                damping: 0.98,
                ..defaults
            },
        }
    }

    /// Load settings from a JSON file and validate them
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that cannot produce a valid simulation
    pub fn validate(&self) -> Result<(), SimError> {
        for (name, value) in [
            ("center.x", self.center.x),
            ("center.y", self.center.y),
            ("rotation_speed_deg", self.rotation_speed_deg),
            ("spin_gain_deg", self.spin_gain_deg),
            ("pointer_span", self.pointer_span),
            ("pulse_rate", self.pulse_rate),
            ("launch_velocity.x", self.launch_velocity.x),
            ("launch_velocity.y", self.launch_velocity.y),
            ("launch_spread_deg", self.launch_spread_deg),
        ] {
            if !value.is_finite() {
                return invalid(name, value, "finite");
            }
        }
        if !(self.half_extent.is_finite() && self.half_extent > 0.0) {
            return invalid("half_extent", self.half_extent, "finite and > 0");
        }
        if !(self.ball_radius.is_finite() && self.ball_radius > 0.0) {
            return invalid("ball_radius", self.ball_radius, "finite and > 0");
        }
        if !(self.pulse_amplitude >= 0.0 && self.pulse_amplitude < self.half_extent) {
            return invalid(
                "pulse_amplitude",
                self.pulse_amplitude,
                "0 <= amplitude < half_extent",
            );
        }
        if self.half_extent - self.pulse_amplitude < self.ball_radius {
            return Err(SimError::BodyDoesNotFit {
                radius: self.ball_radius,
                half_extent: self.half_extent - self.pulse_amplitude,
            });
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return invalid("damping", self.damping, "0 < damping <= 1");
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return invalid("dt", self.dt, "finite and > 0");
        }
        Ok(())
    }

    /// Build the square (degrees → radians happens here)
    pub fn build_frame(&self) -> Result<RotatingFrame, SimError> {
        let frame = RotatingFrame::new(self.center, self.half_extent)?
            .with_rotation_speed(self.rotation_speed_deg.to_radians())?
            .with_input_gain(self.spin_gain_deg.to_radians())?;
        if self.pulse_amplitude > 0.0 {
            frame.with_pulsation(self.pulse_amplitude, self.pulse_rate)
        } else {
            Ok(frame)
        }
    }

    /// Template for spawning balls
    pub fn body_template(&self) -> BodyTemplate {
        BodyTemplate {
            radius: self.ball_radius,
            launch_velocity: self.launch_velocity,
            launch_spread: self.launch_spread_deg.to_radians(),
            damping: self.damping,
            reflect_space: self.reflect_space,
        }
    }

    /// Convert a pointer x-coordinate into spin input for this square
    pub fn spin_input_from_pointer(&self, pointer_x: f64) -> f64 {
        crate::pointer_influence(self.center.x, pointer_x, self.pointer_span)
    }
}

fn invalid(name: &'static str, value: f64, expected: &'static str) -> Result<(), SimError> {
    Err(SimError::InvalidParameter {
        name,
        value,
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names() {
        assert_eq!(Preset::from_str("CLASSIC"), Some(Preset::Classic));
        assert_eq!(Preset::from_str("quantum"), Some(Preset::Quantum));
        assert_eq!(Preset::from_str("wobbly"), None);
        assert_eq!(Preset::Quantum.as_str(), "Quantum");
    }

    #[test]
    fn test_defaults_and_presets_validate() {
        assert!(Settings::default().validate().is_ok());
        assert!(Settings::from_preset(Preset::Classic).validate().is_ok());
        assert!(Settings::from_preset(Preset::Quantum).validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let settings = Settings::from_json(r#"{ "half_extent": 300.0, "damping": 0.9 }"#).unwrap();
        assert_eq!(settings.half_extent, 300.0);
        assert_eq!(settings.damping, 0.9);
        assert_eq!(settings.ball_radius, BALL_RADIUS);
        assert_eq!(settings.reflect_space, ReflectSpace::Global);
    }

    #[test]
    fn test_json_reflect_space_and_center() {
        let settings =
            Settings::from_json(r#"{ "center": [10.0, 20.0], "reflect_space": "Local" }"#).unwrap();
        assert_eq!(settings.center, DVec2::new(10.0, 20.0));
        assert_eq!(settings.reflect_space, ReflectSpace::Local);
    }

    #[test]
    fn test_rejects_ball_that_cannot_fit_pulsation_trough() {
        let settings = Settings {
            half_extent: 30.0,
            pulse_amplitude: 12.0,
            ball_radius: 20.0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SimError::BodyDoesNotFit { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad = [
            Settings {
                damping: 0.0,
                ..Settings::default()
            },
            Settings {
                dt: -1.0,
                ..Settings::default()
            },
            Settings {
                pulse_amplitude: 250.0,
                ..Settings::default()
            },
            Settings {
                rotation_speed_deg: f64::NAN,
                ..Settings::default()
            },
        ];
        for settings in bad {
            assert!(settings.validate().is_err());
        }
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SimError::SettingsParse(_))
        ));
    }

    #[test]
    fn test_build_frame_converts_degrees_once() {
        let settings = Settings {
            rotation_speed_deg: 90.0,
            ..Settings::default()
        };
        let mut frame = settings.build_frame().unwrap();
        frame.update(1.0, None);
        assert!((frame.angle() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_spin_input_from_pointer() {
        let settings = Settings::from_preset(Preset::Quantum);
        assert!((settings.spin_input_from_pointer(100.0) - 0.5).abs() < 1e-12);
    }
}
