//! Per-voice playback parameters
//!
//! The pool resets every voice to [`VoiceParams`] defaults when it is acquired and
//! pushes the whole parameter block to the backend through
//! [`Voice::apply_params`](crate::Voice::apply_params) whenever a setter changes it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Distance attenuation curve for spatialized voices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Rolloff {
    /// Inverse-distance falloff (natural sounding)
    #[default]
    Logarithmic,
    /// Linear falloff reaching silence at `max_distance`
    Linear,
}

/// Output routing target (mixer bus id understood by the backend)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputBus(pub u32);

/// Playback parameters for one voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceParams {
    /// Linear gain (default: 1.0, range: 0.0-1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Playback rate multiplier (default: 1.0)
    #[serde(default = "default_pitch")]
    pub pitch: f32,
    /// Restart the clip when it ends (default: false)
    #[serde(default)]
    pub looping: bool,
    /// Enable HRTF/spatializer processing (default: false)
    #[serde(default)]
    pub spatialize: bool,
    /// 0.0 = fully 2D, 1.0 = fully 3D (default: 0.0)
    #[serde(default)]
    pub spatial_blend: f32,
    /// Distance at which attenuation stops (default: 500.0)
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
    /// Attenuation curve (default: Logarithmic)
    #[serde(default)]
    pub rolloff: Rolloff,
    /// Output bus, `None` routes to the backend's master output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputBus>,
    /// World position of the emitter
    #[serde(skip)]
    pub position: Vec3,
}

fn default_volume() -> f32 {
    1.0
}
fn default_pitch() -> f32 {
    1.0
}
fn default_max_distance() -> f32 {
    500.0
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            pitch: default_pitch(),
            looping: false,
            spatialize: false,
            spatial_blend: 0.0,
            max_distance: default_max_distance(),
            rolloff: Rolloff::default(),
            output: None,
            position: Vec3::ZERO,
        }
    }
}

/// Reusable volume/pitch preset applied with
/// [`SoundInstance::apply_config`](crate::SoundInstance::apply_config).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    /// Linear gain (0.0-1.0)
    pub volume: f32,
    /// Base pitch multiplier
    pub pitch: f32,
    /// Random pitch offset applied on top of `pitch`, uniform in `[-variance, +variance]`
    pub pitch_variance: f32,
}

impl SoundConfig {
    pub const DEFAULT: Self = Self {
        volume: 1.0,
        pitch: 1.0,
        pitch_variance: 0.01,
    };
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_params_default() {
        let params = VoiceParams::default();
        assert_eq!(params.volume, 1.0);
        assert_eq!(params.pitch, 1.0);
        assert!(!params.looping);
        assert!(!params.spatialize);
        assert_eq!(params.spatial_blend, 0.0);
        assert_eq!(params.max_distance, 500.0);
        assert_eq!(params.rolloff, Rolloff::Logarithmic);
        assert_eq!(params.output, None);
    }

    #[test]
    fn test_voice_params_partial_toml() {
        let params: VoiceParams = toml::from_str("volume = 0.5\nrolloff = \"linear\"").unwrap();
        assert_eq!(params.volume, 0.5);
        assert_eq!(params.pitch, 1.0);
        assert_eq!(params.rolloff, Rolloff::Linear);
        assert_eq!(params.max_distance, 500.0);
    }

    #[test]
    fn test_sound_config_default() {
        let config = SoundConfig::default();
        assert_eq!(config.volume, 1.0);
        assert_eq!(config.pitch, 1.0);
        assert_eq!(config.pitch_variance, 0.01);
    }
}
