//! Parameter setters for a live sound
//!
//! Obtained from [`SoundPool::instance`](crate::SoundPool::instance). Every setter
//! updates the slot's [`VoiceParams`] and pushes them to the backend voice right
//! away, so they can be chained in the frame the sound is queued:
//!
//! ```ignore
//! let handle = pool.play(clip, 0.0)?;
//! if let Some(mut sound) = pool.instance(handle) {
//!     sound.apply_config(&SoundConfig::DEFAULT).set_spatial_blend(1.0).set_position(pos);
//! }
//! ```

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::backend::Voice;
use crate::handle::SoundHandle;
use crate::params::{OutputBus, Rolloff, SoundConfig, VoiceParams};
use crate::pool::Slot;

/// Mutable view of one pending or active sound
pub struct SoundInstance<'a, V: Voice> {
    handle: SoundHandle,
    slot: &'a mut Slot<V>,
    rng: &'a mut Pcg32,
}

impl<'a, V: Voice> SoundInstance<'a, V> {
    pub(crate) fn new(handle: SoundHandle, slot: &'a mut Slot<V>, rng: &'a mut Pcg32) -> Self {
        Self { handle, slot, rng }
    }

    fn update(&mut self, f: impl FnOnce(&mut VoiceParams)) -> &mut Self {
        f(&mut self.slot.params);
        self.slot.apply_params();
        self
    }

    pub fn handle(&self) -> SoundHandle {
        self.handle
    }

    /// Current parameter block
    pub fn params(&self) -> &VoiceParams {
        &self.slot.params
    }

    /// Apply volume, pitch and a random pitch variation from a preset
    pub fn apply_config(&mut self, config: &SoundConfig) -> &mut Self {
        self.set_volume(config.volume)
            .set_pitch(config.pitch)
            .vary_pitch(config.pitch_variance)
    }

    pub fn set_volume(&mut self, volume: f32) -> &mut Self {
        self.update(|p| p.volume = volume)
    }

    pub fn volume(&self) -> f32 {
        self.slot.params.volume
    }

    pub fn set_pitch(&mut self, pitch: f32) -> &mut Self {
        self.update(|p| p.pitch = pitch)
    }

    pub fn pitch(&self) -> f32 {
        self.slot.params.pitch
    }

    /// Stretch or squeeze the clip so it lasts `duration` seconds
    ///
    /// No-op if the backend does not know the clip length or `duration <= 0`.
    pub fn set_pitch_for_duration(&mut self, duration: f32) -> &mut Self {
        let length = self.slot.voice.as_ref().and_then(|voice| voice.clip_length());
        match length {
            Some(length) if duration > 0.0 => self.set_pitch(length / duration),
            _ => self,
        }
    }

    /// Offset pitch by a uniform random amount in `[-variance, +variance]`
    pub fn vary_pitch(&mut self, variance: f32) -> &mut Self {
        let variance = variance.abs();
        if variance == 0.0 || !variance.is_finite() {
            return self;
        }
        let offset = self.rng.random_range(-variance..=variance);
        self.update(|p| p.pitch += offset)
    }

    pub fn set_loop(&mut self, looping: bool) -> &mut Self {
        self.update(|p| p.looping = looping)
    }

    pub fn set_spatial(&mut self, spatialize: bool) -> &mut Self {
        self.update(|p| p.spatialize = spatialize)
    }

    /// Blend between 2D (0.0) and 3D (1.0); any positive blend enables spatialization
    pub fn set_spatial_blend(&mut self, blend: f32) -> &mut Self {
        self.update(|p| {
            p.spatial_blend = blend;
            p.spatialize = blend > 0.0;
        })
    }

    pub fn set_max_distance(&mut self, distance: f32) -> &mut Self {
        self.update(|p| p.max_distance = distance)
    }

    pub fn set_rolloff(&mut self, rolloff: Rolloff) -> &mut Self {
        self.update(|p| p.rolloff = rolloff)
    }

    pub fn set_output(&mut self, output: Option<OutputBus>) -> &mut Self {
        self.update(|p| p.output = output)
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.update(|p| p.position = position)
    }

    /// Keep the voice after it stops playing (`false`) until released by hand
    pub fn set_auto_release(&mut self, auto_release: bool) -> &mut Self {
        self.slot.auto_release = auto_release;
        self
    }

    pub fn auto_release(&self) -> bool {
        self.slot.auto_release
    }
}
