//! Playback backend seam
//!
//! The pool never touches audio samples. It drives opaque [`Voice`]s created and
//! destroyed by a [`VoiceBackend`] (a cpal mixer channel, an engine audio source, a
//! test double...).

use crate::params::VoiceParams;

/// A single reusable playback unit.
pub trait Voice {
    /// Clip type this voice can play
    type Clip: Clone;

    /// Activate or deactivate the voice as a whole
    ///
    /// Called with `true` when the pool hands the voice out and with `false` when
    /// it returns to the idle stack.
    fn set_active(&mut self, active: bool);

    /// Enable or disable audio output
    fn set_enabled(&mut self, enabled: bool);

    /// Assign the clip to play next (`None` clears it)
    fn assign_clip(&mut self, clip: Option<Self::Clip>);

    /// Length of the assigned clip in seconds, if known
    fn clip_length(&self) -> Option<f32> {
        None
    }

    /// Start playback of the assigned clip from the beginning
    fn start(&mut self);

    /// Stop playback immediately
    fn stop(&mut self) {}

    /// Whether the voice is currently producing sound
    fn is_playing(&self) -> bool;

    /// Push the full parameter block to the voice
    fn apply_params(&mut self, params: &VoiceParams);
}

/// Creates and destroys voices on behalf of the pool.
///
/// The pool never holds more than its configured capacity of voices, so
/// `create_voice` is called at most `max_capacity` times between disposals.
pub trait VoiceBackend {
    /// Voice type produced by this backend
    type Voice: Voice;

    /// Allocate a new native voice
    fn create_voice(&mut self) -> anyhow::Result<Self::Voice>;

    /// Destroy a voice the pool no longer needs
    fn destroy_voice(&mut self, voice: Self::Voice);
}

/// Clip type of a backend's voices
pub type ClipOf<B> = <<B as VoiceBackend>::Voice as Voice>::Clip;
