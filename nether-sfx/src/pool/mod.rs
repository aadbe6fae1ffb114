//! Sound pool manager
//!
//! Owns every voice, the delayed-start queue, the active list and the debounce
//! gate. All methods take `&mut self`; the pool is driven from the game thread:
//!
//! ```text
//! each frame:
//!     pool.set_clock(now);
//!     pool.set_focused(window_has_focus);
//!     ... game code calls play*/release ...
//!     pool.advance();
//! ```

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tracing::{debug, error, trace, warn};

use crate::backend::{ClipOf, VoiceBackend};
use crate::config::{ExhaustionPolicy, PoolConfig};
use crate::debounce::{Debounce, DebounceGate};
use crate::error::{SfxError, SfxResult};
use crate::handle::SoundHandle;
use crate::instance::SoundInstance;
use crate::params::{OutputBus, VoiceParams};

mod frame;
mod slots;


pub(crate) use slots::{Slot, SlotState};
use slots::VoiceArena;

/// Where a live handle currently sits in the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundState {
    /// Waiting for its start delay to elapse
    Pending,
    /// Started and tracked for auto-release
    Active,
}

/// Queued start: the handle plus the seconds left before it plays
#[derive(Debug, Clone, Copy)]
struct PendingStart {
    handle: SoundHandle,
    remaining: f64,
}

/// Bounded pool of reusable fire-and-forget sound voices
pub struct SoundPool<B: VoiceBackend> {
    arena: VoiceArena<B>,
    /// Started slots, oldest first
    active: Vec<u32>,
    /// Delayed starts, in request order
    pending: Vec<PendingStart>,
    gate: DebounceGate,
    defaults: VoiceParams,
    exhaustion: ExhaustionPolicy,
    rng: Pcg32,
    clock: f64,
    delta_time: f64,
    focused: bool,
    disposed: bool,
}

impl<B: VoiceBackend> SoundPool<B> {
    /// Create a pool and pre-warm `config.default_capacity` voices
    ///
    /// # Errors
    ///
    /// Returns [`SfxError::Backend`] if the backend fails to create a pre-warmed voice.
    /// Voices created before the failure are handed back to the backend.
    pub fn new(backend: B, config: &PoolConfig) -> SfxResult<Self> {
        let mut arena = VoiceArena::new(backend, config.max_capacity);
        if let Err(e) = arena.prewarm(config.prewarm_count()) {
            let destroyed = arena.destroy_all();
            warn!(destroyed, "voice pre-warm failed, pool not created");
            return Err(e);
        }

        let rng = match config.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::seed_from_u64(rand::random::<u64>()),
        };

        Ok(Self {
            arena,
            active: Vec::with_capacity(config.max_capacity),
            pending: Vec::with_capacity(config.max_capacity),
            gate: DebounceGate::new(),
            defaults: config.defaults.clone(),
            exhaustion: config.exhaustion,
            rng,
            clock: 0.0,
            delta_time: 0.0,
            focused: true,
            disposed: false,
        })
    }

    /// Create a pool with [`PoolConfig::default`]
    pub fn with_defaults(backend: B) -> SfxResult<Self> {
        Self::new(backend, &PoolConfig::default())
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Queue `clip` to start after `delay` seconds
    ///
    /// A non-positive delay starts the clip on the next [`advance`](Self::advance).
    ///
    /// # Errors
    ///
    /// - [`SfxError::PoolExhausted`] when no voice can be acquired under the
    ///   configured [`ExhaustionPolicy`]
    /// - [`SfxError::Backend`] when creating a new voice fails
    /// - [`SfxError::Disposed`] after [`dispose`](Self::dispose)
    pub fn play(&mut self, clip: ClipOf<B>, delay: f64) -> SfxResult<SoundHandle> {
        let slot = self.acquire()?;
        let handle = self.arena.prepare(slot, clip, &self.defaults);
        self.pending.push(PendingStart {
            handle,
            remaining: delay.max(0.0),
        });
        trace!(%handle, delay, "queued sound");
        Ok(handle)
    }

    /// Queue a clip picked uniformly at random from `clips`
    ///
    /// # Errors
    ///
    /// [`SfxError::EmptySourceSet`] if `clips` is empty, otherwise as [`play`](Self::play).
    pub fn play_random(&mut self, clips: &[ClipOf<B>], delay: f64) -> SfxResult<SoundHandle> {
        if clips.is_empty() {
            return Err(SfxError::EmptySourceSet);
        }
        let index = self.rng.random_range(0..clips.len());
        self.play(clips[index].clone(), delay)
    }

    /// Queue a random clip that differs from the previous pick
    ///
    /// `last_index` is caller-owned state carried between calls. With more than one
    /// clip the chosen index never equals `*last_index`; with one clip it is always 0.
    /// `last_index` is only updated when the play succeeds.
    pub fn play_random_no_repeat(
        &mut self,
        clips: &[ClipOf<B>],
        last_index: &mut Option<usize>,
        delay: f64,
    ) -> SfxResult<SoundHandle> {
        let index = match (clips.len(), *last_index) {
            (0, _) => return Err(SfxError::EmptySourceSet),
            (1, _) => 0,
            (len, Some(last)) if last < len => {
                // Draw from the other len - 1 clips and skip over the previous one
                let pick = self.rng.random_range(0..len - 1);
                if pick >= last { pick + 1 } else { pick }
            }
            (len, _) => self.rng.random_range(0..len),
        };

        let handle = self.play(clips[index].clone(), delay)?;
        *last_index = Some(index);
        Ok(handle)
    }

    /// [`play`](Self::play) behind a debounce gate
    ///
    /// Returns `Ok(None)` without touching the pool while `debounce` is cooling down.
    /// The cooldown only starts once the play succeeds: a play that fails (for
    /// example on an exhausted pool) leaves the debounce free to fire again.
    pub fn play_debounced(
        &mut self,
        clip: ClipOf<B>,
        debounce: Debounce,
        delay: f64,
    ) -> SfxResult<Option<SoundHandle>> {
        self.debounced(debounce, |pool| pool.play(clip, delay))
    }

    /// [`play_random`](Self::play_random) behind a debounce gate
    pub fn play_random_debounced(
        &mut self,
        clips: &[ClipOf<B>],
        debounce: Debounce,
        delay: f64,
    ) -> SfxResult<Option<SoundHandle>> {
        self.debounced(debounce, |pool| pool.play_random(clips, delay))
    }

    /// [`play_random_no_repeat`](Self::play_random_no_repeat) behind a debounce gate
    pub fn play_random_no_repeat_debounced(
        &mut self,
        clips: &[ClipOf<B>],
        last_index: &mut Option<usize>,
        debounce: Debounce,
        delay: f64,
    ) -> SfxResult<Option<SoundHandle>> {
        self.debounced(debounce, |pool| {
            pool.play_random_no_repeat(clips, last_index, delay)
        })
    }

    fn debounced(
        &mut self,
        debounce: Debounce,
        play: impl FnOnce(&mut Self) -> SfxResult<SoundHandle>,
    ) -> SfxResult<Option<SoundHandle>> {
        if self.gate.is_suppressed(debounce, self.clock) {
            trace!(id = debounce.id, now = self.clock, "debounced sound suppressed");
            return Ok(None);
        }
        let handle = play(self)?;
        self.gate.record(debounce, self.clock);
        Ok(Some(handle))
    }

    fn acquire(&mut self) -> SfxResult<u32> {
        if self.disposed {
            return Err(SfxError::Disposed);
        }
        if let Some(slot) = self.arena.acquire()? {
            return Ok(slot);
        }

        let capacity = self.arena.max_capacity();
        match self.exhaustion {
            ExhaustionPolicy::Reject => {
                warn!(capacity, "sound pool exhausted, dropping play request");
                Err(SfxError::PoolExhausted { capacity })
            }
            ExhaustionPolicy::StealOldest => {
                let victim = if !self.active.is_empty() {
                    Some(self.active.remove(0))
                } else if !self.pending.is_empty() {
                    Some(self.pending.remove(0).handle.slot())
                } else {
                    None
                };
                let Some(victim) = victim else {
                    warn!(capacity, "sound pool exhausted with nothing to steal");
                    return Err(SfxError::PoolExhausted { capacity });
                };

                warn!(capacity, slot = victim, "sound pool exhausted, stealing oldest voice");
                self.arena.recycle(victim);
                self.arena
                    .acquire()?
                    .ok_or(SfxError::PoolExhausted { capacity })
            }
        }
    }

    // ========================================================================
    // Release
    // ========================================================================

    /// Stop a sound and return its voice to the pool
    ///
    /// Stale handles are ignored. Returns whether a voice was released.
    pub fn release(&mut self, handle: SoundHandle) -> bool {
        if !self.arena.is_current(handle) {
            return false;
        }

        let slot = handle.slot();
        if let Some(pos) = self.active.iter().position(|&s| s == slot) {
            self.active.remove(pos);
        } else if let Some(pos) = self.pending.iter().position(|p| p.handle == handle) {
            self.pending.remove(pos);
        } else {
            error!(%handle, "failed to release sound: voice was neither pending nor active");
        }

        self.arena.recycle(slot);
        true
    }

    /// Stop every sound and destroy all voices through the backend
    ///
    /// Idempotent. Subsequent plays fail with [`SfxError::Disposed`].
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        let released = self.active.len() + self.pending.len();
        for slot in std::mem::take(&mut self.active) {
            self.arena.recycle(slot);
        }
        for entry in std::mem::take(&mut self.pending) {
            self.arena.recycle(entry.handle.slot());
        }

        let destroyed = self.arena.destroy_all();
        self.disposed = true;
        debug!(released, destroyed, "sound pool disposed");
    }

    // ========================================================================
    // Queries & instance access
    // ========================================================================

    /// Whether `handle` still refers to the sound it was issued for
    pub fn is_valid(&self, handle: SoundHandle) -> bool {
        self.arena.is_current(handle)
    }

    /// Where a live handle sits, `None` once it went stale
    pub fn state(&self, handle: SoundHandle) -> Option<SoundState> {
        if !self.arena.is_current(handle) {
            return None;
        }
        match self.arena.get(handle.slot()).map(|slot| slot.state) {
            Some(SlotState::Pending) => Some(SoundState::Pending),
            Some(SlotState::Active) => Some(SoundState::Active),
            _ => None,
        }
    }

    /// Parameter view for a live sound, `None` if the handle is stale
    pub fn instance(&mut self, handle: SoundHandle) -> Option<SoundInstance<'_, B::Voice>> {
        let rng = &mut self.rng;
        let slot = self.arena.slot_mut(handle)?;
        Some(SoundInstance::new(handle, slot, rng))
    }

    /// Route every subsequently acquired voice to `output`
    pub fn set_default_output(&mut self, output: Option<OutputBus>) {
        self.defaults.output = output;
    }

    /// Parameters applied to every voice on acquisition
    pub fn defaults(&self) -> &VoiceParams {
        &self.defaults
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn idle_count(&self) -> usize {
        self.arena.idle_len()
    }

    /// Voices currently alive (idle, pending or active)
    pub fn voice_count(&self) -> usize {
        self.arena.len()
    }

    /// Voices ever created through the backend
    pub fn created_count(&self) -> usize {
        self.arena.created()
    }

    pub fn capacity(&self) -> usize {
        self.arena.max_capacity()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn backend(&self) -> &B {
        self.arena.backend()
    }

    /// Time of the last honored trigger for a cooldown group
    pub fn last_debounce_trigger(&self, id: u32) -> Option<f64> {
        self.gate.last_trigger(id)
    }

    /// Forget every debounce cooldown, e.g. on level load
    pub fn reset_debounces(&mut self) {
        self.gate.clear();
    }
}

impl<B: VoiceBackend> Drop for SoundPool<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}
