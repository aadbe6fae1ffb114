//! Per-frame advancement: clock, delayed starts, auto-release

use tracing::trace;

use super::SoundPool;
use crate::backend::VoiceBackend;

impl<B: VoiceBackend> SoundPool<B> {
    /// Feed the current frame time in seconds
    ///
    /// Call exactly once per frame before [`advance`](Self::advance). Calling it
    /// twice drops the first delta.
    pub fn set_clock(&mut self, time: f64) {
        self.delta_time = time - self.clock;
        self.clock = time;
    }

    /// Feed the host application's focus state
    ///
    /// Finished voices are only reclaimed while focused: a suspended output device
    /// reports every voice as stopped.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Current frame time
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Seconds between the last two [`set_clock`](Self::set_clock) calls
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Run one frame: start due sounds, then reclaim finished ones
    pub fn advance(&mut self) {
        let dt = self.delta_time;

        let arena = &mut self.arena;
        let active = &mut self.active;
        self.pending.retain_mut(|entry| {
            entry.remaining -= dt;
            if !arena.is_current(entry.handle) {
                return false;
            }
            if entry.remaining <= 0.0 {
                arena.start(entry.handle.slot());
                active.push(entry.handle.slot());
                trace!(handle = %entry.handle, "started sound");
                return false;
            }
            true
        });

        if !self.focused {
            return;
        }

        let arena = &mut self.arena;
        self.active.retain(|&slot| {
            if !arena.is_reclaimable(slot) {
                return true;
            }
            arena.recycle(slot);
            trace!(slot, "auto-released finished sound");
            false
        });
    }
}
