//! Voice arena
//!
//! Stable slots holding backend voices plus their generation counters. Slot
//! indices never move, so a [`SoundHandle`] stays meaningful for the lifetime of
//! the pool and is rejected once its slot's generation moves on.

use tracing::debug;

use crate::backend::{Voice, VoiceBackend};
use crate::error::SfxResult;
use crate::handle::SoundHandle;
use crate::params::VoiceParams;

/// Lifecycle state of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotState {
    /// Voice destroyed (pool disposed)
    Vacant,
    /// Voice alive and waiting on the idle stack
    Idle,
    /// Handed out, waiting in the delayed-start queue
    Pending,
    /// Started, tracked for auto-release
    Active,
}

/// One arena entry
pub(crate) struct Slot<V> {
    pub voice: Option<V>,
    pub generation: u32,
    pub state: SlotState,
    pub auto_release: bool,
    pub params: VoiceParams,
}

impl<V: Voice> Slot<V> {
    /// Push the current parameter block to the voice
    pub fn apply_params(&mut self) {
        if let Some(voice) = self.voice.as_mut() {
            voice.apply_params(&self.params);
        }
    }
}

/// Bounded arena of voices with an idle stack
pub(crate) struct VoiceArena<B: VoiceBackend> {
    backend: B,
    slots: Vec<Slot<B::Voice>>,
    /// Slots in [`SlotState::Idle`], most recently returned on top
    idle: Vec<u32>,
    max_capacity: usize,
    created: usize,
}

impl<B: VoiceBackend> VoiceArena<B> {
    pub fn new(backend: B, max_capacity: usize) -> Self {
        Self {
            backend,
            slots: Vec::with_capacity(max_capacity),
            idle: Vec::with_capacity(max_capacity),
            max_capacity,
            created: 0,
        }
    }

    /// Create voices up front until `count` slots exist
    pub fn prewarm(&mut self, count: usize) -> SfxResult<()> {
        while self.slots.len() < count.min(self.max_capacity) {
            let slot = self.create()?;
            self.idle.push(slot);
        }
        Ok(())
    }

    /// Take an idle voice, creating one if the arena is below capacity
    ///
    /// Returns `Ok(None)` when every voice is handed out and the cap is reached.
    pub fn acquire(&mut self) -> SfxResult<Option<u32>> {
        if let Some(slot) = self.idle.pop() {
            return Ok(Some(slot));
        }
        if self.slots.len() < self.max_capacity {
            return self.create().map(Some);
        }
        Ok(None)
    }

    fn create(&mut self) -> SfxResult<u32> {
        let mut voice = self.backend.create_voice()?;
        voice.set_active(false);

        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            voice: Some(voice),
            generation: 0,
            state: SlotState::Idle,
            auto_release: true,
            params: VoiceParams::default(),
        });
        self.created += 1;
        debug!(slot, total = self.slots.len(), "created pooled voice");
        Ok(slot)
    }

    /// Reset a freshly acquired voice and load `clip` into it
    ///
    /// Returns the handle for the slot's current generation.
    pub fn prepare(
        &mut self,
        slot: u32,
        clip: <B::Voice as Voice>::Clip,
        defaults: &VoiceParams,
    ) -> SoundHandle {
        let entry = &mut self.slots[slot as usize];
        entry.auto_release = true;
        entry.params = defaults.clone();
        entry.state = SlotState::Pending;

        if let Some(voice) = entry.voice.as_mut() {
            voice.set_active(true);
            voice.set_enabled(false);
            voice.assign_clip(None);
            voice.apply_params(&entry.params);

            voice.set_enabled(true);
            voice.assign_clip(Some(clip));
        }

        SoundHandle::new(slot, entry.generation)
    }

    /// Whether `handle` still refers to the voice it was issued for
    pub fn is_current(&self, handle: SoundHandle) -> bool {
        self.slots.get(handle.index()).is_some_and(|slot| {
            slot.generation == handle.generation()
                && matches!(slot.state, SlotState::Pending | SlotState::Active)
        })
    }

    pub fn get(&self, slot: u32) -> Option<&Slot<B::Voice>> {
        self.slots.get(slot as usize)
    }

    /// Slot for a live handle, `None` when stale
    pub fn slot_mut(&mut self, handle: SoundHandle) -> Option<&mut Slot<B::Voice>> {
        if !self.is_current(handle) {
            return None;
        }
        self.slots.get_mut(handle.index())
    }

    /// Begin playback on a pending slot
    pub fn start(&mut self, slot: u32) {
        let entry = &mut self.slots[slot as usize];
        entry.state = SlotState::Active;
        if let Some(voice) = entry.voice.as_mut() {
            voice.start();
        }
    }

    /// Whether an active slot finished playing and may be reclaimed
    pub fn is_reclaimable(&self, slot: u32) -> bool {
        self.slots.get(slot as usize).is_some_and(|entry| {
            entry.auto_release && entry.voice.as_ref().is_some_and(|voice| !voice.is_playing())
        })
    }

    /// Return a slot to the idle stack
    ///
    /// Bumps the generation, which invalidates every handle issued for it.
    pub fn recycle(&mut self, slot: u32) {
        let entry = &mut self.slots[slot as usize];
        if entry.state == SlotState::Idle || entry.state == SlotState::Vacant {
            return;
        }
        entry.generation = entry.generation.wrapping_add(1);
        entry.state = SlotState::Idle;
        if let Some(voice) = entry.voice.as_mut() {
            voice.stop();
            voice.set_enabled(false);
            voice.set_active(false);
        }
        self.idle.push(slot);
    }

    /// Hand every voice back to the backend for destruction
    ///
    /// Returns the number of voices destroyed by this call.
    pub fn destroy_all(&mut self) -> usize {
        let mut destroyed = 0;
        for entry in &mut self.slots {
            if let Some(voice) = entry.voice.take() {
                self.backend.destroy_voice(voice);
                destroyed += 1;
            }
            if entry.state != SlotState::Idle && entry.state != SlotState::Vacant {
                entry.generation = entry.generation.wrapping_add(1);
            }
            entry.state = SlotState::Vacant;
        }
        self.idle.clear();
        destroyed
    }

    /// Voices currently alive (idle or handed out)
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.voice.is_some()).count()
    }

    pub fn idle_len(&self) -> usize {
        self.idle.len()
    }

    /// Voices ever created by this arena
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
