//! Generation-checked sound handles

use std::fmt;

/// Handle to a sound instance handed out by [`SoundPool`](crate::SoundPool)
///
/// A handle is a `(slot, generation)` pair. The pool bumps a slot's generation every
/// time its voice returns to the idle stack, so a handle kept across frames can be
/// checked with [`SoundPool::is_valid`](crate::SoundPool::is_valid) before use and
/// never reaches a voice that was recycled for an unrelated sound.
///
/// Generations are `u32` and wrap, so a handle only aliases a newer sound after
/// its slot has been recycled 2^32 times while the handle was still held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle {
    slot: u32,
    generation: u32,
}

impl SoundHandle {
    pub(crate) fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Slot index in the pool's voice arena
    #[inline]
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Generation observed when this handle was issued
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.slot as usize
    }
}

impl fmt::Display for SoundHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sound#{}v{}", self.slot, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_accessors() {
        let handle = SoundHandle::new(3, 7);
        assert_eq!(handle.slot(), 3);
        assert_eq!(handle.generation(), 7);
        assert_eq!(handle.index(), 3);
    }

    #[test]
    fn test_handle_equality_includes_generation() {
        assert_eq!(SoundHandle::new(1, 0), SoundHandle::new(1, 0));
        assert_ne!(SoundHandle::new(1, 0), SoundHandle::new(1, 1));
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(SoundHandle::new(4, 2).to_string(), "sound#4v2");
    }
}
