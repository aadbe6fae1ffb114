//! Nether-SFX: pooled fire-and-forget sound instances for Nethercore
//!
//! Games trigger dozens of short sounds per frame (footsteps, impacts, UI blips).
//! This crate hands out cheap, copyable [`SoundHandle`]s backed by a bounded pool
//! of reusable backend voices, and takes care of the bookkeeping around them.
//!
//! # Key Features
//!
//! - **Generation-checked handles**: a handle goes stale the moment its voice is
//!   recycled, so holding one across frames is always safe
//! - **Delayed starts**: every play goes through a pending queue advanced once per frame
//! - **Debounce**: named cooldowns stop grouped triggers from stacking up
//! - **Auto-release**: finished voices return to the pool on their own (only while
//!   the host window has focus)
//! - **Backend agnostic**: voices are created through the [`VoiceBackend`] trait
//!
//! # Usage
//!
//! ```ignore
//! use nether_sfx::{PoolConfig, SoundPool, debounces};
//!
//! let mut pool = SoundPool::new(backend, &PoolConfig::default())?;
//!
//! // every frame
//! pool.set_clock(elapsed_seconds);
//! pool.set_focused(window.has_focus());
//! pool.play_random_debounced(&footsteps, debounces::FOOT_SCUFF, 0.0)?;
//! pool.advance();
//! ```

mod backend;
mod config;
mod debounce;
mod error;
mod handle;
mod instance;
mod params;
mod pool;

#[cfg(test)]
mod test_utils;

pub use glam::Vec3;

pub use backend::{ClipOf, Voice, VoiceBackend};
pub use config::{DebounceEntry, ExhaustionPolicy, PoolConfig};
pub use debounce::{Debounce, DebounceCatalog, DebounceGate, debounces};
pub use error::{SfxError, SfxResult};
pub use handle::SoundHandle;
pub use instance::SoundInstance;
pub use params::{OutputBus, Rolloff, SoundConfig, VoiceParams};
pub use pool::{SoundPool, SoundState};
