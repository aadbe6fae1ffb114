//! Shared test utilities

use std::cell::RefCell;
use std::rc::Rc;

use crate::backend::{Voice, VoiceBackend};
use crate::config::{ExhaustionPolicy, PoolConfig};
use crate::params::VoiceParams;
use crate::pool::SoundPool;

// ============================================================================
// Recording Backend
// ============================================================================

/// Everything the pool did to one test voice
#[derive(Debug, Default)]
pub struct VoiceRecord {
    pub active: bool,
    pub enabled: bool,
    pub clip: Option<u32>,
    pub playing: bool,
    pub starts: u32,
    pub stops: u32,
    pub params: VoiceParams,
    pub destroyed: bool,
}

/// Shared log, indexed by voice creation order (which is also the slot index)
#[derive(Debug, Default)]
pub struct BackendLog {
    pub voices: Vec<VoiceRecord>,
    pub created: usize,
    pub destroyed: usize,
    pub fail_create: bool,
    /// Refuse to create voices once this many exist
    pub fail_after: Option<usize>,
}

pub type SharedLog = Rc<RefCell<BackendLog>>;

/// Test voice that records every call into the shared log
pub struct TestVoice {
    id: usize,
    log: SharedLog,
}

impl Voice for TestVoice {
    type Clip = u32;

    fn set_active(&mut self, active: bool) {
        self.log.borrow_mut().voices[self.id].active = active;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.log.borrow_mut().voices[self.id].enabled = enabled;
    }

    fn assign_clip(&mut self, clip: Option<u32>) {
        self.log.borrow_mut().voices[self.id].clip = clip;
    }

    /// Every test clip lasts `clip` seconds (clip 0 has no known length)
    fn clip_length(&self) -> Option<f32> {
        self.log.borrow().voices[self.id]
            .clip
            .filter(|&clip| clip > 0)
            .map(|clip| clip as f32)
    }

    fn start(&mut self) {
        let mut log = self.log.borrow_mut();
        let record = &mut log.voices[self.id];
        record.playing = true;
        record.starts += 1;
    }

    fn stop(&mut self) {
        let mut log = self.log.borrow_mut();
        let record = &mut log.voices[self.id];
        record.playing = false;
        record.stops += 1;
    }

    fn is_playing(&self) -> bool {
        self.log.borrow().voices[self.id].playing
    }

    fn apply_params(&mut self, params: &VoiceParams) {
        self.log.borrow_mut().voices[self.id].params = params.clone();
    }
}

/// Test backend handing out [`TestVoice`]s
pub struct TestBackend {
    log: SharedLog,
}

impl TestBackend {
    pub fn new() -> (Self, SharedLog) {
        let log = SharedLog::default();
        (Self { log: log.clone() }, log)
    }
}

impl VoiceBackend for TestBackend {
    type Voice = TestVoice;

    fn create_voice(&mut self) -> anyhow::Result<TestVoice> {
        let mut log = self.log.borrow_mut();
        if log.fail_create || log.fail_after.is_some_and(|limit| log.created >= limit) {
            anyhow::bail!("test backend refused to create a voice");
        }
        let id = log.voices.len();
        log.voices.push(VoiceRecord::default());
        log.created += 1;
        Ok(TestVoice {
            id,
            log: self.log.clone(),
        })
    }

    fn destroy_voice(&mut self, voice: TestVoice) {
        let mut log = self.log.borrow_mut();
        log.voices[voice.id].destroyed = true;
        log.destroyed += 1;
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Seeded pool with no pre-warmed voices
pub fn test_pool(
    max_capacity: usize,
    exhaustion: ExhaustionPolicy,
) -> (SoundPool<TestBackend>, SharedLog) {
    let config = PoolConfig {
        max_capacity,
        default_capacity: 0,
        exhaustion,
        seed: Some(0x5eed),
        ..Default::default()
    };
    let (backend, log) = TestBackend::new();
    (SoundPool::new(backend, &config).unwrap(), log)
}

/// Simulate the backend reaching the end of the clip on voice `id`
pub fn finish_voice(log: &SharedLog, id: usize) {
    log.borrow_mut().voices[id].playing = false;
}

/// Whether voice `id` is currently playing
pub fn voice_playing(log: &SharedLog, id: usize) -> bool {
    log.borrow().voices[id].playing
}

/// Advance the pool by one frame of `dt` seconds
pub fn step(pool: &mut SoundPool<TestBackend>, dt: f64) {
    let now = pool.clock() + dt;
    pool.set_clock(now);
    pool.advance();
}
