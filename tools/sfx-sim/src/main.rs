//! sfx-sim - frame-by-frame simulator for the nether-sfx sound pool
//!
//! Drives a `SoundPool` against an in-memory backend whose voices "play" for a
//! fixed clip length, and prints pool statistics as the frames go by.
//!
//! # Usage
//!
//! ```bash
//! sfx-sim --frames 240 --trigger-every 2 --burst 3
//! sfx-sim --config sfx.toml --debounce foot_scuff --verbose
//! sfx-sim --unfocused-from 60 --focused-from 120
//! sfx-sim --config sfx.toml --print-config
//! ```

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nether_sfx::{PoolConfig, SfxError, SoundPool, Voice, VoiceBackend, VoiceParams};

#[derive(Parser)]
#[command(name = "sfx-sim")]
#[command(author, version, about = "Simulate a nether-sfx sound pool frame by frame")]
struct Args {
    /// Pool config file (TOML); built-in defaults when omitted
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, short = 'n', default_value = "240")]
    frames: u32,

    /// Frames per second
    #[arg(long, default_value = "60")]
    tick_rate: u32,

    /// Length of every simulated clip in seconds
    #[arg(long, default_value = "0.25")]
    clip_length: f32,

    /// Number of distinct clips to pick from
    #[arg(long, default_value = "4")]
    clips: u32,

    /// Trigger a burst every N frames
    #[arg(long, default_value = "3")]
    trigger_every: u32,

    /// Sounds per burst
    #[arg(long, default_value = "2")]
    burst: u32,

    /// Start delay for every sound, in seconds
    #[arg(long, default_value = "0.0")]
    delay: f64,

    /// Gate bursts behind a named debounce from the catalog
    #[arg(long)]
    debounce: Option<String>,

    // === Focus ===
    /// Lose host focus at this frame
    #[arg(long)]
    unfocused_from: Option<u32>,

    /// Regain host focus at this frame
    #[arg(long)]
    focused_from: Option<u32>,

    /// Print pool stats every N frames
    #[arg(long, default_value = "30")]
    report_every: u32,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

// ============================================================================
// Simulated backend
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct SimClip {
    id: u32,
    length: f32,
}

struct SimVoice {
    clock: Rc<Cell<f64>>,
    clip: Option<SimClip>,
    pitch: f32,
    looping: bool,
    started_at: Option<f64>,
}

impl Voice for SimVoice {
    type Clip = SimClip;

    fn set_active(&mut self, _active: bool) {}

    fn set_enabled(&mut self, _enabled: bool) {}

    fn assign_clip(&mut self, clip: Option<SimClip>) {
        self.clip = clip;
    }

    fn clip_length(&self) -> Option<f32> {
        self.clip.map(|clip| clip.length)
    }

    fn start(&mut self) {
        self.started_at = Some(self.clock.get());
    }

    fn stop(&mut self) {
        self.started_at = None;
    }

    fn is_playing(&self) -> bool {
        let (Some(start), Some(clip)) = (self.started_at, self.clip) else {
            return false;
        };
        if self.looping {
            return true;
        }
        let duration = f64::from(clip.length / self.pitch.max(f32::EPSILON));
        self.clock.get() - start < duration
    }

    fn apply_params(&mut self, params: &VoiceParams) {
        self.pitch = params.pitch;
        self.looping = params.looping;
    }
}

struct SimBackend {
    clock: Rc<Cell<f64>>,
    created: usize,
    destroyed: Rc<Cell<usize>>,
}

impl VoiceBackend for SimBackend {
    type Voice = SimVoice;

    fn create_voice(&mut self) -> Result<SimVoice> {
        self.created += 1;
        Ok(SimVoice {
            clock: self.clock.clone(),
            clip: None,
            pitch: 1.0,
            looping: false,
            started_at: None,
        })
    }

    fn destroy_voice(&mut self, _voice: SimVoice) {
        self.destroyed.set(self.destroyed.get() + 1);
    }
}

// ============================================================================
// Simulation
// ============================================================================

#[derive(Debug, Default)]
struct SimStats {
    requested: u32,
    queued: u32,
    debounced: u32,
    exhausted: u32,
    peak_active: usize,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(path: Option<&PathBuf>) -> Result<PoolConfig> {
    let config = match path {
        Some(path) => PoolConfig::load(path)
            .with_context(|| format!("Failed to load pool config {}", path.display()))?,
        None => PoolConfig::default(),
    };
    for warning in config.validate() {
        warn!("config: {}", warning);
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_ref())?;
    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if args.tick_rate == 0 {
        anyhow::bail!("--tick-rate must be greater than 0");
    }
    if args.clips == 0 {
        anyhow::bail!("--clips must be greater than 0");
    }

    let debounce = match args.debounce.as_deref() {
        Some(name) => {
            let catalog = config.debounce_catalog();
            let Some(debounce) = catalog.get(name) else {
                let mut known: Vec<_> = catalog.iter().map(|(name, _)| name).collect();
                known.sort_unstable();
                anyhow::bail!("Unknown debounce '{}' (known: {})", name, known.join(", "));
            };
            Some(debounce)
        }
        None => None,
    };

    let clock = Rc::new(Cell::new(0.0));
    let destroyed = Rc::new(Cell::new(0));
    let backend = SimBackend {
        clock: clock.clone(),
        created: 0,
        destroyed: destroyed.clone(),
    };
    let mut pool = SoundPool::new(backend, &config)?;

    let clips: Vec<SimClip> = (0..args.clips)
        .map(|id| SimClip {
            id,
            length: args.clip_length,
        })
        .collect();

    info!(
        frames = args.frames,
        tick_rate = args.tick_rate,
        capacity = pool.capacity(),
        exhaustion = ?config.exhaustion,
        "starting simulation"
    );

    let frame_time = 1.0 / f64::from(args.tick_rate);
    let mut stats = SimStats::default();
    let mut last_index = None;

    for frame in 0..args.frames {
        let now = f64::from(frame) * frame_time;
        clock.set(now);
        pool.set_clock(now);

        if args.unfocused_from == Some(frame) {
            info!(frame, "host lost focus");
            pool.set_focused(false);
        }
        if args.focused_from == Some(frame) {
            info!(frame, "host regained focus");
            pool.set_focused(true);
        }

        if args.trigger_every > 0 && frame % args.trigger_every == 0 {
            for _ in 0..args.burst {
                stats.requested += 1;
                let result = match debounce {
                    Some(debounce) => pool.play_random_no_repeat_debounced(
                        &clips,
                        &mut last_index,
                        debounce,
                        args.delay,
                    ),
                    None => pool
                        .play_random_no_repeat(&clips, &mut last_index, args.delay)
                        .map(Some),
                };
                match result {
                    Ok(Some(handle)) => {
                        stats.queued += 1;
                        if let Some(clip) = last_index.and_then(|i| clips.get(i)) {
                            tracing::debug!(frame, %handle, clip = clip.id, "queued");
                        }
                    }
                    Ok(None) => stats.debounced += 1,
                    Err(SfxError::PoolExhausted { .. }) => stats.exhausted += 1,
                    Err(e) => return Err(e.into()),
                }
            }
        }

        pool.advance();
        stats.peak_active = stats.peak_active.max(pool.active_count());

        if args.report_every > 0 && frame % args.report_every == 0 {
            println!(
                "frame {:>5}  t={:>7.3}s  active={:>3}  pending={:>3}  idle={:>3}  voices={:>3}",
                frame,
                now,
                pool.active_count(),
                pool.pending_count(),
                pool.idle_count(),
                pool.voice_count(),
            );
        }
    }

    let created = pool.backend().created;
    pool.dispose();

    println!();
    println!("Requested:   {}", stats.requested);
    println!("Queued:      {}", stats.queued);
    println!("Debounced:   {}", stats.debounced);
    println!("Exhausted:   {}", stats.exhausted);
    println!("Peak active: {}", stats.peak_active);
    println!("Voices:      {} created, {} destroyed", created, destroyed.get());

    Ok(())
}
