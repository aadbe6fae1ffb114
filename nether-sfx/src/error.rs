//! Error types for the sound pool

use std::io;
use std::path::PathBuf;

/// Errors returned by [`SoundPool`](crate::SoundPool) and [`PoolConfig`](crate::PoolConfig)
///
/// Stale handles are not errors: every operation on a stale handle is a silent no-op.
#[derive(Debug, thiserror::Error)]
pub enum SfxError {
    /// `play_random*` called with no candidate clips
    #[error("cannot pick a clip from an empty source set")]
    EmptySourceSet,

    /// Every voice is pending or active and the exhaustion policy refused to recycle one
    #[error("sound pool exhausted ({capacity} voices in use)")]
    PoolExhausted { capacity: usize },

    /// The pool was disposed and no longer hands out voices
    #[error("sound pool has been disposed")]
    Disposed,

    /// The voice backend failed to create a voice
    #[error(transparent)]
    Backend(#[from] anyhow::Error),

    /// Configuration file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration text is not valid TOML for [`PoolConfig`](crate::PoolConfig)
    #[error("invalid pool config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result alias for sound pool operations
pub type SfxResult<T> = Result<T, SfxError>;
