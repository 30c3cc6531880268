/// Tolerance used when comparing rendered samples.
pub const AUDIO_SAMPLE_EPSILON: f32 = 1e-6;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Capacity of the game-thread to audio-thread command ring.
pub const DEFAULT_COMMAND_CAPACITY: usize = 64;

/// Upper bound for per-layer and master gain.
pub const MAX_GAIN: f32 = 4.0;
