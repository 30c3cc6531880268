use crate::constants::{DEFAULT_COMMAND_CAPACITY, DEFAULT_SAMPLE_RATE, MAX_GAIN};

/// Runtime settings for an [`AudioEngine`](crate::engine::AudioEngine).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: u32,
    /// Slots in the controller to engine command ring
    pub command_capacity: usize,
    pub master_gain: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            command_capacity: DEFAULT_COMMAND_CAPACITY,
            master_gain: 1.0,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity.max(1);
        self
    }

    pub fn with_master_gain(mut self, gain: f32) -> Self {
        self.master_gain = gain.clamp(0.0, MAX_GAIN);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_clamps_values() {
        let config = EngineConfig::default()
            .with_command_capacity(0)
            .with_master_gain(10.0)
            .with_sample_rate(48_000);

        assert_eq!(config.command_capacity, 1);
        assert_eq!(config.master_gain, MAX_GAIN);
        assert_eq!(config.sample_rate, 48_000);
    }
}
