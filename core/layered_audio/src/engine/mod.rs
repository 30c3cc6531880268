use std::fmt;

use cpal::Sample;
use rtrb::RingBuffer;

use crate::{
    config::EngineConfig,
    constants::MAX_GAIN,
    device_manager::{AudioSource, AudioSourceBufferKind},
    engine::command::{AudioCommand, AudioCommandConsumer},
    error::{AudioError, Result},
    handle::LayeredAudioHandle,
    registry::{EntityId, LayeredSourceRegistry},
};

pub mod command;
pub mod controller;

pub use controller::AudioController;

/// Audio-thread owner of the [`LayeredSourceRegistry`].
///
/// Pending commands are applied at the start of every render, so requests
/// made by the [`AudioController`] take effect on the next callback.
pub struct AudioEngine {
    registry: LayeredSourceRegistry,
    commands: AudioCommandConsumer,
    master_gain: f32,
    sample_rate: u32,
    /// frames rendered since creation
    current_frame: u64,
    /// reused between device callbacks
    scratch: Vec<(f32, f32)>,
}

impl fmt::Debug for AudioEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioEngine")
            .field("registry", &self.registry)
            .field("master_gain", &self.master_gain)
            .field("sample_rate", &self.sample_rate)
            .field("current_frame", &self.current_frame)
            .finish_non_exhaustive()
    }
}

impl AudioEngine {
    pub fn new(config: EngineConfig) -> (Self, AudioController) {
        let (producer, consumer) = RingBuffer::new(config.command_capacity.max(1));
        let engine = Self {
            registry: LayeredSourceRegistry::new(),
            commands: consumer,
            master_gain: config.master_gain.clamp(0.0, MAX_GAIN),
            sample_rate: config.sample_rate,
            current_frame: 0,
            scratch: Vec::new(),
        };
        (engine, AudioController::new(producer, config.sample_rate))
    }

    pub fn process_command(&mut self, cmd: AudioCommand) {
        let result = match cmd {
            AudioCommand::Register {
                entity,
                max_layers,
                looping,
            } => self
                .registry
                .register(entity, max_layers, looping)
                .map(|_| ()),
            AudioCommand::Unregister { entity } => self.registry.unregister(entity),
            AudioCommand::Play {
                entity,
                collection,
                clip_index,
                layer_index,
                one_shot,
            } => self.with_handle(entity, |handle| {
                handle.play(&collection, clip_index, layer_index, one_shot)
            }),
            AudioCommand::Stop {
                entity,
                layer_index,
            } => self.with_handle(entity, |handle| handle.stop(layer_index).map(|_| ())),
            AudioCommand::StopAll { entity } => self.with_handle(entity, |handle| {
                handle.stop_all();
                Ok(())
            }),
            AudioCommand::SetLayerGain {
                entity,
                layer_index,
                gain,
            } => self.with_handle(entity, |handle| handle.set_layer_gain(layer_index, gain)),
            AudioCommand::SetLayerPan {
                entity,
                layer_index,
                pan,
            } => self.with_handle(entity, |handle| handle.set_layer_pan(layer_index, pan)),
            AudioCommand::SetMasterGain(gain) => {
                self.master_gain = gain.clamp(0.0, MAX_GAIN);
                Ok(())
            }
        };

        if let Err(err) = result {
            log::warn!("audio command rejected: {err}");
        }
    }

    fn with_handle<F>(&mut self, entity: EntityId, f: F) -> Result<()>
    where
        F: FnOnce(&mut LayeredAudioHandle) -> Result<()>,
    {
        let id = self
            .registry
            .handle_id(entity)
            .ok_or(AudioError::UnknownEntity(entity))?;
        f(self.registry.try_handle_mut(id)?)
    }

    /// Applies pending commands, then overwrites `out` with the next frames.
    pub fn fill_next_samples(&mut self, out: &mut [(f32, f32)]) {
        while let Ok(cmd) = self.commands.pop() {
            self.process_command(cmd);
        }

        self.registry.fill_next_samples(out);
        if self.master_gain != 1.0 {
            for (l, r) in out.iter_mut() {
                *l *= self.master_gain;
                *r *= self.master_gain;
            }
        }

        self.current_frame += out.len() as u64;
    }

    pub fn next_samples(&mut self, frame_size: usize) -> Vec<(f32, f32)> {
        let mut buffer = vec![(0.0f32, 0.0f32); frame_size];
        self.fill_next_samples(&mut buffer);
        buffer
    }

    pub fn registry(&self) -> &LayeredSourceRegistry {
        &self.registry
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    pub fn current_frame(&self) -> u64 {
        self.current_frame
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.current_frame as f64 / f64::from(self.sample_rate.max(1))
    }

    fn fill_sample<T>(data: &mut [T], samples: &[(f32, f32)], channels: usize)
    where
        T: cpal::FromSample<f32>,
    {
        // a trailing partial frame is written as silence
        let whole = samples.len().min(data.len() / channels) * channels;
        let (frames, rest) = data.split_at_mut(whole);
        for sample in rest {
            *sample = 0.0f32.to_sample::<T>();
        }

        for (frame, &(l, r)) in frames.chunks_mut(channels).zip(samples) {
            for (channel, sample) in frame.iter_mut().enumerate() {
                // channels past the first two repeat the mono downmix
                let raw_sample = match channel {
                    0 if channels == 1 => (l + r) * 0.5,
                    0 => l,
                    1 => r,
                    _ => (l + r) * 0.5,
                };
                *sample = raw_sample.to_sample::<T>();
            }
        }
    }
}

impl AudioSource for AudioEngine {
    fn fill_buffer(&mut self, buffer: AudioSourceBufferKind<'_>, channels: usize) {
        let channels = channels.max(1);
        let frame_size = buffer.len() / channels;

        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.resize(frame_size, (0.0, 0.0));
        self.fill_next_samples(&mut scratch);

        match buffer {
            AudioSourceBufferKind::F32(data) => Self::fill_sample(data, &scratch, channels),
            AudioSourceBufferKind::I16(data) => Self::fill_sample(data, &scratch, channels),
            AudioSourceBufferKind::U16(data) => Self::fill_sample(data, &scratch, channels),
        }
        self.scratch = scratch;
    }
}
