use super::AudioDeviceManager;
use crate::device_manager::{AudioDeviceError, AudioSource, AudioSourceBufferKind};
use cpal::{
    OutputCallbackInfo,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};

/// Plays an [`AudioSource`] on the default output device. The stream stops
/// when the manager is dropped.
#[derive(Default)]
pub struct CpalAudioDeviceManager {
    stream: Option<cpal::Stream>,
}

impl std::fmt::Debug for CpalAudioDeviceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpalAudioDeviceManager")
            .field("running", &self.stream.is_some())
            .finish()
    }
}

impl CpalAudioDeviceManager {
    pub fn new() -> Self {
        Self { stream: None }
    }

    fn default_device() -> Result<cpal::Device, AudioDeviceError> {
        cpal::default_host()
            .default_output_device()
            .ok_or(AudioDeviceError::DeviceNotFound)
    }

    /// Sample rate the default output device will run at.
    pub fn default_sample_rate() -> Result<u32, AudioDeviceError> {
        let config = Self::default_device()?
            .default_output_config()
            .map_err(|e| AudioDeviceError::StreamBuildFailed(e.to_string()))?;
        Ok(config.sample_rate().0)
    }

    fn build_output_stream<T, C>(
        &self,
        device: &cpal::Device,
        config: cpal::SupportedStreamConfig,
        mut cb: C,
    ) -> Result<cpal::Stream, AudioDeviceError>
    where
        T: cpal::SizedSample,
        C: FnMut(&mut [T], usize) + Send + 'static,
    {
        let error_cb = move |err| {
            log::warn!("output stream error: {err}");
        };

        let channels = config.channels() as usize;
        let data_cb = move |data: &mut [T], _: &OutputCallbackInfo| {
            cb(data, channels);
        };

        let stream = device
            .build_output_stream(&config.into(), data_cb, error_cb, None)
            .map_err(|e| AudioDeviceError::StreamBuildFailed(e.to_string()))?;

        Ok(stream)
    }
}

impl AudioDeviceManager for CpalAudioDeviceManager {
    fn start_output_stream(
        &mut self,
        mut audio_source: Box<dyn AudioSource>,
    ) -> Result<(), AudioDeviceError> {
        let device = Self::default_device()?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioDeviceError::StreamBuildFailed(e.to_string()))?;
        log::info!(
            "opening output stream: {} ch, {} Hz, {}",
            config.channels(),
            config.sample_rate().0,
            config.sample_format()
        );

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                self.build_output_stream(&device, config, move |data, channels| {
                    audio_source.fill_buffer(AudioSourceBufferKind::F32(data), channels)
                })?
            }
            cpal::SampleFormat::I16 => {
                self.build_output_stream(&device, config, move |data, channels| {
                    audio_source.fill_buffer(AudioSourceBufferKind::I16(data), channels)
                })?
            }
            cpal::SampleFormat::U16 => {
                self.build_output_stream(&device, config, move |data, channels| {
                    audio_source.fill_buffer(AudioSourceBufferKind::U16(data), channels)
                })?
            }
            format => {
                return Err(AudioDeviceError::StreamBuildFailed(format!(
                    "Unsupported sample format '{format}'"
                )));
            }
        };

        stream
            .play()
            .map_err(|e| AudioDeviceError::StreamStartFailed(e.to_string()))?;

        self.stream = Some(stream);
        Ok(())
    }
}
