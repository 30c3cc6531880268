use thiserror::Error;

pub mod cpal_dm;

#[derive(Clone, Debug, Error)]
pub enum AudioDeviceError {
    #[error("no default output device")]
    DeviceNotFound,
    #[error("failed to build output stream: {0}")]
    StreamBuildFailed(String),
    #[error("failed to start output stream: {0}")]
    StreamStartFailed(String),
}

/// Interleaved output buffer handed over by the device, in its native format.
#[derive(Debug)]
pub enum AudioSourceBufferKind<'a> {
    F32(&'a mut [f32]),
    I16(&'a mut [i16]),
    U16(&'a mut [u16]),
}

impl AudioSourceBufferKind<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::F32(data) => data.len(),
            Self::I16(data) => data.len(),
            Self::U16(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Anything that can fill a device buffer of `channels` interleaved channels.
pub trait AudioSource: Send {
    fn fill_buffer(&mut self, buffer: AudioSourceBufferKind<'_>, channels: usize);
}

pub trait AudioDeviceManager {
    fn start_output_stream(
        &mut self,
        audio_source: Box<dyn AudioSource>,
    ) -> Result<(), AudioDeviceError>;
}
