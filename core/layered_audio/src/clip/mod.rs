pub mod clip_id;

use std::{f32::consts::PI, io::Read, path::Path};

use hound::WavReader;

use crate::{
    clip::clip_id::ClipId,
    error::{AudioError, Result},
};

/// `AudioClip` is an immutable, in-memory, stereo-normalized PCM buffer.
///
/// Supports:
/// - Mono and Stereo files (mono is duplicated into both channels)
/// - 8/16/24/32-bit integer or 32-bit float samples (converted to `f32`)
///
/// Does NOT support:
/// - More than 2 channels
/// - Resampling; clips play at the output rate regardless of `sample_rate`
///
/// # Example
/// ```no_run
/// use layered_audio::clip::AudioClip;
///
/// let clip = AudioClip::from_file("assets/wav/breath.wav").unwrap();
/// ```
#[derive(Debug)]
pub struct AudioClip {
    id: ClipId,
    name: String,
    sample_rate: u32,
    /// Stereo frames
    frames: Vec<(f32, f32)>,
}

impl AudioClip {
    pub fn from_frames(name: impl Into<String>, sample_rate: u32, frames: Vec<(f32, f32)>) -> Self {
        Self {
            id: ClipId::new(),
            name: name.into(),
            sample_rate,
            frames,
        }
    }

    /// Synthesizes a mono sine tone of `frame_count` frames.
    pub fn sine(name: impl Into<String>, freq: f32, sample_rate: u32, frame_count: usize) -> Self {
        let phase_increment = 2.0 * PI * freq / sample_rate.max(1) as f32;
        let mut phase = 0.0f32;
        let frames = (0..frame_count)
            .map(|_| {
                let sample = phase.sin();
                phase += phase_increment;
                if phase >= 2.0 * PI {
                    phase -= 2.0 * PI;
                }
                (sample, sample)
            })
            .collect();
        Self::from_frames(name, sample_rate, frames)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("clip")
            .to_owned();
        let reader = WavReader::open(path)?;
        Self::from_reader(reader, name)
    }

    pub fn from_stream<R: Read>(stream: R, name: impl Into<String>) -> Result<Self> {
        let reader = WavReader::new(stream)?;
        Self::from_reader(reader, name.into())
    }

    fn from_reader<R: Read>(reader: WavReader<R>, name: String) -> Result<Self> {
        let spec = reader.spec();
        if spec.channels == 0 || spec.channels > 2 {
            return Err(AudioError::UnsupportedFormat(format!(
                "{name}: {} channels, only mono or stereo is supported",
                spec.channels
            )));
        }

        let raw_samples = Self::decode_pcm_samples(reader)?;
        let frames = Self::interleave_channels(raw_samples, spec.channels);
        log::debug!("decoded clip '{name}' ({} frames)", frames.len());

        Ok(Self {
            id: ClipId::new(),
            name,
            sample_rate: spec.sample_rate,
            frames,
        })
    }

    fn decode_pcm_samples<R: Read>(reader: WavReader<R>) -> Result<Vec<f32>> {
        let spec = reader.spec();
        let samples = match spec.sample_format {
            hound::SampleFormat::Int => {
                let scale = (1u64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / scale))
                    .collect::<std::result::Result<Vec<f32>, _>>()?
            }
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, _>>()?,
        };
        Ok(samples)
    }

    /// Converts raw samples into stereo `(L, R)` frames.
    /// Mono is duplicated into both channels.
    fn interleave_channels(samples: Vec<f32>, channels: u16) -> Vec<(f32, f32)> {
        if channels == 1 {
            samples.into_iter().map(|s| (s, s)).collect()
        } else {
            samples
                .chunks_exact(2)
                .map(|chunk| (chunk[0], chunk[1]))
                .collect()
        }
    }

    pub fn id(&self) -> &ClipId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames.len() as f64 / f64::from(self.sample_rate)
    }

    pub fn frames(&self) -> &[(f32, f32)] {
        &self.frames
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use hound::WavSpec;

    use super::*;
    use crate::{constants::AUDIO_SAMPLE_EPSILON, error::ErrorKind};

    fn create_wav_buffer<S: hound::Sample + Copy>(spec: WavSpec, samples: &[S]) -> Cursor<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut buffer, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        buffer.set_position(0);
        buffer
    }

    fn spec(channels: u16) -> WavSpec {
        WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        }
    }

    #[test]
    fn test_mono_wav_expands_to_stereo() {
        let buffer = create_wav_buffer(spec(1), &[1000i16, -1000]);
        let clip = AudioClip::from_stream(buffer, "mono").unwrap();

        assert_eq!(clip.len_frames(), 2);
        for (l, r) in clip.frames() {
            assert!((l - r).abs() < AUDIO_SAMPLE_EPSILON);
        }
        assert!(clip.frames()[0].0 > 0.0);
        assert!(clip.frames()[1].0 < 0.0);
    }

    #[test]
    fn test_stereo_wav_keeps_channels_apart() {
        let buffer = create_wav_buffer(spec(2), &[16384i16, -16384, 0, 8192]);
        let clip = AudioClip::from_stream(buffer, "stereo").unwrap();

        assert_eq!(clip.len_frames(), 2);
        assert!((clip.frames()[0].0 - 0.5).abs() < AUDIO_SAMPLE_EPSILON);
        assert!((clip.frames()[0].1 + 0.5).abs() < AUDIO_SAMPLE_EPSILON);
        assert!((clip.frames()[1].1 - 0.25).abs() < AUDIO_SAMPLE_EPSILON);
        assert_eq!(clip.sample_rate(), 44100);
    }

    fn decode_mono(buffer: Cursor<Vec<u8>>) -> Vec<f32> {
        let clip = AudioClip::from_stream(buffer, "depth").unwrap();
        clip.frames().iter().map(|&(l, _)| l).collect()
    }

    fn depth_spec(bits_per_sample: u16, sample_format: hound::SampleFormat) -> WavSpec {
        WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample,
            sample_format,
        }
    }

    fn assert_half_scale(decoded: &[f32]) {
        assert_eq!(decoded.len(), 2);
        assert!((decoded[0] - 0.5).abs() < AUDIO_SAMPLE_EPSILON, "got {}", decoded[0]);
        assert!((decoded[1] + 0.5).abs() < AUDIO_SAMPLE_EPSILON, "got {}", decoded[1]);
    }

    #[test]
    fn test_8_bit_unsigned_wav_is_recentred() {
        let spec = depth_spec(8, hound::SampleFormat::Int);
        let buffer = create_wav_buffer(spec, &[64i8, -64]);
        assert_half_scale(&decode_mono(buffer));
    }

    #[test]
    fn test_24_bit_wav_normalizes() {
        let spec = depth_spec(24, hound::SampleFormat::Int);
        let buffer = create_wav_buffer(spec, &[1i32 << 22, -(1 << 22)]);
        assert_half_scale(&decode_mono(buffer));
    }

    #[test]
    fn test_32_bit_int_wav_normalizes() {
        let spec = depth_spec(32, hound::SampleFormat::Int);
        let buffer = create_wav_buffer(spec, &[1i32 << 30, -(1 << 30)]);
        assert_half_scale(&decode_mono(buffer));
    }

    #[test]
    fn test_32_bit_float_wav_passes_through() {
        let spec = depth_spec(32, hound::SampleFormat::Float);
        let buffer = create_wav_buffer(spec, &[0.5f32, -0.5]);
        assert_half_scale(&decode_mono(buffer));
    }

    #[test]
    fn test_invalid_channels_should_fail() {
        let buffer = create_wav_buffer(spec(3), &[0i16; 6]);
        let err = AudioClip::from_stream(buffer, "surround").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_garbage_stream_is_decode_error() {
        let err = AudioClip::from_stream(Cursor::new(vec![1u8, 2, 3, 4]), "junk").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn sine_starts_at_zero_and_peaks_at_quarter_period() {
        let clip = AudioClip::sine("tone", 1.0, 4, 4);
        assert_eq!(clip.len_frames(), 4);
        assert!(clip.frames()[0].0.abs() < AUDIO_SAMPLE_EPSILON);
        assert!((clip.frames()[1].0 - 1.0).abs() < 1e-5);
        assert_eq!(clip.frames()[1].0, clip.frames()[1].1);
    }

    #[test]
    fn clips_get_distinct_ids() {
        let a = AudioClip::from_frames("a", 44100, vec![(0.0, 0.0)]);
        let b = AudioClip::from_frames("b", 44100, vec![(0.0, 0.0)]);
        assert_ne!(a.id(), b.id());
        assert!((AudioClip::from_frames("c", 2, vec![(0.0, 0.0); 3]).duration_secs() - 1.5).abs() < 1e-9);
    }
}
