pub mod gainpan;

use std::sync::Arc;

use crate::{clip::AudioClip, constants::MAX_GAIN, layer::gainpan::apply_gain_pan};

/// One clip playing on a layer.
#[derive(Debug, Clone)]
pub struct Playback {
    clip: Arc<AudioClip>,
    clip_index: usize,
    collection: Arc<str>,
    looping: bool,
    /// next frame to read from `clip`
    position: usize,
}

impl Playback {
    pub fn new(
        clip: Arc<AudioClip>,
        clip_index: usize,
        collection: Arc<str>,
        looping: bool,
    ) -> Self {
        Self {
            clip,
            clip_index,
            collection,
            looping,
            position: 0,
        }
    }

    pub fn clip(&self) -> &Arc<AudioClip> {
        &self.clip
    }

    pub fn clip_index(&self) -> usize {
        self.clip_index
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// A looping playback of a non-empty clip never finishes.
    pub fn is_finished(&self) -> bool {
        if self.looping && !self.clip.is_empty() {
            return false;
        }
        self.position >= self.clip.len_frames()
    }

    /// Adds the next `out.len()` frames into `out`. Frames past the end of a
    /// non-looping clip are left untouched.
    fn mix_into(&mut self, out: &mut [(f32, f32)], gain: f32, pan: f32) {
        let frames = self.clip.frames();
        for frame in out.iter_mut() {
            if self.position >= frames.len() {
                if !self.looping || frames.is_empty() {
                    break;
                }
                self.position = 0;
            }
            let (l, r) = frames[self.position];
            let (l, r) = apply_gain_pan(l, r, gain, pan);
            frame.0 += l;
            frame.1 += r;
            self.position += 1;
        }
    }
}

/// A layer slot: at most one playback plus mix settings that persist across
/// plays.
#[derive(Debug, Clone)]
pub struct LayerSlot {
    playback: Option<Playback>,
    gain: f32,
    pan: f32,
}

impl Default for LayerSlot {
    fn default() -> Self {
        Self {
            playback: None,
            gain: 1.0,
            pan: 0.0,
        }
    }
}

impl LayerSlot {
    pub fn playback(&self) -> Option<&Playback> {
        self.playback.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn pan(&self) -> f32 {
        self.pan
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, MAX_GAIN);
    }

    pub fn set_pan(&mut self, pan: f32) {
        self.pan = pan.clamp(-1.0, 1.0);
    }

    /// Starts `playback`, returning whatever it replaced.
    pub fn start(&mut self, playback: Playback) -> Option<Playback> {
        self.playback.replace(playback)
    }

    pub fn stop(&mut self) -> Option<Playback> {
        self.playback.take()
    }

    /// Mixes this slot into `out`; the slot empties once its playback ends.
    pub fn render(&mut self, out: &mut [(f32, f32)]) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        playback.mix_into(out, self.gain, self.pan);
        if playback.is_finished() {
            self.playback = None;
        }
    }
}
