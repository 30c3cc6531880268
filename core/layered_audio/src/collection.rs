use std::{path::Path, sync::Arc};

use crate::{
    clip::AudioClip,
    error::{AudioError, Result},
};

/// A named, ordered group of clips selected by index.
///
/// Collections are immutable once built and cheap to share between the game
/// thread and the audio thread through `Arc`.
#[derive(Debug, Clone)]
pub struct AudioCollection {
    /// shared with every playback started from this collection
    name: Arc<str>,
    clips: Vec<Arc<AudioClip>>,
}

impl AudioCollection {
    pub fn new(name: impl Into<String>, clips: Vec<Arc<AudioClip>>) -> Self {
        Self {
            name: Arc::from(name.into()),
            clips,
        }
    }

    /// Loads every path as a WAV clip, in order.
    pub fn from_files<P: AsRef<Path>>(name: impl Into<String>, paths: &[P]) -> Result<Self> {
        let clips = paths
            .iter()
            .map(|p| AudioClip::from_file(p).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(name, clips))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<AudioClip>> {
        self.clips.iter()
    }

    /// Returns the clip at `index`, failing on an empty collection or an
    /// out-of-range index.
    pub fn clip(&self, index: usize) -> Result<&Arc<AudioClip>> {
        if self.clips.is_empty() {
            return Err(AudioError::EmptyCollection(self.name.to_string()));
        }
        self.clips
            .get(index)
            .ok_or_else(|| AudioError::ClipIndexOutOfRange {
                collection: self.name.to_string(),
                index,
                len: self.clips.len(),
            })
    }
}
