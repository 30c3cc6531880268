use std::sync::Arc;

use crate::{
    collection::AudioCollection,
    error::{AudioError, Result},
    layer::{LayerSlot, Playback},
    registry::EntityId,
};

/// A multi-layer audio source owned by one entity.
///
/// Holds a fixed number of layer slots chosen at registration. Each slot plays
/// at most one clip; starting a clip on an occupied slot stops the previous
/// one first.
#[derive(Debug)]
pub struct LayeredAudioHandle {
    entity: EntityId,
    looping: bool,
    layers: Box<[LayerSlot]>,
}

impl LayeredAudioHandle {
    pub fn new(entity: EntityId, max_layers: usize, looping: bool) -> Result<Self> {
        if max_layers == 0 {
            return Err(AudioError::ZeroLayers);
        }
        Ok(Self {
            entity,
            looping,
            layers: vec![LayerSlot::default(); max_layers].into_boxed_slice(),
        })
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn max_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Plays `collection[clip_index]` on `layer_index` from its first frame.
    ///
    /// The clip loops when this source was registered with looping enabled and
    /// `one_shot` is false; otherwise it plays once and the layer empties when
    /// it ends. Nothing changes if either index is invalid.
    pub fn play(
        &mut self,
        collection: &AudioCollection,
        clip_index: usize,
        layer_index: usize,
        one_shot: bool,
    ) -> Result<()> {
        let max_layers = self.max_layers();
        let clip = collection.clip(clip_index)?;
        let slot = self
            .layers
            .get_mut(layer_index)
            .ok_or(AudioError::LayerIndexOutOfRange {
                index: layer_index,
                max_layers,
            })?;

        let looping = self.looping && !one_shot;
        slot.start(Playback::new(
            Arc::clone(clip),
            clip_index,
            Arc::clone(collection.shared_name()),
            looping,
        ));
        Ok(())
    }

    /// Empties `layer_index`, returning the playback that was stopped.
    pub fn stop(&mut self, layer_index: usize) -> Result<Option<Playback>> {
        Ok(self.slot_mut(layer_index)?.stop())
    }

    pub fn stop_all(&mut self) {
        for slot in self.layers.iter_mut() {
            slot.stop();
        }
    }

    pub fn layer(&self, layer_index: usize) -> Result<Option<&Playback>> {
        Ok(self.slot(layer_index)?.playback())
    }

    pub fn is_playing(&self, layer_index: usize) -> Result<bool> {
        Ok(self.slot(layer_index)?.is_playing())
    }

    pub fn active_layers(&self) -> usize {
        self.layers.iter().filter(|slot| slot.is_playing()).count()
    }

    pub fn layers(&self) -> &[LayerSlot] {
        &self.layers
    }

    pub fn set_layer_gain(&mut self, layer_index: usize, gain: f32) -> Result<()> {
        self.slot_mut(layer_index)?.set_gain(gain);
        Ok(())
    }

    pub fn set_layer_pan(&mut self, layer_index: usize, pan: f32) -> Result<()> {
        self.slot_mut(layer_index)?.set_pan(pan);
        Ok(())
    }

    /// Adds every active layer into `out` and advances their positions.
    pub fn render(&mut self, out: &mut [(f32, f32)]) {
        for slot in self.layers.iter_mut() {
            slot.render(out);
        }
    }

    fn slot(&self, layer_index: usize) -> Result<&LayerSlot> {
        self.layers
            .get(layer_index)
            .ok_or(AudioError::LayerIndexOutOfRange {
                index: layer_index,
                max_layers: self.layers.len(),
            })
    }

    fn slot_mut(&mut self, layer_index: usize) -> Result<&mut LayerSlot> {
        let max_layers = self.layers.len();
        self.layers
            .get_mut(layer_index)
            .ok_or(AudioError::LayerIndexOutOfRange {
                index: layer_index,
                max_layers,
            })
    }
}
