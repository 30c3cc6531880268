use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    clip::AudioClip,
    collection::AudioCollection,
    engine::command::{AudioCommand, AudioCommandProducer},
    error::{AudioError, Result},
    registry::EntityId,
};

/// Game-thread side of an [`AudioEngine`](crate::engine::AudioEngine).
///
/// Mirrors which entities are registered and how many layers they have, so
/// every request is validated here and rejected immediately instead of being
/// dropped later on the audio thread.
pub struct AudioController {
    producer: AudioCommandProducer,
    /// entity -> max layers
    layers: HashMap<EntityId, usize>,
    /// output rate of the engine; clips are not resampled
    sample_rate: u32,
}

impl fmt::Debug for AudioController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioController")
            .field("layers", &self.layers)
            .field("sample_rate", &self.sample_rate)
            .finish_non_exhaustive()
    }
}

impl AudioController {
    pub(crate) fn new(producer: AudioCommandProducer, sample_rate: u32) -> Self {
        Self {
            producer,
            layers: HashMap::new(),
            sample_rate,
        }
    }

    pub fn register(&mut self, entity: EntityId, max_layers: usize, looping: bool) -> Result<()> {
        if self.layers.contains_key(&entity) {
            return Err(AudioError::EntityAlreadyRegistered(entity));
        }
        if max_layers == 0 {
            return Err(AudioError::ZeroLayers);
        }
        self.send(AudioCommand::Register {
            entity,
            max_layers,
            looping,
        })?;
        self.layers.insert(entity, max_layers);

        log::debug!("registered entity {entity} ({max_layers} layers, loop: {looping})");
        Ok(())
    }

    pub fn unregister(&mut self, entity: EntityId) -> Result<()> {
        self.max_layers(entity)?;
        self.send(AudioCommand::Unregister { entity })?;
        self.layers.remove(&entity);

        log::debug!("unregistered entity {entity}");
        Ok(())
    }

    pub fn play(
        &mut self,
        entity: EntityId,
        collection: &Arc<AudioCollection>,
        clip_index: usize,
        layer_index: usize,
        one_shot: bool,
    ) -> Result<()> {
        let clip = collection.clip(clip_index)?;
        self.check_layer(entity, layer_index)?;
        self.check_sample_rate(clip);
        self.send(AudioCommand::Play {
            entity,
            collection: Arc::clone(collection),
            clip_index,
            layer_index,
            one_shot,
        })?;

        log::debug!(
            "entity {entity}: layer {layer_index} <- '{}' [{}] (one shot: {one_shot})",
            clip.name(),
            clip.id()
        );
        Ok(())
    }

    pub fn stop(&mut self, entity: EntityId, layer_index: usize) -> Result<()> {
        self.check_layer(entity, layer_index)?;
        self.send(AudioCommand::Stop {
            entity,
            layer_index,
        })?;

        log::debug!("entity {entity}: layer {layer_index} stopped");
        Ok(())
    }

    pub fn stop_all(&mut self, entity: EntityId) -> Result<()> {
        self.max_layers(entity)?;
        self.send(AudioCommand::StopAll { entity })?;

        log::debug!("entity {entity}: all layers stopped");
        Ok(())
    }

    pub fn set_layer_gain(&mut self, entity: EntityId, layer_index: usize, gain: f32) -> Result<()> {
        self.check_layer(entity, layer_index)?;
        self.send(AudioCommand::SetLayerGain {
            entity,
            layer_index,
            gain,
        })
    }

    pub fn set_layer_pan(&mut self, entity: EntityId, layer_index: usize, pan: f32) -> Result<()> {
        self.check_layer(entity, layer_index)?;
        self.send(AudioCommand::SetLayerPan {
            entity,
            layer_index,
            pan,
        })
    }

    pub fn set_master_gain(&mut self, gain: f32) -> Result<()> {
        self.send(AudioCommand::SetMasterGain(gain))
    }

    pub fn is_registered(&self, entity: EntityId) -> bool {
        self.layers.contains_key(&entity)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Warns when `clip` will play at the wrong pitch. Returns true on a
    /// mismatch.
    pub fn check_sample_rate(&self, clip: &AudioClip) -> bool {
        if clip.sample_rate() == self.sample_rate {
            return false;
        }
        log::warn!(
            "clip '{}' is {} Hz but output runs at {} Hz, it will play off-pitch",
            clip.name(),
            clip.sample_rate(),
            self.sample_rate
        );
        true
    }

    fn max_layers(&self, entity: EntityId) -> Result<usize> {
        self.layers
            .get(&entity)
            .copied()
            .ok_or(AudioError::UnknownEntity(entity))
    }

    fn check_layer(&self, entity: EntityId, layer_index: usize) -> Result<()> {
        let max_layers = self.max_layers(entity)?;
        if layer_index >= max_layers {
            return Err(AudioError::LayerIndexOutOfRange {
                index: layer_index,
                max_layers,
            });
        }
        Ok(())
    }

    fn send(&mut self, command: AudioCommand) -> Result<()> {
        self.producer.push(command).map_err(|_| {
            log::warn!("audio command queue full, request dropped");
            AudioError::CommandQueueFull
        })
    }
}
