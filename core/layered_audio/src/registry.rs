use std::{collections::HashMap, fmt};

use crate::{
    collection::AudioCollection,
    error::{AudioError, Result},
    handle::LayeredAudioHandle,
};

/// Identity of the game entity that owns a layered source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Opaque reference to a registered [`LayeredAudioHandle`].
///
/// Arena slots are reused after unregistration; the generation makes ids of
/// destroyed handles stay invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId {
    index: u32,
    generation: u32,
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Default)]
struct Entry {
    generation: u32,
    handle: Option<LayeredAudioHandle>,
}

/// Owns every layered source, one per entity.
#[derive(Debug, Default)]
pub struct LayeredSourceRegistry {
    entries: Vec<Entry>,
    free: Vec<u32>,
    by_entity: HashMap<EntityId, HandleId>,
}

impl LayeredSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a layered source for `entity` with `max_layers` slots.
    pub fn register(&mut self, entity: EntityId, max_layers: usize, looping: bool) -> Result<HandleId> {
        if self.by_entity.contains_key(&entity) {
            return Err(AudioError::EntityAlreadyRegistered(entity));
        }
        let handle = LayeredAudioHandle::new(entity, max_layers, looping)?;
        let id = self.allocate(handle);
        self.by_entity.insert(entity, id);
        Ok(id)
    }

    /// Destroys the entity's layered source, stopping all of its layers.
    pub fn unregister(&mut self, entity: EntityId) -> Result<()> {
        let id = self
            .by_entity
            .remove(&entity)
            .ok_or(AudioError::UnknownEntity(entity))?;
        let entry = &mut self.entries[id.index as usize];
        if let Some(mut handle) = entry.handle.take() {
            handle.stop_all();
        }
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.index);
        Ok(())
    }

    fn allocate(&mut self, handle: LayeredAudioHandle) -> HandleId {
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            entry.handle = Some(handle);
            return HandleId {
                index,
                generation: entry.generation,
            };
        }

        let index = self.entries.len() as u32;
        self.entries.push(Entry {
            generation: 0,
            handle: Some(handle),
        });
        HandleId {
            index,
            generation: 0,
        }
    }

    pub fn handle_id(&self, entity: EntityId) -> Option<HandleId> {
        self.by_entity.get(&entity).copied()
    }

    pub fn handle(&self, id: HandleId) -> Option<&LayeredAudioHandle> {
        self.entries
            .get(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.handle.as_ref())
    }

    pub fn handle_mut(&mut self, id: HandleId) -> Option<&mut LayeredAudioHandle> {
        self.entries
            .get_mut(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.handle.as_mut())
    }

    pub fn try_handle_mut(&mut self, id: HandleId) -> Result<&mut LayeredAudioHandle> {
        self.handle_mut(id).ok_or(AudioError::UnknownHandle(id))
    }

    /// See [`LayeredAudioHandle::play`].
    pub fn play(
        &mut self,
        id: HandleId,
        collection: &AudioCollection,
        clip_index: usize,
        layer_index: usize,
        one_shot: bool,
    ) -> Result<()> {
        self.try_handle_mut(id)?
            .play(collection, clip_index, layer_index, one_shot)
    }

    pub fn len(&self) -> usize {
        self.by_entity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = &LayeredAudioHandle> {
        self.entries.iter().filter_map(|entry| entry.handle.as_ref())
    }

    /// Overwrites `out` with the sum of every active layer of every source.
    pub fn fill_next_samples(&mut self, out: &mut [(f32, f32)]) {
        out.fill((0.0, 0.0));
        for handle in self.entries.iter_mut().filter_map(|e| e.handle.as_mut()) {
            handle.render(out);
        }
    }

    pub fn next_samples(&mut self, frame_size: usize) -> Vec<(f32, f32)> {
        let mut buffer = vec![(0.0f32, 0.0f32); frame_size];
        self.fill_next_samples(&mut buffer);
        buffer
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{clip::AudioClip, constants::AUDIO_SAMPLE_EPSILON, error::ErrorKind};

    fn collection() -> AudioCollection {
        let clips = (0..6)
            .map(|i| {
                let level = 0.1 * (i as f32 + 1.0);
                Arc::new(AudioClip::from_frames(
                    format!("clip-{i}"),
                    44100,
                    vec![(level, level); 8],
                ))
            })
            .collect();
        AudioCollection::new("survivor", clips)
    }

    #[test]
    fn replaying_layer_zero_ends_on_latest_clip() {
        let c = collection();
        let mut registry = LayeredSourceRegistry::new();
        let id = registry.register(EntityId(42), 6, true).unwrap();

        registry.play(id, &c, 0, 0, false).unwrap();
        registry.play(id, &c, 5, 0, false).unwrap();

        let handle = registry.handle(id).unwrap();
        assert_eq!(handle.layer(0).unwrap().unwrap().clip_index(), 5);
        assert!(handle.layer(0).unwrap().unwrap().is_looping());
    }

    #[test]
    fn one_handle_per_entity() {
        let mut registry = LayeredSourceRegistry::new();
        registry.register(EntityId(1), 6, true).unwrap();

        let err = registry.register(EntityId(1), 2, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.handle(registry.handle_id(EntityId(1)).unwrap()).unwrap().max_layers(), 6);
    }

    #[test]
    fn zero_layers_does_not_register() {
        let mut registry = LayeredSourceRegistry::new();
        let err = registry.register(EntityId(1), 0, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(registry.is_empty());
        assert!(registry.handle_id(EntityId(1)).is_none());
    }

    #[test]
    fn unregister_invalidates_stale_ids() {
        let c = collection();
        let mut registry = LayeredSourceRegistry::new();
        let old = registry.register(EntityId(1), 2, true).unwrap();
        registry.unregister(EntityId(1)).unwrap();

        let new = registry.register(EntityId(2), 2, true).unwrap();
        assert_ne!(old, new);
        assert!(registry.handle(old).is_none());
        let err = registry.play(old, &c, 0, 0, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(registry.handle(new).unwrap().entity(), EntityId(2));
    }

    #[test]
    fn unregister_unknown_entity_fails() {
        let mut registry = LayeredSourceRegistry::new();
        let err = registry.unregister(EntityId(9)).unwrap_err();
        assert!(matches!(err, AudioError::UnknownEntity(EntityId(9))));
    }

    #[test]
    fn unregistered_entity_goes_silent() {
        let c = collection();
        let mut registry = LayeredSourceRegistry::new();
        let id = registry.register(EntityId(1), 1, true).unwrap();
        registry.play(id, &c, 0, 0, false).unwrap();
        assert!(registry.next_samples(2)[0].0 > 0.0);

        registry.unregister(EntityId(1)).unwrap();
        assert!(registry.next_samples(2).iter().all(|&f| f == (0.0, 0.0)));
    }

    #[test]
    fn sources_of_all_entities_are_mixed() {
        let c = collection();
        let mut registry = LayeredSourceRegistry::new();
        let a = registry.register(EntityId(1), 2, true).unwrap();
        let b = registry.register(EntityId(2), 2, true).unwrap();

        registry.play(a, &c, 0, 0, false).unwrap();
        registry.play(a, &c, 1, 1, false).unwrap();
        registry.play(b, &c, 2, 0, false).unwrap();

        let mut out = vec![(1.0, 1.0); 3];
        registry.fill_next_samples(&mut out);
        for (l, r) in out {
            assert!((l - 0.6).abs() < AUDIO_SAMPLE_EPSILON);
            assert!((r - 0.6).abs() < AUDIO_SAMPLE_EPSILON);
        }
    }

    #[test]
    fn rejected_play_leaves_every_slot_unchanged() {
        let c = collection();
        let mut registry = LayeredSourceRegistry::new();
        let id = registry.register(EntityId(3), 6, true).unwrap();
        registry.play(id, &c, 1, 0, false).unwrap();
        registry.play(id, &c, 2, 5, false).unwrap();

        let err = registry.play(id, &c, 0, 6, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let handle = registry.handle(id).unwrap();
        let playing: Vec<_> = (0..6)
            .map(|layer| handle.layer(layer).unwrap().map(|p| p.clip_index()))
            .collect();
        assert_eq!(playing, vec![Some(1), None, None, None, None, Some(2)]);
    }
}
