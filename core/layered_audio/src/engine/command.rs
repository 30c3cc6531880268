use std::sync::Arc;

use rtrb::{Consumer, Producer};

use crate::{collection::AudioCollection, registry::EntityId};

/// Requests sent from the game thread to the audio thread.
#[derive(Debug)]
pub enum AudioCommand {
    Register {
        entity: EntityId,
        max_layers: usize,
        looping: bool,
    },
    Unregister {
        entity: EntityId,
    },
    Play {
        entity: EntityId,
        collection: Arc<AudioCollection>,
        clip_index: usize,
        layer_index: usize,
        one_shot: bool,
    },
    Stop {
        entity: EntityId,
        layer_index: usize,
    },
    StopAll {
        entity: EntityId,
    },
    SetLayerGain {
        entity: EntityId,
        layer_index: usize,
        gain: f32,
    },
    SetLayerPan {
        entity: EntityId,
        layer_index: usize,
        pan: f32,
    },
    SetMasterGain(f32),
}

pub type AudioCommandProducer = Producer<AudioCommand>;
pub type AudioCommandConsumer = Consumer<AudioCommand>;
