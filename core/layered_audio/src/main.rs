use std::{env, sync::Arc, thread, time::Duration};

use layered_audio::{
    clip::AudioClip,
    collection::AudioCollection,
    config::EngineConfig,
    constants::DEFAULT_SAMPLE_RATE,
    device_manager::{AudioDeviceManager, cpal_dm::CpalAudioDeviceManager},
    engine::AudioEngine,
    registry::EntityId,
};

const PLAYER: EntityId = EntityId(1);
const MAX_LAYERS: usize = 6;
const ROUNDS: usize = 8;

/// Six tones a fifth apart, used when no WAV files are given.
fn tone_collection(sample_rate: u32) -> AudioCollection {
    let clips = (0..6)
        .map(|i| {
            let freq = 220.0 * 1.5f32.powi(i);
            Arc::new(AudioClip::sine(
                format!("tone-{i}"),
                freq,
                sample_rate,
                sample_rate as usize / 2,
            ))
        })
        .collect();
    AudioCollection::new("tones", clips)
}

fn main() {
    env_logger::init();

    let sample_rate = CpalAudioDeviceManager::default_sample_rate().unwrap_or(DEFAULT_SAMPLE_RATE);
    let paths: Vec<String> = env::args().skip(1).collect();
    let collection = if paths.is_empty() {
        tone_collection(sample_rate)
    } else {
        match AudioCollection::from_files("harness", &paths[..]) {
            Ok(collection) if !collection.is_empty() => collection,
            Ok(_) => tone_collection(sample_rate),
            Err(e) => {
                log::error!("failed to load clips: {e}");
                return;
            }
        }
    };
    let collection = Arc::new(collection);

    let (engine, mut controller) =
        AudioEngine::new(EngineConfig::default().with_sample_rate(sample_rate));
    let mut manager = CpalAudioDeviceManager::new();
    if let Err(e) = manager.start_output_stream(Box::new(engine)) {
        log::error!("failed to start audio stream: {e}");
        return;
    }

    if let Err(e) = controller.register(PLAYER, MAX_LAYERS, true) {
        log::error!("failed to register player: {e}");
        return;
    }

    // alternate clips on the first and last layer, replacing each time
    let last = collection.len() - 1;
    for round in 0..ROUNDS {
        let (layer, clip) = if round % 2 == 0 {
            (0, round / 2 % collection.len())
        } else {
            (MAX_LAYERS - 1, last - round / 2 % collection.len())
        };
        match controller.play(PLAYER, &collection, clip, layer, false) {
            Ok(()) => log::info!("layer {layer} <- clip {clip}"),
            Err(e) => log::error!("play rejected: {e}"),
        }
        thread::sleep(Duration::from_secs(1));
    }

    if let Err(e) = controller.unregister(PLAYER) {
        log::error!("failed to unregister player: {e}");
    }
    thread::sleep(Duration::from_millis(100));
}
