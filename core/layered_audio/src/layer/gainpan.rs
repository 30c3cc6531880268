use crate::constants::MAX_GAIN;

/// Scales a stereo frame by `gain` and places it in the stereo field.
/// -1.0 = Left, 0.0 = Center (unchanged), 1.0 = Right
pub fn apply_gain_pan(l: f32, r: f32, gain: f32, pan: f32) -> (f32, f32) {
    let gain = gain.clamp(0.0, MAX_GAIN);
    let pan = pan.clamp(-1.0, 1.0);

    let pan_l = if pan < 0.0 { 1.0 } else { 1.0 - pan };
    let pan_r = if pan > 0.0 { 1.0 } else { 1.0 + pan };

    (l * gain * pan_l, r * gain * pan_r)
}
