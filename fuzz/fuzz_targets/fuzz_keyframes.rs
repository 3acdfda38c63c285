#![no_main]

use debris_core::Keyframes;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Vec<(f64, f64)>, Vec<f64>)| {
    let (stops, samples) = input;
    if stops.len() > 256 || samples.len() > 256 {
        return;
    }
    // Construction either rejects the track or yields one that samples to
    // values inside the range of its stops.
    let Ok(track) = Keyframes::new(stops.iter().copied()) else {
        return;
    };
    let lo = stops.iter().map(|&(_, v)| v).fold(f64::INFINITY, f64::min);
    let hi = stops.iter().map(|&(_, v)| v).fold(f64::NEG_INFINITY, f64::max);
    for at in samples {
        let value = track.sample(at);
        assert!(value.is_finite(), "sample({at}) = {value}");
        assert!(value >= lo - 1e-9 && value <= hi + 1e-9, "sample({at}) = {value}");
    }
});
