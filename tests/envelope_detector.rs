// SPDX-License-Identifier: LGPL-3.0-or-later

//! End-to-end envelope detector checks against closed-form expectations.

use std::f32::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use drc_units::envelope::EnvelopeDetector;
use drc_units::filters::butterworth;
use drc_units::Block;

const SAMPLE_RATE: f32 = 16000.0;
const NUM_SAMPLES: usize = 6400;

fn tone(channels: usize, frames: usize, frequency_hz: f32, amplitude: f32) -> Block {
    Block::from_fn(channels, frames, |_, i| {
        amplitude * (2.0 * PI * frequency_hz * i as f32 / SAMPLE_RATE).sin()
    })
}

fn metering_detector(channels: usize) -> EnvelopeDetector {
    let prefilter = butterworth::bandpass(2, SAMPLE_RATE, 20.0, 1000.0).unwrap();
    let mut detector = EnvelopeDetector::new();
    detector
        .init(channels, SAMPLE_RATE, 0.05, 0.05, Some(&prefilter))
        .unwrap();
    detector
}

#[test]
fn rms_of_in_band_tone_converges_to_amplitude_over_sqrt2() {
    let mut detector = metering_detector(1);
    // 0.05 s at 16 kHz decimates by 200: 6400 samples emit 32 columns.
    assert_eq!(detector.decimation_factor(), 200);

    let input = tone(1, NUM_SAMPLES, 200.0, 1.0);
    let mut envelope = Block::new(0, 0);
    detector.process_block(&input, &mut envelope).unwrap();
    assert_eq!(envelope.channels(), 1);
    assert_eq!(envelope.frames(), NUM_SAMPLES / 200);

    let last = envelope.sample(0, envelope.frames() - 1);
    let expected = 1.0 / 2.0f32.sqrt();
    assert!((last - expected).abs() < 0.01, "got {last}, want {expected}");
    assert_eq!(detector.most_recent_envelope()[0], last);
}

#[test]
fn out_of_band_tone_is_rejected_by_the_prefilter() {
    let mut detector = metering_detector(1);

    // 7 kHz sits far above the 1 kHz band edge of the pre-filter.
    let input = tone(1, NUM_SAMPLES, 7000.0, 1.0);
    let mut envelope = Block::new(0, 0);
    detector.process_block(&input, &mut envelope).unwrap();

    let last = envelope.sample(0, envelope.frames() - 1);
    assert!(last < 0.01, "got {last}");
}

#[test]
fn short_call_emits_nothing_and_keeps_the_cached_envelope() {
    let mut detector = metering_detector(1);

    let input = tone(1, NUM_SAMPLES, 200.0, 1.0);
    let mut envelope = Block::new(0, 0);
    detector.process_block(&input, &mut envelope).unwrap();
    let cached = detector.most_recent_envelope().to_vec();

    // 6400 is a multiple of the decimation factor, so the phase is zero
    // here and 100 further samples cannot complete a period.
    let short = tone(1, 100, 200.0, 1.0);
    detector.process_block(&short, &mut envelope).unwrap();
    assert_eq!(envelope.frames(), 0);
    assert_eq!(detector.most_recent_envelope(), cached.as_slice());
}

#[test]
fn chunked_processing_matches_the_whole_stream() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let input = Block::from_fn(2, NUM_SAMPLES, |_, _| rng.gen_range(-1.0f32..1.0));

    let mut whole = metering_detector(2);
    let mut whole_out = Block::new(0, 0);
    whole.process_block(&input, &mut whole_out).unwrap();

    let mut chunked = metering_detector(2);
    let mut columns: Vec<Vec<f32>> = vec![Vec::new(); 2];
    let mut start = 0;
    for len in [1000, 37, 963, 4400] {
        let chunk = Block::from_fn(2, len, |c, i| input.sample(c, start + i));
        let mut out = Block::new(0, 0);
        chunked.process_block(&chunk, &mut out).unwrap();
        for c in 0..2 {
            columns[c].extend_from_slice(out.channel(c));
        }
        start += len;
    }
    assert_eq!(start, NUM_SAMPLES);

    for c in 0..2 {
        assert_eq!(columns[c].as_slice(), whole_out.channel(c));
    }
    assert_eq!(
        chunked.most_recent_envelope(),
        whole.most_recent_envelope()
    );
}

#[test]
fn channels_are_tracked_independently() {
    let mut detector = metering_detector(2);

    let input = Block::from_fn(2, NUM_SAMPLES, |c, i| {
        let amplitude = if c == 0 { 0.25 } else { 1.0 };
        amplitude * (2.0 * PI * 200.0 * i as f32 / SAMPLE_RATE).sin()
    });
    let mut envelope = Block::new(0, 0);
    detector.process_block(&input, &mut envelope).unwrap();

    let last = envelope.frames() - 1;
    let quiet = envelope.sample(0, last);
    let loud = envelope.sample(1, last);
    assert!((quiet - 0.25 / 2.0f32.sqrt()).abs() < 0.01, "got {quiet}");
    assert!((loud - 1.0 / 2.0f32.sqrt()).abs() < 0.01, "got {loud}");
}
