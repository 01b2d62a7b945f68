//! Render property integration tests.

use std::f64::consts::TAU;

use fmsynth_engine::{envelope, render_chain, render_patch, EngineError, RenderRequest, SynthGraph};
use fmsynth_patch::{AdsrParams, OperatorParams, Patch};

fn three_chain_patch() -> Patch {
    Patch::builder(&[2, 2, 2])
        .base_frequency(220.0)
        .operator(0, OperatorParams::ratio(3.0, 0.0))
        .operator(1, OperatorParams::ratio(1.0, 1.2))
        .operator(2, OperatorParams::ratio(1.5, 0.0).with_envelope(AdsrParams::new(0.01, 0.02, 0.4, 0.05)))
        .operator(3, OperatorParams::ratio(2.0, 0.7).with_level(0.5))
        .operator(4, OperatorParams::fixed(1000.0, 0.0).with_feedback(1))
        .operator(5, OperatorParams::ratio(0.5, 2.5))
        .envelope(AdsrParams::new(0.05, 0.05, 0.6, 0.1))
        .build()
}

// ============================================================================
// Envelope
// ============================================================================

#[test]
fn test_reference_envelope_at_cd_rate() {
    let params = AdsrParams::new(0.1, 0.1, 0.5, 0.2);
    let env = envelope::generate(Some(&params), 1.0, 44100.0);

    assert_eq!(env.len(), 44100);
    assert_eq!(env[0], 0.0);
    assert!((env[4410] - 1.0).abs() < 1e-9);
    assert!((env[8820] - 0.5).abs() < 1e-9);
    assert_eq!(env[env.len() - 1], 0.0);
}

// ============================================================================
// Graph
// ============================================================================

#[test]
fn test_sum_equals_independent_chains() {
    let patch = three_chain_patch();
    let request = RenderRequest::new(16000, 0.25);
    let output = render_patch(&patch, &request).unwrap();

    let independent: Vec<Vec<f64>> = (0..3)
        .map(|chain| {
            let params = patch.chain_params(chain).unwrap();
            render_chain(&params, patch.base_frequency, request.sample_rate, request.duration).unwrap()
        })
        .collect();

    assert_eq!(output.chains, independent);
    for n in 0..output.len() {
        let expected = independent[0][n] + independent[1][n] + independent[2][n];
        assert!((output.summed[n] - expected).abs() < 1e-12);
    }
}

#[test]
fn test_single_operator_chain_is_enveloped_sine() {
    let env = AdsrParams::new(0.02, 0.03, 0.8, 0.05);
    let patch = Patch::builder(&[1])
        .base_frequency(330.0)
        .operator(0, OperatorParams::ratio(1.0, 9.0).with_envelope(env))
        .build();
    let request = RenderRequest::new(22050, 0.2);
    let output = render_patch(&patch, &request).unwrap();

    let gains = envelope::generate(Some(&env), 0.2, 22050.0);
    for (n, sample) in output.output.iter().enumerate() {
        let t = n as f64 / 22050.0;
        let expected = gains[n] * (TAU * 330.0 * t).sin();
        assert!((sample - expected).abs() < 1e-12, "sample {n}");
    }
}

#[test]
fn test_absent_output_envelope_passes_sum_through() {
    let mut patch = three_chain_patch();
    patch.envelope = None;
    let output = render_patch(&patch, &RenderRequest::new(8000, 0.1)).unwrap();

    assert!(output.envelope.iter().all(|&g| g == 1.0));
    assert_eq!(output.output, output.summed);
}

#[test]
fn test_invalid_patch_fails_before_render() {
    let mut patch = Patch::for_algorithm(&[2, 2]).unwrap();
    patch.operators.remove(&3);

    match render_patch(&patch, &RenderRequest::default()) {
        Err(EngineError::InvalidPatch(err)) => assert!(err.message.contains('3')),
        other => panic!("expected InvalidPatch, got {other:?}"),
    }
}

#[test]
fn test_empty_algorithm() {
    assert!(matches!(SynthGraph::new(&[0]), Err(EngineError::EmptyAlgorithm)));
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_render_is_deterministic() {
    let patch = three_chain_patch();
    let request = RenderRequest::new(44100, 0.5);

    let first = render_patch(&patch, &request).unwrap();
    let second = render_patch(&patch, &request).unwrap();
    let serial = render_patch(&patch, &request.with_parallel(false)).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, serial);
    assert_eq!(first.fingerprint(), serial.fingerprint());
}

#[test]
fn test_default_patch_renders_bounded() {
    let output = render_patch(&Patch::default(), &RenderRequest::new(44100, 1.0)).unwrap();
    assert_eq!(output.len(), 44100);
    assert!(output.peak() <= 3.0);
    assert!(output.peak() > 0.1);
    assert_eq!(output.output[output.len() - 1], 0.0);
}
