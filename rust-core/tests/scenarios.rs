//! End-to-end scenarios through the public API

use std::f64::consts::PI;
use std::io::Cursor;

use fourier_analysis::spectrum::{mod_bessel_i0, SegmentPlan};
use fourier_analysis::{
    fft, ifft, AnalyzerConfig, FourierError, FourierTransform, SegmentRequest, SegmentWarning,
    WindowKind,
};
use num_complex::Complex64;
use rustfft::FftPlanner;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sine(n: usize, cycles: f64) -> Vec<f64> {
    (0..n)
        .map(|i| (2.0 * PI * cycles * i as f64 / n as f64).sin())
        .collect()
}

#[test]
fn sinusoid_power_spectrum() {
    init_logging();
    let config = AnalyzerConfig::default().with_delta_t(0.01).unwrap();
    let mut analyzer = FourierTransform::from_real(&sine(64, 4.0), config);

    let psd = analyzer.power_spectrum().unwrap();
    assert_eq!(psd.len(), 32);

    let (peak_bin, peak) = psd.peak().unwrap();
    assert_eq!(peak_bin, 4);
    assert!((psd.frequencies[peak_bin] - 6.25).abs() < 1e-12);
    for (k, &p) in psd.power.iter().enumerate() {
        if k != peak_bin {
            assert!(p < 1e-6 * peak);
        }
    }
    assert!(analyzer.warnings().is_empty());
}

#[test]
fn known_transform_pair() {
    let input: Vec<Complex64> = [1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0]
        .iter()
        .map(|&x| Complex64::new(x, 0.0))
        .collect();
    let output = fft(&input).unwrap();

    assert!((output[0].re - 4.0).abs() < 1e-12);
    assert!(output[0].im.abs() < 1e-12);
    assert!(output[4].norm() < 1e-12);
    // Odd bins: |X[k]| = |1 + w + w² + w³| with w = e^{iπk/4}
    assert!((output[1].norm() - (4.0 + 2.0 * 2f64.sqrt()).sqrt()).abs() < 1e-12);
    assert!(output[2].norm() < 1e-12);

    let restored = ifft(&output).unwrap();
    for (a, b) in input.iter().zip(restored.iter()) {
        assert!((*a - *b).norm() < 1e-12);
    }
}

#[test]
fn forward_matches_reference_with_positive_exponent() {
    // Forward uses e^{+2πijk/n} without scaling, i.e. rustfft's inverse
    let input: Vec<Complex64> = (0..64)
        .map(|i| Complex64::new((i as f64 * 0.37).cos(), (i as f64 * 0.11).sin()))
        .collect();

    let ours = fft(&input).unwrap();
    let mut reference = input.clone();
    FftPlanner::new()
        .plan_fft_inverse(input.len())
        .process(&mut reference);

    for (a, b) in ours.iter().zip(reference.iter()) {
        assert!((*a - *b).norm() < 1e-9);
    }

    let ours = ifft(&input).unwrap();
    let mut reference = input.clone();
    FftPlanner::new()
        .plan_fft_forward(input.len())
        .process(&mut reference);
    for (a, b) in ours.iter().zip(reference.iter()) {
        assert!((*a - *b / 64.0).norm() < 1e-12);
    }
}

#[test]
fn identical_signals_correlate_at_zero_lag() {
    let data: Vec<f64> = (0..128)
        .map(|i| (i as f64 * 0.2).sin() + 0.5 * (i as f64 * 0.9).cos())
        .collect();
    let mut analyzer = FourierTransform::default();
    analyzer.set_hann();

    let result = analyzer.correlate_pair(&data, &data).unwrap();
    assert_eq!(result.len(), 128);
    assert_eq!(result.peak_lag(), Some(0.0));
    assert_eq!(result.lags[0], -64.0);
}

#[test]
fn unsegmentable_request_falls_back() {
    init_logging();
    let config = AnalyzerConfig::default()
        .with_zero_pad(false)
        .with_segments(SegmentRequest::Count(3));
    let mut analyzer = FourierTransform::from_real(&sine(100, 10.0), config);

    let psd = analyzer.power_spectrum().unwrap();
    let resolution = psd.resolution.as_ref().unwrap();
    assert_eq!(resolution.plan, SegmentPlan::single(100));
    assert_eq!(resolution.padded_length, Some(128));
    assert_eq!(psd.plan, SegmentPlan::single(128));
    assert_eq!(psd.len(), 64);

    let warnings = analyzer.warnings();
    assert!(warnings.contains(SegmentWarning::NotDivisibleBySegmentNumber));
    assert!(warnings.contains(SegmentWarning::PaddedInsteadOfSegmented));
    assert_eq!(warnings.len(), 2);
}

#[test]
fn streamed_spectrum() {
    // Several values per line and ragged line breaks
    let data = sine(64, 8.0);
    let mut text = String::new();
    for (i, x) in data.iter().enumerate() {
        text.push_str(&format!("{x} 0.0"));
        text.push(if i % 3 == 2 { '\n' } else { ' ' });
    }

    let mut analyzer = FourierTransform::default();
    analyzer.set_overlap(true);
    let psd = analyzer
        .power_spectrum_from_reader(Cursor::new(text), 16, 7)
        .unwrap();
    assert_eq!(psd.len(), 8);
    assert_eq!(psd.peak().unwrap().0, 2);

    let err = analyzer
        .power_spectrum_from_reader(Cursor::new("1.0 0.0"), 16, 7)
        .unwrap_err();
    assert!(matches!(err, FourierError::UnexpectedEndOfStream { .. }));
}

#[test]
fn kaiser_window_uses_bessel_ratio() {
    let mut analyzer = FourierTransform::from_real(&[1.0; 33], AnalyzerConfig::default());
    analyzer.set_kaiser(3.0).unwrap();
    analyzer.transform().unwrap();

    // 33 points pad to 64; weights span the padded length
    let weights = analyzer.weights().unwrap();
    assert_eq!(weights.len(), 64);
    let expected_edge = 1.0 / mod_bessel_i0(3.0 * PI);
    assert!((weights[0] - expected_edge).abs() < 1e-12);
    assert_eq!(analyzer.window_name(), "Kaiser, alpha = 3");
}

#[test]
fn bessel_reference_values() {
    // I0(2) = 2.2795853023, I0(10) = 2815.7166284662
    assert!((mod_bessel_i0(2.0) - 2.279_585_302_3).abs() < 1e-6);
    assert!((mod_bessel_i0(10.0) / 2_815.716_628_466_2 - 1.0).abs() < 1e-6);
}

#[test]
fn short_time_follows_frequency_change() {
    let data: Vec<f64> = (0..128)
        .map(|i| {
            let cycles = if i < 64 { 2.0 } else { 6.0 };
            (2.0 * PI * cycles * i as f64 / 32.0).sin()
        })
        .collect();
    let mut analyzer = FourierTransform::from_real(&data, AnalyzerConfig::default());
    analyzer.set_window(WindowKind::Hann);

    let result = analyzer.short_time(32).unwrap();
    assert_eq!(result.num_times(), 97);
    assert_eq!(result.num_frequencies(), 16);

    let peak = |t: usize| {
        let spectrum = result.spectrum_at(t);
        (0..spectrum.len())
            .max_by(|&a, &b| spectrum[a].total_cmp(&spectrum[b]))
            .unwrap()
    };
    assert_eq!(peak(0), 2);
    assert_eq!(peak(96), 6);
}
