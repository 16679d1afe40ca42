//! Criterion benchmarks for the analysis transforms
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use impact_texture::filters::{generate_window, WindowType};
use impact_texture::transform::{
    gabor_wavelet_transform, lifter_spectrum, stft, GwtConfig, LifterMode,
};
use impact_texture::{FftConfig, SignalSeries};

const SAMPLE_RATE: f64 = 44100.0;

fn generate_test_signal(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            (2.0 * std::f64::consts::PI * 440.0 * t).sin() * 0.5
                + (2.0 * std::f64::consts::PI * 3150.0 * t).sin() * 0.2
        })
        .collect()
}

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft");
    for &size in &[1024usize, 4096, 16384] {
        let signal = SignalSeries::from_samples(generate_test_signal(size), SAMPLE_RATE)
            .expect("valid signal");
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(signal.fft(&FftConfig::default())))
        });
    }
    group.finish();
}

fn bench_stft(c: &mut Criterion) {
    let signal = generate_test_signal(44100);
    let window = generate_window(WindowType::Hamming, 256);
    c.bench_function("stft_1s_256_128", |b| {
        b.iter(|| black_box(stft(black_box(&signal), &window, 128)))
    });
}

fn bench_gwt(c: &mut Criterion) {
    let mut group = c.benchmark_group("gwt");
    group.sample_size(10);
    // 40 ms analysis window at 44.1 kHz
    let signal = generate_test_signal(1764);
    for &channels in &[64usize, 256] {
        let config = GwtConfig {
            channels,
            ..GwtConfig::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(channels), &channels, |b, _| {
            b.iter(|| black_box(gabor_wavelet_transform(black_box(&signal), SAMPLE_RATE, &config)))
        });
    }
    group.finish();
}

fn bench_liftering(c: &mut Criterion) {
    let spectrum: Vec<f64> = (0..512)
        .map(|i| 1.0 + (i as f64 * 0.05).sin().abs())
        .collect();
    c.bench_function("lifter_512_low_15", |b| {
        b.iter(|| black_box(lifter_spectrum(black_box(&spectrum), 15, LifterMode::Low)))
    });
}

criterion_group!(benches, bench_fft, bench_stft, bench_gwt, bench_liftering);
criterion_main!(benches);
