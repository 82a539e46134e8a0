use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use polyvox::pipeline::{AudioInput, LanguageTarget, Pipeline, VoiceProfile};
use polyvox::stt::MockTranscriber;
use polyvox::translate::MockTranslator;
use polyvox::translate::languages::SUPPORTED_LANGUAGES;
use polyvox::tts::MockSynthesizer;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

/// First `count` supported languages as targets
fn targets(count: usize) -> Vec<LanguageTarget> {
    SUPPORTED_LANGUAGES
        .iter()
        .take(count)
        .map(|(code, label)| LanguageTarget::new(*code, *label))
        .collect()
}

/// Pipeline whose translator waits `latency` per call, standing in for a
/// network round trip.
fn pipeline(latency: Duration, targets: &[LanguageTarget]) -> Pipeline {
    let translator = targets.iter().fold(MockTranslator::new(), |mock, target| {
        mock.with_delay(&target.code, latency)
    });
    Pipeline::new(
        Arc::new(MockTranscriber::new().with_response("The quick brown fox jumps over the lazy dog.")),
        Arc::new(translator),
        Arc::new(MockSynthesizer::new()),
    )
}

fn criterion_benchmark(c: &mut Criterion) {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start tokio runtime: {e}");
            return;
        }
    };
    let audio = AudioInput::parse("bench.wav");
    let voice = VoiceProfile::new("bench-voice");

    let mut group = c.benchmark_group("fan_out");
    group.measurement_time(Duration::from_secs(5));

    // With a fixed per-branch latency, total time should stay flat as
    // targets grow if branches really run concurrently.
    for count in [1, 4, 16] {
        let targets = targets(count);
        let pipeline = pipeline(Duration::from_millis(5), &targets);
        group.bench_with_input(BenchmarkId::new("targets", count), &targets, |b, targets| {
            b.iter(|| {
                let artifacts = rt.block_on(pipeline.run(&audio, targets, &voice));
                black_box(artifacts)
            })
        });
    }
    group.finish();

    let targets = targets(4);
    let pipeline = pipeline(Duration::ZERO, &targets);
    c.bench_function("orchestration_overhead", |b| {
        b.iter(|| black_box(rt.block_on(pipeline.run(&audio, &targets, &voice))))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
