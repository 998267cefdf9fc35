//! Benchmarks for the per-frame hot path: extraction and windowing

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sign_language_recognition::classification::LabelVocabulary;
use sign_language_recognition::constants::SEQUENCE_LENGTH;
use sign_language_recognition::keypoint_extraction::KeypointExtractor;
use sign_language_recognition::landmarks::{Landmark, LandmarkKind, PoseEstimate};

fn random_pose() -> PoseEstimate {
    let mut pose = PoseEstimate::new();
    for kind in LandmarkKind::ALL {
        // Leave a few landmarks absent, as real detections do
        if rand::random::<f32>() < 0.1 {
            continue;
        }
        pose.insert(Landmark {
            kind,
            x: rand::random::<f32>() * 640.0,
            y: rand::random::<f32>() * 480.0,
            visibility: rand::random::<f32>(),
        });
    }
    pose
}

fn benchmark_extract(c: &mut Criterion) {
    let extractor = KeypointExtractor::new();
    let poses: Vec<PoseEstimate> = (0..100).map(|_| random_pose()).collect();

    c.bench_function("extract_keypoints", |b| {
        let mut i = 0;
        b.iter(|| {
            let features = extractor.extract(black_box(&poses[i % poses.len()]));
            i += 1;
            black_box(features)
        });
    });
}

fn benchmark_warm_window_append(c: &mut Criterion) {
    let mut extractor = KeypointExtractor::new();
    let poses: Vec<PoseEstimate> = (0..100).map(|_| random_pose()).collect();

    // Warm the window so every append snapshots a full sequence
    for pose in poses.iter().take(SEQUENCE_LENGTH) {
        let features = extractor.extract(pose);
        extractor.add_to_sequence(features);
    }

    c.bench_function("warm_window_append", |b| {
        let mut i = 0;
        b.iter(|| {
            let features = extractor.extract(&poses[i % poses.len()]);
            i += 1;
            black_box(extractor.add_to_sequence(features))
        });
    });
}

fn benchmark_vocabulary_decode(c: &mut Criterion) {
    let json: String = {
        let entries: Vec<String> = (0..50).map(|i| format!("\"sign_{i}\": {i}")).collect();
        format!("{{{}}}", entries.join(", "))
    };
    let vocabulary = LabelVocabulary::from_json(&json).expect("valid label map");

    c.bench_function("vocabulary_decode", |b| {
        let mut i = 0;
        b.iter(|| {
            let label = vocabulary.label_for(black_box(i % 50));
            i += 1;
            black_box(label)
        });
    });
}

criterion_group!(
    benches,
    benchmark_extract,
    benchmark_warm_window_append,
    benchmark_vocabulary_decode
);
criterion_main!(benches);
