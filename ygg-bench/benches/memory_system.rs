//! Yggdrasil Benchmark Suite
//!
//! Targets for a single-agent run:
//!   memory_commit_single .............. < 5μs
//!   predict_top5_from_200 ............. < 200μs
//!   learn_step_from_200 ............... < 300μs
//!   attachment_update_8_entities ...... < 50μs
//!   bias_report_500_entries ........... < 100μs

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use chrono::{TimeZone, Utc};
use ygg_core::bias::{EmotionalTimeline, TimelineEntry, report};
use ygg_core::config::AttachmentConfig;
use ygg_core::types::{Emotion, EmotionTag, TimeOfDay, Urgency};
use ygg_core::{AttachmentGraph, Event, Learner, LearningState, MemoryStore, Predictor};

const FEATURES: [&str; 12] = [
    "attic",
    "dark room",
    "loud footsteps",
    "ringing doorbell",
    "hushed voices",
    "birthday party",
    "diary",
    "cold wind",
    "warm kitchen",
    "feeling of isolation",
    "radio news",
    "laughter",
];

fn make_event(i: usize) -> Event {
    let features = (0..3)
        .map(|k| FEATURES[(i + k * 5) % FEATURES.len()].to_string())
        .collect();
    let time_of_day = if i % 2 == 0 { TimeOfDay::Day } else { TimeOfDay::Night };
    let urgency = if i % 3 == 0 { Urgency::Urgent } else { Urgency::Peaceful };
    Event::new(format!("event_{i}"), features)
        .with_temporal(time_of_day, urgency)
        .with_social(if i % 4 == 0 { "Alone" } else { "With Family" })
        .with_raw_text(format!("Sentence number {i} of the diary."))
}

fn make_tag(event: &Event, i: usize) -> EmotionTag {
    let emotion = Emotion::CATEGORIES[i % Emotion::CATEGORIES.len()];
    EmotionTag::new(event.id.clone(), emotion, (i % 10) as f64 / 10.0)
}

fn populated_store(n: usize) -> MemoryStore {
    let mut store = MemoryStore::new();
    for i in 0..n {
        let event = make_event(i);
        store.commit(&event, &make_tag(&event, i));
    }
    store
}

/// Benchmark: Commit one tagged event (target: < 5μs).
fn bench_memory_commit(c: &mut Criterion) {
    let event = make_event(42);
    let tag = make_tag(&event, 42);
    c.bench_function("memory_commit_single", |b| {
        b.iter_batched(
            MemoryStore::new,
            |mut store| {
                store.commit(black_box(&event), black_box(&tag));
                store
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: Predict from 200 memories with k = 5 (target: < 200μs).
fn bench_predict(c: &mut Criterion) {
    let store = populated_store(200);
    let predictor = Predictor::default();
    let event = make_event(1_000);

    c.bench_function("predict_top5_from_200", |b| {
        b.iter(|| black_box(predictor.predict(black_box(&store), black_box(&event))));
    });
}

/// Benchmark: Predict then learn over 200 memories (target: < 300μs).
fn bench_learn_step(c: &mut Criterion) {
    let store = populated_store(200);
    let predictor = Predictor::default();
    let learner = Learner::default();
    let event = make_event(1_001);
    let actual = EmotionTag::new(event.id.clone(), Emotion::Joy, 0.9);

    c.bench_function("learn_step_from_200", |b| {
        b.iter_batched(
            || (store.clone(), LearningState::new()),
            |(mut store, mut state)| {
                let prediction = predictor.predict(&store, &event);
                let outcome = learner.learn(&mut store, &mut state, &event, &prediction, &actual);
                black_box(outcome)
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: Attachment update with fuzzy alias resolution (target: < 50μs).
fn bench_attachment_update(c: &mut Criterion) {
    let entities = [
        "Father", "Margot", "Petr", "Mrs. van Daan", "attic", "diary", "Miep", "the grocer",
    ];
    c.bench_function("attachment_update_8_entities", |b| {
        b.iter_batched(
            || AttachmentGraph::new(AttachmentConfig::default()),
            |mut graph| {
                graph.update(black_box(&entities), Emotion::LoveAttachment, 0.8);
                graph
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: Drift report over a 500-entry history (target: < 100μs).
fn bench_bias_report(c: &mut Criterion) {
    let mut timeline = EmotionalTimeline::new();
    for i in 0..500 {
        timeline.record(
            "attic",
            TimelineEntry {
                emotion: Emotion::CATEGORIES[(i / 50) % Emotion::CATEGORIES.len()],
                intensity: 0.5,
                timestamp: Utc
                    .timestamp_opt(1_000_000 + i64::try_from(i).unwrap_or(0), 0)
                    .single()
                    .unwrap_or_default(),
            },
        );
    }

    c.bench_function("bias_report_500_entries", |b| {
        b.iter(|| black_box(report(black_box(&timeline), "attic", 10)));
    });
}

criterion_group!(
    benches,
    bench_memory_commit,
    bench_predict,
    bench_learn_step,
    bench_attachment_update,
    bench_bias_report,
);
criterion_main!(benches);
