//! Integration Tests: end-to-end emotional learning flows.
//!
//! These tests drive the public API the way a run does: seed memory,
//! predict, compare with ground truth, learn, report.

use ygg_core::bias::{self, report};
use ygg_core::config::YggConfig;
use ygg_core::event::{Event, RawEvent};
use ygg_core::learning::{ErrorBand, Learner};
use ygg_core::metrics::LearningStats;
use ygg_core::mind::Mind;
use ygg_core::persistence::{ResultsReader, ResultsWriter};
use ygg_core::retrieval::{Prediction, Predictor, predict};
use ygg_core::types::{Emotion, EmotionTag, MemoryId, TimeOfDay, Urgency};

fn dark_room(id: &str) -> Event {
    Event::new(id, vec!["dark room".into()])
        .with_social("Alone")
        .with_temporal(TimeOfDay::Day, Urgency::Urgent)
}

fn predicted(emotion: Emotion, intensity: f64) -> Prediction {
    Prediction {
        emotion,
        intensity,
        supporting: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Worked scenarios
// ---------------------------------------------------------------------------

#[test]
fn identical_event_predicts_stored_feeling() {
    let mut mind = Mind::default();
    mind.store
        .commit(&dark_room("event_1"), &EmotionTag::new("event_1", Emotion::Fear, 0.6));

    let prediction = predict(&mind.store, &dark_room("event_2"), 5);
    assert_eq!(prediction.emotion, Emotion::Fear);
    assert!((prediction.intensity - 0.6).abs() < 1e-9);
    assert_eq!(prediction.supporting, [MemoryId::from("event_1")]);
}

#[test]
fn small_error_reinforces_without_contradiction() {
    let mut mind = Mind::default();
    mind.store
        .commit(&dark_room("event_1"), &EmotionTag::new("event_1", Emotion::Fear, 0.6));
    mind.store
        .commit(&dark_room("event_2"), &EmotionTag::new("event_2", Emotion::Joy, 0.6));

    let Mind { store, state, .. } = &mut mind;
    let outcome = Learner::default().learn(
        store,
        state,
        &dark_room("event_3"),
        &predicted(Emotion::Fear, 0.6),
        &EmotionTag::new("event_3", Emotion::Fear, 0.65),
    );

    assert!((outcome.error - 0.05).abs() < 1e-9);
    assert_eq!(outcome.band, ErrorBand::Low);
    assert_eq!(outcome.updated, [MemoryId::from("event_1")]);
    assert!(!outcome.contradiction_logged);
    assert!(outcome.new_memory.is_none());
    assert_eq!(mind.store.len(), 2);
    assert!(mind.state.contradictions.is_empty());
    assert!(mind.state.bias_meter.is_empty());
}

#[test]
fn large_mismatch_commits_and_tracks_bias() {
    let mut mind = Mind::default();
    mind.store
        .commit(&dark_room("event_1"), &EmotionTag::new("event_1", Emotion::Joy, 0.9));

    let Mind { store, state, .. } = &mut mind;
    let outcome = Learner::default().learn(
        store,
        state,
        &dark_room("event_2"),
        &predicted(Emotion::Joy, 0.9),
        &EmotionTag::new("event_2", Emotion::Fear, 0.1),
    );

    assert!((outcome.error - 0.8).abs() < 1e-9);
    assert!(outcome.contradiction_logged);
    let id = outcome.new_memory.expect("new memory");
    let memory = mind.store.get(&id).expect("committed");
    assert_eq!(memory.emotion(), Emotion::Fear);
    assert!((memory.intensity() - 0.1).abs() < 1e-9);
    assert!(mind.store.ids_for(Emotion::Fear).contains(&id));

    let entry = &mind.state.contradictions.entries()[0];
    assert!((entry.error - 0.8).abs() < 1e-9);
    assert_eq!(entry.event_id, id);
    assert_eq!(
        mind.state.bias_meter.counts("dark room").and_then(|c| c.get(&Emotion::Fear)),
        Some(&1)
    );
    assert_eq!(mind.state.timeline.history("dark room").map(<[_]>::len), Some(1));
    assert!(mind.store.is_consistent());
}

// ---------------------------------------------------------------------------
// Full cycle: seed → learn → report → persist → reload
// ---------------------------------------------------------------------------

#[test]
fn full_learning_cycle() {
    let config = YggConfig::default();
    let mut mind = Mind::new(&config);
    let predictor = Predictor::new(config.predictor.clone());
    let learner = Learner::new(config.learning.clone());
    let mut stats = LearningStats::new();

    // Phase 1: the attic is a happy place.
    for i in 1..=4 {
        let id = format!("event_{i}");
        let event = Event::new(id.as_str(), vec!["attic".into(), "window".into()])
            .with_social("With Peter");
        mind.store.commit(&event, &EmotionTag::new(id.as_str(), Emotion::Joy, 0.8));
        mind.graph.update(&["Peter"], Emotion::Joy, 0.8);
    }
    assert_eq!(mind.mood(), Emotion::Joy);

    // Phase 2: then it becomes frightening.
    for i in 5..=7 {
        let id = format!("event_{i}");
        let event = Event::new(id.as_str(), vec!["attic".into(), "footsteps".into()])
            .with_social("Alone")
            .with_raw_text("Footsteps downstairs.");
        let prediction = predictor.predict(&mind.store, &event);
        stats.predictions_made += 1;
        let actual = EmotionTag::new(id.as_str(), Emotion::Fear, 0.2);

        let Mind { store, state, graph } = &mut mind;
        let outcome = learner.learn(store, state, &event, &prediction, &actual);
        stats.record(&outcome);
        if outcome.new_memory.is_some() && !outcome.memory_committed {
            store.commit(&event, &actual);
        }
        if outcome.new_memory.is_some() {
            let r = report(&state.timeline, event.concept(), config.bias.recent_window)
                .expect("concept has history");
            if r.shift_detected {
                stats.mark_shifted(event.concept());
            }
        }
        graph.update(&["Peter", "Mother"], actual.emotion, actual.intensity);
    }

    assert!(stats.contradictions >= 1);
    assert!(!mind.store.ids_for(Emotion::Fear).is_empty());
    assert!(mind.store.is_consistent());

    let peter = mind.graph.attachment("peter").expect("peter");
    assert_eq!(peter.history.len(), 7);
    let mother = mind.graph.attachment("Mother").expect("mother");
    assert!(mother.weight < 0.0);

    let dir = tempfile::tempdir().expect("tempdir");
    ResultsWriter::create(dir.path())
        .expect("create")
        .write_all(&mind, &stats)
        .expect("write");
    let reader = ResultsReader::open(dir.path());
    let timeline = reader.timeline().expect("timeline");
    let r = report(&timeline, "attic", 5).expect("attic report");
    assert_eq!(r.dominant, Emotion::Fear);
    assert_eq!(reader.memory_store().expect("store").len(), mind.store.len());
}

#[test]
fn raw_collaborator_record_feeds_the_engine() {
    let raw: RawEvent = serde_json::from_str(
        r#"{
            "Event ID": "event_9",
            "Sensory Features": ["radio", " ", "news"],
            "Temporal Context": {"TimeOfDay": "night", "Urgency": "Urgent"},
            "Social Context": "With Family"
        }"#,
    )
    .expect("json");
    let event = Event::try_from(raw).expect("valid");
    assert_eq!(event.sensory_features, ["radio", "news"]);
    assert!(event.raw_text.is_empty());

    let mut mind = Mind::default();
    let tag = EmotionTag::validated(event.id.clone(), Some("I feel Fear."), Some(1.7));
    assert_eq!(tag.emotion, Emotion::Fear);
    assert!((tag.intensity - 0.5).abs() < 1e-9);
    mind.store.commit(&event, &tag);
    assert_eq!(predict(&mind.store, &event, 5).emotion, Emotion::Fear);
}

#[test]
fn digest_mentions_focused_concept() {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    let mut mind = Mind::default();
    mind.store
        .commit(&dark_room("event_1"), &EmotionTag::new("event_1", Emotion::Joy, 0.9));
    let learner = Learner::default();
    for (i, emotion) in [(2, Emotion::Fear), (3, Emotion::Sadness), (4, Emotion::Fear)] {
        let id = format!("event_{i}");
        let Mind { store, state, .. } = &mut mind;
        learner.learn(
            store,
            state,
            &dark_room(&id),
            &predicted(Emotion::Joy, 0.9),
            &EmotionTag::new(id.as_str(), emotion, 0.1),
        );
    }

    let (bias_lines, contradiction_lines) = bias::summarize(
        &mind.state.bias_meter,
        &mind.state.contradictions,
        Some("dark"),
        5,
        &YggConfig::default().bias,
        &mut StdRng::seed_from_u64(3),
    );
    assert_eq!(bias_lines, ["- dark room: Fear → Sadness"]);
    assert_eq!(contradiction_lines.len(), 3);
    assert_eq!(contradiction_lines[0], "- dark room: Joy → Fear");
}
