//! Prompt and Extraction Golden Set.
//!
//! Curated prompt renderings and recorded model responses used to check that
//! templates produce well-formed prompts and that typical (and typically
//! messy) model output is recovered into the expected structure.
//!
//! Run with `cargo test -p ygg-llm --test eval_golden`.

use ygg_llm::parse;
use ygg_llm::prompt;

/// A golden prompt rendering case.
struct GoldenCase {
    /// Human-readable name for the test case.
    name: &'static str,
    /// Which prompt template constant to use.
    template: &'static str,
    /// Template variables to fill in.
    vars: Vec<(&'static str, &'static str)>,
    /// Strings that MUST appear in the rendered prompt.
    prompt_must_contain: Vec<&'static str>,
    /// Strings that MUST NOT appear in the rendered prompt.
    prompt_must_not_contain: Vec<&'static str>,
}

fn golden_cases() -> Vec<GoldenCase> {
    vec![
        // ---------------------------------------------------------------
        // 1. Event encoding of a quiet morning
        // ---------------------------------------------------------------
        GoldenCase {
            name: "encoding_quiet_morning",
            template: prompt::EVENT_ENCODING_USER,
            vars: vec![
                ("event_id", "event_1"),
                ("sentence", "I woke at six and the house was silent."),
            ],
            prompt_must_contain: vec![
                "(given: event_1)",
                "I woke at six",
                r#"{"TimeOfDay": "Day" | "Night" | "Unknown""#,
            ],
            prompt_must_not_contain: vec!["{event_id}", "{sentence}", "{{"],
        },
        // ---------------------------------------------------------------
        // 2. Event encoding with braces inside the sentence
        // ---------------------------------------------------------------
        GoldenCase {
            name: "encoding_sentence_with_braces",
            template: prompt::EVENT_ENCODING_USER,
            vars: vec![
                ("event_id", "event_12"),
                ("sentence", "Margot wrote {secret} on the page and laughed."),
            ],
            prompt_must_contain: vec!["{secret}", "event_12"],
            prompt_must_not_contain: vec!["{sentence}"],
        },
        // ---------------------------------------------------------------
        // 3. Emotion tagging of an encoded event
        // ---------------------------------------------------------------
        GoldenCase {
            name: "tagging_footsteps",
            template: prompt::EMOTION_TAGGING_USER,
            vars: vec![
                ("event_id", "event_7"),
                (
                    "event_json",
                    r#"{"Event ID": "event_7", "Sensory Features": ["loud footsteps"], "Temporal Context": {"TimeOfDay": "Night", "Urgency": "Urgent"}}"#,
                ),
            ],
            prompt_must_contain: vec![
                r#""Event ID": "event_7","#,
                "loud footsteps",
                r#"{"TimeOfDay": "Night", "Urgency": "Urgent"}}"#,
            ],
            prompt_must_not_contain: vec!["{event_json}", "{event_id}"],
        },
        // ---------------------------------------------------------------
        // 4. Entity extraction
        // ---------------------------------------------------------------
        GoldenCase {
            name: "entities_annex_dinner",
            template: prompt::ENTITY_EXTRACTION_USER,
            vars: vec![(
                "text",
                "Father and Peter carried the potatoes up to the attic.",
            )],
            prompt_must_contain: vec!["Father and Peter", "Example output:"],
            prompt_must_not_contain: vec!["{text}"],
        },
    ]
}

// ---------------------------------------------------------------------------
// Template rendering
// ---------------------------------------------------------------------------

#[test]
fn golden_prompts_render_without_unresolved_vars() {
    for case in &golden_cases() {
        let rendered = prompt::render_template(case.template, &case.vars);

        for needle in &case.prompt_must_contain {
            assert!(
                rendered.contains(needle),
                "Golden case '{}': rendered prompt must contain '{}' but doesn't.\nRendered:\n{}",
                case.name,
                needle,
                &rendered[..rendered.len().min(500)]
            );
        }
        for needle in &case.prompt_must_not_contain {
            assert!(
                !rendered.contains(needle),
                "Golden case '{}': rendered prompt must NOT contain '{}' but does.\nRendered:\n{}",
                case.name,
                needle,
                &rendered[..rendered.len().min(500)]
            );
        }
    }
}

#[test]
fn all_prompts_demand_structured_output() {
    let prompts = [
        ("event_encoding", prompt::EVENT_ENCODING_SYSTEM),
        ("emotion_tagging", prompt::EMOTION_TAGGING_SYSTEM),
        ("entity_extraction", prompt::ENTITY_EXTRACTION_SYSTEM),
    ];
    for (name, template) in &prompts {
        assert!(template.starts_with("You are"), "'{name}' must establish a role");
        assert!(
            template.contains("JSON") || template.contains("list"),
            "'{name}' must ask for structured output"
        );
    }
}

#[test]
fn tagging_prompt_lists_every_category() {
    for label in ["Joy", "Sadness", "Fear", "Anger", "Curiosity", "Love/Attachment"] {
        assert!(prompt::EMOTION_TAGGING_SYSTEM.contains(label));
        assert!(prompt::EMOTION_TAGGING_USER.contains(label));
    }
}

// ---------------------------------------------------------------------------
// Recorded responses
// ---------------------------------------------------------------------------

#[test]
fn recorded_encoding_response() {
    let response = r#"Here is the extracted event:

```json
{
  "Event ID": "event_3",
  "Sensory Features": ["ringing doorbell", "hushed voices", "fear of discovery"],
  "Temporal Context": {"TimeOfDay": "Night", "Urgency": "Urgent"},
  "Social Context": "With Family",
  "Raw Text": "The doorbell rang and we all held our breath."
}
```"#;
    let value = parse::extract_json_object(response).expect("event");
    assert_eq!(value["Event ID"], "event_3");
    assert_eq!(value["Sensory Features"][0], "ringing doorbell");
    assert_eq!(value["Temporal Context"]["Urgency"], "Urgent");
}

#[test]
fn recorded_tagging_responses() {
    let chatty = r#"Based on the event, I would say:
{"Event ID": "event_3", "Assigned Emotion": "Fear", "Emotion Intensity": 0.85}
This reflects the tension of the moment."#;
    let value = parse::extract_tag_object(chatty).expect("tag");
    assert_eq!(value["Assigned Emotion"], "Fear");
    assert_eq!(value["Emotion Intensity"], 0.85);

    let refusal = "I am unable to assign an emotion to this text.";
    assert!(parse::extract_tag_object(refusal).is_err());
}

#[test]
fn recorded_entity_responses() {
    let cases: [(&str, &[&str]); 5] = [
        (r#"["Father", "Margot", "diary"]"#, &["Father", "Margot", "diary"]),
        ("['Mrs. Van Daan', 'kitchen']", &["Mrs. Van Daan", "kitchen"]),
        (
            "Entities found:\n[\"Peter\", \"attic window\"]",
            &["Peter", "attic window"],
        ),
        ("[Miep, it, the grocer, they]", &["Miep", "the grocer"]),
        ("[]", &[]),
    ];
    for (response, expected) in cases {
        assert_eq!(parse::parse_entity_list(response), expected, "response: {response}");
    }
}
