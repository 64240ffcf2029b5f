//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::entities::{DialogueCorpus, audio_file_name};
use domain::value_objects::{DialogueId, LanguageCode};
use proptest::prelude::*;

// ============================================================================
// LanguageCode Property Tests
// ============================================================================

mod language_code_tests {
    use super::*;

    proptest! {
        #[test]
        fn well_formed_tags_parse(tag in "[a-z]{2,3}(-[A-Za-z0-9]{2,8}){0,2}") {
            let code = LanguageCode::parse(&tag);
            prop_assert!(code.is_ok());
            let code = code.unwrap();
            prop_assert_eq!(code.as_str(), tag.as_str());
        }

        #[test]
        fn primary_subtag_is_prefix(tag in "[a-zA-Z]{2,3}-[A-Z]{2}") {
            let code = LanguageCode::parse(&tag).unwrap();
            let primary = code.primary_subtag();
            prop_assert_eq!(primary, tag[..tag.find('-').unwrap()].to_ascii_lowercase());
        }

        #[test]
        fn tags_with_spaces_inside_rejected(a in "[a-z]{2}", b in "[A-Z]{2}") {
            let tag = format!("{a} {b}");
            prop_assert!(LanguageCode::parse(&tag).is_err());
        }

        #[test]
        fn display_name_never_empty(tag in "[a-z]{2}-[A-Z]{2}") {
            let code = LanguageCode::parse(&tag).unwrap();
            prop_assert!(!code.display_name().is_empty());
        }
    }
}

// ============================================================================
// DialogueId Property Tests
// ============================================================================

mod dialogue_id_tests {
    use super::*;

    proptest! {
        #[test]
        fn numeric_ids_survive_json(n in any::<u64>()) {
            let id = DialogueId::from(n);
            let json = serde_json::to_string(&id).unwrap();
            let back: DialogueId = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, id);
        }

        #[test]
        fn text_ids_survive_json(s in "[a-z_]{1,12}") {
            let id = DialogueId::from(s.as_str());
            let json = serde_json::to_string(&id).unwrap();
            let back: DialogueId = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, id);
        }

        #[test]
        fn audio_file_names_are_mp3(conv in any::<u32>(), line in "[a-z0-9]{1,6}") {
            let name = audio_file_name(
                "vietnamese",
                &DialogueId::from(u64::from(conv)),
                &DialogueId::from(line.as_str()),
            );
            prop_assert!(name.starts_with("vietnamese_"));
            let suffix = format!("_{line}.mp3");
            prop_assert!(name.ends_with(&suffix));
        }
    }
}

// ============================================================================
// Corpus Property Tests
// ============================================================================

mod corpus_tests {
    use super::*;

    proptest! {
        #[test]
        fn line_count_matches_generated_lines(sizes in prop::collection::vec(0usize..5, 0..6)) {
            let conversations: Vec<serde_json::Value> = sizes
                .iter()
                .enumerate()
                .map(|(c, n)| {
                    let lines: Vec<serde_json::Value> = (0..*n)
                        .map(|l| serde_json::json!({"id": l, "text": "xin chào", "language": "vi"}))
                        .collect();
                    serde_json::json!({"id": c, "dialogues": lines})
                })
                .collect();
            let doc = serde_json::json!({"conversations": conversations}).to_string();

            let corpus = DialogueCorpus::from_json(&doc).unwrap();
            prop_assert_eq!(corpus.line_count(), sizes.iter().sum::<usize>());
            prop_assert_eq!(corpus.lines().count(), corpus.line_count());
        }

        #[test]
        fn audio_path_rewrite_is_idempotent(
            ids in prop::collection::vec(1u64..50, 1..6),
            stale in "/[a-z]{1,8}\\.mp3",
        ) {
            let lines: Vec<serde_json::Value> = ids
                .iter()
                .map(|id| serde_json::json!({
                    "id": id,
                    "note": "keep",
                    "text": "xin chào",
                    "audioPaths": {"vietnamese": stale, "english": "/en.mp3"},
                    "language": "vi"
                }))
                .collect();
            let doc = serde_json::json!({"conversations": [{"id": 1, "dialogues": lines}]}).to_string();

            let rewrite = |json: &str| {
                let mut corpus = DialogueCorpus::from_json(json).unwrap();
                for conversation in &mut corpus.conversations {
                    for line in &mut conversation.dialogues {
                        let name = audio_file_name("vietnamese", &conversation.id, &line.id);
                        line.set_audio_path("vietnamese", format!("/audios/vietnamese/{name}"));
                    }
                }
                corpus.to_pretty_json().unwrap()
            };

            let first = rewrite(&doc);
            let second = rewrite(&first);
            prop_assert_eq!(&first, &second);

            let reloaded = DialogueCorpus::from_json(&second).unwrap();
            for (_, line) in reloaded.lines() {
                prop_assert_eq!(line.audio_paths.len(), 2);
            }
        }
    }
}
