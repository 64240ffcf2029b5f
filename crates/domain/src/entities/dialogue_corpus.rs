//! Dialogue corpus entity
//!
//! The corpus is a JSON document of conversations, each holding ordered
//! dialogue lines with their audio asset paths. Fields this model does not
//! know about are kept in `extra`, and a rewritten document keeps the key
//! order of the file it was read from.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::DomainError;
use crate::value_objects::DialogueId;

/// Build the audio file name for one dialogue line
///
/// `audio_file_name("vietnamese", &1_u64.into(), &3_u64.into())` is
/// `vietnamese_1_3.mp3`.
#[must_use]
pub fn audio_file_name(prefix: &str, conversation_id: &DialogueId, line_id: &DialogueId) -> String {
    format!("{prefix}_{conversation_id}_{line_id}.mp3")
}

/// Distinguish an explicit `null` from a missing key
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// One spoken line inside a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueLine {
    /// Line identifier, unique within its conversation
    pub id: DialogueId,
    /// Text to be spoken
    pub text: String,
    /// Short language tag of the text (e.g. `vi`, `en`)
    #[serde(default)]
    pub language: String,
    /// Default audio asset used by the player
    ///
    /// `None` when the key is absent, `Some(None)` for an explicit `null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub audio_file: Option<Option<String>>,
    /// Audio asset per language key
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub audio_paths: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DialogueLine {
    /// Create a line with no audio attached
    pub fn new(id: impl Into<DialogueId>, text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            language: language.into(),
            audio_file: None,
            audio_paths: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    /// Insert or overwrite the audio path for `key`, returning the old value
    pub fn set_audio_path(&mut self, key: impl Into<String>, path: impl Into<String>) -> Option<String> {
        self.audio_paths.insert(key.into(), path.into())
    }

    /// Whether the document has an `audioFile` key for this line, even a null one
    #[must_use]
    pub const fn has_audio_file(&self) -> bool {
        self.audio_file.is_some()
    }

    /// The default audio path, if one is set
    #[must_use]
    pub fn default_audio(&self) -> Option<&str> {
        self.audio_file.as_ref().and_then(Option::as_deref)
    }

    /// Point the default audio at `path`
    pub fn set_default_audio(&mut self, path: impl Into<String>) {
        self.audio_file = Some(Some(path.into()));
    }

    /// Whether the line is written in `language` (compared case-insensitively)
    #[must_use]
    pub fn is_in_language(&self, language: &str) -> bool {
        self.language.eq_ignore_ascii_case(language)
    }
}

/// A titled sequence of dialogue lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation identifier
    pub id: DialogueId,
    /// Display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Lines in speaking order
    #[serde(default)]
    pub dialogues: Vec<DialogueLine>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new(id: impl Into<DialogueId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            dialogues: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Append a line
    #[must_use]
    pub fn with_line(mut self, line: DialogueLine) -> Self {
        self.dialogues.push(line);
        self
    }

    /// Title for logs, falling back to the id
    #[must_use]
    pub fn label(&self) -> String {
        self.title.clone().unwrap_or_else(|| self.id.to_string())
    }
}

/// The whole corpus document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueCorpus {
    /// All conversations in file order
    #[serde(default)]
    pub conversations: Vec<Conversation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Document as it was read, used to restore key order on write
    #[serde(skip)]
    layout: Option<Value>,
}

impl DialogueCorpus {
    /// Create a corpus from conversations
    #[must_use]
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations,
            ..Self::default()
        }
    }

    /// Parse a corpus from JSON text
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let layout: Value = serde_json::from_str(json)?;
        let mut corpus: Self = serde_json::from_value(layout.clone())?;
        corpus.layout = Some(layout);
        Ok(corpus)
    }

    /// Serialize as 2-space indented JSON; non-ASCII text is written as-is
    ///
    /// Keys that came from the source document keep their position; new
    /// keys follow them.
    pub fn to_pretty_json(&self) -> Result<String, DomainError> {
        let value = serde_json::to_value(self)?;
        let value = match &self.layout {
            Some(layout) => follow_layout(value, layout),
            None => value,
        };
        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Total number of dialogue lines across all conversations
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.conversations.iter().map(|c| c.dialogues.len()).sum()
    }

    /// Iterate `(conversation, line)` pairs in file order
    pub fn lines(&self) -> impl Iterator<Item = (&Conversation, &DialogueLine)> {
        self.conversations
            .iter()
            .flat_map(|c| c.dialogues.iter().map(move |line| (c, line)))
    }
}

/// Rebuild `value` with object keys in the order they have in `layout`
fn follow_layout(value: Value, layout: &Value) -> Value {
    match (value, layout) {
        (Value::Object(mut fields), Value::Object(original)) => {
            let mut ordered = Map::with_capacity(fields.len());
            for (key, old) in original {
                if let Some(new) = fields.shift_remove(key) {
                    ordered.insert(key.clone(), follow_layout(new, old));
                }
            }
            ordered.extend(fields);
            Value::Object(ordered)
        },
        (Value::Array(items), Value::Array(original)) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match original.get(i) {
                    Some(old) => follow_layout(item, old),
                    None => item,
                })
                .collect(),
        ),
        (value, _) => value,
    }
}
