//! Document model.
//!
//! A document is an opaque key plus an open map of fields. The pipeline
//! only ever interprets three of them: the source text, the computed
//! vector, and a display title. Everything else is carried through
//! untouched so that snapshots produced by an external change-capture
//! trigger survive a full replace byte-for-byte.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use docvec_embeddings::Embedding;

/// Field holding the source text to embed.
pub const TEXT_FIELD: &str = "plot";

/// Field holding the computed vector.
pub const EMBEDDING_FIELD: &str = "plot_embedding";

/// Field holding the display title.
pub const TITLE_FIELD: &str = "title";

/// A stored document: key plus open field map.
///
/// A document is a *candidate* for embedding iff the text field is
/// present and the vector field is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Opaque unique key.
    #[serde(rename = "_id")]
    pub id: String,

    /// All remaining fields, flattened.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Create an empty document with the given key.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Set a field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set the source text field.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_field(TEXT_FIELD, text.into())
    }

    /// Set the display title field.
    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with_field(TITLE_FIELD, title.into())
    }

    /// The source text, if present.
    pub fn text(&self) -> Option<&str> {
        self.fields.get(TEXT_FIELD).and_then(Value::as_str)
    }

    /// The display title, if present.
    pub fn title(&self) -> Option<&str> {
        self.fields.get(TITLE_FIELD).and_then(Value::as_str)
    }

    /// Whether the vector field is present.
    pub fn has_embedding(&self) -> bool {
        self.fields.contains_key(EMBEDDING_FIELD)
    }

    /// The stored vector, if present and numeric.
    pub fn embedding(&self) -> Option<Embedding> {
        let values = self.fields.get(EMBEDDING_FIELD)?.as_array()?;
        values
            .iter()
            .map(|v| v.as_f64().map(|f| f as f32))
            .collect()
    }

    /// Whether this document still needs its vector computed.
    pub fn is_candidate(&self) -> bool {
        self.text().is_some() && !self.has_embedding()
    }

    /// Return the snapshot with the vector field merged in.
    ///
    /// The write downstream is a full-document replace, so the vector is
    /// never persisted partially.
    pub fn with_embedding(mut self, embedding: &[f32]) -> Self {
        let values: Vec<Value> = embedding.iter().map(|f| Value::from(f64::from(*f))).collect();
        self.fields.insert(EMBEDDING_FIELD.to_string(), Value::Array(values));
        self
    }
}

/// A similarity search hit, projected to the caller-facing fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// Document key.
    #[serde(rename = "_id")]
    pub id: String,

    /// Display title, when the document has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Source text excerpt.
    #[serde(rename = "plot", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Similarity score, higher is closer.
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_candidate_invariant() {
        let no_text = Document::new("a");
        let candidate = Document::new("b").with_text("a plot");
        let processed = Document::new("c")
            .with_text("a plot")
            .with_embedding(&[0.1, 0.2]);
        let vector_only = Document::new("d").with_embedding(&[0.1]);

        assert!(!no_text.is_candidate());
        assert!(candidate.is_candidate());
        assert!(!processed.is_candidate());
        assert!(!vector_only.is_candidate());
    }

    #[test]
    fn test_embedding_round_trip() {
        let doc = Document::new("a").with_embedding(&[0.5, -0.25]);
        assert_eq!(doc.embedding(), Some(vec![0.5, -0.25]));
    }

    #[test]
    fn test_unknown_fields_survive_serde() {
        let raw = serde_json::json!({
            "_id": "movie-1",
            "title": "The Match",
            "plot": "a story about sports",
            "year": 1994,
            "genres": ["drama"],
        });

        let doc: Document = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(doc.id, "movie-1");
        assert_eq!(doc.text(), Some("a story about sports"));
        assert!(doc.is_candidate());

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_with_embedding_replaces_existing() {
        let doc = Document::new("a")
            .with_embedding(&[1.0])
            .with_embedding(&[2.0, 3.0]);
        assert_eq!(doc.embedding(), Some(vec![2.0, 3.0]));
    }
}
