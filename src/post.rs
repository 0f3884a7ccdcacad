use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::ShapeError;

/// Opaque identifier used for terms and authors; the API sends numbers, but strings show up too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(serde_json::Number),
    Text(String),
}

impl Id {
    /// Numbers and strings are ids; anything else (`null`, objects, ...) is not.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Id::Number(n.clone())),
            Value::String(s) => Some(Id::Text(s.clone())),
            _ => None,
        }
    }

    /// Lookup key for term tables, where `5`, `5.0` and `"5"` address the same term.
    pub fn key(&self) -> String {
        match self {
            Id::Number(n) if n.is_f64() => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
                _ => n.to_string(),
            },
            _ => self.to_string(),
        }
    }
}

/// Strict equality: numbers compare by value, `5` never equals `"5"`.
impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Id::Number(a), Id::Number(b)) => a == b || a.as_f64() == b.as_f64(),
            (Id::Text(a), Id::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Id {}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{n}"),
            Id::Text(s) => f.write_str(s),
        }
    }
}

/// One entry of the posts collection, as served with `_embed`.
#[derive(Debug, Deserialize)]
pub struct RawPost {
    #[serde(deserialize_with = "lenient_ids")]
    pub topic: Vec<Id>,
    #[serde(deserialize_with = "lenient_ids")]
    pub group: Vec<Id>,
    #[serde(deserialize_with = "lenient_ids")]
    pub tags: Vec<Id>,
    #[serde(deserialize_with = "lenient_ids")]
    pub categories: Vec<Id>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub author: Option<Id>,
    pub modified: String,
    #[serde(default)]
    pub featured_media: Value,
    pub link: String,
    pub title: Rendered,

    /// Everything else, including the `_embedded` side channel.
    #[serde(flatten)]
    pub other_fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Rendered {
    pub rendered: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Term {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<Id>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddedAuthor {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<Id>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// A sequence is required, but entries that cannot be ids are dropped.
fn lenient_ids<'de, D>(deserializer: D) -> Result<Vec<Id>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values.iter().filter_map(Id::from_value).collect())
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<Id>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Id::from_value(&Value::deserialize(deserializer)?))
}

impl RawPost {
    pub fn from_value(value: &Value) -> Result<Self, ShapeError> {
        RawPost::deserialize(value).map_err(ShapeError::Fields)
    }

    /// Walks `path` from the post root. Every segment must exist.
    pub fn lookup(&self, path: &[String]) -> Result<&Value, ShapeError> {
        let missing = |segment: &str| ShapeError::MissingField {
            segment: segment.to_string(),
            path: path.join("."),
        };

        let (first, rest) = path.split_first().ok_or_else(|| missing(""))?;
        let mut target = self.other_fields.get(first).ok_or_else(|| missing(first.as_str()))?;
        for segment in rest {
            target = target.get(segment.as_str()).ok_or_else(|| missing(segment.as_str()))?;
        }
        Ok(target)
    }

    /// Like [`RawPost::lookup`], but the value must be a JSON array.
    pub fn lookup_sequence(&self, path: &[String]) -> Result<&Vec<Value>, ShapeError> {
        self.lookup(path)?
            .as_array()
            .ok_or_else(|| ShapeError::NotSequence {
                path: path.join("."),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    fn minimal() -> Value {
        json!({
            "topic": [], "group": [], "tags": [], "categories": [],
            "author": 1,
            "modified": "2024-03-05T10:00:00",
            "featured_media": 12,
            "link": "https://example.com/a",
            "title": { "rendered": "A" },
            "_embedded": { "wp:term": [], "author": [] }
        })
    }

    #[test]
    fn numeric_and_string_ids_share_a_key() {
        let n: Id = serde_json::from_value(json!(5)).unwrap();
        let s: Id = serde_json::from_value(json!("5")).unwrap();
        assert_eq!(n.key(), s.key());
        assert_ne!(n, s);
    }

    #[test]
    fn integral_floats_key_like_integers() {
        let f: Id = serde_json::from_value(json!(1.0)).unwrap();
        let i: Id = serde_json::from_value(json!(1)).unwrap();
        assert_eq!(f.key(), "1");
        assert_eq!(f, i);

        let frac: Id = serde_json::from_value(json!(1.5)).unwrap();
        assert_eq!(frac.key(), "1.5");
    }

    #[test]
    fn non_id_entries_are_dropped_from_sequences() {
        let mut raw = minimal();
        raw["topic"] = json!([null, 1, {"id": 2}, "x"]);
        let post = RawPost::from_value(&raw).unwrap();
        let keys: Vec<_> = post.topic.iter().map(Id::key).collect();
        assert_eq!(keys, ["1", "x"]);
    }

    #[test]
    fn id_sequences_are_still_required() {
        let mut raw = minimal();
        raw.as_object_mut().unwrap().remove("tags");
        assert!(matches!(
            RawPost::from_value(&raw),
            Err(ShapeError::Fields(_))
        ));

        raw["tags"] = json!(3);
        assert!(RawPost::from_value(&raw).is_err());
    }

    #[test]
    fn lookup_walks_embedded_fields() {
        let post = RawPost::from_value(&minimal()).unwrap();
        assert!(post.lookup_sequence(&path(&["_embedded", "wp:term"])).is_ok());

        let err = post.lookup(&path(&["_embedded", "missing"])).unwrap_err();
        assert!(matches!(err, ShapeError::MissingField { ref segment, .. } if segment == "missing"));
    }

    #[test]
    fn lookup_rejects_non_sequence() {
        let mut raw = minimal();
        raw["_embedded"]["author"] = json!({ "id": 1 });
        let post = RawPost::from_value(&raw).unwrap();
        let err = post.lookup_sequence(&path(&["_embedded", "author"])).unwrap_err();
        assert!(matches!(err, ShapeError::NotSequence { .. }));
    }

    #[test]
    fn missing_title_is_a_shape_error() {
        let mut raw = minimal();
        raw.as_object_mut().unwrap().remove("title");
        assert!(matches!(
            RawPost::from_value(&raw),
            Err(ShapeError::Fields(_))
        ));
    }

    #[test]
    fn missing_featured_media_is_null() {
        let mut raw = minimal();
        raw.as_object_mut().unwrap().remove("featured_media");
        let post = RawPost::from_value(&raw).unwrap();
        assert!(post.featured_media.is_null());
    }
}
