use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::Deserialize as _;
use serde_json::Value;

use crate::builtin;
use crate::error::{Fault, ShapeError};
use crate::post::{EmbeddedAuthor, Id, RawPost, Term};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub link: String,
}

impl Author {
    pub fn canonical() -> Self {
        Self {
            name: builtin::DEFAULT_AUTHOR_NAME.to_string(),
            link: builtin::DEFAULT_AUTHOR_LINK.to_string(),
        }
    }
}

/// Lookup paths and fallback labels used while normalizing.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub inner_props_path: Vec<String>,
    pub author_path: Vec<String>,
    pub default_topic: String,
    pub default_category: String,
    pub default_author: Author,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        let owned =
            |path: &[&str]| -> Vec<String> { path.iter().map(|s| s.to_string()).collect() };
        Self {
            inner_props_path: owned(builtin::DEFAULT_INNER_PROPS_PATH),
            author_path: owned(builtin::DEFAULT_AUTHOR_PATH),
            default_topic: builtin::DEFAULT_TOPIC.to_string(),
            default_category: builtin::DEFAULT_CATEGORY.to_string(),
            default_author: Author::canonical(),
        }
    }
}

/// Featured media reference, passed through to the card untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedMedia(pub Value);

impl fmt::Display for FeaturedMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::Null => Ok(()),
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// Render-ready view of one post.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRecord {
    pub topic: String,
    pub category: String,
    pub date: String,
    pub featured_media: FeaturedMedia,
    pub link: String,
    pub title: String,
    pub author: Author,
}

/// Per-post map from term id to term. Duplicate ids keep the last entry seen.
#[derive(Debug, Default)]
pub struct TermTable {
    terms: HashMap<String, Term>,
}

impl TermTable {
    pub fn get(&self, id: &Id) -> Option<&Term> {
        self.terms.get(&id.key())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn first_known<'a>(&'a self, ids: &[Id]) -> Option<&'a Term> {
        ids.iter().find_map(|id| self.get(id))
    }
}

pub fn build_term_table(
    post: &RawPost,
    inner_props_path: &[String],
) -> Result<TermTable, ShapeError> {
    let joined = || inner_props_path.join(".");
    let mut table = TermTable::default();
    for group in post.lookup_sequence(inner_props_path)? {
        let group = group
            .as_array()
            .ok_or_else(|| ShapeError::NotSequence { path: joined() })?;
        for raw in group {
            let term = Term::deserialize(raw).map_err(|source| ShapeError::Entry {
                path: joined(),
                source,
            })?;
            // Entries without an id can never be looked up.
            let Some(key) = term.id.as_ref().map(Id::key) else {
                continue;
            };
            // Later groups overwrite earlier ones.
            table.terms.insert(key, term);
        }
    }
    Ok(table)
}

/// Author ids compare strictly: `5` never matches `"5"`.
pub fn resolve_author(
    post: &RawPost,
    author_path: &[String],
    default: &Author,
) -> Result<Author, ShapeError> {
    let authors = post.lookup_sequence(author_path)?;
    let Some(wanted) = post.author.as_ref() else {
        return Ok(default.clone());
    };

    let found = authors
        .iter()
        .filter_map(|raw| EmbeddedAuthor::deserialize(raw).ok())
        .find(|author| author.id.as_ref() == Some(wanted));

    Ok(match found {
        Some(author) => Author {
            name: author.name.unwrap_or_else(|| default.name.clone()),
            link: author.link.unwrap_or_else(|| default.link.clone()),
        },
        None => default.clone(),
    })
}

/// `topic` beats `group` beats `tags`. Always upper-cased.
pub fn resolve_topic(post: &RawPost, terms: &TermTable, default: &str) -> String {
    let term = [&post.topic, &post.group, &post.tags]
        .into_iter()
        .find_map(|ids| terms.first_known(ids));
    term.and_then(|t| t.name.as_deref())
        .unwrap_or(default)
        .to_uppercase()
}

pub fn resolve_category(post: &RawPost, terms: &TermTable, default: &str) -> String {
    terms
        .first_known(&post.categories)
        .and_then(|t| t.name.as_deref())
        .unwrap_or(default)
        .to_string()
}

/// Formats `modified` as e.g. `5 March 2024`, in the local time zone.
pub fn resolve_date(post: &RawPost) -> Result<String, ShapeError> {
    let date = local_calendar_date(&post.modified)
        .ok_or_else(|| ShapeError::Timestamp(post.modified.clone()))?;
    Ok(date.format("%-d %B %Y").to_string())
}

/// Offset-less date-times that are already local wall time.
const LOCAL_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn local_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    for format in LOCAL_DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    // A bare date means midnight UTC, which may fall on another local day.
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(
        date.and_hms_opt(0, 0, 0)?
            .and_utc()
            .with_timezone(&Local)
            .date_naive(),
    )
}

pub fn prepare_post(
    post: &RawPost,
    options: &NormalizeOptions,
) -> Result<DisplayRecord, ShapeError> {
    let terms = build_term_table(post, &options.inner_props_path)?;
    let author = resolve_author(post, &options.author_path, &options.default_author)?;
    Ok(DisplayRecord {
        topic: resolve_topic(post, &terms, &options.default_topic),
        category: resolve_category(post, &terms, &options.default_category),
        date: resolve_date(post)?,
        featured_media: FeaturedMedia(post.featured_media.clone()),
        link: post.link.clone(),
        title: post.title.rendered.clone(),
        author,
    })
}

/// Normalizes every post in order. The first malformed post fails the whole batch.
pub fn normalize(
    posts: &[Value],
    options: &NormalizeOptions,
) -> Result<Vec<DisplayRecord>, Fault> {
    posts
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            RawPost::from_value(raw)
                .and_then(|post| prepare_post(&post, options))
                .map_err(|source| Fault::Shape { index, source })
        })
        .collect()
}
