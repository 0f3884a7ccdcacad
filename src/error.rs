use thiserror::Error;

/// A post that cannot be traversed or decoded. Any one of these aborts the whole batch.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("missing field `{segment}` while resolving `{path}`")]
    MissingField { segment: String, path: String },

    #[error("`{path}` is not a sequence")]
    NotSequence { path: String },

    #[error("malformed entry under `{path}`: {source}")]
    Entry {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed post fields: {0}")]
    Fields(#[source] serde_json::Error),

    #[error("unparseable `modified` timestamp {0:?}")]
    Timestamp(String),
}

/// Why the card grid could not be produced. Only ever logged; the page shows a generic panel.
#[derive(Debug, Error)]
pub enum Fault {
    #[error("transport fault: {0:#}")]
    Transport(anyhow::Error),

    #[error("post #{index} is malformed: {source}")]
    Shape {
        index: usize,
        #[source]
        source: ShapeError,
    },
}
