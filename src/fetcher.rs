use anyhow::{Context as _, anyhow};
use serde_json::Value;
use url::Url;

/// One-shot JSON fetches. No retries and no timeout: a request either resolves or fails.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(user_agent: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build reqwest client")?;
        Ok(Self { client })
    }

    pub async fn get_json(&self, url: Url) -> anyhow::Result<Value> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {}", url))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("GET {} failed with status {}", url, status));
        }

        let bytes = resp.bytes().await.context("read response body")?;
        tracing::debug!(%url, bytes = bytes.len(), "fetched");
        serde_json::from_slice(&bytes).with_context(|| format!("parse JSON from {}", url))
    }
}

/// The posts endpoint must answer with a JSON array.
pub fn into_posts(value: Value) -> anyhow::Result<Vec<Value>> {
    match value {
        Value::Array(posts) => Ok(posts),
        other => Err(anyhow!(
            "expected a JSON array of posts, got {}",
            json_kind(&other)
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
