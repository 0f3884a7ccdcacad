use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::error::Fault;
use crate::fetcher::{self, Fetcher};
use crate::html;
use crate::mount::MountPoint;
use crate::normalize::{self, DisplayRecord, NormalizeOptions};
use crate::progress::Progress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Fetching,
    Success,
    Failure,
    Rendered,
}

/// What ended up in the mount point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Cards(usize),
    ErrorPanel,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Cards(n) => write!(f, "{n} cards"),
            Outcome::ErrorPanel => f.write_str("error panel"),
        }
    }
}

/// Fetch, normalize, render, mount. Runs once: [`Orchestrator::run`] consumes it.
pub struct Orchestrator {
    fetcher: Fetcher,
    url: Url,
    options: NormalizeOptions,
    progress: Arc<Progress>,
    phase: Phase,
}

impl Orchestrator {
    pub fn new(
        fetcher: Fetcher,
        url: Url,
        options: NormalizeOptions,
        progress: Arc<Progress>,
    ) -> Self {
        Self {
            fetcher,
            url,
            options,
            progress,
            phase: Phase::Idle,
        }
    }

    /// Mounts either the card grid or the error panel, exactly once. Only a failing mount is
    /// returned as an error; every fetch or normalize fault ends in the error panel.
    pub async fn run<M>(mut self, mount: &mut M) -> anyhow::Result<Outcome>
    where
        M: MountPoint + ?Sized,
    {
        self.drive(mount).await
    }

    async fn drive<M>(&mut self, mount: &mut M) -> anyhow::Result<Outcome>
    where
        M: MountPoint + ?Sized,
    {
        self.enter(Phase::Fetching);
        self.progress.set_stage(format!("fetching {}", self.url));

        let (markup, outcome) = match self.load().await {
            Ok(records) => {
                self.enter(Phase::Success);
                self.progress.set_stage("rendering cards");
                (html::render_grid(&records), Outcome::Cards(records.len()))
            }
            Err(fault) => {
                tracing::error!(error = %fault, url = %self.url, "blog posts unavailable");
                self.enter(Phase::Failure);
                (html::render_error_panel(), Outcome::ErrorPanel)
            }
        };

        mount.mount(&markup.into_string())?;
        self.enter(Phase::Rendered);
        tracing::info!(%outcome, "rendered");
        Ok(outcome)
    }

    async fn load(&self) -> Result<Vec<DisplayRecord>, Fault> {
        let body = self
            .fetcher
            .get_json(self.url.clone())
            .await
            .map_err(Fault::Transport)?;
        let posts = fetcher::into_posts(body).map_err(Fault::Transport)?;
        tracing::info!(posts = posts.len(), "fetched posts");

        self.progress.set_stage("normalizing posts");
        normalize::normalize(&posts, &self.options)
    }

    fn enter(&mut self, next: Phase) {
        tracing::debug!(from = ?self.phase, to = ?next, "phase");
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Calls(Vec<String>);

    impl MountPoint for Calls {
        fn mount(&mut self, markup: &str) -> anyhow::Result<()> {
            self.0.push(markup.to_string());
            Ok(())
        }
    }

    struct Broken;

    impl MountPoint for Broken {
        fn mount(&mut self, _markup: &str) -> anyhow::Result<()> {
            anyhow::bail!("container gone")
        }
    }

    fn unreachable_url() -> Url {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        Url::parse(&format!("http://{addr}/posts.json")).unwrap()
    }

    fn orchestrator(url: Url) -> Orchestrator {
        Orchestrator::new(
            Fetcher::new("test-agent").unwrap(),
            url,
            NormalizeOptions::default(),
            Progress::new(false),
        )
    }

    #[tokio::test]
    async fn failed_fetch_still_ends_rendered() {
        let mut o = orchestrator(unreachable_url());
        assert_eq!(o.phase, Phase::Idle);

        let mut calls = Calls::default();
        let outcome = o.drive(&mut calls).await.unwrap();

        assert_eq!(outcome, Outcome::ErrorPanel);
        assert_eq!(o.phase, Phase::Rendered);
        assert_eq!(calls.0.len(), 1);
    }

    #[tokio::test]
    async fn failed_mount_stops_before_rendered() {
        let mut o = orchestrator(unreachable_url());
        assert!(o.drive(&mut Broken).await.is_err());
        assert_eq!(o.phase, Phase::Failure);
    }
}
