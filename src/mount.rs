use std::path::PathBuf;

use anyhow::{Context as _, anyhow};
use kuchiki::traits::TendrilSink as _;

/// The single container whose contents get replaced wholesale.
pub trait MountPoint {
    fn mount(&mut self, markup: &str) -> anyhow::Result<()>;
}

/// Mounts into an HTML page and writes the whole page to `out`. Each call starts from the
/// template again, so the last call wins.
pub struct PageMount {
    template: String,
    selector: String,
    out: PathBuf,
}

impl PageMount {
    pub fn new(template: String, selector: impl Into<String>, out: PathBuf) -> Self {
        Self {
            template,
            selector: selector.into(),
            out,
        }
    }
}

impl MountPoint for PageMount {
    fn mount(&mut self, markup: &str) -> anyhow::Result<()> {
        let page = replace_contents(&self.template, &self.selector, markup)?;

        if let Some(parent) = self.out.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
        }
        std::fs::write(&self.out, &page)
            .with_context(|| format!("write {}", self.out.display()))?;

        tracing::info!(path = %self.out.display(), bytes = page.len(), "mounted");
        Ok(())
    }
}

/// Returns `page` with the children of the first element matching `selector` replaced by `markup`.
pub fn replace_contents(page: &str, selector: &str, markup: &str) -> anyhow::Result<String> {
    let document = kuchiki::parse_html().one(page);
    let target = document
        .select_first(selector)
        .map_err(|()| anyhow!("no element matches {selector:?} in page"))?;
    let target = target.as_node();

    for child in target.children().collect::<Vec<_>>() {
        child.detach();
    }

    // Parsing wraps the fragment in <html><body>; move the body children across.
    let fragment = kuchiki::parse_html().one(markup);
    if let Ok(body) = fragment.select_first("body") {
        for child in body.as_node().children().collect::<Vec<_>>() {
            target.append(child);
        }
    }

    let mut out = Vec::new();
    document.serialize(&mut out).context("serialize page")?;
    String::from_utf8(out).context("page html not utf-8")
}
