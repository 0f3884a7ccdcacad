use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use url::Url;

use crate::builtin;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProgressMode {
    /// Enable progress UI when stderr is a TTY.
    Auto,
    /// Always enable progress UI (even when piped).
    Always,
    /// Never show progress UI.
    Never,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// WordPress posts endpoint returning a JSON array of posts with `_embedded` terms and authors.
    #[arg(long, default_value = builtin::DEFAULT_FETCH_URL)]
    pub url: Url,

    /// HTML page to mount the cards into. Defaults to a minimal built-in page.
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// CSS selector of the container whose contents are replaced.
    #[arg(long, default_value = builtin::MOUNT_SELECTOR)]
    pub selector: String,

    /// Where the rendered page is written.
    #[arg(long, default_value = "index.html")]
    pub out: PathBuf,

    /// HTTP User-Agent used for the posts request.
    #[arg(long, default_value = "blog-card-render/0.1")]
    pub user_agent: String,

    /// Progress display: `auto`, `always`, or `never`.
    #[arg(long, value_enum, default_value = "auto")]
    pub progress: ProgressMode,
}
