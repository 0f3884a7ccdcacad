mod builtin;
mod cli;
mod error;
mod fetcher;
mod html;
mod mount;
mod normalize;
mod orchestrator;
mod post;
mod progress;

use anyhow::Context as _;
use cli::Args;

pub use cli::{Args as CliArgs, ProgressMode};
pub use error::{Fault, ShapeError};
pub use fetcher::Fetcher;
pub use html::{render_card, render_error_panel, render_grid};
pub use mount::{MountPoint, PageMount, replace_contents};
pub use normalize::{
    Author, DisplayRecord, FeaturedMedia, NormalizeOptions, TermTable, build_term_table,
    normalize, prepare_post, resolve_author, resolve_category, resolve_date, resolve_topic,
};
pub use orchestrator::{Orchestrator, Outcome};
pub use post::{Id, RawPost, Term};
pub use progress::Progress;

pub async fn run(args: Args) -> anyhow::Result<Outcome> {
    use std::io::IsTerminal as _;

    let progress_enabled = match args.progress {
        ProgressMode::Always => true,
        ProgressMode::Never => false,
        ProgressMode::Auto => std::io::stderr().is_terminal(),
    };
    let progress = Progress::new(progress_enabled);

    let template = match &args.template {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
        }
        None => builtin::page_shell().into_string(),
    };
    let mut mount = PageMount::new(template, args.selector.clone(), args.out.clone());

    let fetcher = Fetcher::new(&args.user_agent)?;
    let orchestrator = Orchestrator::new(
        fetcher,
        args.url.clone(),
        NormalizeOptions::default(),
        progress.clone(),
    );

    let res = orchestrator.run(&mut mount).await;
    progress.finish();
    res
}
