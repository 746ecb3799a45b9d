//! Normalise the post catalogue file.
//!
//! Reads `posts.json`, fills missing slugs, normalises tags, probes each
//! image URL, substitutes the placeholder for unreachable images, and
//! rewrites the file. The site's blog page then never has to discover a
//! broken image at render time.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use url::Url;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::ports::{ImageProbe, needs_probe};
use backend::inbound::http::state::DEFAULT_PLACEHOLDER_IMAGE;
use backend::outbound::content::JsonPostStore;
use backend::outbound::probe::HttpImageProbe;

/// CLI arguments.
#[derive(Debug, Parser)]
#[command(name = "normalize-posts", about = "Normalise the post catalogue file")]
struct Args {
    /// Path to the catalogue file.
    #[arg(long, default_value = "posts.json")]
    posts: PathBuf,

    /// Public base URL used to resolve site-relative image paths.
    #[arg(long)]
    base_url: Option<Url>,

    /// Placeholder substituted for unreachable images.
    #[arg(long, default_value = DEFAULT_PLACEHOLDER_IMAGE)]
    placeholder: String,

    /// Report what would change without rewriting the file.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        warn!(error = %e, "tracing init failed");
    }
    let args = Args::parse();

    let store = JsonPostStore::new(args.posts.clone());
    let mut posts = store
        .read_posts()
        .wrap_err_with(|| format!("failed to read {}", args.posts.display()))?;
    info!(count = posts.len(), "catalogue loaded");

    let probe = HttpImageProbe::new(args.base_url.clone())
        .wrap_err("failed to build the image probe")?;

    let mut substituted = 0_usize;
    for post in &mut posts {
        let resolved = match post.image() {
            Some(url) if !needs_probe(url) => continue,
            Some(url) => {
                if probe.exists(url).await {
                    continue;
                }
                warn!(slug = post.slug(), %url, "image unreachable, using placeholder");
                substituted += 1;
                Some(args.placeholder.clone())
            }
            None => {
                substituted += 1;
                Some(args.placeholder.clone())
            }
        };
        post.set_image(resolved);
    }

    if args.dry_run {
        info!(substituted, "dry run complete; file left untouched");
        return Ok(());
    }

    store
        .write_posts(&posts)
        .wrap_err_with(|| format!("failed to rewrite {}", args.posts.display()))?;
    info!(substituted, "catalogue rewritten");
    Ok(())
}
