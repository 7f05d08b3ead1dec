//! GenPass page binary.
//!
//! Runs the page headless over stdio: JSON events in, posts out. Logs go to
//! stderr so stdout stays the wire channel.
//!
//! # Usage
//!
//! ```bash
//! # Page served from ./mobile, settings in ~/.genpass.json
//! genpass-page --assets ./mobile --store ~/.genpass.json
//!
//! # German labels, legacy MD5 derivation
//! genpass-page --lang de --algorithm md5
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use genpass_core::{HashAlgorithm, Language};
use genpass_page::{DEFAULT_CONTENT_HEIGHT, PageRuntimeConfig};
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// GenPass page
#[derive(Parser, Debug)]
#[command(name = "genpass-page")]
#[command(about = "GenPass mobile page over a JSON-lines stdio bridge")]
#[command(version)]
struct Args {
    /// Settings file
    #[arg(long, default_value = "genpass.json")]
    store: PathBuf,

    /// Directory the page is served from
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Label language (en, es, fr, de, pt-br, zh-hk, hu, ru)
    #[arg(long)]
    lang: Option<String>,

    /// Content height reported to the bookmarklet, in CSS pixels
    #[arg(long, default_value_t = DEFAULT_CONTENT_HEIGHT)]
    content_height: u32,

    /// Derivation hash
    #[arg(long, value_enum, default_value_t = Algorithm::default())]
    algorithm: Algorithm,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Md5,
    Sha512,
}

impl Default for Algorithm {
    fn default() -> Self {
        match HashAlgorithm::default() {
            HashAlgorithm::Md5 => Self::Md5,
            HashAlgorithm::Sha512 => Self::Sha512,
        }
    }
}

impl From<Algorithm> for HashAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Md5 => Self::Md5,
            Algorithm::Sha512 => Self::Sha512,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let language = args.lang.as_deref().and_then(Language::from_code);
    if args.lang.is_some() && language.is_none() {
        tracing::warn!(lang = ?args.lang, "unknown language, using English");
    }

    let config = PageRuntimeConfig {
        store_path: args.store,
        page_dir: args.assets,
        language,
        content_height: args.content_height,
        algorithm: args.algorithm.into(),
    };

    tracing::info!("GenPass page starting");
    let driver = genpass_page::open(config)?;

    let input = BufReader::new(tokio::io::stdin());
    let local = tokio::task::LocalSet::new();
    local.run_until(genpass_page::serve(driver, input, tokio::io::stdout())).await?;

    tracing::info!("input closed, exiting");
    Ok(())
}
