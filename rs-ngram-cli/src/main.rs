use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use env_logger::Env;
use log::{info, LevelFilter};

use rs_ngram_core::io::{read_corpus, tokenize};
use rs_ngram_core::model::frequency_table::KeyMode;
use rs_ngram_core::model::generation_config::{Decoding, GenerationConfig};
use rs_ngram_core::model::generator::Generator;

#[derive(Parser, Debug)]
#[command(author, version, about = "Word-level n-gram text generator", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, action = ArgAction::Count)]
    quiet: u8,

    /// JSON configuration file; command-line values take precedence
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Window width (the prediction context is N - 1 tokens)
    #[arg(short = 'n', long = "window", value_name = "N")]
    window: Option<usize>,

    /// Maximum length of the output, seed included
    #[arg(short = 'l', long, value_name = "LEN")]
    max_length: Option<usize>,

    /// How n-token windows are keyed
    #[arg(long, value_enum)]
    key_mode: Option<KeyModeArg>,

    /// How the next token is chosen
    #[arg(long, value_enum)]
    decoding: Option<DecodingArg>,

    /// Seed of the random generator used by sampled decoding
    #[arg(long, value_name = "SEED")]
    rng_seed: Option<u64>,

    /// Training corpus (plain text)
    corpus: PathBuf,

    /// Seed words; normalized like the corpus
    seed: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KeyModeArg {
    /// Key windows by their exact tokens
    Exact,
    /// Key windows by their 32-bit fingerprint (colliding windows share a count)
    Fingerprint,
}

impl From<KeyModeArg> for KeyMode {
    fn from(arg: KeyModeArg) -> Self {
        match arg {
            KeyModeArg::Exact => KeyMode::Exact,
            KeyModeArg::Fingerprint => KeyMode::Fingerprint,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DecodingArg {
    /// Always take the most frequent follower
    Greedy,
    /// Draw a follower weighted by its count
    Sampled,
}

impl From<DecodingArg> for Decoding {
    fn from(arg: DecodingArg) -> Self {
        match arg {
            DecodingArg::Greedy => Decoding::Greedy,
            DecodingArg::Sampled => Decoding::Sampled,
        }
    }
}

/// Level requested by `-v`/`-q`, if any. Without flags, `RUST_LOG` decides.
fn verbosity(verbose: u8, quiet: u8) -> Option<LevelFilter> {
    match (quiet, verbose) {
        (0, 0) => None,
        (0, 1) => Some(LevelFilter::Info),
        (0, 2) => Some(LevelFilter::Debug),
        (0, _) => Some(LevelFilter::Trace),
        (1, _) => Some(LevelFilter::Error),
        _ => Some(LevelFilter::Off),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    builder.format_timestamp_millis();
    if let Some(level) = verbosity(verbose, quiet) {
        builder.filter_level(level);
    }
    let _ = builder.try_init();
}

/// Layers the configuration: defaults, then the config file, then flags.
fn build_config(cli: &Cli) -> Result<GenerationConfig> {
    let mut config = match &cli.config {
        Some(path) => GenerationConfig::from_file(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?,
        None => GenerationConfig::default(),
    };

    if let Some(n) = cli.window {
        config.n = n;
    }
    if let Some(max_length) = cli.max_length {
        config.max_length = max_length;
    }
    if let Some(key_mode) = cli.key_mode {
        config.key_mode = key_mode.into();
    }
    if let Some(decoding) = cli.decoding {
        config.decoding = decoding.into();
    }
    if cli.rng_seed.is_some() {
        config.rng_seed = cli.rng_seed;
    }
    if !cli.seed.is_empty() {
        config.seed_tokens = tokenize(&cli.seed.join(" "));
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    // Load and normalize the training data
    let corpus = read_corpus(&cli.corpus)
        .with_context(|| format!("failed to load corpus {}", cli.corpus.display()))?;
    info!("loaded {} tokens from {}", corpus.len(), cli.corpus.display());

    // Train a model of window width n over the whole corpus
    let generator = Generator::from_config(&corpus, &config).context("failed to train model")?;

    // Extend the seed until "EOF" or the length cap, greedily or by sampling
    let sequence = generator.run(&config).context("generation failed")?;
    println!("{}", sequence.join(" "));

    Ok(())
}
