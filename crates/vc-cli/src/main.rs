//! VocalCut command line
//!
//! Usage:
//!   vocalcut bench --vocal <file> --karaoke <file> [--backend all]
//!   vocalcut extract --vocal <file> --karaoke <file> [--out-dir <dir>]

mod audio;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use vc_bench::{BenchmarkHarness, HarnessConfig, RunOutcome};
use vc_core::{BackendId, VcError};

#[derive(Parser)]
#[command(name = "vocalcut", about = "Subtract a karaoke track from a vocal track")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Time one or all backends on the same pair of tracks
    Bench {
        #[command(flatten)]
        tracks: TrackArgs,
        /// Backend to run, or "all"
        #[arg(short, long, default_value = "all")]
        backend: BackendArg,
        /// Harness config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Write the difference of the tracks to a WAV file
    Extract {
        #[command(flatten)]
        tracks: TrackArgs,
        /// Backend computing the difference
        #[arg(short, long, default_value = "vector")]
        backend: BackendId,
        /// Directory receiving vocal_only_<millis>.wav
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        /// Output sample rate (defaults to the vocal track's, else 44100)
        #[arg(long)]
        sample_rate: Option<u32>,
        /// Output channel count (defaults to the vocal track's, else 2)
        #[arg(long)]
        channels: Option<u16>,
        /// Harness config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct TrackArgs {
    /// Track with vocals
    #[arg(long)]
    vocal: PathBuf,
    /// Instrumental (karaoke) track
    #[arg(long)]
    karaoke: PathBuf,
}

/// Backend selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackendArg {
    All,
    One(BackendId),
}

impl FromStr for BackendArg {
    type Err = VcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::One)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench {
            tracks,
            backend,
            config,
        } => {
            for line in run_bench(&tracks, backend, config.as_deref())? {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Extract {
            tracks,
            backend,
            out_dir,
            sample_rate,
            channels,
            config,
        } => {
            let path = run_extract(
                &tracks,
                backend,
                &out_dir,
                sample_rate,
                channels,
                config.as_deref(),
            )?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn build_harness(config: Option<&Path>) -> Result<BenchmarkHarness> {
    let config = match config {
        Some(path) => HarnessConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => HarnessConfig::default(),
    };
    Ok(BenchmarkHarness::from_config(&config)?)
}

fn run_bench(tracks: &TrackArgs, backend: BackendArg, config: Option<&Path>) -> Result<Vec<String>> {
    let vocal = audio::decode_track(&tracks.vocal)?;
    let karaoke = audio::decode_track(&tracks.karaoke)?;
    let harness = build_harness(config)?;

    let outcomes: Vec<RunOutcome> = match backend {
        BackendArg::All => harness.run_all(&vocal.bytes, &karaoke.bytes)?,
        BackendArg::One(id) => vec![harness.run(id, &vocal.bytes, &karaoke.bytes)?],
    };

    if let Some(first) = outcomes.first() {
        if outcomes.iter().any(|o| o.entry.checksum != first.entry.checksum) {
            bail!("backends disagree on the output");
        }
        log::info!(
            "Output: {} bytes (checksum {})",
            first.entry.output_len,
            first.entry.checksum
        );
    }

    Ok(harness.log().lines())
}

fn run_extract(
    tracks: &TrackArgs,
    backend: BackendId,
    out_dir: &Path,
    sample_rate: Option<u32>,
    channels: Option<u16>,
    config: Option<&Path>,
) -> Result<PathBuf> {
    let vocal = audio::decode_track(&tracks.vocal)?;
    let karaoke = audio::decode_track(&tracks.karaoke)?;
    let format = audio::output_format(vocal.header, sample_rate, channels)?;
    let harness = build_harness(config)?;

    let outcome = harness.run(backend, &vocal.bytes, &karaoke.bytes)?;
    log::info!("{}", outcome.entry.display_line());

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let path = audio::output_path(out_dir);
    audio::encode_wav(&outcome.output, format, &path)?;
    Ok(path)
}
