use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use lookahead_compressor::{wav, Compressor, CompressorSettings, DebugTrace};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lookahead-compressor",
    version = "0.1.0",
    about = "CLI for offline dynamic range compression"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress a wav file, or every wav file in a directory
    Compress(CompressArgs),
    /// Print the per-sample trace table for a short list of samples
    Trace(TraceArgs),
}

#[derive(Args)]
struct Params {
    #[arg(
        short = 't',
        long = "threshold",
        value_name = "LEVEL",
        help = "Linear level above which gain reduction begins (0.0..1.0)"
    )]
    threshold: Option<f32>,

    #[arg(
        short = 'r',
        long = "ratio",
        value_name = "RATIO",
        help = "Reduction ratio (e.g. 4.0 for 4:1)"
    )]
    ratio: Option<f32>,

    #[arg(
        short = 'a',
        long = "attack",
        value_name = "SECONDS",
        help = "Attack time (accepted, attack is currently instant)"
    )]
    attack: Option<f32>,

    #[arg(
        short = 'e',
        long = "release",
        value_name = "COEFF",
        help = "Per-sample release smoothing coefficient (0.0..1.0)"
    )]
    release: Option<f32>,

    #[arg(
        short = 'l',
        long = "lookahead",
        value_name = "MS",
        help = "Lookahead delay in milliseconds, 0 disables it"
    )]
    lookahead_ms: Option<f32>,

    #[arg(
        long = "config",
        value_name = "FILE",
        help = "TOML file with a [compressor] table; flags override it"
    )]
    config: Option<PathBuf>,

    #[arg(long = "strict", help = "Reject out-of-range parameters")]
    strict: bool,
}

#[derive(Args)]
struct CompressArgs {
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        help = "Input wav file or directory containing wav files"
    )]
    input: PathBuf,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Output wav file, or directory when the input is a directory"
    )]
    output: PathBuf,

    #[arg(
        short = 'b',
        long = "block-size",
        value_name = "FRAMES",
        help = "Frames handed to the compressor per call"
    )]
    block_size: Option<usize>,

    #[command(flatten)]
    params: Params,
}

#[derive(Args)]
struct TraceArgs {
    #[arg(
        short = 's',
        long = "samples",
        value_name = "SAMPLES",
        help = "Comma separated input samples (e.g. 0,0,0.9,0)"
    )]
    samples: Option<String>,

    #[arg(
        long = "sample-rate",
        value_name = "HZ",
        help = "Sample rate used to size the lookahead"
    )]
    sample_rate: Option<f32>,

    #[command(flatten)]
    params: Params,
}

impl Params {
    /// Config file (or `base`) first, then any flags on top.
    fn resolve(&self, base: CompressorSettings) -> anyhow::Result<CompressorSettings> {
        let mut settings = match &self.config {
            Some(path) => CompressorSettings::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => base,
        };

        if let Some(v) = self.threshold {
            settings.threshold = v;
        }
        if let Some(v) = self.ratio {
            settings.ratio = v;
        }
        if let Some(v) = self.attack {
            settings.attack = v;
        }
        if let Some(v) = self.release {
            settings.release = v;
        }
        if let Some(v) = self.lookahead_ms {
            settings.lookahead_ms = v;
        }

        if self.strict {
            settings.validate()?;
        }

        debug!(settings = %toml::to_string(&settings)?, "resolved settings");
        Ok(settings)
    }
}

fn parse_samples(samples: &str) -> anyhow::Result<Vec<f32>> {
    samples
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f32>()
                .with_context(|| format!("invalid sample {:?}", s))
        })
        .collect()
}

fn compress(args: CompressArgs) -> anyhow::Result<()> {
    let settings = args.params.resolve(CompressorSettings::default())?;
    let block_size = args.block_size.unwrap_or(1024);

    if args.input.is_dir() {
        let reports = wav::compress_dir(&args.input, &args.output, settings, block_size)?;
        info!(files = reports.len(), "done");
    } else {
        ensure_parent(&args.output)?;
        wav::compress_file(&args.input, &args.output, settings, block_size)
            .with_context(|| format!("compressing {}", args.input.display()))?;
    }

    Ok(())
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display())),
        _ => Ok(()),
    }
}

fn trace(args: TraceArgs) -> anyhow::Result<()> {
    // defaults reproduce a 2 ms lookahead against a single transient at 1 kHz
    let base = CompressorSettings {
        threshold: 0.5,
        ratio: 4.0,
        release: 0.5,
        lookahead_ms: 2.0,
        ..Default::default()
    };
    let settings = args.params.resolve(base)?;
    let sample_rate = args.sample_rate.unwrap_or(1000.0);
    let mut buffer = parse_samples(args.samples.as_deref().unwrap_or("0,0,0.9,0,0,0"))?;

    if buffer.is_empty() {
        bail!("no samples to trace");
    }

    let mut compressor = Compressor::from_settings(settings);
    let mut debug_trace = DebugTrace::new();
    compressor.process_traced(&mut buffer, sample_rate, &mut debug_trace);

    println!("Sample Rate: {} Hz", sample_rate);
    println!("Lookahead: {} ms ({} frames)", settings.lookahead_ms, compressor.lookahead_len());
    println!("Threshold: {}, Ratio: {}", settings.threshold, settings.ratio);
    println!();
    print!("{}", debug_trace);

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Compress(args) => compress(args),
        Command::Trace(args) => trace(args),
    }
}
