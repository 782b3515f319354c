use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use spectro_audio::analysis::Severity;
use spectro_audio::audio::{decode_file, write_wav, BitDepth};
use spectro_audio::{AppConfig, AudioPipeline};

#[derive(Parser, Debug)]
#[command(
    name = "spectro_cli",
    about = "Offline vocal analysis, consonant repair and mastering for WAV files"
)]
struct Cli {
    /// JSON configuration overriding thresholds, synthesis constants and defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print features, detected regions and recommendations as JSON
    Analyze {
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Exit with code 2 when a high-severity issue is reported
        #[arg(long)]
        strict: bool,
    },
    /// Single-pass loudness mastering
    Master {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, allow_negative_numbers = true, value_parser = parse_finite)]
        target_lufs: Option<f32>,
        #[arg(long, value_parser = parse_finite)]
        spectral_balance: Option<f32>,
        #[arg(long, value_parser = parse_finite)]
        dynamics: Option<f32>,
        #[arg(long)]
        bit_depth: Option<u16>,
    },
    /// Blend synthesized consonants into regions that lack them
    Correct {
        input: PathBuf,
        output: PathBuf,
        /// Voice recording whose consonant transients shape the bursts
        #[arg(long)]
        reference: Option<PathBuf>,
        #[arg(long, value_parser = parse_finite)]
        intensity: Option<f32>,
        /// Seed for reproducible noise bursts
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        bit_depth: Option<u16>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::try_load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Analyze {
            input,
            output,
            strict,
        } => run_analyze(config, &input, output, strict),
        Commands::Master {
            input,
            output,
            target_lufs,
            spectral_balance,
            dynamics,
            bit_depth,
        } => {
            let mut config = config;
            if let Some(target) = target_lufs {
                config.mastering.target_loudness_lufs = target;
            }
            if let Some(balance) = spectral_balance {
                config.mastering.spectral_balance = balance;
            }
            if let Some(amount) = dynamics {
                config.mastering.dynamics_amount = amount;
            }
            apply_bit_depth(&mut config, bit_depth)?;
            run_master(config, &input, &output)
        }
        Commands::Correct {
            input,
            output,
            reference,
            intensity,
            seed,
            bit_depth,
        } => {
            let mut config = config;
            if let Some(intensity) = intensity {
                config.mastering.intensity = intensity;
            }
            apply_bit_depth(&mut config, bit_depth)?;
            run_correct(config, &input, &output, reference.as_deref(), seed)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    // Keep any subscriber that is already installed
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_finite(value: &str) -> Result<f32, String> {
    let parsed: f32 = value.parse().map_err(|err| format!("{err}"))?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(format!("{value} is not a finite number"))
    }
}

fn apply_bit_depth(config: &mut AppConfig, bits: Option<u16>) -> Result<()> {
    if let Some(bits) = bits {
        config.output.bit_depth =
            BitDepth::from_bits(bits).with_context(|| format!("--bit-depth {bits}"))?;
    }
    Ok(())
}

fn run_analyze(
    config: AppConfig,
    input: &Path,
    output_path: Option<PathBuf>,
    strict: bool,
) -> Result<ExitCode> {
    let buffer = decode_file(input).with_context(|| format!("decoding {}", input.display()))?;
    let report = AudioPipeline::new(config).analyze(&buffer);

    emit_json(&report, output_path)?;

    let failing = report
        .recommendations
        .iter()
        .any(|r| r.severity == Severity::High);
    if strict && failing {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::from(0))
    }
}

fn run_master(config: AppConfig, input: &Path, output: &Path) -> Result<ExitCode> {
    let buffer = decode_file(input).with_context(|| format!("decoding {}", input.display()))?;
    let bit_depth = config.output.bit_depth;
    let (mastered, report) = AudioPipeline::new(config).master(&buffer);

    write_wav(output, &mastered, bit_depth)
        .with_context(|| format!("writing {}", output.display()))?;
    emit_json(&report, None)?;
    Ok(ExitCode::from(0))
}

fn run_correct(
    config: AppConfig,
    input: &Path,
    output: &Path,
    reference: Option<&Path>,
    seed: Option<u64>,
) -> Result<ExitCode> {
    let buffer = decode_file(input).with_context(|| format!("decoding {}", input.display()))?;
    let reference = reference
        .map(|path| {
            decode_file(path).with_context(|| format!("decoding reference {}", path.display()))
        })
        .transpose()?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let bit_depth = config.output.bit_depth;
    let (corrected, report) =
        AudioPipeline::new(config).correct_consonants(&buffer, reference.as_ref(), &mut rng);

    write_wav(output, &corrected, bit_depth)
        .with_context(|| format!("writing {}", output.display()))?;
    emit_json(&report, None)?;
    Ok(ExitCode::from(0))
}

fn emit_json<T: Serialize>(value: &T, output_path: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}
