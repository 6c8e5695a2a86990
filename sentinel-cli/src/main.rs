//! Sentinel - classificador de ameaças no ar
//! Interface de linha de comando para classificar leituras e reproduzir capturas
//!
//! ## Variáveis de ambiente
//! - `SENTINEL_IAQ_THRESHOLD`, `SENTINEL_VOC_THRESHOLD`, `SENTINEL_CO2_THRESHOLD`,
//!   `SENTINEL_PM25_THRESHOLD`: limiares do operador
//! - `SENTINEL_BASELINE_INTERVAL_MS`: intervalo da linha de base (default: 300000)
//! - `SENTINEL_INITIAL_VOC_BASELINE`: linha de base inicial (default: 0.5)
//! - `RUST_LOG`: filtro de logs (default: sentinel=info,sentinel_threat=info)

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::*;
use sentinel_threat::{
    BaselineConfig, DetectionResult, SensorSnapshot, ThreatClassifier, ThresholdConfig,
    signatures::{Report, signatures},
};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sentinel")]
#[command(author = "SIL Contributors")]
#[command(version = "2026.1.16")]
#[command(about = "Sentinel - air-quality threat classifier", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

/// Valores que sobrescrevem o ambiente
#[derive(Args, Default)]
struct Overrides {
    /// IAQ threshold (overrides SENTINEL_IAQ_THRESHOLD)
    #[arg(long, global = true)]
    iaq_threshold: Option<f32>,

    /// VOC threshold (overrides SENTINEL_VOC_THRESHOLD)
    #[arg(long, global = true)]
    voc_threshold: Option<f32>,

    /// CO2 threshold (overrides SENTINEL_CO2_THRESHOLD)
    #[arg(long, global = true)]
    co2_threshold: Option<f32>,

    /// PM2.5 threshold (overrides SENTINEL_PM25_THRESHOLD)
    #[arg(long, global = true)]
    pm25_threshold: Option<f32>,

    /// Baseline refresh interval in ms (overrides SENTINEL_BASELINE_INTERVAL_MS)
    #[arg(long, global = true)]
    baseline_interval_ms: Option<u64>,

    /// Initial VOC baseline (overrides SENTINEL_INITIAL_VOC_BASELINE)
    #[arg(long, global = true)]
    initial_voc_baseline: Option<f32>,
}

impl Overrides {
    fn thresholds(&self) -> ThresholdConfig {
        let env = ThresholdConfig::from_env();
        ThresholdConfig::new(
            self.iaq_threshold.unwrap_or(env.iaq),
            self.voc_threshold.unwrap_or(env.voc),
            self.co2_threshold.unwrap_or(env.co2),
            self.pm25_threshold.unwrap_or(env.pm25),
        )
    }

    fn baseline(&self) -> BaselineConfig {
        let env = BaselineConfig::from_env();
        BaselineConfig {
            interval_ms: self.baseline_interval_ms.unwrap_or(env.interval_ms),
            initial_voc: self.initial_voc_baseline.unwrap_or(env.initial_voc),
        }
    }

    fn classifier(&self) -> ThreatClassifier {
        ThreatClassifier::new(self.thresholds()).with_baseline(self.baseline())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single reading
    Classify {
        /// Indoor air quality index (0-500)
        #[arg(long)]
        iaq: f32,

        /// VOC reading (~0-2)
        #[arg(long)]
        voc: f32,

        /// CO2 (ppm)
        #[arg(long, default_value_t = 0.0)]
        co2: f32,

        /// Temperature (°C)
        #[arg(long)]
        temperature: f32,

        /// Relative humidity (%)
        #[arg(long)]
        humidity: f32,

        /// Raw gas resistance (Ω)
        #[arg(long, visible_alias = "raw-gas")]
        gas_resistance: f32,

        /// PM1 (µg/m³)
        #[arg(long, default_value_t = 0.0)]
        pm1: f32,

        /// PM2.5 (µg/m³)
        #[arg(long)]
        pm25: f32,

        /// PM10 (µg/m³)
        #[arg(long, default_value_t = 0.0)]
        pm10: f32,

        /// Mark the reading as a spike (passed through unchanged)
        #[arg(long)]
        spike: bool,
    },

    /// Replay a JSON Lines capture through one classifier
    Replay {
        /// Input file (.jsonl); reads stdin when omitted
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// Only print readings classified as threats
        #[arg(long)]
        threats_only: bool,
    },

    /// List threat signatures in priority order
    Signatures,

    /// Show version and active configuration
    Info,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentinel=info,sentinel_threat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let overrides = &cli.overrides;

    let outcome = match cli.command {
        Commands::Classify {
            iaq,
            voc,
            co2,
            temperature,
            humidity,
            gas_resistance,
            pm1,
            pm25,
            pm10,
            spike,
        } => {
            let snapshot = SensorSnapshot::new(
                iaq,
                voc,
                co2,
                temperature,
                humidity,
                gas_resistance,
                spike,
                pm1,
                pm25,
                pm10,
            );
            classify_command(overrides, &snapshot, cli.json)
        }

        Commands::Replay {
            input,
            threats_only,
        } => replay_command(overrides, input.as_deref(), threats_only, cli.json),

        Commands::Signatures => {
            print_signatures();
            Ok(())
        }

        Commands::Info => {
            print_info(overrides);
            Ok(())
        }
    };

    if let Err(e) = outcome {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

// ============================================================================
// Commands
// ============================================================================

fn classify_command(
    overrides: &Overrides,
    snapshot: &SensorSnapshot,
    json: bool,
) -> anyhow::Result<()> {
    let mut classifier = overrides.classifier();
    let result = classifier.detect(snapshot);
    print_result(None, &result, json)
}

fn replay_command(
    overrides: &Overrides,
    input: Option<&Path>,
    threats_only: bool,
    json: bool,
) -> anyhow::Result<()> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open '{}'", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin().lock())),
    };

    let mut classifier = overrides.classifier();
    let mut processed = 0u64;
    let mut threats = 0u64;
    let mut skipped = 0u64;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("failed to read line {}", line_number))?;
        if line.trim().is_empty() {
            continue;
        }

        let snapshot = match SensorSnapshot::from_json(&line) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                eprintln!("{} line {}: {}", "warning:".yellow().bold(), line_number, e);
                skipped += 1;
                continue;
            }
        };

        let result = match snapshot.timestamp_ms {
            Some(now_ms) => classifier.detect_at(&snapshot, now_ms),
            None => classifier.detect(&snapshot),
        };

        processed += 1;
        if result.is_threat {
            threats += 1;
        }
        if threats_only && !result.is_threat {
            continue;
        }
        print_result(Some(line_number), &result, json)?;
    }

    tracing::info!(
        processed,
        threats,
        skipped,
        voc_baseline = classifier.voc_baseline(),
        "replay finished"
    );
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn print_result(line: Option<usize>, result: &DetectionResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(result)?);
        return Ok(());
    }

    let status = if result.is_threat {
        "THREAT".red().bold()
    } else {
        "ok".green().bold()
    };
    let spike = if result.is_spike {
        format!(" {}", "[spike]".yellow())
    } else {
        String::new()
    };

    match line {
        Some(n) => println!("{:>5}  {:<6} {}{}", n, status, result.signature, spike),
        None => println!("{:<6} {}{}", status, result.signature, spike),
    }
    Ok(())
}

fn print_signatures() {
    println!("{}", "Threat signatures (highest priority first)".bold());
    println!();

    for signature in signatures() {
        let label = match signature.report {
            Report::Template(template) => template.label,
            Report::LpgCarrier { .. } => "DRUG_DELIVERY_IN_LPG / LPG_CARRIER_ONLY",
        };
        println!(
            "{:>3}. {} {}",
            signature.priority,
            signature.name.cyan().bold(),
            format!("({})", label).dimmed()
        );

        let criteria: Vec<String> = signature.criteria.iter().map(|c| c.to_string()).collect();
        println!("     {}", criteria.join("  AND  "));
    }
}

fn print_info(overrides: &Overrides) {
    let thresholds = overrides.thresholds();
    let baseline = overrides.baseline();

    println!("{}", "Sentinel - air-quality threat classifier".bold());
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("{}", "Thresholds (spike helper):".bold());
    println!("  IAQ:   {}", thresholds.iaq);
    println!("  VOC:   {}", thresholds.voc);
    println!("  CO2:   {} ppm", thresholds.co2);
    println!("  PM2.5: {} µg/m³", thresholds.pm25);
    println!();
    println!("{}", "VOC baseline:".bold());
    println!("  Initial:  {}", baseline.initial_voc);
    println!("  Interval: {} ms", baseline.interval_ms);
    println!();
    println!("Signatures: {}", signatures().len());
}
