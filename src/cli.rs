//! Command line front end. Each command prints a JSON report on stdout.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use crate::config::Config;
use crate::fixtures;
use crate::scenario::{compare_scenarios, Scenario, ScenarioRequest};
use crate::simulation::{generate_reference_dataset, simulate, Calibration, HvacInput, Samples};
use crate::wastage::{Aggregation, WastageEstimator};

#[derive(Parser, Debug)]
#[command(author, version, about = "Synthetic HVAC building simulator and wastage cost estimator", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    /// Configuration file (config/default.toml is used when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Calibration variant, overrides the configuration
    #[arg(long, global = true)]
    pub variant: Option<Calibration>,

    /// Random seed, overrides the configuration
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a cleaned reference dataset and write it as CSV
    Generate {
        #[arg(short, long)]
        output: PathBuf,
        /// Rows drawn before filtering
        #[arg(long)]
        samples: Option<usize>,
    },
    /// Simulate a constant HVAC setting
    Simulate {
        #[arg(long, allow_negative_numbers = true)]
        hvac: f64,
        #[arg(long, conflicts_with = "reference")]
        samples: Option<usize>,
        /// Reuse the row count of an existing fixture
        #[arg(long)]
        reference: Option<PathBuf>,
        #[arg(long)]
        no_noise: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Simulate a setting and price its deviation from the target
    Wastage {
        #[arg(long, allow_negative_numbers = true)]
        hvac: f64,
        #[arg(long, allow_negative_numbers = true)]
        target: Option<f64>,
        #[arg(long)]
        samples: Option<usize>,
        /// Building floor area (m²)
        #[arg(long)]
        area: Option<f64>,
        /// Cost per m² per °C per day
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long)]
        aggregation: Option<Aggregation>,
    },
    /// Compare labelled settings, e.g. --setting causal=48 --setting baseline=60
    Compare {
        #[arg(long = "setting", required = true, value_parser = parse_setting)]
        settings: Vec<Scenario>,
        #[arg(long, allow_negative_numbers = true)]
        target: Option<f64>,
        #[arg(long)]
        samples: Option<usize>,
    },
}

fn parse_setting(raw: &str) -> Result<Scenario, String> {
    let (label, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected label=value, got '{raw}'"))?;
    let hvac: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid hvac value '{value}': {e}"))?;
    Ok(Scenario::new(label.trim(), hvac))
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(variant) = self.variant {
            config.simulation.calibration = variant;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
    }
}

/// Execute the parsed command, writing its JSON report to `out`.
pub fn run(cli: &Cli, mut config: Config, out: &mut impl Write) -> Result<()> {
    cli.apply_overrides(&mut config);
    let sim = &config.simulation;

    let report = match &cli.command {
        Commands::Generate { output, samples } => {
            let mut generation = config.generation.clone();
            if let Some(n) = samples {
                generation.samples = *n;
            }
            let data = generate_reference_dataset(
                sim.calibration,
                &generation,
                &mut rng_for(sim.seed),
            )?;
            fixtures::write_csv(output, &data)?;
            json!({
                "calibration": sim.calibration,
                "drawn": generation.samples,
                "kept": data.len(),
                "output": output,
            })
        }
        Commands::Simulate {
            hvac,
            samples,
            reference,
            no_noise,
            output,
        } => {
            let baseline = match reference {
                Some(path) => Some(
                    fixtures::read_csv(path)
                        .with_context(|| format!("reading reference {}", path.display()))?
                        .indoor_temps(),
                ),
                None => None,
            };
            let samples = match &baseline {
                Some(series) => Samples::like(series),
                None => Samples::Count(samples.unwrap_or(sim.samples)),
            };
            let data = simulate(
                sim.calibration,
                &HvacInput::Constant(*hvac),
                samples,
                sim.noise_enabled && !no_noise,
                &mut rng_for(sim.seed),
            )?;
            if let Some(path) = output {
                fixtures::write_csv(path, &data)?;
            }
            json!({
                "calibration": sim.calibration,
                "hvac": hvac,
                "rows": data.len(),
                "mean_indoor_temp": data.mean_indoor_temp(),
                "mean_energy": data.mean_energy(),
                "output": output,
            })
        }
        Commands::Wastage {
            hvac,
            target,
            samples,
            area,
            rate,
            aggregation,
        } => {
            let mut wastage = config.wastage.clone();
            if let Some(area) = area {
                wastage.building_area_m2 = *area;
            }
            if let Some(rate) = rate {
                wastage.cost_per_area_per_degree = *rate;
            }
            if let Some(aggregation) = aggregation {
                wastage.aggregation = *aggregation;
            }
            let target = target.unwrap_or(sim.target_temp_c);

            let data = simulate(
                sim.calibration,
                &HvacInput::Constant(*hvac),
                Samples::Count(samples.unwrap_or(sim.samples)),
                sim.noise_enabled,
                &mut rng_for(sim.seed),
            )?;
            let estimator = WastageEstimator::new(wastage)?;
            let summary = estimator.estimate(&data.indoor_temps(), target)?;

            json!({
                "calibration": sim.calibration,
                "hvac": hvac,
                "target_temp": target,
                "days": summary.days(),
                "mean_indoor_temp": data.mean_indoor_temp(),
                "aggregation": estimator.config().aggregation,
                "total_cost": summary.total_cost,
                "mean_daily_cost": summary.mean_daily_cost(),
                "total_power_kwh": summary.daily_power.iter().sum::<f64>(),
            })
        }
        Commands::Compare {
            settings,
            target,
            samples,
        } => {
            let request = ScenarioRequest {
                calibration: sim.calibration,
                samples: samples.unwrap_or(sim.samples),
                noise_enabled: sim.noise_enabled,
                seed: sim.seed.unwrap_or_else(rand::random),
                target_temp: target.unwrap_or(sim.target_temp_c),
                wastage: config.wastage.clone(),
                scenarios: settings.clone(),
            };
            let comparison = compare_scenarios(&request)?;
            let outcomes: Vec<_> = comparison
                .outcomes
                .iter()
                .map(|o| {
                    json!({
                        "label": o.label,
                        "hvac": o.hvac,
                        "mean_indoor_temp": o.mean_indoor_temp,
                        "mean_energy": o.mean_energy,
                        "total_cost": o.cost.total_cost,
                    })
                })
                .collect();
            json!({
                "calibration": sim.calibration,
                "target_temp": comparison.target_temp,
                "seed": request.seed,
                "best": comparison.best().map(|o| o.label.as_str()),
                "outcomes": outcomes,
            })
        }
    };

    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}
