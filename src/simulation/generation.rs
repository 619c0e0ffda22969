//! Reference dataset generation.
//!
//! Builds calibration data the way the building's historical log was
//! produced: HVAC settings are drawn at random, outcomes come from the
//! simulator, and rows outside the plausible operating band are dropped.

use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::building::{simulate, HvacInput, Samples, SyntheticDataset};
use super::calibration::Calibration;
use crate::error::{SimError, SimResult};

/// Distribution HVAC settings are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HvacDistribution {
    Normal { mean: f64, std_dev: f64 },
    Uniform { low: f64, high: f64 },
}

impl HvacDistribution {
    /// Distribution used for each calibration's historical data
    pub fn for_calibration(calibration: Calibration) -> Self {
        match calibration {
            Calibration::Subtractive => HvacDistribution::Normal {
                mean: 50.0,
                std_dev: 7.5,
            },
            Calibration::Additive => HvacDistribution::Uniform {
                low: 0.0,
                high: 100.0,
            },
        }
    }

    fn draw<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> SimResult<Vec<f64>> {
        match *self {
            HvacDistribution::Normal { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
                    return Err(SimError::invalid(format!(
                        "normal hvac distribution needs finite mean and non-negative std-dev, got mean={mean} std_dev={std_dev}"
                    )));
                }
                let dist = Normal::new(mean, std_dev)
                    .map_err(|e| SimError::invalid(format!("normal hvac distribution: {e}")))?;
                Ok((0..n).map(|_| dist.sample(rng)).collect())
            }
            HvacDistribution::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || low >= high {
                    return Err(SimError::invalid(format!(
                        "uniform hvac distribution needs finite low < high, got [{low}, {high})"
                    )));
                }
                let dist = Uniform::new(low, high);
                Ok((0..n).map(|_| dist.sample(rng)).collect())
            }
        }
    }
}

/// Physically plausible operating window for generated rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlausibilityBand {
    pub min_indoor_temp: f64,
    pub max_indoor_temp: f64,
}

impl Default for PlausibilityBand {
    fn default() -> Self {
        Self {
            min_indoor_temp: 13.0,
            max_indoor_temp: 27.0,
        }
    }
}

impl PlausibilityBand {
    /// Both bounds must be finite with `min < max`.
    pub fn check(&self) -> SimResult<()> {
        let (min, max) = (self.min_indoor_temp, self.max_indoor_temp);
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(SimError::invalid(format!(
                "plausibility band needs finite min < max, got ({min}, {max})"
            )));
        }
        Ok(())
    }

    /// Bounds are exclusive and energy must be strictly positive.
    pub fn contains(&self, indoor_temp: f64, energy: f64) -> bool {
        indoor_temp > self.min_indoor_temp && indoor_temp < self.max_indoor_temp && energy > 0.0
    }

    /// Copy of `dataset` without implausible rows, in the original order.
    pub fn retain(&self, dataset: &SyntheticDataset) -> SyntheticDataset {
        let kept: Vec<_> = dataset
            .iter()
            .filter(|row| self.contains(row.indoor_temp, row.energy))
            .copied()
            .collect();

        let dropped = dataset.len() - kept.len();
        if dropped > 0 {
            tracing::debug!(
                dropped,
                kept = kept.len(),
                min = self.min_indoor_temp,
                max = self.max_indoor_temp,
                "removed implausible rows"
            );
        }

        SyntheticDataset::from_rows(kept)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerationConfig {
    /// Rows drawn before filtering
    #[validate(range(min = 1))]
    pub samples: usize,
    /// Overrides the calibration's default distribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<HvacDistribution>,
    #[serde(default)]
    #[validate(custom(function = "validate_band"))]
    pub band: PlausibilityBand,
}

fn validate_band(band: &PlausibilityBand) -> Result<(), ValidationError> {
    band.check().map_err(|_| {
        let mut err = ValidationError::new("band_bounds");
        err.message = Some("min_indoor_temp must be below max_indoor_temp".into());
        err
    })
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            distribution: None,
            band: PlausibilityBand::default(),
        }
    }
}

/// Generate a cleaned reference dataset. Noise is always on.
pub fn generate_reference_dataset<R: Rng + ?Sized>(
    calibration: Calibration,
    config: &GenerationConfig,
    rng: &mut R,
) -> SimResult<SyntheticDataset> {
    if config.samples == 0 {
        return Err(SimError::invalid("sample count must be positive"));
    }
    config.band.check()?;

    let distribution = config
        .distribution
        .unwrap_or_else(|| HvacDistribution::for_calibration(calibration));
    let settings = distribution.draw(config.samples, rng)?;

    let raw = simulate(
        calibration,
        &HvacInput::PerSample(settings),
        Samples::Count(config.samples),
        true,
        rng,
    )?;
    let cleaned = config.band.retain(&raw);

    tracing::info!(
        %calibration,
        drawn = raw.len(),
        kept = cleaned.len(),
        "generated reference dataset"
    );

    Ok(cleaned)
}
