//! Energy Wastage Cost Estimation
//!
//! Prices the energy spent holding a building away from its target
//! temperature. Every degree of deviation on a given day costs
//! `building_area * cost_per_area_per_degree`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

use crate::error::{SimError, SimResult};

pub const DAYS_PER_YEAR: f64 = 365.0;

/// Electricity price used to express daily cost as wasted energy (currency/kWh)
pub const DEFAULT_PRICE_PER_KWH: f64 = 0.25;

/// How the daily costs are folded into the headline total
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Aggregation {
    /// `mean(deviation) * area * rate * 365`, independent of series length
    #[default]
    AnnualisedMeanDeviation,
    /// Plain sum of the daily costs over the supplied horizon
    SumOfDailyCosts,
}

/// Summary of wastage cost for one temperature series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub total_cost: f64,
    /// Cost per sample (day)
    pub daily_cost: Vec<f64>,
    /// Wasted energy per sample (kWh)
    pub daily_power: Vec<f64>,
}

impl CostSummary {
    pub fn days(&self) -> usize {
        self.daily_cost.len()
    }

    pub fn mean_daily_cost(&self) -> f64 {
        if self.daily_cost.is_empty() {
            0.0
        } else {
            self.daily_cost.iter().sum::<f64>() / self.daily_cost.len() as f64
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WastageConfig {
    /// Floor area (m²)
    #[validate(range(exclusive_min = 0.0))]
    pub building_area_m2: f64,
    /// Currency per m² per °C per day
    #[validate(range(exclusive_min = 0.0))]
    pub cost_per_area_per_degree: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub price_per_kwh: f64,
    #[serde(default)]
    pub aggregation: Aggregation,
}

impl Default for WastageConfig {
    fn default() -> Self {
        Self {
            building_area_m2: 1000.0,
            cost_per_area_per_degree: 0.4,
            price_per_kwh: DEFAULT_PRICE_PER_KWH,
            aggregation: Aggregation::AnnualisedMeanDeviation,
        }
    }
}

pub struct WastageEstimator {
    config: WastageConfig,
}

impl WastageEstimator {
    pub fn new(config: WastageConfig) -> SimResult<Self> {
        check_positive("building_area", config.building_area_m2)?;
        check_positive("cost_per_area_per_degree", config.cost_per_area_per_degree)?;
        check_positive("price_per_kwh", config.price_per_kwh)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &WastageConfig {
        &self.config
    }

    /// Estimate the cost of missing `target` across `achieved` temperatures.
    pub fn estimate(&self, achieved: &[f64], target: f64) -> SimResult<CostSummary> {
        if achieved.is_empty() {
            return Err(SimError::invalid("achieved temperature series is empty"));
        }
        if !target.is_finite() {
            return Err(SimError::invalid(format!(
                "target temperature {target} is not finite"
            )));
        }
        if let Some(i) = achieved.iter().position(|t| !t.is_finite()) {
            return Err(SimError::invalid(format!(
                "achieved temperature at index {i} is not finite"
            )));
        }

        let per_degree = self.config.building_area_m2 * self.config.cost_per_area_per_degree;
        let deviations: Vec<f64> = achieved.iter().map(|t| (t - target).abs()).collect();
        let daily_cost: Vec<f64> = deviations.iter().map(|d| d * per_degree).collect();
        let daily_power = daily_cost
            .iter()
            .map(|c| c / self.config.price_per_kwh)
            .collect();

        let total_cost = match self.config.aggregation {
            Aggregation::AnnualisedMeanDeviation => {
                let mean_deviation = deviations.iter().sum::<f64>() / deviations.len() as f64;
                mean_deviation * per_degree * DAYS_PER_YEAR
            }
            Aggregation::SumOfDailyCosts => daily_cost.iter().sum(),
        };

        tracing::debug!(
            days = achieved.len(),
            target,
            total_cost,
            aggregation = %self.config.aggregation,
            "estimated wastage"
        );

        Ok(CostSummary {
            total_cost,
            daily_cost,
            daily_power,
        })
    }
}

/// Annualised wastage cost of `achieved` relative to `target`.
///
/// Uses [`Aggregation::AnnualisedMeanDeviation`] and
/// [`DEFAULT_PRICE_PER_KWH`] for the power series.
pub fn estimate_wastage(
    achieved: &[f64],
    target: f64,
    building_area: f64,
    cost_per_area_per_degree: f64,
) -> SimResult<CostSummary> {
    WastageEstimator::new(WastageConfig {
        building_area_m2: building_area,
        cost_per_area_per_degree,
        ..Default::default()
    })?
    .estimate(achieved, target)
}

fn check_positive(name: &str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(format!("{name} must be positive, got {value}")))
    }
}
