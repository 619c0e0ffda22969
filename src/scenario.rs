//! What-if comparison of HVAC recommendations.
//!
//! Each labelled setting (for example the causal model's recommendation
//! against a conventional regression baseline) is simulated and priced
//! against the same target. Scenario `i` draws from its own generator seeded
//! with `seed + i`, so an outcome never depends on which other scenarios ran
//! or in what order.

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::simulation::{simulate, Calibration, HvacInput, Samples};
use crate::wastage::{CostSummary, WastageConfig, WastageEstimator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub label: String,
    pub hvac: f64,
}

impl Scenario {
    pub fn new(label: impl Into<String>, hvac: f64) -> Self {
        Self {
            label: label.into(),
            hvac,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRequest {
    pub calibration: Calibration,
    /// Days simulated per scenario
    pub samples: usize,
    pub noise_enabled: bool,
    pub seed: u64,
    pub target_temp: f64,
    pub wastage: WastageConfig,
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub label: String,
    pub hvac: f64,
    pub mean_indoor_temp: f64,
    pub mean_energy: f64,
    pub cost: CostSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub target_temp: f64,
    /// In request order
    pub outcomes: Vec<ScenarioOutcome>,
}

impl ScenarioComparison {
    /// Outcome with the lowest total wastage cost
    pub fn best(&self) -> Option<&ScenarioOutcome> {
        self.outcomes
            .iter()
            .min_by(|a, b| a.cost.total_cost.total_cmp(&b.cost.total_cost))
    }

    /// Outcomes sorted from cheapest to most expensive
    pub fn ranked(&self) -> Vec<&ScenarioOutcome> {
        self.outcomes
            .iter()
            .sorted_by(|a, b| a.cost.total_cost.total_cmp(&b.cost.total_cost))
            .collect()
    }

    /// Total cost saved by `label` relative to `baseline`
    pub fn savings(&self, label: &str, baseline: &str) -> Option<f64> {
        let find = |l: &str| self.outcomes.iter().find(|o| o.label == l);
        Some(find(baseline)?.cost.total_cost - find(label)?.cost.total_cost)
    }
}

/// Seed of the scenario at `index` in a request seeded with `seed`.
pub fn scenario_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add(index as u64)
}

/// Evaluate a single scenario with its own generator.
pub fn evaluate_scenario(
    request: &ScenarioRequest,
    estimator: &WastageEstimator,
    index: usize,
) -> SimResult<ScenarioOutcome> {
    let scenario = request
        .scenarios
        .get(index)
        .ok_or_else(|| SimError::invalid(format!("no scenario at index {index}")))?;
    let mut rng = StdRng::seed_from_u64(scenario_seed(request.seed, index));

    let data = simulate(
        request.calibration,
        &HvacInput::Constant(scenario.hvac),
        Samples::Count(request.samples),
        request.noise_enabled,
        &mut rng,
    )?;
    let temps = data.indoor_temps();
    let cost = estimator.estimate(&temps, request.target_temp)?;

    Ok(ScenarioOutcome {
        label: scenario.label.clone(),
        hvac: scenario.hvac,
        mean_indoor_temp: data.mean_indoor_temp().unwrap_or_default(),
        mean_energy: data.mean_energy().unwrap_or_default(),
        cost,
    })
}

pub fn compare_scenarios(request: &ScenarioRequest) -> SimResult<ScenarioComparison> {
    if request.scenarios.is_empty() {
        return Err(SimError::invalid("at least one scenario is required"));
    }
    if request.scenarios.iter().any(|s| s.label.trim().is_empty()) {
        return Err(SimError::invalid("scenario label must not be empty"));
    }
    if let Some(label) = request
        .scenarios
        .iter()
        .map(|s| s.label.as_str())
        .duplicates()
        .next()
    {
        return Err(SimError::invalid(format!(
            "duplicate scenario label '{label}'"
        )));
    }

    let estimator = WastageEstimator::new(request.wastage.clone())?;
    let outcomes = (0..request.scenarios.len())
        .map(|i| evaluate_scenario(request, &estimator, i))
        .collect::<SimResult<Vec<_>>>()?;

    for outcome in &outcomes {
        tracing::info!(
            label = %outcome.label,
            hvac = outcome.hvac,
            mean_indoor_temp = outcome.mean_indoor_temp,
            total_cost = outcome.cost.total_cost,
            "scenario evaluated"
        );
    }

    Ok(ScenarioComparison {
        target_temp: request.target_temp,
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(scenarios: Vec<Scenario>) -> ScenarioRequest {
        ScenarioRequest {
            calibration: Calibration::Subtractive,
            samples: 365,
            noise_enabled: true,
            seed: 0,
            target_temp: 19.0,
            wastage: WastageConfig::default(),
            scenarios,
        }
    }

    #[test]
    fn test_closest_setting_wins() {
        // subtractive: hvac 50 -> 19.0 °C, 30 -> 21.0 °C, 80 -> 16.0 °C
        let comparison = compare_scenarios(&request(vec![
            Scenario::new("baseline", 30.0),
            Scenario::new("causal", 50.0),
            Scenario::new("aggressive", 80.0),
        ]))
        .unwrap();

        assert_eq!(comparison.best().unwrap().label, "causal");
        let ranked: Vec<&str> = comparison.ranked().iter().map(|o| o.label.as_str()).collect();
        assert_eq!(ranked, vec!["causal", "baseline", "aggressive"]);
        assert!(comparison.savings("causal", "baseline").unwrap() > 0.0);
    }

    #[test]
    fn test_outcome_independent_of_neighbours() {
        let alone = compare_scenarios(&request(vec![Scenario::new("a", 42.0)])).unwrap();
        let with_other = compare_scenarios(&request(vec![
            Scenario::new("a", 42.0),
            Scenario::new("b", 60.0),
        ]))
        .unwrap();

        assert_eq!(alone.outcomes[0].cost, with_other.outcomes[0].cost);
    }

    #[test]
    fn test_noise_free_costs_are_exact() {
        let mut req = request(vec![Scenario::new("two_over", 30.0)]);
        req.noise_enabled = false;
        req.target_temp = 19.0;
        let comparison = compare_scenarios(&req).unwrap();
        // 21 °C against 19 °C for 1000 m² at 0.4 per degree
        assert!((comparison.outcomes[0].cost.total_cost - 292_000.0).abs() < 1e-6);
        assert!((comparison.outcomes[0].mean_energy - 470.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_and_duplicate_labels_rejected() {
        assert!(compare_scenarios(&request(vec![])).is_err());
        assert!(compare_scenarios(&request(vec![Scenario::new(" ", 10.0)])).is_err());
        assert!(compare_scenarios(&request(vec![
            Scenario::new("x", 10.0),
            Scenario::new("x", 20.0),
        ]))
        .is_err());
    }

    #[test]
    fn test_duplicate_label_is_named() {
        let err = compare_scenarios(&request(vec![
            Scenario::new("a", 10.0),
            Scenario::new("b", 20.0),
            Scenario::new("b", 30.0),
            Scenario::new("a", 40.0),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            SimError::InvalidInput("duplicate scenario label 'b'".into())
        );
    }

    #[test]
    fn test_ranked_keeps_input_order_on_ties() {
        let mut req = request(vec![
            Scenario::new("first", 50.0),
            Scenario::new("far", 90.0),
            Scenario::new("second", 50.0),
        ]);
        req.noise_enabled = false;
        let comparison = compare_scenarios(&req).unwrap();
        let ranked: Vec<&str> = comparison.ranked().iter().map(|o| o.label.as_str()).collect();
        assert_eq!(ranked, vec!["first", "second", "far"]);
    }

    #[test]
    fn test_scenarios_can_run_on_separate_threads() {
        let req = request(vec![Scenario::new("a", 35.0), Scenario::new("b", 65.0)]);
        let estimator = WastageEstimator::new(req.wastage.clone()).unwrap();

        let parallel: Vec<ScenarioOutcome> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..req.scenarios.len())
                .map(|i| {
                    let req = &req;
                    let estimator = &estimator;
                    s.spawn(move || evaluate_scenario(req, estimator, i).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        let sequential = compare_scenarios(&req).unwrap();

        for (p, q) in parallel.iter().zip(sequential.outcomes.iter()) {
            assert_eq!(p.cost, q.cost);
        }
    }
}
