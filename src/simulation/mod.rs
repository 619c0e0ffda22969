//! # Building Simulation Module
//!
//! Synthetic thermal and energy data for a building under HVAC control.
//!
//! ## Components
//!
//! - **Calibration**: named constant sets for the linear HVAC response (cooling or heating)
//! - **Building**: the simulator itself, mapping HVAC settings to indoor temperature and energy
//! - **Generation**: randomised reference datasets with plausibility filtering
//!
//! ## Usage
//!
//! ```rust
//! use smart_building_sim::simulation::{
//!     BuildingSimulator, BuildingSimulatorConfig, Calibration, Samples,
//! };
//!
//! let config = BuildingSimulatorConfig {
//!     calibration: Calibration::Additive,
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let mut sim = BuildingSimulator::new(config);
//! let year = sim.run(55.0, Samples::Count(365)).unwrap();
//!
//! let mean_temp = year.mean_indoor_temp().unwrap();
//! assert!(mean_temp > 18.0 && mean_temp < 19.0);
//! ```

pub mod building;
pub mod calibration;
pub mod generation;

pub use building::{
    simulate, BuildingSimulator, BuildingSimulatorConfig, HvacInput, ObservationRow, Samples,
    SyntheticDataset,
};
pub use calibration::{Calibration, CalibrationConstants, Rounding};
pub use generation::{
    generate_reference_dataset, GenerationConfig, HvacDistribution, PlausibilityBand,
};
