//! Synthetic building thermal/energy simulation and HVAC wastage costing.
//!
//! The simulator turns an HVAC control setting into daily indoor
//! temperature and energy observations; the wastage estimator prices how far
//! those temperatures stray from a target. Both are pure functions that take
//! their random source from the caller.

pub mod cli;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod scenario;
pub mod simulation;
pub mod telemetry;
pub mod wastage;

pub use error::{SimError, SimResult};
pub use simulation::{simulate, Calibration, HvacInput, ObservationRow, Samples, SyntheticDataset};
pub use wastage::{estimate_wastage, CostSummary};
