//! BOXES-style tabular SARSA for continuous-state, discrete-action control
//!
//! This crate provides:
//! - Uniform grid discretization of bounded continuous observations
//! - A dense, flat action-value table with first-max greedy lookups
//! - An on-policy SARSA agent with per-call epsilon decay
//! - A training pipeline with flat-best-return convergence detection and
//!   pluggable observers (progress bars, JSONL export, metrics)
//!
//! The environment is an external collaborator behind the
//! [`Environment`] port; this crate ships no simulators.

pub mod error;
pub mod grid;
pub mod pipeline;
pub mod ports;
pub mod sarsa;

pub use error::{Error, Result};
pub use grid::StateGrid;
pub use pipeline::{
    JsonlObserver, MetricsObserver, ProgressObserver, TerminationReason, TrainingConfig,
    TrainingPipeline, TrainingReport,
};
pub use ports::{Environment, StepOutcome, TrainingObserver};
pub use sarsa::{AgentConfig, QTable, SarsaAgent, SavedSarsaAgent, TrainingMetadata};
