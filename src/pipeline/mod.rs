//! Training pipeline abstractions
//!
//! This module provides the episode loop that drives a SARSA agent against
//! an environment, plus composable observers for recording training data.

pub mod observers;
pub mod training;

// Re-export observer implementations (adapters)
pub use observers::{
    EpisodeObservation, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
};
pub use training::{TerminationReason, TrainingConfig, TrainingPipeline, TrainingReport};

pub use crate::ports::{Environment, TrainingObserver};
