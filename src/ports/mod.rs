//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the learning core and the
//! outside world: the environment the agent trains in, and the observers
//! that collect data while it does.

pub mod environment;
pub mod observer;

pub use environment::{Environment, StepOutcome};
pub use observer::TrainingObserver;
