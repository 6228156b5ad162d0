//! Environment port - abstraction over the simulator the agent trains in
//!
//! This port defines the boundary between the learning core and the
//! environment: the core never sees transition dynamics or reward logic,
//! only the stepping interface below.

use crate::Result;

/// Result of a single environment step.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Observation after the step
    pub observation: Vec<f64>,
    /// Reward signal for the step
    pub reward: f64,
    /// Whether the episode has terminated
    pub done: bool,
}

/// Environment trait - the external simulator the trainer drives
///
/// Implementations are synchronous; `reset` and `step` are treated as
/// blocking black-box calls. The static configuration methods
/// (`observation_bounds`, `action_count`) are queried once at agent
/// construction and must not change afterwards.
///
/// # Contract
///
/// Observations returned by `reset` and `step` are expected to stay within
/// the advertised bounds; the discretizer does not clamp (see
/// [`StateGrid`](crate::grid::StateGrid)).
pub trait Environment: Send {
    /// Begin a new episode and return the initial observation.
    ///
    /// # Errors
    ///
    /// Environment faults propagate to the trainer and abort the run.
    fn reset(&mut self) -> Result<Vec<f64>>;

    /// Advance one interaction step with the given action.
    ///
    /// `done = true` signals episode termination, whether the goal was
    /// reached or the environment exhausted its own step budget.
    ///
    /// # Errors
    ///
    /// Environment faults propagate to the trainer and abort the run.
    fn step(&mut self, action: usize) -> Result<StepOutcome>;

    /// Per-dimension (low, high) observation bounds.
    fn observation_bounds(&self) -> (Vec<f64>, Vec<f64>);

    /// Number of discrete actions.
    fn action_count(&self) -> usize;

    /// Release environment resources.
    ///
    /// The trainer calls this on every exit path, including environment
    /// failure.
    ///
    /// # Default Implementation
    ///
    /// Does nothing and returns `Ok(())`.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
