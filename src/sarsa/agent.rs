//! SARSA agent over a discretized continuous state space
//!
//! The agent couples a [`StateGrid`] with a dense [`QTable`] and follows an
//! ε-greedy behavior policy. Exploration decays by a fixed amount on every
//! action selection, matching the reference schedule where the decrement is
//! computed once at configuration time from a decay budget and the total
//! number of planned steps.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    grid::StateGrid,
    ports::Environment,
    sarsa::q_table::QTable,
};

/// Hyperparameters for a [`SarsaAgent`].
///
/// Defaults follow the reference Mountain Car schedule: α = 0.08, γ = 0.98,
/// 30 bins, ε decaying from 1.0 to a floor of 0.005 over a planned
/// 50 000 × 200 steps.
///
/// # Examples
///
/// ```
/// use boxes::AgentConfig;
///
/// let config = AgentConfig::default()
///     .with_bins(20)
///     .with_decay_schedule(2.5, 50_000 * 200)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate α in (0, 1]
    pub learning_rate: f64,
    /// Discount factor γ in (0, 1]
    pub discount_factor: f64,
    /// Bins per observation dimension (the table holds bins + 1 cells)
    pub bins: usize,
    /// Initial exploration rate
    pub epsilon: f64,
    /// Exploration rate floor
    pub min_epsilon: f64,
    /// Fixed per-selection epsilon decrement
    pub epsilon_decay: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let planned_steps = 50_000 * 200;
        Self {
            learning_rate: 0.08,
            discount_factor: 0.98,
            bins: 30,
            epsilon: 1.0,
            min_epsilon: 0.005,
            epsilon_decay: 500.0 * 0.005 / planned_steps as f64,
            seed: None,
        }
    }
}

impl AgentConfig {
    /// Set the learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the discount factor.
    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Set the bin count per observation dimension.
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    /// Set the exploration floor.
    pub fn with_min_epsilon(mut self, min_epsilon: f64) -> Self {
        self.min_epsilon = min_epsilon;
        self
    }

    /// Derive the per-selection decrement from a total decay budget spread
    /// over the planned number of selection calls.
    pub fn with_decay_schedule(mut self, decay_budget: f64, planned_steps: usize) -> Self {
        self.epsilon_decay = decay_budget / planned_steps as f64;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the hyperparameters.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` if α or γ fall outside (0, 1],
    /// if `bins` is zero, if ε lies outside [`min_epsilon`, 1.0], or if the
    /// decay is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(invalid(format!(
                "learning rate {} must be in (0, 1]",
                self.learning_rate
            )));
        }
        if !(self.discount_factor > 0.0 && self.discount_factor <= 1.0) {
            return Err(invalid(format!(
                "discount factor {} must be in (0, 1]",
                self.discount_factor
            )));
        }
        if self.bins == 0 {
            return Err(invalid("bins must be at least 1".to_string()));
        }
        if !(self.min_epsilon >= 0.0 && self.min_epsilon <= 1.0) {
            return Err(invalid(format!(
                "epsilon floor {} must be in [0, 1]",
                self.min_epsilon
            )));
        }
        if !(self.epsilon >= self.min_epsilon && self.epsilon <= 1.0) {
            return Err(invalid(format!(
                "initial epsilon {} must be in [{}, 1]",
                self.epsilon, self.min_epsilon
            )));
        }
        if !self.epsilon_decay.is_finite() || self.epsilon_decay < 0.0 {
            return Err(invalid(format!(
                "epsilon decay {} must be finite and non-negative",
                self.epsilon_decay
            )));
        }
        Ok(())
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfiguration { message }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SarsaAgentState {
    pub q_table: QTable,
    pub grid: StateGrid,
    pub num_actions: usize,
    pub epsilon: f64,
    pub initial_epsilon: f64,
    pub epsilon_decay: f64,
    pub min_epsilon: f64,
    pub rng_seed: Option<u64>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// SARSA agent (on-policy TD control)
///
/// Owns the value table and the exploration state. Action selection is
/// ε-greedy; `learn` applies the SARSA update toward the value of the action
/// actually taken next, so exploration feeds back into the target.
#[derive(Debug, Clone)]
pub struct SarsaAgent {
    q_table: QTable,
    grid: StateGrid,
    num_actions: usize,
    epsilon: f64,
    initial_epsilon: f64,
    epsilon_decay: f64,
    min_epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl SarsaAgent {
    /// Create an agent for an observation space with the given per-dimension
    /// bounds and a discrete action space of `num_actions` actions.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails [`AgentConfig::validate`],
    /// if the bounds are malformed, or if `num_actions` is zero.
    pub fn new(
        config: AgentConfig,
        low: Vec<f64>,
        high: Vec<f64>,
        num_actions: usize,
    ) -> Result<Self> {
        config.validate()?;
        if num_actions == 0 {
            return Err(invalid("environment exposes no actions".to_string()));
        }
        let grid = StateGrid::new(low, high, config.bins)?;
        let q_table = QTable::new(
            grid.dims(),
            grid.cells_per_dim(),
            num_actions,
            config.learning_rate,
            config.discount_factor,
        );

        Ok(Self {
            q_table,
            grid,
            num_actions,
            epsilon: config.epsilon,
            initial_epsilon: config.epsilon,
            epsilon_decay: config.epsilon_decay,
            min_epsilon: config.min_epsilon,
            rng: build_rng(config.seed),
            rng_seed: config.seed,
        })
    }

    /// Create an agent from an environment's static configuration
    /// (observation bounds and action count, queried once here).
    pub fn for_environment<E: Environment + ?Sized>(config: AgentConfig, env: &E) -> Result<Self> {
        let (low, high) = env.observation_bounds();
        Self::new(config, low, high, env.action_count())
    }

    /// ε-greedy action selection.
    ///
    /// Every call decays ε by the configured decrement (clamped at the
    /// floor) while it is still above the floor; the decay is deliberately
    /// not coupled to whether the call ends up exploring or exploiting.
    /// With probability 1 − ε the greedy action is returned (lowest index on
    /// ties); otherwise a uniformly random action, which may coincide with
    /// the greedy one.
    pub fn select_action(&mut self, observation: &[f64]) -> usize {
        let state = self.grid.discretize(observation);

        if self.epsilon > self.min_epsilon {
            self.epsilon = (self.epsilon - self.epsilon_decay).max(self.min_epsilon);
        }

        if self.rng.random::<f64>() < 1.0 - self.epsilon {
            self.q_table.greedy_action(&state)
        } else {
            self.rng.random_range(0..self.num_actions)
        }
    }

    /// SARSA update for one transition.
    ///
    /// `next_action` must be the action that will actually be taken from
    /// `next_observation` (on-policy), not the greedy action under the
    /// current table.
    pub fn learn(
        &mut self,
        observation: &[f64],
        action: usize,
        reward: f64,
        next_observation: &[f64],
        next_action: usize,
    ) {
        let state = self.grid.discretize(observation);
        let next_state = self.grid.discretize(next_observation);
        self.q_table
            .sarsa_update(&state, action, reward, &next_state, next_action);
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of discrete actions.
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// The discretization grid.
    pub fn grid(&self) -> &StateGrid {
        &self.grid
    }

    /// The value table.
    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Extract the greedy policy: one action per discretized state,
    /// row-major in state order, lowest index on ties.
    pub fn greedy_policy(&self) -> Vec<usize> {
        self.q_table.greedy_policy()
    }

    /// Reset the value table and exploration rate to initial conditions.
    pub fn reset(&mut self) {
        self.q_table = QTable::new(
            self.grid.dims(),
            self.grid.cells_per_dim(),
            self.num_actions,
            self.q_table.learning_rate(),
            self.q_table.discount_factor(),
        );
        self.epsilon = self.initial_epsilon;
        self.rng = build_rng(self.rng_seed);
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub(crate) fn export_state(&self) -> SarsaAgentState {
        SarsaAgentState {
            q_table: self.q_table.clone(),
            grid: self.grid.clone(),
            num_actions: self.num_actions,
            epsilon: self.epsilon,
            initial_epsilon: self.initial_epsilon,
            epsilon_decay: self.epsilon_decay,
            min_epsilon: self.min_epsilon,
            rng_seed: self.rng_seed,
        }
    }

    pub(crate) fn from_state(state: SarsaAgentState) -> Self {
        Self {
            q_table: state.q_table,
            grid: state.grid,
            num_actions: state.num_actions,
            epsilon: state.epsilon,
            initial_epsilon: state.initial_epsilon,
            epsilon_decay: state.epsilon_decay,
            min_epsilon: state.min_epsilon,
            rng: build_rng(state.rng_seed),
            rng_seed: state.rng_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_agent(config: AgentConfig) -> SarsaAgent {
        SarsaAgent::new(config, vec![-1.2, -0.07], vec![0.6, 0.07], 3).unwrap()
    }

    #[test]
    fn test_epsilon_decays_by_exactly_the_decrement_per_call() {
        let mut agent = test_agent(
            AgentConfig::default()
                .with_decay_schedule(0.5, 100)
                .with_seed(1),
        );
        let decay = 0.5 / 100.0;

        let before = agent.epsilon();
        agent.select_action(&[0.0, 0.0]);
        assert!((before - agent.epsilon() - decay).abs() < 1e-12);

        // Decay applies on every call, exploring or not
        agent.select_action(&[0.0, 0.0]);
        assert!((before - agent.epsilon() - 2.0 * decay).abs() < 1e-12);
    }

    #[test]
    fn test_epsilon_is_non_increasing_and_floored() {
        let mut config = AgentConfig::default().with_seed(7);
        config.epsilon = 0.05;
        config.min_epsilon = 0.01;
        config.epsilon_decay = 0.02;
        let mut agent = test_agent(config);

        let mut previous = agent.epsilon();
        for _ in 0..50 {
            agent.select_action(&[0.0, 0.0]);
            let epsilon = agent.epsilon();
            assert!(epsilon <= previous);
            assert!(epsilon >= 0.01);
            previous = epsilon;
        }
        assert_eq!(agent.epsilon(), 0.01);
    }

    #[test]
    fn test_zero_epsilon_always_selects_greedy() {
        let mut config = AgentConfig::default().with_seed(3);
        config.epsilon = 0.0;
        config.min_epsilon = 0.0;
        config.epsilon_decay = 0.0;
        let mut agent = test_agent(config);

        // Make action 2 the best in the cell containing the origin
        let cell = agent.grid().discretize(&[0.0, 0.0]);
        for _ in 0..100 {
            agent.learn(&[0.0, 0.0], 2, 1.0, &[0.0, 0.0], 2);
        }
        assert!(agent.q_table().get(&cell, 2) > 0.0);

        for _ in 0..50 {
            assert_eq!(agent.select_action(&[0.0, 0.0]), 2);
        }
    }

    #[test]
    fn test_learn_applies_reference_scenario() {
        // Zero table, γ = 0.98, α = 0.08, reward −1: new value is −0.08
        let mut config = AgentConfig::default().with_seed(5);
        config.epsilon_decay = 0.0;
        let mut agent = test_agent(config);

        agent.learn(&[0.0, 0.0], 1, -1.0, &[0.1, 0.01], 0);
        let cell = agent.grid().discretize(&[0.0, 0.0]);
        assert!((agent.q_table().get(&cell, 1) - (-0.08)).abs() < 1e-12);
    }

    #[test]
    fn test_seeded_agents_are_deterministic() {
        let config = AgentConfig::default().with_seed(11);
        let mut a = test_agent(config.clone());
        let mut b = test_agent(config);

        for _ in 0..200 {
            assert_eq!(a.select_action(&[-0.4, 0.02]), b.select_action(&[-0.4, 0.02]));
        }
    }

    #[test]
    fn test_reset_restores_initial_conditions() {
        let mut agent = test_agent(AgentConfig::default().with_seed(13));
        agent.learn(&[0.0, 0.0], 0, -1.0, &[0.1, 0.01], 1);
        agent.select_action(&[0.0, 0.0]);
        assert!(agent.epsilon() < 1.0);

        agent.reset();
        assert_eq!(agent.epsilon(), 1.0);
        let cell = agent.grid().discretize(&[0.0, 0.0]);
        assert_eq!(agent.q_table().get(&cell, 0), 0.0);
    }

    #[test]
    fn test_config_validation() {
        assert!(AgentConfig::default().validate().is_ok());
        assert!(
            AgentConfig::default()
                .with_learning_rate(0.0)
                .validate()
                .is_err()
        );
        assert!(
            AgentConfig::default()
                .with_discount_factor(1.5)
                .validate()
                .is_err()
        );
        assert!(AgentConfig::default().with_bins(0).validate().is_err());

        let mut config = AgentConfig::default();
        config.epsilon = 0.001; // below the default floor
        assert!(config.validate().is_err());

        let mut config = AgentConfig::default();
        config.epsilon_decay = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_action_space() {
        let result = SarsaAgent::new(AgentConfig::default(), vec![0.0], vec![1.0], 0);
        assert!(result.is_err());
    }
}
