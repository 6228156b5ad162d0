//! Dense action-value table for temporal difference learning

use serde::{Deserialize, Serialize};

/// Action-value table over a discretized state space.
///
/// Values live in one contiguous buffer of
/// `cells_per_dim ^ dims * num_actions` entries, indexed by a linear offset
/// computed from the state tuple plus the action index. The shape is fixed
/// at construction and all values start at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QTable {
    values: Vec<f64>,
    dims: usize,
    cells_per_dim: usize,
    num_actions: usize,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a zero-initialized table.
    pub fn new(
        dims: usize,
        cells_per_dim: usize,
        num_actions: usize,
        learning_rate: f64,
        discount_factor: f64,
    ) -> Self {
        let len = cells_per_dim.pow(dims as u32) * num_actions;
        Self {
            values: vec![0.0; len],
            dims,
            cells_per_dim,
            num_actions,
            learning_rate,
            discount_factor,
        }
    }

    /// Linear offset of a (state, action) pair.
    ///
    /// Aborts on a state component past the table edge; this is where an
    /// out-of-bounds observation surfaces as a fatal fault.
    fn offset(&self, state: &[usize], action: usize) -> usize {
        debug_assert_eq!(state.len(), self.dims);
        let cell = state.iter().fold(0usize, |acc, &index| {
            assert!(
                index < self.cells_per_dim,
                "state component {index} is outside the table (cells per dimension: {})",
                self.cells_per_dim
            );
            acc * self.cells_per_dim + index
        });
        assert!(
            action < self.num_actions,
            "action {action} is outside the table (actions: {})",
            self.num_actions
        );
        cell * self.num_actions + action
    }

    /// Get the value of a (state, action) pair.
    pub fn get(&self, state: &[usize], action: usize) -> f64 {
        self.values[self.offset(state, action)]
    }

    /// Set the value of a (state, action) pair.
    pub fn set(&mut self, state: &[usize], action: usize, value: f64) {
        let offset = self.offset(state, action);
        self.values[offset] = value;
    }

    /// Greedy action for a state, ties broken toward the lowest index.
    pub fn greedy_action(&self, state: &[usize]) -> usize {
        let base = self.offset(state, 0);
        first_max(&self.values[base..base + self.num_actions])
    }

    /// SARSA update: on-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ Q(s',a') - Q(s,a)]
    ///
    /// `next_action` must be the action actually taken in `next_state`, not
    /// the greedy one; exploration steps feed back into the target.
    pub fn sarsa_update(
        &mut self,
        state: &[usize],
        action: usize,
        reward: f64,
        next_state: &[usize],
        next_action: usize,
    ) {
        let next_q = self.get(next_state, next_action);
        let td_target = reward + self.discount_factor * next_q;
        let offset = self.offset(state, action);
        let td_error = td_target - self.values[offset];
        self.values[offset] += self.learning_rate * td_error;
    }

    /// Greedy action per state over the whole table, row-major in state
    /// order. Deterministic for a fixed table.
    pub fn greedy_policy(&self) -> Vec<usize> {
        self.values.chunks(self.num_actions).map(first_max).collect()
    }

    /// Number of discretized states the table covers.
    pub fn num_states(&self) -> usize {
        self.values.len() / self.num_actions
    }

    /// Number of actions per state.
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Learning rate α.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Discount factor γ.
    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }
}

/// Index of the largest value, keeping the first on ties.
fn first_max(row: &[f64]) -> usize {
    let mut best = 0;
    for (action, &q) in row.iter().enumerate().skip(1) {
        if q > row[best] {
            best = action;
        }
    }
    best
}
