//! SARSA temporal difference learning over a discretized state space
//!
//! This module implements on-policy TD control for continuous-state,
//! discrete-action environments. Observations are discretized by a
//! [`StateGrid`](crate::grid::StateGrid); values live in a dense flat
//! [`QTable`]; the [`SarsaAgent`] selects actions ε-greedily and updates
//! toward the value of the action it actually takes next:
//!
//! Q(s,a) ← Q(s,a) + α[r + γ Q(s',a') - Q(s,a)]
//!
//! ## Usage Example
//!
//! ```no_run
//! use boxes::{AgentConfig, SarsaAgent};
//!
//! let agent = SarsaAgent::new(
//!     AgentConfig::default()
//!         .with_bins(30)
//!         .with_decay_schedule(2.5, 50_000 * 200)
//!         .with_seed(42),
//!     vec![-1.2, -0.07], // observation lows
//!     vec![0.6, 0.07],   // observation highs
//!     3,                 // discrete actions
//! );
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::{AgentConfig, SarsaAgent};
pub use q_table::QTable;
pub use serialization::{SavedSarsaAgent, TrainingMetadata};
