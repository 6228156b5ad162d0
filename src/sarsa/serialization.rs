//! Serialization support for trained SARSA agents.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::sarsa::agent::{SarsaAgent, SarsaAgentState};

/// Summary of the training run that produced a saved agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Episodes completed before the snapshot
    pub episodes: usize,
    /// Best episode return observed, if any episode completed
    pub best_return: Option<f64>,
}

/// Versioned on-disk envelope for a trained agent.
///
/// Captures the value table, the discretization grid, the exploration state,
/// and the recorded RNG seed, so a restored agent resumes exactly where the
/// saved one stopped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSarsaAgent {
    pub version: u32,
    state: SarsaAgentState,
    pub metadata: TrainingMetadata,
}

impl SavedSarsaAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &SarsaAgent, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            state: agent.export_state(),
            metadata,
        }
    }

    pub fn to_agent(&self) -> Result<SarsaAgent> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported SARSA save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }
        Ok(SarsaAgent::from_state(self.state.clone()))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize SARSA agent")?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize SARSA agent")
    }
}
