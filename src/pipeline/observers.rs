//! Observer adapters for training pipelines
//!
//! Observers allow composable data collection during training without
//! coupling training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{Result, ports::TrainingObserver};

/// Observation of a single training episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeObservation {
    /// Episode number
    pub episode: usize,
    /// Raw return of this episode
    pub episode_return: f64,
    /// Running best return
    pub best_return: f64,
    /// Exploration rate after the episode
    pub epsilon: f64,
}

/// Progress bar observer - shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self { progress_bar: None }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingObserver for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes {msg}")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(
        &mut self,
        episode: usize,
        _episode_return: f64,
        best_return: f64,
        epsilon: f64,
    ) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(format!("best:{best_return:.1} eps:{epsilon:.3}"));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish();
        }
        Ok(())
    }
}

/// Metrics observer - tracks per-episode traces in memory
pub struct MetricsObserver {
    returns: Vec<f64>,
    best_returns: Vec<f64>,
    epsilons: Vec<f64>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            returns: Vec::new(),
            best_returns: Vec::new(),
            epsilons: Vec::new(),
        }
    }

    /// Episodes observed so far
    pub fn episodes(&self) -> usize {
        self.returns.len()
    }

    /// Best return so far, if any episode completed
    pub fn best_return(&self) -> Option<f64> {
        self.best_returns.last().copied()
    }

    /// Mean of the raw per-episode returns
    pub fn mean_return(&self) -> f64 {
        if self.returns.is_empty() {
            0.0
        } else {
            self.returns.iter().sum::<f64>() / self.returns.len() as f64
        }
    }

    /// Exploration rate after the most recent episode
    pub fn final_epsilon(&self) -> Option<f64> {
        self.epsilons.last().copied()
    }

    /// Raw per-episode returns
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes(),
            best_return: self.best_return(),
            mean_return: self.mean_return(),
            final_epsilon: self.final_epsilon(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub best_return: Option<f64>,
    pub mean_return: f64,
    pub final_epsilon: Option<f64>,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingObserver for MetricsObserver {
    fn on_episode_end(
        &mut self,
        _episode: usize,
        episode_return: f64,
        best_return: f64,
        epsilon: f64,
    ) -> Result<()> {
        self.returns.push(episode_return);
        self.best_returns.push(best_return);
        self.epsilons.push(epsilon);
        Ok(())
    }
}

/// JSONL observer - exports one observation per episode in JSON Lines
/// format, for reward-vs-episode plotting downstream
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer writing to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl TrainingObserver for JsonlObserver {
    fn on_episode_end(
        &mut self,
        episode: usize,
        episode_return: f64,
        best_return: f64,
        epsilon: f64,
    ) -> Result<()> {
        let observation = EpisodeObservation {
            episode,
            episode_return,
            best_return,
            epsilon,
        };
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
