//! Training pipeline for the SARSA agent

use std::{fs::File, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Environment, TrainingObserver},
    sarsa::SarsaAgent,
};

/// Training configuration
///
/// Defaults follow the reference Mountain Car run: 50 000 episodes of up to
/// 200 steps, stopping early once the best return has been flat for 10 000
/// consecutive episodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Episode budget
    pub max_episodes: usize,

    /// Per-episode step budget (applies even if the environment never
    /// reports `done`)
    pub max_steps_per_episode: usize,

    /// Early stop after this many consecutive episodes with an unchanged
    /// best return
    pub convergence_streak: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_episodes: 50_000,
            max_steps_per_episode: 200,
            convergence_streak: 10_000,
        }
    }
}

/// Why a training run stopped.
///
/// Environment faults are the third exit path; they propagate as `Err` from
/// [`TrainingPipeline::run`] instead of appearing here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The best return was flat for the configured streak
    Converged,
    /// The episode budget ran out
    EpisodeBudgetExhausted,
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Episodes completed
    pub episodes: usize,

    /// Best episode return observed (`f64::NEG_INFINITY` if no episode ran)
    pub best_return: f64,

    /// Running best return, one entry per episode (not the raw per-episode
    /// returns)
    pub return_history: Vec<f64>,

    /// Exploration rate after each episode, for diagnostic plotting
    pub epsilon_trace: Vec<f64>,

    /// Greedy action per discretized state, row-major in state order
    pub policy: Vec<usize>,

    /// Which normal exit path ended the run
    pub termination: TerminationReason,
}

impl TrainingReport {
    /// Save the report to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a report from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }

    /// Export `(episode, best_return, epsilon)` rows as CSV for external
    /// plotting
    pub fn write_history_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["episode", "best_return", "epsilon"])?;
        for (episode, (best, epsilon)) in self
            .return_history
            .iter()
            .zip(&self.epsilon_trace)
            .enumerate()
        {
            writer.write_record([
                episode.to_string(),
                best.to_string(),
                epsilon.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Training pipeline: runs episodes against an environment, tracks the
/// running best return, and stops early once it stays flat long enough.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn TrainingObserver>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn TrainingObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run training until convergence or budget exhaustion.
    ///
    /// The environment is closed on every exit path, including an
    /// environment fault mid-run.
    ///
    /// # Errors
    ///
    /// Environment and observer failures abort the run and propagate.
    pub fn run<E: Environment>(
        &mut self,
        agent: &mut SarsaAgent,
        env: &mut E,
    ) -> Result<TrainingReport> {
        let outcome = self.run_episodes(agent, env);
        let closed = env.close();
        let report = outcome?;
        closed?;
        Ok(report)
    }

    fn run_episodes<E: Environment>(
        &mut self,
        agent: &mut SarsaAgent,
        env: &mut E,
    ) -> Result<TrainingReport> {
        for observer in &mut self.observers {
            observer.on_training_start(self.config.max_episodes)?;
        }

        let mut best_return = f64::NEG_INFINITY;
        let mut return_history = Vec::new();
        let mut epsilon_trace = Vec::new();
        let mut streak = 0usize;
        let mut episodes = 0usize;
        let mut termination = TerminationReason::EpisodeBudgetExhausted;

        for episode in 0..self.config.max_episodes {
            let episode_return = self.run_episode(agent, env)?;
            episodes = episode + 1;

            if episode_return > best_return {
                best_return = episode_return;
            }
            return_history.push(best_return);
            epsilon_trace.push(agent.epsilon());

            for observer in &mut self.observers {
                observer.on_episode_end(episode, episode_return, best_return, agent.epsilon())?;
            }

            // Flatness check over the running best; the first episode has no
            // predecessor to compare against
            if episode > 0 {
                if return_history[episode] == return_history[episode - 1] {
                    streak += 1;
                    if streak == self.config.convergence_streak {
                        termination = TerminationReason::Converged;
                        break;
                    }
                } else {
                    streak = 0;
                }
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingReport {
            episodes,
            best_return,
            return_history,
            epsilon_trace,
            policy: agent.greedy_policy(),
            termination,
        })
    }

    /// One episode: reset, pick the initial action, then step/learn until
    /// the environment reports `done` or the step budget runs out. The
    /// action learned on is always the action taken next (on-policy).
    fn run_episode<E: Environment>(&mut self, agent: &mut SarsaAgent, env: &mut E) -> Result<f64> {
        let mut observation = env.reset()?;
        let mut action = agent.select_action(&observation);
        let mut episode_return = 0.0;

        for _ in 0..self.config.max_steps_per_episode {
            let outcome = env.step(action)?;
            let next_action = agent.select_action(&outcome.observation);

            agent.learn(
                &observation,
                action,
                outcome.reward,
                &outcome.observation,
                next_action,
            );

            episode_return += outcome.reward;
            observation = outcome.observation;
            action = next_action;

            if outcome.done {
                break;
            }
        }

        Ok(episode_return)
    }
}
