//! Common test utilities for the boxes test suite.
//!
//! Provides a scripted environment double whose per-episode rewards are
//! fixed up front, so training outcomes are fully predictable.

use boxes::{Environment, Error, Result, StepOutcome};

/// Environment double that replays a fixed reward per step for each episode.
///
/// Episode `i` pays `rewards_per_episode[i]` on every one of `steps_per_episode`
/// steps, then reports `done`. Observations sweep deterministically through the
/// declared bounds so successive steps land in different grid cells.
pub struct ScriptedEnv {
    rewards_per_episode: Vec<f64>,
    steps_per_episode: usize,
    episode: usize,
    step_in_episode: usize,
    pub resets: usize,
    pub closed: bool,
}

impl ScriptedEnv {
    pub fn new(rewards_per_episode: Vec<f64>, steps_per_episode: usize) -> Self {
        Self {
            rewards_per_episode,
            steps_per_episode,
            episode: 0,
            step_in_episode: 0,
            resets: 0,
            closed: false,
        }
    }

    fn observation(&self) -> Vec<f64> {
        // Walk through [-1, 1) in small deterministic increments
        let t = (self.step_in_episode % 20) as f64;
        vec![-1.0 + t * 0.1, -1.0 + t * 0.05]
    }
}

impl Environment for ScriptedEnv {
    fn reset(&mut self) -> Result<Vec<f64>> {
        if self.episode >= self.rewards_per_episode.len() {
            return Err(Error::Environment {
                message: "scripted episodes exhausted".to_string(),
            });
        }
        self.resets += 1;
        self.step_in_episode = 0;
        Ok(self.observation())
    }

    fn step(&mut self, _action: usize) -> Result<StepOutcome> {
        let reward = self.rewards_per_episode[self.episode];
        self.step_in_episode += 1;
        let done = self.step_in_episode >= self.steps_per_episode;
        let observation = self.observation();
        if done {
            self.episode += 1;
        }
        Ok(StepOutcome {
            observation,
            reward,
            done,
        })
    }

    fn observation_bounds(&self) -> (Vec<f64>, Vec<f64>) {
        (vec![-1.0, -1.0], vec![1.0, 1.0])
    }

    fn action_count(&self) -> usize {
        3
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
