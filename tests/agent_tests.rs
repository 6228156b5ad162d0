//! End-to-end agent behavior tests

use boxes::{
    AgentConfig, Environment, Result, SarsaAgent, StepOutcome, TrainingConfig, TrainingPipeline,
};

mod common;
use common::ScriptedEnv;

/// One-step environment where action 1 pays +1 and action 0 pays nothing.
struct TwoArmEnv;

impl Environment for TwoArmEnv {
    fn reset(&mut self) -> Result<Vec<f64>> {
        Ok(vec![0.5])
    }

    fn step(&mut self, action: usize) -> Result<StepOutcome> {
        let reward = if action == 1 { 1.0 } else { 0.0 };
        Ok(StepOutcome {
            observation: vec![0.5],
            reward,
            done: true,
        })
    }

    fn observation_bounds(&self) -> (Vec<f64>, Vec<f64>) {
        (vec![0.0], vec![1.0])
    }

    fn action_count(&self) -> usize {
        2
    }
}

#[test]
fn test_agent_learns_the_rewarding_action() {
    let mut env = TwoArmEnv;
    let config = AgentConfig::default()
        .with_bins(4)
        .with_min_epsilon(0.0)
        .with_decay_schedule(1.0, 200)
        .with_seed(42);
    let mut agent = SarsaAgent::for_environment(config, &env).unwrap();

    let training = TrainingConfig {
        max_episodes: 500,
        max_steps_per_episode: 1,
        convergence_streak: 10_000,
    };
    let report = TrainingPipeline::new(training)
        .run(&mut agent, &mut env)
        .unwrap();

    assert_eq!(report.best_return, 1.0);

    // The cell containing the start observation must prefer the paying arm
    let cell = agent.grid().discretize(&[0.5]);
    assert!(agent.q_table().get(&cell, 1) > agent.q_table().get(&cell, 0));
    assert_eq!(agent.q_table().greedy_action(&cell), 1);
}

#[test]
fn test_seeded_training_is_reproducible() {
    let run = |seed: u64| {
        let mut env = ScriptedEnv::new(vec![-5.0; 10], 5);
        let mut agent =
            SarsaAgent::for_environment(AgentConfig::default().with_seed(seed), &env).unwrap();
        let config = TrainingConfig {
            max_episodes: 10,
            max_steps_per_episode: 50,
            convergence_streak: 1000,
        };
        let report = TrainingPipeline::new(config)
            .run(&mut agent, &mut env)
            .unwrap();
        (report.policy, report.epsilon_trace)
    };

    assert_eq!(run(77), run(77));
}

#[test]
fn test_exploration_rate_decay_matches_schedule_across_training() {
    let mut env = ScriptedEnv::new(vec![-5.0; 4], 5);
    let decay = 0.5 / 1000.0;
    let config = AgentConfig::default()
        .with_decay_schedule(0.5, 1000)
        .with_seed(5);
    let mut agent = SarsaAgent::for_environment(config, &env).unwrap();

    let training = TrainingConfig {
        max_episodes: 4,
        max_steps_per_episode: 50,
        convergence_streak: 1000,
    };
    let report = TrainingPipeline::new(training)
        .run(&mut agent, &mut env)
        .unwrap();

    // One selection at reset plus one per step: 6 calls per episode
    let calls_per_episode = 6.0;
    for (episode, &epsilon) in report.epsilon_trace.iter().enumerate() {
        let expected = 1.0 - calls_per_episode * (episode as f64 + 1.0) * decay;
        assert!(
            (epsilon - expected).abs() < 1e-12,
            "episode {episode}: epsilon {epsilon} != expected {expected}"
        );
    }
}
