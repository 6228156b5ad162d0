//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events, allowing
//! composable data collection without coupling the training loop to
//! specific output formats or metrics.

use crate::Result;

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different types of data during
/// training. Examples include:
/// - Progress bars for user feedback
/// - JSONL export for reward-vs-episode plotting
/// - Metrics tracking for evaluation
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. `on_episode_end(...)` - After every completed episode
/// 3. `on_training_end()` - Once at the end (early stop or budget exhausted)
///
/// # Examples
///
/// ```no_run
/// use boxes::ports::TrainingObserver;
///
/// struct EpisodeCounter {
///     episodes: usize,
/// }
///
/// impl TrainingObserver for EpisodeCounter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         _episode_return: f64,
///         _best_return: f64,
///         _epsilon: f64,
///     ) -> boxes::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait TrainingObserver: Send {
    /// Called when training starts.
    ///
    /// # Parameters
    ///
    /// * `total_episodes` - The episode budget for the run
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to initialize observation state.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every completed episode.
    ///
    /// # Parameters
    ///
    /// * `episode` - Index of the episode (0-based)
    /// * `episode_return` - Accumulated reward of this episode
    /// * `best_return` - Running best over all episodes so far
    /// * `epsilon` - Exploration rate after the episode
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to record per-episode data.
    fn on_episode_end(
        &mut self,
        _episode: usize,
        _episode_return: f64,
        _best_return: f64,
        _epsilon: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when training completes, on both the early-stop and the
    /// budget-exhausted path.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to flush outputs or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
