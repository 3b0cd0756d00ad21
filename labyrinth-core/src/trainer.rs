//! Train [`Agent`].
mod config;
use crate::{
    record::{AggregateRecorder, RecordValue},
    Agent, DiscreteAct, Env, ReplayBufferBase, Transition,
};
use anyhow::Result;
use chrono::Local;
pub use config::TrainerConfig;
use log::{debug, info, trace};
use std::sync::{Arc, Mutex};

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeOutcome {
    /// The environment reached a terminal state.
    Terminated,

    /// The step budget ran out.
    Truncated,

    /// The stop signal was raised during the episode.
    Cancelled,
}

/// The terminated episode with the fewest steps.
#[derive(Debug, Clone)]
pub struct BestEpisode<O: crate::Obs> {
    /// Index of the episode, starting from 0.
    pub episode: usize,

    /// Transitions of the episode, in order.
    pub transitions: Vec<Transition<O>>,
}

impl<O: crate::Obs> BestEpisode<O> {
    /// Number of steps of the episode.
    pub fn steps(&self) -> usize {
        self.transitions.len()
    }
}

/// Result of [`Trainer::train()`].
#[derive(Debug, Clone)]
pub struct TrainingSummary<O: crate::Obs> {
    /// Outcome of every completed episode. Cancelled episodes are not included.
    pub outcomes: Vec<EpisodeOutcome>,

    /// `true` if training was stopped before all episodes ran.
    pub cancelled: bool,

    /// `None` if no episode terminated.
    pub best_episode: Option<BestEpisode<O>>,
}

impl<O: crate::Obs> TrainingSummary<O> {
    /// Number of completed episodes.
    pub fn episodes(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of episodes that reached a terminal state.
    pub fn n_terminated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| **o == EpisodeOutcome::Terminated)
            .count()
    }
}

struct Episode<O: crate::Obs> {
    outcome: EpisodeOutcome,
    transitions: Vec<Transition<O>>,
    episode_return: f32,
    losses: Vec<f32>,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages training loop and related objects.
///
/// # Training loop
///
/// 1. Reset [`Env`] and the step counter of the episode.
/// 2. Take an action with [`Policy::sample`](crate::Policy::sample) and do an
///    environment step. The record returned by the environment, tagged with
///    `episode`, `step` and `reward`, is written to the recorder.
/// 3. Hand the transition `(o_t, a_t, r_t, o_t+1, done)` to
///    [`Agent::observe`]. Agents learning online update their estimator with
///    it. Agents with experience replay push it into the buffer and learn
///    from a sampled batch once the buffer holds enough transitions.
/// 4. Back to step 2 until the episode terminates or the step budget
///    `max_steps_per_episode` runs out.
/// 5. Call [`Agent::end_episode`] once and store the episode record
///    (`episode`, `episode_return`, `episode_steps`, `epsilon`, `loss`,
///    `datetime`). Records are flushed every `flush_record_interval` episodes.
/// 6. Back to step 1 until `episodes` episodes are done.
///
/// The stop signal is checked before every step. An episode interrupted by
/// the signal is abandoned: [`Agent::end_episode`] is not called and the
/// episode is not counted.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|Transition|A
///     A -->|Transition|D[ReplayBufferBase]
///     D -->|Batch|A
///     B -->|Record|C[AggregateRecorder]
/// ```
pub struct Trainer {
    episodes: usize,
    max_steps_per_episode: usize,
    flush_record_interval: usize,
    stop: Option<Arc<Mutex<bool>>>,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            episodes: config.episodes,
            max_steps_per_episode: config.max_steps_per_episode,
            flush_record_interval: config.flush_record_interval,
            stop: None,
        })
    }

    /// Sets a flag stopping the training loop when it becomes `true`.
    pub fn with_stop_signal(mut self, stop: Arc<Mutex<bool>>) -> Self {
        self.stop = Some(stop);
        self
    }

    fn is_stopped(&self) -> bool {
        match &self.stop {
            // A poisoned flag stops training as well
            Some(stop) => stop.lock().map(|v| *v).unwrap_or(true),
            None => false,
        }
    }

    fn run_episode<E, A, R>(
        &self,
        episode: usize,
        env: &mut E,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut dyn AggregateRecorder,
    ) -> Result<Episode<E::Obs>>
    where
        E: Env,
        E::Act: DiscreteAct,
        A: Agent<E, R>,
        R: ReplayBufferBase,
    {
        let mut obs = env.reset()?;
        let mut transitions = Vec::new();
        let mut episode_return = 0.0;
        let mut losses = Vec::new();

        for t in 0..self.max_steps_per_episode {
            if self.is_stopped() {
                return Ok(Episode {
                    outcome: EpisodeOutcome::Cancelled,
                    transitions,
                    episode_return,
                    losses,
                });
            }

            let act = agent.sample(&obs)?;
            let (step, mut record) = env.step(&act)?;
            trace!("episode {}, step {}: {:?} -> {:?}", episode, t, act, step.obs);

            record.insert("episode", RecordValue::Scalar(episode as f32));
            record.insert("step", RecordValue::Scalar(t as f32));
            record.insert("reward", RecordValue::Scalar(step.reward));
            recorder.write(record);

            let tr = Transition::new(
                obs,
                step.act.index(),
                step.reward,
                step.obs.clone(),
                step.is_terminated,
            );
            if let Some(r) = agent.observe(tr.clone(), buffer)? {
                if let Ok(loss) = r.get_scalar("loss") {
                    losses.push(loss);
                }
            }
            transitions.push(tr);
            episode_return += step.reward;
            obs = step.obs;

            if step.is_terminated {
                return Ok(Episode {
                    outcome: EpisodeOutcome::Terminated,
                    transitions,
                    episode_return,
                    losses,
                });
            }
        }

        Ok(Episode {
            outcome: EpisodeOutcome::Truncated,
            transitions,
            episode_return,
            losses,
        })
    }

    /// Train the agent.
    ///
    /// `env`, `agent` and `buffer` are owned by the caller and stay usable
    /// after training, also when training was stopped.
    pub fn train<E, A, R>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut dyn AggregateRecorder,
    ) -> Result<TrainingSummary<E::Obs>>
    where
        E: Env,
        E::Act: DiscreteAct,
        A: Agent<E, R>,
        R: ReplayBufferBase,
    {
        let mut outcomes = Vec::with_capacity(self.episodes);
        let mut best_episode: Option<BestEpisode<E::Obs>> = None;
        let mut cancelled = false;
        agent.train();
        info!("Starts training for {} episodes", self.episodes);

        for episode in 0..self.episodes {
            if self.is_stopped() {
                cancelled = true;
                break;
            }

            let ep = self.run_episode(episode, env, agent, buffer, recorder)?;
            if ep.outcome == EpisodeOutcome::Cancelled {
                info!("Training stopped during episode {}", episode);
                cancelled = true;
                break;
            }

            let n_steps = ep.transitions.len();
            let mut record = agent.end_episode();
            record.insert("episode", RecordValue::Scalar(episode as f32));
            record.insert("episode_return", RecordValue::Scalar(ep.episode_return));
            record.insert("episode_steps", RecordValue::Scalar(n_steps as f32));
            if !ep.losses.is_empty() {
                let loss = ep.losses.iter().sum::<f32>() / ep.losses.len() as f32;
                record.insert("loss", RecordValue::Scalar(loss));
            }
            record.insert("datetime", RecordValue::DateTime(Local::now()));
            debug!(
                "episode {}: {:?} after {} steps, return {}",
                episode, ep.outcome, n_steps, ep.episode_return
            );
            recorder.store(record);

            // Strictly fewer steps, so the earliest episode wins on ties
            if ep.outcome == EpisodeOutcome::Terminated
                && best_episode.as_ref().map_or(true, |b| n_steps < b.steps())
            {
                best_episode = Some(BestEpisode {
                    episode,
                    transitions: ep.transitions,
                });
            }
            outcomes.push(ep.outcome);

            if outcomes.len() % self.flush_record_interval == 0 {
                info!("{} episodes done", outcomes.len());
                recorder.flush(outcomes.len() as _);
            }
        }

        if outcomes.len() % self.flush_record_interval != 0 {
            recorder.flush(outcomes.len() as _);
        }

        let summary = TrainingSummary {
            outcomes,
            cancelled,
            best_episode,
        };
        info!(
            "Training finished: {} episodes, {} terminated, best episode {:?}",
            summary.episodes(),
            summary.n_terminated(),
            summary
                .best_episode
                .as_ref()
                .map(|b| (b.episode, b.steps()))
        );
        Ok(summary)
    }
}
