//! A one-dimensional corridor and scripted agents, used for tests.
use crate::{
    error::LabyrinthError,
    record::{Record, RecordValue},
    Act, Agent, DiscreteAct, DiscreteObs, Env, Obs, Policy, ReplayBufferBase, Step, Transition,
    ValueEstimator,
};
use anyhow::Result;
use std::{
    path::Path,
    sync::{Arc, Mutex},
};

/// Position in the corridor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineObs(pub usize);

impl Obs for LineObs {}

impl DiscreteObs for LineObs {
    fn index(&self) -> usize {
        self.0
    }
}

/// Move to the left or to the right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineAct {
    Left,
    Right,
}

impl Act for LineAct {}

impl DiscreteAct for LineAct {
    fn n_actions() -> usize {
        2
    }

    fn index(&self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    fn from_index(ix: usize) -> Result<Self, LabyrinthError> {
        match ix {
            0 => Ok(Self::Left),
            1 => Ok(Self::Right),
            _ => Err(LabyrinthError::InvalidAction(ix)),
        }
    }
}

/// Corridor of `len` cells. The agent starts at 0, the goal is the last cell.
pub struct LineEnv {
    len: usize,
    pos: usize,
}

impl Env for LineEnv {
    type Config = usize;
    type Obs = LineObs;
    type Act = LineAct;
    type Info = ();

    fn build(config: &usize, _seed: i64) -> Result<Self> {
        Ok(Self {
            len: *config,
            pos: 0,
        })
    }

    fn step(&mut self, a: &LineAct) -> Result<(Step<Self>, Record)> {
        self.pos = match a {
            LineAct::Left => self.pos.saturating_sub(1),
            LineAct::Right => (self.pos + 1).min(self.len - 1),
        };
        let done = self.pos == self.len - 1;
        let reward = if done { 1.0 } else { 0.0 };
        let record = Record::from_scalar("pos", self.pos as f32);
        Ok((Step::new(LineObs(self.pos), *a, reward, done, ()), record))
    }

    fn reset(&mut self) -> Result<LineObs> {
        self.pos = 0;
        Ok(LineObs(self.pos))
    }
}

/// Prefers a single action in every state.
pub struct Prefer(pub usize);

impl ValueEstimator for Prefer {
    type Obs = LineObs;

    fn n_actions(&self) -> usize {
        2
    }

    fn action_values(&self, _obs: &LineObs) -> Result<Vec<f32>> {
        let mut vs = vec![0.0; 2];
        vs[self.0] = 1.0;
        Ok(vs)
    }

    fn update(&mut self, _batch: &[Transition<LineObs>]) -> Result<Record> {
        Ok(Record::empty())
    }
}

/// Replays fixed action sequences, one per episode, cycling through them.
pub struct ScriptedAgent {
    scripts: Vec<Vec<usize>>,
    episode: usize,
    t: usize,
    pub n_observed: usize,
    pub n_end_episode: usize,
    pub stop_after: Option<(usize, Arc<Mutex<bool>>)>,
}

impl ScriptedAgent {
    pub fn new(scripts: Vec<Vec<usize>>) -> Self {
        Self {
            scripts,
            episode: 0,
            t: 0,
            n_observed: 0,
            n_end_episode: 0,
            stop_after: None,
        }
    }
}

impl Policy<LineEnv> for ScriptedAgent {
    fn sample(&mut self, _obs: &LineObs) -> Result<LineAct> {
        let script = &self.scripts[self.episode % self.scripts.len()];
        let ix = script[self.t % script.len()];
        self.t += 1;
        Ok(LineAct::from_index(ix)?)
    }
}

impl<R: ReplayBufferBase> Agent<LineEnv, R> for ScriptedAgent {
    fn train(&mut self) {}

    fn eval(&mut self) {}

    fn is_train(&self) -> bool {
        true
    }

    fn observe(&mut self, _tr: Transition<LineObs>, _buffer: &mut R) -> Result<Option<Record>> {
        self.n_observed += 1;
        if let Some((n, stop)) = &self.stop_after {
            if self.n_observed == *n {
                *stop.lock().unwrap() = true;
            }
        }
        Ok(Some(Record::from_scalar("loss", 0.5)))
    }

    fn end_episode(&mut self) -> Record {
        self.episode += 1;
        self.t = 0;
        self.n_end_episode += 1;
        Record::from_slice(&[("epsilon", RecordValue::Scalar(1.0))])
    }

    fn save_params(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn load_params(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
