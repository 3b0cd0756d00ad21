//! Maze with continuous positions and actions.
use anyhow::Result;
use labyrinth_core::{
    record::{Record, RecordValue},
    Act, Env, FeatureObs, Obs, Policy, Step,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle `(x, y, width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,

    /// Top edge.
    pub y: f32,

    /// Width.
    pub w: f32,

    /// Height.
    pub h: f32,
}

impl Rect {
    /// Constructs a rectangle.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns `true` if the interiors overlap. Touching edges do not overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Position of the agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousObs {
    /// Horizontal position.
    pub x: f32,

    /// Vertical position.
    pub y: f32,
}

impl Obs for ContinuousObs {}

impl FeatureObs for ContinuousObs {
    fn features(&self) -> Vec<f32> {
        vec![self.x, self.y]
    }
}

/// Direction of a move. Each component is clipped to the action range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousAct {
    /// Horizontal component.
    pub dx: f32,

    /// Vertical component.
    pub dy: f32,
}

impl Act for ContinuousAct {}

/// Configuration of [`ContinuousMazeEnv`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousMazeEnvConfig {
    /// Width of the arena.
    pub width: f32,

    /// Height of the arena.
    pub height: f32,

    /// Radius of the agent.
    pub agent_radius: f32,

    /// Distance per unit of action.
    pub agent_speed: f32,

    /// Bound of each action component.
    pub max_action: f32,

    /// Initial position.
    pub start: (f32, f32),

    /// Walls.
    pub walls: Vec<Rect>,
}

impl Default for ContinuousMazeEnvConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            agent_radius: 10.0,
            agent_speed: 5.0,
            max_action: 5.0,
            start: (150.0, 200.0),
            walls: vec![
                Rect::new(100.0, 50.0, 150.0, 10.0),
                Rect::new(100.0, 250.0, 200.0, 10.0),
                Rect::new(100.0, 50.0, 10.0, 200.0),
                Rect::new(290.0, 60.0, 10.0, 190.0),
            ],
        }
    }
}

impl ContinuousMazeEnvConfig {
    /// Sets the initial position.
    pub fn start(mut self, x: f32, y: f32) -> Self {
        self.start = (x, y);
        self
    }

    /// Sets the walls.
    pub fn walls(mut self, walls: Vec<Rect>) -> Self {
        self.walls = walls;
        self
    }
}

/// A round agent moving in a rectangular arena with walls.
///
/// A move is cancelled when the bounding box of the agent at the new position
/// would overlap a wall. The position is then clipped so that the agent stays
/// inside the arena. The reward is always zero and episodes never terminate,
/// so episodes end by the step budget of the trainer.
pub struct ContinuousMazeEnv {
    config: ContinuousMazeEnvConfig,
    x: f32,
    y: f32,
}

impl ContinuousMazeEnv {
    fn collides(&self, x: f32, y: f32) -> bool {
        let r = self.config.agent_radius;
        let agent = Rect::new(x - r, y - r, 2.0 * r, 2.0 * r);
        self.config.walls.iter().any(|w| agent.intersects(w))
    }

    fn obs(&self) -> ContinuousObs {
        ContinuousObs {
            x: self.x,
            y: self.y,
        }
    }
}

impl Env for ContinuousMazeEnv {
    type Config = ContinuousMazeEnvConfig;
    type Obs = ContinuousObs;
    type Act = ContinuousAct;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            x: config.start.0,
            y: config.start.1,
        })
    }

    fn step(&mut self, a: &ContinuousAct) -> Result<(Step<Self>, Record)> {
        let c = &self.config;
        let dx = a.dx.clamp(-c.max_action, c.max_action) * c.agent_speed;
        let dy = a.dy.clamp(-c.max_action, c.max_action) * c.agent_speed;
        let (x, y) = (self.x + dx, self.y + dy);
        if !self.collides(x, y) {
            self.x = x;
            self.y = y;
        }

        let c = &self.config;
        self.x = self.x.clamp(c.agent_radius, c.width - c.agent_radius);
        self.y = self.y.clamp(c.agent_radius, c.height - c.agent_radius);

        let record = Record::from_slice(&[
            ("agent_x", RecordValue::Scalar(self.x)),
            ("agent_y", RecordValue::Scalar(self.y)),
        ]);
        Ok((Step::new(self.obs(), *a, 0.0, false, ()), record))
    }

    fn reset(&mut self) -> Result<ContinuousObs> {
        self.x = self.config.start.0;
        self.y = self.config.start.1;
        Ok(self.obs())
    }
}

/// Samples each action component uniformly from `[-max_action, max_action]`.
pub struct UniformRandomPolicy {
    max_action: f32,
    rng: StdRng,
}

impl UniformRandomPolicy {
    /// Constructs the policy.
    pub fn new(max_action: f32, seed: u64) -> Self {
        Self {
            max_action,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy<ContinuousMazeEnv> for UniformRandomPolicy {
    fn sample(&mut self, _obs: &ContinuousObs) -> Result<ContinuousAct> {
        let m = self.max_action;
        Ok(ContinuousAct {
            dx: self.rng.gen_range(-m..=m),
            dy: self.rng.gen_range(-m..=m),
        })
    }
}
