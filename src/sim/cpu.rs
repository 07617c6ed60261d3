//! CPU opponent
//!
//! The CPU predicts where the ball will cross its paddle's depth and slides
//! toward that point at a capped rate. Lower tiers add aim noise more often
//! and with more spread. A prediction is rolled once per approach and kept
//! until the ball turns around or something is hit, so the noise does not
//! jitter every frame.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entities::{Paddle, Side};
use crate::consts::*;
use crate::normalize;

/// CPU difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Tuning for this tier, relative to the ball's base speed
    pub fn profile(&self, base_speed: f32) -> CpuProfile {
        match self {
            Difficulty::Easy => CpuProfile {
                speed: base_speed - 10.0,
                miss_chance: 0.5,
                precision: 8.0,
            },
            Difficulty::Normal => CpuProfile {
                speed: base_speed - 7.5,
                miss_chance: 0.3,
                precision: 6.0,
            },
            Difficulty::Hard => CpuProfile {
                speed: base_speed - 5.0,
                miss_chance: 0.1,
                precision: 4.0,
            },
        }
    }
}

/// CPU tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuProfile {
    /// Maximum paddle travel rate (units/s)
    pub speed: f32,
    /// Probability of adding aim noise to a fresh prediction
    pub miss_chance: f32,
    /// Spread of the aim noise
    pub precision: f32,
}

/// A cached crossing estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Where the paddle is heading
    pub target_x: f32,
    pub noise: f32,
    pub hit_offset: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    pub side: Side,
    difficulty: Difficulty,
    profile: CpuProfile,
    prediction: Option<Prediction>,
    /// Time the ball has been moving away
    away_time: f32,
}

impl Cpu {
    pub fn new(side: Side, difficulty: Difficulty, base_speed: f32) -> Self {
        Self {
            side,
            difficulty,
            profile: difficulty.profile(base_speed),
            prediction: None,
            away_time: 0.0,
        }
    }

    /// Replace the tier's tuning
    pub fn with_profile(mut self, profile: CpuProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> &CpuProfile {
        &self.profile
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }

    /// Forget the cached crossing estimate
    pub fn reset_predict(&mut self) {
        self.prediction = None;
    }

    /// Whether the ball is travelling toward this CPU's goal
    pub fn ball_incoming(&self, velocity: Vec3) -> bool {
        velocity.z * self.side.z_sign() > 0.0
    }

    /// One rally tick
    pub fn step<R: Rng>(
        &mut self,
        paddle: &mut Paddle,
        ball: Vec3,
        velocity: Vec3,
        dt: f32,
        arena_width: f32,
        rng: &mut R,
    ) {
        if !self.ball_incoming(velocity) {
            self.prediction = None;
            self.away_time += dt;
            if self.difficulty == Difficulty::Hard && self.away_time >= CPU_IDLE_RECENTER_DELAY {
                recenter(paddle, CPU_RALLY_RECENTER_SPEED, dt, arena_width);
            }
            return;
        }
        self.away_time = 0.0;

        let target_x = match self.prediction {
            Some(prediction) => prediction.target_x,
            None => {
                let prediction = self.predict(paddle, ball, velocity, rng);
                log::debug!("{:?} CPU predicts x={:.2}", self.side, prediction.target_x);
                self.prediction = Some(prediction);
                prediction.target_x
            }
        };

        let max_step = self.profile.speed * dt;
        let step = (target_x - paddle.x()).clamp(-max_step, max_step);
        let half = arena_width / 2.0;
        paddle.shift(normalize(step, -half, half), arena_width);
    }

    fn predict<R: Rng>(&self, paddle: &Paddle, ball: Vec3, velocity: Vec3, rng: &mut R) -> Prediction {
        let time_to_reach = ((paddle.position().z - ball.z) / velocity.z).abs();

        let noise = if rng.random::<f32>() < self.profile.miss_chance {
            (rng.random::<f32>() - 0.5) * self.profile.precision
        } else {
            0.0
        };
        let hit_offset = (rng.random::<f32>() * 2.0 - 1.0) * paddle.half_x();

        Prediction {
            target_x: ball.x + velocity.x * time_to_reach + noise + hit_offset,
            noise,
            hit_offset,
        }
    }

    /// One serve tick: centre the paddle. Returns true once centred.
    pub fn serve_step(&mut self, paddle: &mut Paddle, dt: f32, arena_width: f32) -> bool {
        self.prediction = None;
        self.away_time = 0.0;
        recenter(paddle, CPU_SERVE_RECENTER_SPEED, dt, arena_width)
    }
}

/// Slide a paddle toward x = 0 at `rate`; true once it is there
pub fn recenter(paddle: &mut Paddle, rate: f32, dt: f32, arena_width: f32) -> bool {
    let max_step = rate * dt;
    let x = paddle.x();
    if x.abs() <= max_step {
        paddle.set_x(0.0, arena_width);
        return true;
    }
    paddle.shift_by(-x.signum() * max_step, arena_width);
    false
}
