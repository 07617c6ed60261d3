//! Simulation clock and ball kinematics
//!
//! The manager holds the scalars every other component reads during a tick:
//! the frame step, ball speed and velocity, arena extents and the current
//! phase.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::phase::GamePhase;
use crate::consts::*;
use crate::error::SimError;

/// Frame-step sampler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    /// Current frame step (seconds)
    pub delta: f32,
    /// Total simulated time (seconds)
    pub elapsed: f64,
    /// Largest step handed to the simulation
    pub max_delta: f32,
}

impl Clock {
    pub fn new(max_delta: f32) -> Self {
        Self {
            delta: 0.0,
            elapsed: 0.0,
            max_delta,
        }
    }

    /// Take a raw frame time, clamp it, and make it the current step
    pub fn sample(&mut self, raw_dt: f32) -> f32 {
        // A non-positive cap freezes time instead of panicking in clamp
        let max = self.max_delta.max(0.0);
        let dt = if raw_dt.is_finite() {
            raw_dt.clamp(0.0, max)
        } else {
            0.0
        };
        self.delta = dt;
        self.elapsed += dt as f64;
        dt
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameManager {
    pub clock: Clock,
    phase: GamePhase,

    width: f32,
    height: f32,

    default_speed: f32,
    speed: f32,
    velocity: Vec3,
    acceleration: f32,

    /// Visual effect side-channel
    pub effect: bool,
}

impl GameManager {
    pub fn new(width: f32, height: f32, max_delta: f32) -> Self {
        Self {
            clock: Clock::new(max_delta),
            phase: GamePhase::First,
            width,
            height,
            default_speed: BALL_DEFAULT_SPEED,
            speed: BALL_DEFAULT_SPEED,
            velocity: Vec3::ZERO,
            acceleration: BALL_ACCELERATION,
            effect: true,
        }
    }

    #[inline]
    pub fn delta_time(&self) -> f32 {
        self.clock.delta
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Assign the phase; returns the previous one
    pub fn set_phase(&mut self, phase: GamePhase) -> GamePhase {
        let previous = self.phase;
        if previous != phase {
            log::info!("Phase {:?} -> {:?}", previous, phase);
        }
        self.phase = phase;
        previous
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn default_speed(&self) -> f32 {
        self.default_speed
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Set the ball speed, rescaling the velocity to match
    ///
    /// Negative values are rejected and leave both unchanged.
    pub fn set_speed(&mut self, value: f32) -> Result<(), SimError> {
        if value < 0.0 || value.is_nan() {
            return Err(SimError::NegativeSpeed(value));
        }
        self.speed = value;
        self.velocity = self.velocity.normalize_or_zero() * value;
        Ok(())
    }

    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, value: Vec3) {
        self.velocity = value;
    }

    /// Speed up by one acceleration step, keeping the direction
    pub fn accelerate(&mut self) {
        self.speed += self.acceleration;
        self.velocity = self.velocity.normalize_or_zero() * self.speed;
    }

    /// Stop the ball and restore the default speed
    pub fn reset_ball(&mut self) {
        self.velocity = Vec3::ZERO;
        self.speed = self.default_speed;
    }
}
