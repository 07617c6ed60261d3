//! Cube Pong - a 3D two-paddle arena game
//!
//! Core modules:
//! - `sim`: Simulation (ball physics, ray collisions, phase machine, CPU)
//! - `settings`: Match configuration loaded from JSON
//! - `error`: Error types shared by the simulation and configuration

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::{ControlSetting, GameMode, Settings};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Largest frame step the clock will hand to the simulation (seconds)
    pub const MAX_DELTA: f32 = 0.1;

    /// Arena depth (Z extent, goal to goal)
    pub const ARENA_HEIGHT: f32 = 28.0;
    /// Arena width (X extent, side wall to side wall)
    pub const ARENA_WIDTH: f32 = ARENA_HEIGHT / 5.0 * 4.0;

    /// Wall boxes are one unit tall and this thick
    pub const WALL_HEIGHT: f32 = 1.0;
    pub const WALL_DEPTH: f32 = 0.1;

    /// Paddle box edge (depth and height); width is a fraction of the arena
    pub const PADDLE_SIZE: f32 = 1.0;
    pub const PADDLE_WIDTH_FRACTION: f32 = 1.0 / 6.0;
    /// Distance from a goal wall to the paddle centre
    pub const PADDLE_GOAL_GAP: f32 = 1.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 1.0;
    pub const BALL_DEFAULT_SPEED: f32 = 25.0;
    /// Speed added on every rally paddle hit
    pub const BALL_ACCELERATION: f32 = 0.2;

    /// Extra ray length past one frame of travel, covers corner sampling
    pub const RAY_MARGIN: f32 = 0.085;
    /// Obstacle wall push-out along the hit normal
    pub const WALL_NUDGE: f32 = 0.5;

    /// Paddle bounce: maximum outgoing angle from the court axis
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;
    /// Normals with |z| above this count as a paddle face hit
    pub const PADDLE_FACE_THRESHOLD: f32 = 0.9;
    /// Minimum forward (Z) velocity after a paddle bounce
    pub const MIN_FORWARD_VELOCITY: f32 = 0.01;
    pub const FORWARD_VELOCITY_FIX: f32 = 0.1;

    /// Human paddle travel rate (units/s)
    pub const HUMAN_PADDLE_SPEED: f32 = 15.0;

    /// Serve carry friction (per tick) and snap threshold (velocity squared)
    pub const CARRY_DECAY: f32 = 0.965;
    pub const CARRY_SNAP_SQ: f32 = 1e-4;
    /// Gap between the paddle face and a ball waiting to be served
    pub const SERVE_GAP: f32 = 0.1;
    /// Seconds before an idle human serve launches on its own
    pub const SERVE_TIMEOUT: f32 = 10.0;
    /// Ball glide to the server's paddle (seconds)
    pub const SERVE_MOVE_DURATION: f32 = 0.6;
    /// Goal wall blink after a point (seconds)
    pub const SCORE_CUE_DURATION: f32 = 0.4;

    /// CPU recentre rates (units/s) and the Hard tier's idle wait (seconds)
    pub const CPU_SERVE_RECENTER_SPEED: f32 = 20.0;
    pub const CPU_RALLY_RECENTER_SPEED: f32 = 8.0;
    pub const CPU_IDLE_RECENTER_DELAY: f32 = 0.5;
    /// Maximum random pause before a CPU serve (seconds)
    pub const CPU_SERVE_MAX_DELAY: f32 = 1.0;

    /// First side to reach this many points wins (0 = endless)
    pub const POINTS_TO_WIN: u32 = 11;
}

/// Map `val` in `[min, max]` to `[0, 1]`
#[inline]
pub fn normalize(val: f32, min: f32, max: f32) -> f32 {
    if min == max {
        return 0.0;
    }
    (val - min) / (max - min)
}

/// Inverse of [`normalize`]
#[inline]
pub fn denormalize(val: f32, min: f32, max: f32) -> f32 {
    val * (max - min) + min
}

/// Reflect a vector about a unit normal: v' = v - 2(v·n)n
#[inline]
pub fn reflect(v: Vec3, normal: Vec3) -> Vec3 {
    v - 2.0 * v.dot(normal) * normal
}

/// Smoothstep easing on [0, 1]
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
