//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped timestep only
//! - Seeded RNG only
//! - Fixed hit-test order
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod control;
pub mod cpu;
pub mod entities;
pub mod geometry;
pub mod manager;
pub mod phase;
pub mod score;
pub mod state;
pub mod tick;

pub use collision::{on_hit, resolve_collisions};
pub use control::{Controller, KeyState};
pub use cpu::{Cpu, CpuProfile, Difficulty, Prediction};
pub use entities::{Ball, GoalWall, HitObject, ObstacleWall, Paddle, Side, Stage, WallSide};
pub use geometry::{BoxMesh, Ray, RayHit};
pub use manager::{Clock, GameManager};
pub use phase::{GamePhase, LaunchTrigger, Transition, TransitionSlot};
pub use score::PointTracker;
pub use state::{Carry, GameEvent, GameState, HitEvent, Pilot, Snapshot};
pub use tick::{TickInput, tick};
