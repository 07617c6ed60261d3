//! Match phases and multi-tick transitions
//!
//! Animated hand-offs between phases (ball glide to the server, the serve
//! wait, the score cue) are explicit records advanced once per tick by the
//! frame driver. Only one may be pending at a time.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entities::Side;
use crate::ease_in_out;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Match start: ball moves to the first server
    First,
    /// Ball carried by the server's paddle, waiting for launch
    Serving,
    /// Rally in progress
    Playing,
    /// A goal was hit: score cue, then ball moves to the next server
    GetPoint,
    /// Frozen until resumed from outside
    Pause,
    /// Match over
    End,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::End)
    }

    /// Whether ticks advance anything in this phase
    pub fn is_frozen(&self) -> bool {
        matches!(self, GamePhase::Pause | GamePhase::End)
    }
}

/// What ended a serve wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaunchTrigger {
    /// Server pressed the launch key
    Key,
    /// Nobody pressed anything before the timeout
    Timeout,
    /// CPU server finished its delay
    Cpu,
}

/// A pending multi-tick transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Transition {
    /// Glide the ball to the server's paddle, then serve
    MoveToServer {
        server: Side,
        from: Vec3,
        to: Vec3,
        elapsed: f32,
        duration: f32,
    },
    /// Wait for the server to launch
    ServeLaunch {
        server: Side,
        /// Time spent waiting (drives the human timeout)
        waited: f32,
        /// CPU pause before launching, drawn once the paddle is centred
        cpu_delay: Option<f32>,
    },
    /// Goal wall blink after a point
    ScoreCue {
        wall: Side,
        elapsed: f32,
        duration: f32,
    },
}

impl Transition {
    pub fn move_to_server(server: Side, from: Vec3, to: Vec3, duration: f32) -> Self {
        Transition::MoveToServer {
            server,
            from,
            to,
            elapsed: 0.0,
            duration,
        }
    }

    pub fn serve_launch(server: Side) -> Self {
        Transition::ServeLaunch {
            server,
            waited: 0.0,
            cpu_delay: None,
        }
    }

    pub fn score_cue(wall: Side, duration: f32) -> Self {
        Transition::ScoreCue {
            wall,
            elapsed: 0.0,
            duration,
        }
    }

    /// Advance a timed transition; returns true once it has run its course
    ///
    /// `ServeLaunch` only accumulates its wait here; its completion depends
    /// on input and is decided by the driver.
    pub fn advance(&mut self, dt: f32) -> bool {
        match self {
            Transition::MoveToServer {
                elapsed, duration, ..
            }
            | Transition::ScoreCue {
                elapsed, duration, ..
            } => {
                *elapsed += dt;
                *elapsed >= *duration
            }
            Transition::ServeLaunch { waited, .. } => {
                *waited += dt;
                false
            }
        }
    }

    /// Eased ball position for a `MoveToServer` transition
    pub fn ball_position(&self) -> Option<Vec3> {
        match self {
            Transition::MoveToServer {
                from,
                to,
                elapsed,
                duration,
                ..
            } => {
                let t = if *duration > 0.0 {
                    *elapsed / *duration
                } else {
                    1.0
                };
                Some(from.lerp(*to, ease_in_out(t)))
            }
            _ => None,
        }
    }
}

/// Single-occupancy slot for the pending transition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionSlot {
    current: Option<Transition>,
}

impl TransitionSlot {
    /// Start a transition unless one is already pending
    ///
    /// Returns false (and changes nothing) while another is in flight.
    pub fn begin(&mut self, transition: Transition) -> bool {
        if self.current.is_some() {
            log::debug!("Transition already pending, ignoring {:?}", transition);
            return false;
        }
        self.current = Some(transition);
        true
    }

    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Transition> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Transition> {
        self.current.as_mut()
    }

    /// Clear the slot, returning what was pending
    pub fn finish(&mut self) -> Option<Transition> {
        self.current.take()
    }
}
