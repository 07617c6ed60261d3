//! Human paddle control from sampled key state

use serde::{Deserialize, Serialize};

use super::entities::Paddle;
use crate::normalize;
use crate::settings::ControlSetting;

/// Key-down state for one paddle, sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub launch: bool,
}

impl KeyState {
    /// Build key state from a platform "is this key down" query
    pub fn sample<F>(bindings: &ControlSetting, is_down: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        Self {
            left: is_down(&bindings.left),
            right: is_down(&bindings.right),
            launch: is_down(&bindings.launch),
        }
    }
}

/// Drives one paddle from key state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Controller {
    /// Travel rate (units/s)
    pub speed: f32,
    launch_was_down: bool,
}

impl Controller {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            launch_was_down: false,
        }
    }

    /// Move the paddle for held direction keys
    pub fn control(&self, paddle: &mut Paddle, keys: &KeyState, dt: f32, arena_width: f32) {
        let max = arena_width / 2.0;
        let min = -max;
        if keys.left {
            paddle.shift(normalize(-self.speed * dt, min, max), arena_width);
        }
        if keys.right {
            paddle.shift(normalize(self.speed * dt, min, max), arena_width);
        }
    }

    /// Record this tick's launch key; true only on the press edge
    pub fn observe_launch(&mut self, keys: &KeyState) -> bool {
        let pressed = keys.launch && !self.launch_was_down;
        self.launch_was_down = keys.launch;
        pressed
    }
}
