//! Points and serve possession

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entities::Side;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointTracker {
    near: u32,
    far: u32,
    /// Side that serves next
    server: Side,
}

impl PointTracker {
    pub fn new(first_server: Side) -> Self {
        Self {
            near: 0,
            far: 0,
            server: first_server,
        }
    }

    /// Start with a coin-flip server
    pub fn with_random_server<R: Rng>(rng: &mut R) -> Self {
        let server = if rng.random_bool(0.5) {
            Side::Near
        } else {
            Side::Far
        };
        Self::new(server)
    }

    /// Record a goal against `conceded`
    ///
    /// The opponent scores and the conceding side serves next. Returns the
    /// scoring side.
    pub fn concede(&mut self, conceded: Side) -> Side {
        let scorer = conceded.opponent();
        match scorer {
            Side::Near => self.near += 1,
            Side::Far => self.far += 1,
        }
        self.server = conceded;
        log::info!(
            "Point to {:?} ({} - {}), {:?} serves",
            scorer,
            self.near,
            self.far,
            self.server
        );
        scorer
    }

    pub fn points(&self, side: Side) -> u32 {
        match side {
            Side::Near => self.near,
            Side::Far => self.far,
        }
    }

    pub fn server(&self) -> Side {
        self.server
    }

    /// Side that has reached `points_to_win`, if any (0 never ends)
    pub fn winner(&self, points_to_win: u32) -> Option<Side> {
        if points_to_win == 0 {
            return None;
        }
        if self.near >= points_to_win {
            Some(Side::Near)
        } else if self.far >= points_to_win {
            Some(Side::Far)
        } else {
            None
        }
    }
}
