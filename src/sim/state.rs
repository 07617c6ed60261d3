//! Game state and events
//!
//! `GameState` is the one context every tick function receives. It owns the
//! stage, the kinematics, the score, both paddle pilots, the pending
//! transition and the match RNG.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::control::Controller;
use super::cpu::Cpu;
use super::entities::{HitObject, Paddle, Side, Stage};
use super::manager::GameManager;
use super::phase::{GamePhase, LaunchTrigger, TransitionSlot};
use super::score::PointTracker;
use crate::consts::*;
use crate::error::SimError;
use crate::settings::{GameMode, Settings};

/// Who moves a paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Pilot {
    Human(Controller),
    Cpu(Cpu),
}

impl Pilot {
    pub fn is_cpu(&self) -> bool {
        matches!(self, Pilot::Cpu(_))
    }
}

/// A resolved ray contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitEvent {
    pub object: HitObject,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Notifications for the rendering/effect collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball hit something this tick
    Hit(HitEvent),
    /// Hit on an object with an effect hook while effects are on
    Effect(HitEvent),
    /// A point was scored
    Scored { scorer: Side, near: u32, far: u32 },
    /// Blink the goal wall that was hit
    Blink { wall: Side },
    /// Ball is gliding to this serve position
    ServeTarget { server: Side, position: Vec3 },
    /// Ball left the server's paddle
    Launched { server: Side, trigger: LaunchTrigger },
    PhaseChanged { from: GamePhase, to: GamePhase },
    MatchOver { winner: Side },
}

/// Ball freedom along the serving paddle
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Carry {
    /// Ball X velocity relative to the arena
    pub velocity: f32,
}

/// Read-only view for collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub ball_position: Vec3,
    pub ball_velocity: Vec3,
    pub ball_speed: f32,
    pub near_x: f32,
    pub far_x: f32,
    pub near_points: u32,
    pub far_points: u32,
    pub server: Side,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub manager: GameManager,
    pub stage: Stage,
    pub points: PointTracker,
    pub near_pilot: Pilot,
    pub far_pilot: Pilot,
    /// Pending multi-tick transition
    pub transition: TransitionSlot,
    /// Present while the server carries the ball
    pub carry: Option<Carry>,
    /// Events produced by the latest tick
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pause key state last tick (pause is edge-triggered)
    pub(crate) pause_was_down: bool,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a match from settings; a missing seed is drawn at random
    ///
    /// Settings are validated first, so a hand-built `Settings` with bad
    /// values is rejected here rather than misbehaving mid-match.
    pub fn new(settings: Settings) -> Result<Self, SimError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut manager = GameManager::new(ARENA_WIDTH, ARENA_HEIGHT, settings.max_delta);
        manager.effect = settings.effect;
        let stage = Stage::new(manager.width(), manager.height());
        let points = PointTracker::with_random_server(&mut rng);

        let human = || Pilot::Human(Controller::new(settings.paddle_speed));
        let cpu = |side| Pilot::Cpu(Cpu::new(side, settings.difficulty, manager.default_speed()));
        let (near_pilot, far_pilot) = match settings.mode {
            GameMode::Single => (human(), cpu(Side::Far)),
            GameMode::Duo => (human(), human()),
            GameMode::Watch => (cpu(Side::Near), cpu(Side::Far)),
        };

        log::info!(
            "New {} match (seed {}), {:?} serves first",
            settings.mode.as_str(),
            seed,
            points.server()
        );

        Ok(Self {
            settings,
            seed,
            manager,
            stage,
            points,
            near_pilot,
            far_pilot,
            transition: TransitionSlot::default(),
            carry: None,
            events: Vec::new(),
            time_ticks: 0,
            pause_was_down: false,
            rng,
        })
    }

    /// Default settings with a fixed seed
    pub fn with_seed(seed: u64) -> Result<Self, SimError> {
        Self::new(Settings {
            seed: Some(seed),
            ..Settings::default()
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.manager.phase()
    }

    /// Change phase and report it
    pub fn set_phase(&mut self, phase: GamePhase) {
        let from = self.manager.set_phase(phase);
        if from != phase {
            self.events.push(GameEvent::PhaseChanged { from, to: phase });
        }
    }

    /// Freeze a rally; false outside `Playing`
    pub fn pause(&mut self) -> bool {
        if self.phase() != GamePhase::Playing {
            return false;
        }
        self.set_phase(GamePhase::Pause);
        true
    }

    /// Unfreeze a paused rally; false unless paused
    pub fn resume(&mut self) -> bool {
        if self.phase() != GamePhase::Pause {
            return false;
        }
        self.set_phase(GamePhase::Playing);
        true
    }

    /// Stop the match from any phase
    pub fn end(&mut self) {
        self.transition.finish();
        self.carry = None;
        self.set_phase(GamePhase::End);
    }

    pub fn pilot(&self, side: Side) -> &Pilot {
        match side {
            Side::Near => &self.near_pilot,
            Side::Far => &self.far_pilot,
        }
    }

    /// Pilot, its paddle, and the match RNG, borrowed together
    pub(crate) fn pilot_parts(&mut self, side: Side) -> (&mut Pilot, &mut Paddle, &mut Pcg32) {
        let pilot = match side {
            Side::Near => &mut self.near_pilot,
            Side::Far => &mut self.far_pilot,
        };
        (pilot, self.stage.paddle_mut(side), &mut self.rng)
    }

    /// Drop every CPU's cached crossing estimate
    pub fn invalidate_predictions(&mut self) {
        for pilot in [&mut self.near_pilot, &mut self.far_pilot] {
            if let Pilot::Cpu(cpu) = pilot {
                cpu.reset_predict();
            }
        }
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time_ticks,
            phase: self.phase(),
            ball_position: self.stage.ball.position,
            ball_velocity: self.manager.velocity(),
            ball_speed: self.manager.speed(),
            near_x: self.stage.near.x(),
            far_x: self.stage.far.x(),
            near_points: self.points.points(Side::Near),
            far_points: self.points.points(Side::Far),
            server: self.points.server(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_match_starts_first() {
        let state = GameState::with_seed(1).unwrap();
        assert_eq!(state.phase(), GamePhase::First);
        assert_eq!(state.manager.velocity(), Vec3::ZERO);
        assert_eq!(state.manager.speed(), BALL_DEFAULT_SPEED);
        assert!(!state.near_pilot.is_cpu());
        assert!(state.far_pilot.is_cpu());
    }

    #[test]
    fn test_modes_assign_pilots() {
        let watch = GameState::new(Settings {
            mode: GameMode::Watch,
            seed: Some(1),
            ..Settings::default()
        })
        .unwrap();
        assert!(watch.near_pilot.is_cpu() && watch.far_pilot.is_cpu());

        let duo = GameState::new(Settings {
            mode: GameMode::Duo,
            seed: Some(1),
            ..Settings::default()
        })
        .unwrap();
        assert!(!duo.near_pilot.is_cpu() && !duo.far_pilot.is_cpu());
    }

    #[test]
    fn test_pause_only_from_playing() {
        let mut state = GameState::with_seed(2).unwrap();
        assert!(!state.pause());
        state.set_phase(GamePhase::Playing);
        assert!(state.pause());
        assert_eq!(state.phase(), GamePhase::Pause);
        assert!(!state.pause());
        assert!(state.resume());
        assert_eq!(state.phase(), GamePhase::Playing);
        assert!(!state.resume());
    }

    #[test]
    fn test_end_from_any_phase() {
        let mut state = GameState::with_seed(3).unwrap();
        state.end();
        assert_eq!(state.phase(), GamePhase::End);
        assert!(!state.transition.is_pending());
        assert!(state.drain_events().contains(&GameEvent::PhaseChanged {
            from: GamePhase::First,
            to: GamePhase::End
        }));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let err = GameState::new(Settings {
            max_delta: -0.1,
            ..Settings::default()
        })
        .unwrap_err();
        assert!(matches!(err, SimError::InvalidSetting(_)));

        let err = GameState::new(Settings {
            serve_timeout: f32::NAN,
            ..Settings::default()
        })
        .unwrap_err();
        assert!(matches!(err, SimError::InvalidSetting(_)));
    }

    #[test]
    fn test_same_seed_same_first_server() {
        let a = GameState::with_seed(77).unwrap();
        let b = GameState::with_seed(77).unwrap();
        assert_eq!(a.points.server(), b.points.server());
    }
}
