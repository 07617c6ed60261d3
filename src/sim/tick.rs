//! Per-frame simulation tick
//!
//! Order within one tick: sample the clock, read input, move paddles, move
//! the ball, push it back if it slipped into a wall (otherwise resolve at
//! most one collision), then advance whichever transition the phase is
//! waiting on.

use glam::Vec3;
use rand::Rng;

use super::collision::{contain_ball, resolve_collisions};
use super::entities::Side;
use super::phase::{GamePhase, LaunchTrigger, Transition};
use super::state::{Carry, GameEvent, GameState, Pilot};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub near: super::control::KeyState,
    pub far: super::control::KeyState,
    /// Pause key; toggles on the press edge
    pub pause: bool,
}

impl TickInput {
    pub fn keys(&self, side: Side) -> &super::control::KeyState {
        match side {
            Side::Near => &self.near,
            Side::Far => &self.far,
        }
    }
}

/// Advance the game by one frame of `raw_dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, raw_dt: f32) {
    state.events.clear();
    let dt = state.manager.clock.sample(raw_dt);

    // Launch keys are edge-triggered, so every tick must see them
    let near_launch = observe_launch(state, Side::Near, input);
    let far_launch = observe_launch(state, Side::Far, input);

    let pause_pressed = input.pause && !state.pause_was_down;
    state.pause_was_down = input.pause;

    if pause_pressed {
        match state.phase() {
            GamePhase::Playing => {
                state.pause();
                return;
            }
            GamePhase::Pause => {
                state.resume();
            }
            _ => {}
        }
    }

    if state.phase().is_frozen() {
        return;
    }

    state.time_ticks += 1;

    match state.phase() {
        GamePhase::First => advance_move_to_server(state, dt),
        GamePhase::Serving => {
            let launch = match state.points.server() {
                Side::Near => near_launch,
                Side::Far => far_launch,
            };
            tick_serving(state, input, launch, dt);
        }
        GamePhase::Playing => tick_playing(state, input, dt),
        GamePhase::GetPoint => tick_get_point(state, dt),
        GamePhase::Pause | GamePhase::End => {}
    }
}

fn observe_launch(state: &mut GameState, side: Side, input: &TickInput) -> bool {
    let keys = input.keys(side);
    match side {
        Side::Near => match &mut state.near_pilot {
            Pilot::Human(controller) => controller.observe_launch(keys),
            Pilot::Cpu(_) => false,
        },
        Side::Far => match &mut state.far_pilot {
            Pilot::Human(controller) => controller.observe_launch(keys),
            Pilot::Cpu(_) => false,
        },
    }
}

/// Glide the ball to the current server, then start serving
fn advance_move_to_server(state: &mut GameState, dt: f32) {
    if !state.transition.is_pending() {
        let server = state.points.server();
        let to = state.stage.paddle(server).serve_point(state.stage.ball.size);
        let from = state.stage.ball.position;
        if state
            .transition
            .begin(Transition::move_to_server(server, from, to, SERVE_MOVE_DURATION))
        {
            state.events.push(GameEvent::ServeTarget {
                server,
                position: to,
            });
        }
    }

    let Some(transition) = state.transition.current_mut() else {
        return;
    };
    let Transition::MoveToServer { server, .. } = *transition else {
        return;
    };

    let done = transition.advance(dt);
    if let Some(position) = transition.ball_position() {
        state.stage.ball.set_position(position);
    }

    if done {
        state.transition.finish();
        begin_serving(state, server);
    }
}

fn begin_serving(state: &mut GameState, server: Side) {
    state.manager.reset_ball();
    state.carry = Some(Carry::default());
    state.set_phase(GamePhase::Serving);
    state.transition.begin(Transition::serve_launch(server));
}

fn tick_serving(state: &mut GameState, input: &TickInput, launch_pressed: bool, dt: f32) {
    let server = state.points.server();
    let width = state.manager.width();
    let prev_x = state.stage.paddle(server).x();

    let (pilot, paddle, _) = state.pilot_parts(server);
    let is_human = !pilot.is_cpu();
    let cpu_centred = match pilot {
        Pilot::Human(controller) => {
            controller.control(paddle, input.keys(server), dt, width);
            false
        }
        Pilot::Cpu(cpu) => cpu.serve_step(paddle, dt, width),
    };

    carry_ball(state, server, prev_x, dt);

    if !state.transition.is_pending() {
        state.transition.begin(Transition::serve_launch(server));
    }
    let Some(transition) = state.transition.current_mut() else {
        return;
    };
    if !matches!(transition, Transition::ServeLaunch { .. }) {
        return;
    }
    transition.advance(dt);
    let Transition::ServeLaunch {
        waited, cpu_delay, ..
    } = transition
    else {
        return;
    };

    let trigger = if is_human {
        if launch_pressed {
            Some(LaunchTrigger::Key)
        } else if *waited >= state.settings.serve_timeout {
            Some(LaunchTrigger::Timeout)
        } else {
            None
        }
    } else {
        match cpu_delay {
            None => {
                if cpu_centred {
                    *cpu_delay = Some(state.rng.random_range(0.0..CPU_SERVE_MAX_DELAY));
                }
                None
            }
            Some(remaining) => {
                *remaining -= dt;
                (*remaining <= 0.0).then_some(LaunchTrigger::Cpu)
            }
        }
    };

    if let Some(trigger) = trigger {
        launch(state, server, trigger);
    }
}

/// Let the waiting ball slide along the serving paddle
///
/// The ball eases toward the paddle's motion with per-tick friction and is
/// kept on the paddle face and inside the arena.
fn carry_ball(state: &mut GameState, server: Side, prev_paddle_x: f32, dt: f32) {
    let Some(carry) = state.carry.as_mut() else {
        return;
    };
    let paddle = state.stage.paddle(server);
    let paddle_velocity = if dt > 0.0 {
        (paddle.x() - prev_paddle_x) / dt
    } else {
        0.0
    };

    carry.velocity = carry.velocity * CARRY_DECAY + paddle_velocity * (1.0 - CARRY_DECAY);
    if carry.velocity * carry.velocity < CARRY_SNAP_SQ {
        carry.velocity = 0.0;
    }

    let ball = &state.stage.ball;
    let half_ball = ball.size / 2.0;
    let half_court = state.manager.width() / 2.0 - WALL_DEPTH / 2.0;
    let mut x = ball.position.x + carry.velocity * dt;
    x = x.clamp(paddle.x() - paddle.half_x(), paddle.x() + paddle.half_x());
    x = x.clamp(-half_court + half_ball, half_court - half_ball);

    let z = paddle.serve_point(ball.size).z;
    state.stage.ball.set_position(Vec3::new(x, 0.0, z));
}

fn launch(state: &mut GameState, server: Side, trigger: LaunchTrigger) {
    let ball_x = state.stage.ball.position.x;
    let velocity = state
        .stage
        .paddle(server)
        .bounce(ball_x, state.manager.speed());
    state.manager.set_velocity(velocity);

    state.carry = None;
    state.transition.finish();
    state.invalidate_predictions();
    log::info!("{:?} serves ({:?})", server, trigger);
    state.events.push(GameEvent::Launched { server, trigger });
    state.set_phase(GamePhase::Playing);
}

fn tick_playing(state: &mut GameState, input: &TickInput, dt: f32) {
    for side in [Side::Near, Side::Far] {
        drive_paddle(state, side, input, dt);
    }

    let velocity = state.manager.velocity();
    state.stage.ball.advance(velocity, dt);

    if contain_ball(state).is_none() {
        resolve_collisions(state);
    }
}

fn drive_paddle(state: &mut GameState, side: Side, input: &TickInput, dt: f32) {
    let width = state.manager.width();
    let ball = state.stage.ball.position;
    let velocity = state.manager.velocity();

    let (pilot, paddle, rng) = state.pilot_parts(side);
    match pilot {
        Pilot::Human(controller) => controller.control(paddle, input.keys(side), dt, width),
        Pilot::Cpu(cpu) => cpu.step(paddle, ball, velocity, dt, width, rng),
    }
}

/// Score cue, then glide to the next server (or end the match)
fn tick_get_point(state: &mut GameState, dt: f32) {
    if !state.transition.is_pending() {
        let wall = state.points.server();
        if state
            .transition
            .begin(Transition::score_cue(wall, SCORE_CUE_DURATION))
        {
            state.events.push(GameEvent::Blink { wall });
        }
    }

    let cue_done = match state.transition.current_mut() {
        Some(cue @ Transition::ScoreCue { .. }) => cue.advance(dt),
        Some(Transition::MoveToServer { .. }) => {
            advance_move_to_server(state, dt);
            return;
        }
        _ => return,
    };
    if !cue_done {
        return;
    }
    state.transition.finish();

    if let Some(winner) = state.points.winner(state.settings.points_to_win) {
        log::info!(
            "{:?} wins {} - {}",
            winner,
            state.points.points(Side::Near),
            state.points.points(Side::Far)
        );
        state.events.push(GameEvent::MatchOver { winner });
        state.end();
        return;
    }

    // Starts the glide; it runs from the next tick on
    advance_move_to_server(state, 0.0);
}
