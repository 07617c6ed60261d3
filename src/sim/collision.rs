//! Ball collision engine
//!
//! Each tick, four rays are cast from the ball's footprint corners along its
//! velocity, reaching one frame of travel plus a small margin. Hit objects
//! are tried in priority order for each ray, and the first object to report
//! a contact is the only one resolved that tick.

use glam::Vec3;

use super::entities::{HitObject, Side, WallSide};
use super::geometry::{Ray, RayHit};
use super::phase::GamePhase;
use super::state::{GameEvent, GameState, HitEvent};
use crate::consts::*;
use crate::reflect;

/// Cast the corner rays and resolve at most one hit
pub fn resolve_collisions(state: &mut GameState) -> Option<HitEvent> {
    let velocity = state.manager.velocity();
    if velocity.length_squared() == 0.0 {
        return None;
    }

    let far = velocity.length() * state.manager.delta_time() + state.settings.ray_margin;
    let origin = state.stage.ball.position;
    let objects = state.stage.hit_objects();

    for offset in state.stage.ball.offsets() {
        let ray = Ray::new(origin + offset, velocity, far);
        for object in objects {
            if let Some(hit) = on_hit(object, &ray, state) {
                report_hit(state, hit);
                return Some(hit);
            }
        }
    }
    None
}

/// Put back a ball that slipped into a wall between ray checks
///
/// Only one hit resolves per tick, so a ball can end a frame overlapping a
/// wall its rays never reported. Overlapping a goal wall scores for that
/// goal; overlapping a side wall clamps the ball back and sends it inward.
pub fn contain_ball(state: &mut GameState) -> Option<HitEvent> {
    let ball = state.stage.ball.position;
    let half_ball = state.stage.ball.size / 2.0;
    let max_x = state.manager.width() / 2.0 - WALL_DEPTH / 2.0 - half_ball;
    let max_z = state.manager.height() / 2.0 - WALL_DEPTH / 2.0 - half_ball;

    let hit = if ball.z.abs() > max_z {
        let defender = if ball.z > 0.0 { Side::Near } else { Side::Far };
        goal_response(state, defender);
        HitEvent {
            object: HitObject::GoalWall(defender),
            point: ball,
            normal: Vec3::Z * -defender.z_sign(),
        }
    } else if ball.x.abs() > max_x {
        let side = if ball.x > 0.0 {
            WallSide::Right
        } else {
            WallSide::Left
        };
        let normal = Vec3::X * -side.x_sign();
        let velocity = state.manager.velocity();
        if velocity.dot(normal) < 0.0 {
            state.manager.set_velocity(reflect(velocity, normal));
        }
        state
            .stage
            .ball
            .set_position(Vec3::new(ball.x.clamp(-max_x, max_x), 0.0, ball.z));
        HitEvent {
            object: HitObject::ObstacleWall(side),
            point: ball,
            normal,
        }
    } else {
        return None;
    };

    log::debug!("Ball pushed back from {:?}", hit.object);
    report_hit(state, hit);
    Some(hit)
}

/// Test one object against a ray and apply its response on contact
pub fn on_hit(object: HitObject, ray: &Ray, state: &mut GameState) -> Option<HitEvent> {
    let hit = state.stage.mesh(object).raycast(ray)?;

    match object {
        HitObject::Paddle(side) => paddle_response(state, side, &hit),
        HitObject::ObstacleWall(_) => obstacle_response(state, &hit),
        HitObject::GoalWall(side) => goal_response(state, side),
    }

    Some(HitEvent {
        object,
        point: hit.point,
        normal: hit.normal,
    })
}

fn paddle_response(state: &mut GameState, side: Side, hit: &RayHit) {
    let velocity = if hit.normal.z.abs() > PADDLE_FACE_THRESHOLD {
        let ball_x = state.stage.ball.position.x;
        state.stage.paddle(side).bounce(ball_x, state.manager.speed())
    } else {
        // Clipped the paddle's end: plain reflection
        reflect(state.manager.velocity(), hit.normal)
    };
    state.manager.set_velocity(velocity);

    if state.phase() == GamePhase::Playing {
        state.manager.accelerate();
    }
}

fn obstacle_response(state: &mut GameState, hit: &RayHit) {
    let velocity = reflect(state.manager.velocity(), hit.normal);
    state.manager.set_velocity(velocity);

    let nudged = state.stage.ball.position + hit.normal * WALL_NUDGE;
    state.stage.ball.set_position(nudged);
}

fn goal_response(state: &mut GameState, defender: Side) {
    state.manager.reset_ball();
    let scorer = state.points.concede(defender);
    state.events.push(GameEvent::Scored {
        scorer,
        near: state.points.points(Side::Near),
        far: state.points.points(Side::Far),
    });
    state.set_phase(GamePhase::GetPoint);
}

fn report_hit(state: &mut GameState, hit: HitEvent) {
    log::debug!(
        "Hit {:?} at ({:.2}, {:.2}) normal ({:.2}, {:.2})",
        hit.object,
        hit.point.x,
        hit.point.z,
        hit.normal.x,
        hit.normal.z
    );
    state.events.push(GameEvent::Hit(hit));

    if matches!(hit.object, HitObject::GoalWall(_)) {
        return;
    }
    state.invalidate_predictions();
    if state.manager.effect && state.stage.has_effect(hit.object) {
        state.events.push(GameEvent::Effect(hit));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{GameMode, Settings};

    fn playing_state() -> GameState {
        let mut state = GameState::new(Settings {
            mode: GameMode::Duo,
            seed: Some(9),
            ..Settings::default()
        })
        .unwrap();
        state.set_phase(GamePhase::Playing);
        state.manager.clock.sample(1.0 / 60.0);
        state.events.clear();
        state
    }

    #[test]
    fn test_paddle_face_bounce_and_accelerate() {
        let mut state = playing_state();
        // Far paddle face is at z = -12.5; ball corners 0.3 in front of it
        state.stage.ball.set_position(Vec3::new(0.0, 0.0, -11.7));
        state.manager.set_velocity(Vec3::new(0.0, 0.0, -BALL_DEFAULT_SPEED));

        let hit = resolve_collisions(&mut state).expect("paddle hit");
        assert_eq!(hit.object, HitObject::Paddle(Side::Far));
        let speed = BALL_DEFAULT_SPEED + BALL_ACCELERATION;
        assert!((state.manager.speed() - speed).abs() < 1e-6);
        let v = state.manager.velocity();
        assert!(v.z > 0.0);
        assert!((v.length() - speed).abs() < 1e-4);
    }

    #[test]
    fn test_paddle_bounce_outside_playing_keeps_speed() {
        let mut state = playing_state();
        state.set_phase(GamePhase::Serving);
        state.stage.ball.set_position(Vec3::new(0.0, 0.0, -11.7));
        state.manager.set_velocity(Vec3::new(0.0, 0.0, -BALL_DEFAULT_SPEED));
        resolve_collisions(&mut state).expect("paddle hit");
        assert_eq!(state.manager.speed(), BALL_DEFAULT_SPEED);
    }

    #[test]
    fn test_side_wall_reflects_and_nudges() {
        let mut state = playing_state();
        let x = -ARENA_WIDTH / 2.0 + 0.05 + 0.5 + 0.2;
        state.stage.ball.set_position(Vec3::new(x, 0.0, 0.0));
        let v0 = Vec3::new(-15.0, 0.0, -20.0);
        state.manager.set_velocity(v0);

        let hit = resolve_collisions(&mut state).expect("wall hit");
        assert_eq!(hit.object, HitObject::ObstacleWall(WallSide::Left));
        let v = state.manager.velocity();
        assert!((v.x - 15.0).abs() < 1e-3);
        assert!((v.z + 20.0).abs() < 1e-3);
        assert!((v.length() - v0.length()).abs() < 1e-3);
        assert!((state.stage.ball.position.x - (x + WALL_NUDGE)).abs() < 1e-3);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::Effect(_))));
    }

    #[test]
    fn test_effect_flag_off_suppresses_effect_event() {
        let mut state = playing_state();
        state.manager.effect = false;
        let x = -ARENA_WIDTH / 2.0 + 0.05 + 0.5 + 0.2;
        state.stage.ball.set_position(Vec3::new(x, 0.0, 0.0));
        state.manager.set_velocity(Vec3::new(-15.0, 0.0, -20.0));
        resolve_collisions(&mut state).expect("wall hit");
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::Hit(_))));
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::Effect(_))));
    }

    #[test]
    fn test_goal_wall_scores() {
        let mut state = playing_state();
        // Clear of the far paddle, heading into the far goal
        state.stage.ball.set_position(Vec3::new(8.0, 0.0, -13.2));
        state.manager.set_velocity(Vec3::new(0.0, 0.0, -BALL_DEFAULT_SPEED));
        state.manager.set_speed(27.0).unwrap();

        let hit = resolve_collisions(&mut state).expect("goal hit");
        assert_eq!(hit.object, HitObject::GoalWall(Side::Far));
        assert_eq!(state.manager.velocity(), Vec3::ZERO);
        assert_eq!(state.manager.speed(), BALL_DEFAULT_SPEED);
        assert_eq!(state.phase(), GamePhase::GetPoint);
        assert_eq!(state.points.points(Side::Near), 1);
        assert_eq!(state.points.points(Side::Far), 0);
        assert_eq!(state.points.server(), Side::Far);
    }

    #[test]
    fn test_one_hit_per_tick_in_priority_order() {
        let mut state = playing_state();
        // Ball heading into the corner where the far paddle meets the left
        // wall; the paddle is first in priority
        state.stage.far.set_x(-20.0, ARENA_WIDTH);
        let paddle_left = state.stage.far.x() - state.stage.far.half_x();
        state.stage.ball.set_position(Vec3::new(paddle_left + 0.6, 0.0, -11.7));
        state.manager.set_velocity(Vec3::new(-1.0, 0.0, -BALL_DEFAULT_SPEED));

        let hit = resolve_collisions(&mut state).expect("hit");
        assert_eq!(hit.object, HitObject::Paddle(Side::Far));
        let hits = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Hit(_)))
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_no_hit_in_open_court() {
        let mut state = playing_state();
        state.stage.ball.set_position(Vec3::ZERO);
        state.manager.set_velocity(Vec3::new(5.0, 0.0, 24.0).normalize() * BALL_DEFAULT_SPEED);
        assert!(resolve_collisions(&mut state).is_none());
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_ball_past_goal_face_scores() {
        let mut state = playing_state();
        // Leading corners already beyond the far goal slab, rays see nothing
        state.stage.ball.set_position(Vec3::new(3.0, 0.0, -14.5));
        state.manager.set_velocity(Vec3::new(0.0, 0.0, -BALL_DEFAULT_SPEED));
        assert!(resolve_collisions(&mut state).is_none());

        let hit = contain_ball(&mut state).expect("goal");
        assert_eq!(hit.object, HitObject::GoalWall(Side::Far));
        assert_eq!(state.phase(), GamePhase::GetPoint);
        assert_eq!(state.points.points(Side::Near), 1);
        assert_eq!(state.manager.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_ball_inside_side_wall_is_pushed_back() {
        let mut state = playing_state();
        let v0 = Vec3::new(-15.0, 0.0, 20.0);
        state.stage.ball.set_position(Vec3::new(-11.3, 0.0, 2.0));
        state.manager.set_velocity(v0);

        let hit = contain_ball(&mut state).expect("pushed back");
        assert_eq!(hit.object, HitObject::ObstacleWall(WallSide::Left));
        let limit = ARENA_WIDTH / 2.0 - WALL_DEPTH / 2.0 - BALL_SIZE / 2.0;
        assert!((state.stage.ball.position.x + limit).abs() < 1e-5);
        let v = state.manager.velocity();
        assert!(v.x > 0.0);
        assert!((v.length() - v0.length()).abs() < 1e-3);
        assert_eq!(state.phase(), GamePhase::Playing);

        // Already heading inward: position fixed, velocity kept
        state.stage.ball.set_position(Vec3::new(11.0, 0.0, 0.0));
        state.manager.set_velocity(Vec3::new(-15.0, 0.0, 20.0));
        contain_ball(&mut state).expect("pushed back");
        assert!((state.stage.ball.position.x - limit).abs() < 1e-5);
        assert_eq!(state.manager.velocity(), Vec3::new(-15.0, 0.0, 20.0));
    }

    #[test]
    fn test_ball_in_court_left_alone() {
        let mut state = playing_state();
        state.stage.ball.set_position(Vec3::new(10.0, 0.0, 13.0));
        state.manager.set_velocity(Vec3::new(5.0, 0.0, 24.0));
        assert!(contain_ball(&mut state).is_none());
        assert_eq!(state.stage.ball.position, Vec3::new(10.0, 0.0, 13.0));
    }

    #[test]
    fn test_ray_reach_boundary() {
        let mut state = playing_state();
        // Set dt so one frame of travel plus margin ends exactly on the face
        let speed = 10.0;
        state.manager.clock = crate::sim::manager::Clock::new(1.0);
        state.manager.clock.sample(0.25);
        state.settings.ray_margin = 0.5;
        state.manager.set_velocity(Vec3::new(0.0, 0.0, -speed));
        // Far paddle face z = -12.5; leading corners at z - 0.5
        state.stage.ball.set_position(Vec3::new(0.0, 0.0, -12.5 + 3.0 + 0.5));
        assert!(resolve_collisions(&mut state).is_some());

        let mut state = playing_state();
        state.manager.clock = crate::sim::manager::Clock::new(1.0);
        state.manager.clock.sample(0.25);
        state.settings.ray_margin = 0.5;
        state.manager.set_velocity(Vec3::new(0.0, 0.0, -speed));
        state.stage.ball.set_position(Vec3::new(0.0, 0.0, -12.5 + 3.25 + 0.5));
        assert!(resolve_collisions(&mut state).is_none());
    }
}
