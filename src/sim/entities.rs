//! Arena entities: ball, paddles, walls
//!
//! The stage owns every entity. Other components read positions through it
//! and mutate through the explicit entry points here.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::geometry::BoxMesh;
use crate::consts::*;
use crate::{denormalize, normalize};

/// One end of the court
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Positive Z end (player one)
    Near,
    /// Negative Z end (player two / CPU)
    Far,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Near => Side::Far,
            Side::Far => Side::Near,
        }
    }

    /// Sign of this end's Z coordinate
    pub fn z_sign(self) -> f32 {
        match self {
            Side::Near => 1.0,
            Side::Far => -1.0,
        }
    }
}

/// Which side wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    Left,
    Right,
}

impl WallSide {
    pub fn x_sign(self) -> f32 {
        match self {
            WallSide::Left => -1.0,
            WallSide::Right => 1.0,
        }
    }
}

/// The ball: a cube sliding on the ground plane
///
/// Velocity and speed live in the game manager; the ball only owns where it
/// is and how big it is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub position: Vec3,
    pub size: f32,
}

impl Ball {
    pub fn new(size: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            size,
        }
    }

    /// Advance by one frame of velocity
    pub fn advance(&mut self, velocity: Vec3, dt: f32) {
        self.position += velocity * dt;
        self.position.y = 0.0;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = Vec3::new(position.x, 0.0, position.z);
    }

    /// Footprint corners used as collision ray origins
    pub fn offsets(&self) -> [Vec3; 4] {
        let h = self.size / 2.0;
        [
            Vec3::new(h, 0.0, h),
            Vec3::new(-h, 0.0, h),
            Vec3::new(h, 0.0, -h),
            Vec3::new(-h, 0.0, -h),
        ]
    }
}

/// A paddle sliding along X at a fixed depth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    pub mesh: BoxMesh,
    /// Local bounding box, computed once at creation
    bounding_box: (Vec3, Vec3),
}

impl Paddle {
    pub fn new(side: Side, width: f32, z: f32) -> Self {
        let mesh = BoxMesh::new(
            Vec3::new(width, PADDLE_SIZE, PADDLE_SIZE),
            Vec3::new(0.0, 0.0, z),
        );
        Self {
            side,
            bounding_box: mesh.bounding_box(),
            mesh,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.mesh.position
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.mesh.position.x
    }

    /// Half of the paddle's width along X
    pub fn half_x(&self) -> f32 {
        (self.bounding_box.1.x - self.bounding_box.0.x) / 2.0
    }

    /// Half of the paddle's depth along Z
    pub fn half_z(&self) -> f32 {
        (self.bounding_box.1.z - self.bounding_box.0.z) / 2.0
    }

    /// Legal X range inside an arena of `arena_width`
    pub fn x_range(&self, arena_width: f32) -> (f32, f32) {
        let half = arena_width / 2.0;
        (-half + self.half_x(), half - self.half_x())
    }

    /// Move by a normalized step (see [`crate::normalize`]), then clamp
    pub fn shift(&mut self, step: f32, arena_width: f32) {
        let half = arena_width / 2.0;
        let x = self.x() + denormalize(step, -half, half);
        self.set_x(x, arena_width);
    }

    /// Move by a world-space distance
    pub fn shift_by(&mut self, dx: f32, arena_width: f32) {
        let half = arena_width / 2.0;
        self.shift(normalize(dx, -half, half), arena_width);
    }

    pub fn set_x(&mut self, x: f32, arena_width: f32) {
        let (min, max) = self.x_range(arena_width);
        self.mesh.position.x = x.clamp(min, max);
    }

    /// Z direction pointing away from this paddle's end of the court
    pub fn outgoing_z(&self) -> f32 {
        -self.side.z_sign()
    }

    /// Paddle bounce law
    ///
    /// The contact offset along the paddle picks the outgoing angle: centre
    /// goes straight back, the tips leave at ±60°.
    pub fn bounce(&self, ball_x: f32, speed: f32) -> Vec3 {
        let u = ((ball_x - self.x()) / self.half_x()).clamp(-1.0, 1.0);
        let angle = u * MAX_BOUNCE_ANGLE;
        let dz = self.outgoing_z();

        let mut velocity = Vec3::new(speed * angle.sin(), 0.0, dz * speed * angle.cos());

        if velocity.z.abs() < MIN_FORWARD_VELOCITY {
            velocity.z = dz * FORWARD_VELOCITY_FIX;
            velocity = velocity.normalize_or_zero() * speed;
        }
        velocity
    }

    /// Where a ball of `ball_size` waits while this paddle serves
    pub fn serve_point(&self, ball_size: f32) -> Vec3 {
        let pos = self.position();
        let gap = self.half_z() + ball_size / 2.0 + SERVE_GAP;
        Vec3::new(pos.x, 0.0, pos.z + self.outgoing_z() * gap)
    }
}

/// A side wall: reflects the ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleWall {
    pub side: WallSide,
    pub mesh: BoxMesh,
    /// Effect hook: report hits to the stretch effect
    pub effect: bool,
}

/// A goal wall: ends the rally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalWall {
    /// The side that concedes when this wall is hit
    pub defender: Side,
    pub mesh: BoxMesh,
    pub effect: bool,
}

/// Anything a collision ray can hit (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitObject {
    Paddle(Side),
    ObstacleWall(WallSide),
    GoalWall(Side),
}

/// Everything in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub width: f32,
    pub height: f32,
    pub ball: Ball,
    pub near: Paddle,
    pub far: Paddle,
    pub wall_left: ObstacleWall,
    pub wall_right: ObstacleWall,
    pub goal_near: GoalWall,
    pub goal_far: GoalWall,
}

impl Stage {
    pub fn new(width: f32, height: f32) -> Self {
        let paddle_width = width * PADDLE_WIDTH_FRACTION;
        let paddle_z = height / 2.0 - PADDLE_GOAL_GAP;

        let side_wall = |side: WallSide| ObstacleWall {
            side,
            mesh: BoxMesh::new(
                Vec3::new(height - WALL_DEPTH, WALL_HEIGHT, WALL_DEPTH),
                Vec3::new(side.x_sign() * width / 2.0, 0.0, 0.0),
            )
            .with_yaw(side.x_sign() * std::f32::consts::FRAC_PI_2),
            effect: true,
        };
        let goal_wall = |defender: Side| GoalWall {
            defender,
            mesh: BoxMesh::new(
                Vec3::new(width - WALL_DEPTH, WALL_HEIGHT, WALL_DEPTH),
                Vec3::new(0.0, 0.0, defender.z_sign() * height / 2.0),
            ),
            effect: false,
        };

        Self {
            width,
            height,
            ball: Ball::new(BALL_SIZE),
            near: Paddle::new(Side::Near, paddle_width, paddle_z),
            far: Paddle::new(Side::Far, paddle_width, -paddle_z),
            wall_left: side_wall(WallSide::Left),
            wall_right: side_wall(WallSide::Right),
            goal_near: goal_wall(Side::Near),
            goal_far: goal_wall(Side::Far),
        }
    }

    /// Hit objects in collision priority order
    pub fn hit_objects(&self) -> [HitObject; 6] {
        [
            HitObject::Paddle(Side::Near),
            HitObject::Paddle(Side::Far),
            HitObject::GoalWall(Side::Far),
            HitObject::GoalWall(Side::Near),
            HitObject::ObstacleWall(WallSide::Left),
            HitObject::ObstacleWall(WallSide::Right),
        ]
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Near => &self.near,
            Side::Far => &self.far,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Near => &mut self.near,
            Side::Far => &mut self.far,
        }
    }

    pub fn goal(&self, side: Side) -> &GoalWall {
        match side {
            Side::Near => &self.goal_near,
            Side::Far => &self.goal_far,
        }
    }

    pub fn obstacle(&self, side: WallSide) -> &ObstacleWall {
        match side {
            WallSide::Left => &self.wall_left,
            WallSide::Right => &self.wall_right,
        }
    }

    /// Collision shape of a hit object
    pub fn mesh(&self, object: HitObject) -> &BoxMesh {
        match object {
            HitObject::Paddle(side) => &self.paddle(side).mesh,
            HitObject::ObstacleWall(side) => &self.obstacle(side).mesh,
            HitObject::GoalWall(side) => &self.goal(side).mesh,
        }
    }

    /// Whether the object's effect hook wants hit events
    pub fn has_effect(&self, object: HitObject) -> bool {
        match object {
            HitObject::Paddle(_) => false,
            HitObject::ObstacleWall(side) => self.obstacle(side).effect,
            HitObject::GoalWall(side) => self.goal(side).effect,
        }
    }
}
