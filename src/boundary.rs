use simulation_common::config::check_world_size;
use simulation_common::{clamp, ConfigError, Vec2};
use std::fmt;

/// One of the four walls of the rectangular boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
    Bottom,
    Top,
}

/// Axis-aligned rectangle anchored at the origin: `[0, width] x [0, height]`.
///
/// Tangents and normals are discrete per-wall directions, which only makes
/// sense for a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    width: f32,
    height: f32,
}

impl Boundary {
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigError> {
        check_world_size(width, height)?;
        Ok(Boundary { width, height })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn min_x(&self) -> f32 {
        0.0
    }

    pub fn max_x(&self) -> f32 {
        self.width
    }

    pub fn min_y(&self) -> f32 {
        0.0
    }

    pub fn max_y(&self) -> f32 {
        self.height
    }

    /// True iff both coordinates lie inside the rectangle, edges included.
    pub fn contains(&self, position: Vec2) -> bool {
        (self.min_x()..=self.max_x()).contains(&position.x)
            && (self.min_y()..=self.max_y()).contains(&position.y)
    }

    /// True iff `position` is within `threshold` of any wall, measured per axis.
    pub fn is_near(&self, position: Vec2, threshold: f32) -> bool {
        position.x <= self.min_x() + threshold
            || position.x >= self.max_x() - threshold
            || position.y <= self.min_y() + threshold
            || position.y >= self.max_y() - threshold
    }

    /// The wall closest to `position`. Ties go to Left, then Right, then Bottom.
    pub fn nearest_wall(&self, position: Vec2) -> Wall {
        let dist_left = (position.x - self.min_x()).abs();
        let dist_right = (position.x - self.max_x()).abs();
        let dist_bottom = (position.y - self.min_y()).abs();
        let dist_top = (position.y - self.max_y()).abs();

        let min_dist = dist_left.min(dist_right).min(dist_bottom).min(dist_top);

        if min_dist == dist_left {
            Wall::Left
        } else if min_dist == dist_right {
            Wall::Right
        } else if min_dist == dist_bottom {
            Wall::Bottom
        } else {
            Wall::Top
        }
    }

    /// Unit tangent of the nearest wall: vertical for side walls, horizontal otherwise.
    pub fn tangent_at(&self, position: Vec2) -> Vec2 {
        match self.nearest_wall(position) {
            Wall::Left | Wall::Right => Vec2::new(0.0, 1.0),
            Wall::Bottom | Wall::Top => Vec2::new(1.0, 0.0),
        }
    }

    /// Inward unit normal of the nearest wall.
    pub fn normal_at(&self, position: Vec2) -> Vec2 {
        match self.nearest_wall(position) {
            Wall::Left => Vec2::new(1.0, 0.0),
            Wall::Right => Vec2::new(-1.0, 0.0),
            Wall::Bottom => Vec2::new(0.0, 1.0),
            Wall::Top => Vec2::new(0.0, -1.0),
        }
    }

    pub fn clamp(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            clamp(position.x, self.min_x(), self.max_x()),
            clamp(position.y, self.min_y(), self.max_y()),
        )
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Boundary(width={}, height={})", self.width, self.height)
    }
}
