use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// A simple 2D vector struct used for agent positions and velocities.
///
/// `Vec2` is `Copy`: assigning it into an agent or a local binding always
/// yields an independently owned value.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2.
    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    /// Creates a zero vector.
    pub fn zero() -> Self {
        Vec2 { x: 0.0, y: 0.0 }
    }

    /// Calculates the squared length (magnitude) of the vector.
    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Calculates the length (magnitude) of the vector.
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns a unit vector pointing the same way.
    /// Returns a zero vector if the original vector's length is zero.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return Vec2::zero();
        }
        Vec2 { x: self.x / len, y: self.y / len }
    }

    /// Calculates the dot product with another vector.
    pub fn dot(&self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Calculates the squared distance to another vector (point).
    pub fn distance_squared(&self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Calculates the distance to another vector (point).
    pub fn distance(&self, other: Vec2) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Angle of the vector in radians, measured from the +x axis.
    pub fn angle(&self) -> f32 {
        vec_to_angle(*self)
    }

    /// Rotates the vector counter-clockwise by `angle_rad`.
    pub fn rotate(&self, angle_rad: f32) -> Self {
        let (sin_a, cos_a) = angle_rad.sin_cos();
        Vec2 {
            x: self.x * cos_a - self.y * sin_a,
            y: self.x * sin_a + self.y * cos_a,
        }
    }

    /// Scales the vector by a scalar value.
    pub fn scale(&self, scalar: f32) -> Self {
        Vec2 { x: self.x * scalar, y: self.y * scalar }
    }

    /// Adds another vector to this vector.
    pub fn add(&self, other: Vec2) -> Self {
        Vec2 { x: self.x + other.x, y: self.y + other.y }
    }

    /// Subtracts another vector from this vector.
    pub fn sub(&self, other: Vec2) -> Self {
        Vec2 { x: self.x - other.x, y: self.y - other.y }
    }

    /// Perturbs both components in place with independent `N(0, std_dev)` noise.
    /// A negative or non-finite `std_dev` leaves the vector unchanged.
    pub fn add_randomness<R: Rng + ?Sized>(&mut self, std_dev: f32, rng: &mut R) {
        let Ok(noise) = Normal::new(0.0f32, std_dev) else {
            return;
        };
        self.x += noise.sample(rng);
        self.y += noise.sample(rng);
    }
}

// Implement standard operators for convenience
impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self { x: self.x + other.x, y: self.y + other.y }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self { x: self.x * scalar, y: self.y * scalar }
    }
}

impl Mul<Vec2> for f32 {
    type Output = Vec2;
    fn mul(self, vec: Vec2) -> Vec2 {
        vec * self
    }
}

impl Div<f32> for Vec2 {
    type Output = Self;
    fn div(self, scalar: f32) -> Self {
        Self { x: self.x / scalar, y: self.y / scalar }
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Converts an angle (in radians) to a unit vector.
pub fn angle_to_vec(angle_rad: f32) -> Vec2 {
    Vec2::new(angle_rad.cos(), angle_rad.sin())
}

/// Converts a vector to an angle (in radians).
/// Uses atan2 for quadrant correctness.
pub fn vec_to_angle(vec: Vec2) -> f32 {
    vec.y.atan2(vec.x)
}

/// Clamps a value between a minimum and maximum.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    fn random_vec(rng: &mut StdRng) -> Vec2 {
        Vec2::new(rng.random_range(-100.0..100.0), rng.random_range(-100.0..100.0))
    }

    #[test]
    fn normalize_yields_unit_length_for_nonzero_vectors() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..256 {
            let v = random_vec(&mut rng);
            if v == Vec2::zero() {
                continue;
            }
            assert_relative_eq!(v.normalize().length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn normalize_of_zero_is_zero() {
        assert_eq!(Vec2::zero().normalize(), Vec2::zero());
        assert_eq!(Vec2::zero().rotate(1.3), Vec2::zero());
    }

    #[test]
    fn rotate_round_trips_and_preserves_length() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..256 {
            let v = random_vec(&mut rng);
            let angle = rng.random_range(-TAU..TAU);
            let rotated = v.rotate(angle);
            assert_relative_eq!(rotated.length(), v.length(), max_relative = 1e-4);

            let back = rotated.rotate(-angle);
            assert_abs_diff_eq!(back.x, v.x, epsilon = 1e-3);
            assert_abs_diff_eq!(back.y, v.y, epsilon = 1e-3);
        }
    }

    #[test]
    fn rotate_is_counter_clockwise() {
        let r = Vec2::new(1.0, 0.0).rotate(FRAC_PI_2);
        assert_abs_diff_eq!(r.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(r.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn arithmetic_and_geometry() {
        let a = Vec2::new(3.0, 4.0);
        let b = Vec2::new(1.0, -2.0);
        assert_eq!(a + b, Vec2::new(4.0, 2.0));
        assert_eq!(a - b, Vec2::new(2.0, 6.0));
        assert_eq!(a * 2.0, 2.0 * a);
        assert_eq!(a / 2.0, Vec2::new(1.5, 2.0));
        assert_eq!(-b, Vec2::new(-1.0, 2.0));
        assert_relative_eq!(a.length(), 5.0);
        assert_relative_eq!(a.dot(b), -5.0);
        assert_relative_eq!(a.distance(b), (4.0f32 + 36.0).sqrt());
        assert_relative_eq!(Vec2::new(-1.0, 0.0).angle(), PI);
        assert_eq!(clamp(12.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn copies_are_independent() {
        let original = Vec2::new(1.0, 2.0);
        let mut copy = original;
        copy.x = 9.0;
        copy.add_randomness(1.0, &mut StdRng::seed_from_u64(1));
        assert_eq!(original, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn add_randomness_perturbs_both_axes() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut v = Vec2::new(5.0, 5.0);
        v.add_randomness(0.5, &mut rng);
        assert_ne!(v.x, 5.0);
        assert_ne!(v.y, 5.0);

        let mut untouched = Vec2::new(5.0, 5.0);
        untouched.add_randomness(-1.0, &mut rng);
        assert_eq!(untouched, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn display_uses_two_decimals() {
        assert_eq!(Vec2::new(1.0, -2.456).to_string(), "(1.00, -2.46)");
    }
}
