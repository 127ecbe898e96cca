use serde::{Deserialize, Serialize};

use crate::core::Point;

/// 2D affine transform, the top two rows of a 3x3 matrix:
///
/// ```text
/// | scale_x  skew_x   trans_x |
/// | skew_y   scale_y  trans_y |
/// | 0        0        1       |
/// ```
///
/// `post_*` operations apply after the current transform (`M' = op * M`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub scale_x: f64,
    pub skew_x: f64,
    pub trans_x: f64,
    pub skew_y: f64,
    pub scale_y: f64,
    pub trans_y: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        skew_x: 0.0,
        trans_x: 0.0,
        skew_y: 0.0,
        scale_y: 1.0,
        trans_y: 0.0,
    };

    #[must_use]
    pub fn scale(scale_x: f64, scale_y: f64) -> Self {
        Self {
            scale_x,
            scale_y,
            ..Self::IDENTITY
        }
    }

    #[must_use]
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            trans_x: dx,
            trans_y: dy,
            ..Self::IDENTITY
        }
    }

    /// Scale around `(pivot_x, pivot_y)`.
    #[must_use]
    pub fn scale_about(scale_x: f64, scale_y: f64, pivot_x: f64, pivot_y: f64) -> Self {
        Self {
            scale_x,
            scale_y,
            trans_x: pivot_x * (1.0 - scale_x),
            trans_y: pivot_y * (1.0 - scale_y),
            ..Self::IDENTITY
        }
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.scale_x.is_finite()
            && self.skew_x.is_finite()
            && self.trans_x.is_finite()
            && self.skew_y.is_finite()
            && self.scale_y.is_finite()
            && self.trans_y.is_finite()
    }

    /// Returns `other * self`: `self` is applied first, then `other`.
    #[must_use]
    pub fn post_concat(self, other: Self) -> Self {
        Self {
            scale_x: other.scale_x * self.scale_x + other.skew_x * self.skew_y,
            skew_x: other.scale_x * self.skew_x + other.skew_x * self.scale_y,
            trans_x: other.scale_x * self.trans_x + other.skew_x * self.trans_y + other.trans_x,
            skew_y: other.skew_y * self.scale_x + other.scale_y * self.skew_y,
            scale_y: other.skew_y * self.skew_x + other.scale_y * self.scale_y,
            trans_y: other.skew_y * self.trans_x + other.scale_y * self.trans_y + other.trans_y,
        }
    }

    #[must_use]
    pub fn post_scale(self, scale_x: f64, scale_y: f64, pivot_x: f64, pivot_y: f64) -> Self {
        self.post_concat(Self::scale_about(scale_x, scale_y, pivot_x, pivot_y))
    }

    #[must_use]
    pub fn post_translate(self, dx: f64, dy: f64) -> Self {
        Self {
            trans_x: self.trans_x + dx,
            trans_y: self.trans_y + dy,
            ..self
        }
    }

    #[must_use]
    pub fn determinant(self) -> f64 {
        self.scale_x * self.scale_y - self.skew_x * self.skew_y
    }

    /// Returns the inverse, or `None` for singular / non-finite matrices.
    #[must_use]
    pub fn invert(self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() <= f64::EPSILON * f64::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let inverted = Self {
            scale_x: self.scale_y * inv,
            skew_x: -self.skew_x * inv,
            trans_x: (self.skew_x * self.trans_y - self.scale_y * self.trans_x) * inv,
            skew_y: -self.skew_y * inv,
            scale_y: self.scale_x * inv,
            trans_y: (self.skew_y * self.trans_x - self.scale_x * self.trans_y) * inv,
        };
        inverted.is_finite().then_some(inverted)
    }

    #[must_use]
    pub fn map_point(self, point: Point) -> Point {
        Point::new(
            self.scale_x * point.x + self.skew_x * point.y + self.trans_x,
            self.skew_y * point.x + self.scale_y * point.y + self.trans_y,
        )
    }

    pub fn map_points(self, points: &mut [Point]) {
        for point in points {
            *point = self.map_point(*point);
        }
    }

    /// Maps a vector, ignoring translation.
    #[must_use]
    pub fn map_vector(self, dx: f64, dy: f64) -> (f64, f64) {
        (
            self.scale_x * dx + self.skew_x * dy,
            self.skew_y * dx + self.scale_y * dy,
        )
    }
}
