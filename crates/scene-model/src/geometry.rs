//! Points, vectors, and rectangles used for camera framing.
//!
//! `Point2D` doubles as a 2D vector (offsets, velocities, influences).

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A 2D point or vector in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };
    pub const ONE: Point2D = Point2D { x: 1.0, y: 1.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same value on both axes.
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Vector magnitude.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn dot(&self, other: &Point2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Component-wise product.
    pub fn scale(&self, other: &Point2D) -> Point2D {
        Point2D::new(self.x * other.x, self.y * other.y)
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalized(&self) -> Option<Point2D> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(Point2D::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    /// Component-wise absolute value.
    pub fn abs(&self) -> Point2D {
        Point2D::new(self.x.abs(), self.y.abs())
    }

    /// Linear interpolation between two points, `t` clamped to `[0, 1]`.
    pub fn lerp(a: &Point2D, b: &Point2D, t: f64) -> Point2D {
        let t = t.clamp(0.0, 1.0);
        Point2D {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
        }
    }

    /// Whether both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2D {
    type Output = Point2D;

    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point2D {
    fn add_assign(&mut self, rhs: Point2D) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point2D {
    fn sub_assign(&mut self, rhs: Point2D) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;

    fn mul(self, rhs: f64) -> Point2D {
        Point2D::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point2D {
    type Output = Point2D;

    fn neg(self) -> Point2D {
        Point2D::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Point2D::new(x, y)
    }
}

/// Clamp that tolerates `min > max` by returning the midpoint of the two.
///
/// `f64::clamp` panics on inverted bounds, which happens whenever a view
/// is wider than the region it is clamped into.
pub fn clamp_lenient(value: f64, min: f64, max: f64) -> f64 {
    if min > max {
        (min + max) / 2.0
    } else if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// An axis-aligned rectangle stored as min/max edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    /// Rect from its edges. Edges are taken as given.
    pub const fn from_min_max(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Rect from its bottom-left corner and size.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_min_max(x, y, x + width, y + height)
    }

    /// Rect centred at `center` with half extents `half`.
    pub fn from_center(center: Point2D, half: Point2D) -> Self {
        Self::from_min_max(
            center.x - half.x,
            center.y - half.y,
            center.x + half.x,
            center.y + half.y,
        )
    }

    /// Zero-size rect at a point.
    pub fn at_point(p: Point2D) -> Self {
        Self::from_min_max(p.x, p.y, p.x, p.y)
    }

    /// Grow the rect to include `p`.
    pub fn include(&self, p: Point2D) -> Rect {
        Rect::from_min_max(
            self.x_min.min(p.x),
            self.y_min.min(p.y),
            self.x_max.max(p.x),
            self.y_max.max(p.y),
        )
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn size(&self) -> Point2D {
        Point2D::new(self.width(), self.height())
    }

    pub fn min(&self) -> Point2D {
        Point2D::new(self.x_min, self.y_min)
    }

    pub fn max(&self) -> Point2D {
        Point2D::new(self.x_max, self.y_max)
    }

    /// The center point of this rect.
    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Move the rect so its centre is at `center`, keeping its size.
    pub fn with_center(&self, center: Point2D) -> Rect {
        Rect::from_center(center, self.size() * 0.5)
    }

    /// Expand every edge outwards by `amount`.
    pub fn expand(&self, amount: f64) -> Rect {
        Rect::from_min_max(
            self.x_min - amount,
            self.y_min - amount,
            self.x_max + amount,
            self.y_max + amount,
        )
    }

    /// Clamp each edge into `bounds` independently.
    pub fn clamp_edges_into(&self, bounds: &Rect) -> Rect {
        Rect::from_min_max(
            self.x_min.max(bounds.x_min),
            self.y_min.max(bounds.y_min),
            self.x_max.min(bounds.x_max),
            self.y_max.min(bounds.y_max),
        )
    }

    /// Clamp a point into the rect.
    pub fn clamp_point(&self, p: Point2D) -> Point2D {
        Point2D::new(
            clamp_lenient(p.x, self.x_min, self.x_max),
            clamp_lenient(p.y, self.y_min, self.y_max),
        )
    }

    /// Position for the centre of a box with half extents `half` so that
    /// the box stays inside this rect. A box larger than the rect is centred
    /// on it along that axis.
    pub fn clamp_center(&self, center: Point2D, half: Point2D) -> Point2D {
        Point2D::new(
            clamp_lenient(center.x, self.x_min + half.x, self.x_max - half.x),
            clamp_lenient(center.y, self.y_min + half.y, self.y_max - half.y),
        )
    }

    /// Check if a point is within this rect (edges inclusive).
    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    /// Linearly interpolate between two rects edge by edge.
    pub fn lerp(a: &Rect, b: &Rect, t: f64) -> Rect {
        let t = t.clamp(0.0, 1.0);
        Rect {
            x_min: a.x_min + (b.x_min - a.x_min) * t,
            y_min: a.y_min + (b.y_min - a.y_min) * t,
            x_max: a.x_max + (b.x_max - a.x_max) * t,
            y_max: a.y_max + (b.y_max - a.y_max) * t,
        }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Rect::at_point(Point2D::ZERO)
    }
}
