use ordered_float::NotNan;
use serde::Serialize;

use crate::num::Quantizer;

/// Parametric slack at segment end points. Segments that meet at a shared end
/// point must be reported as crossing there, even after a little floating
/// point error in the solve.
const ENDPOINT_BIAS: f64 = 1e-6;

/// Two segments whose directions have a sine below this are treated as
/// parallel and never intersect.
const PARALLEL_TOLERANCE: f64 = 1e-12;

/// Relative distance (to the edge length) under which a point counts as lying
/// on a polygon edge.
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// A quantized point.
///
/// Both coordinates have been rounded by a [`Quantizer`], so points that the
/// quantizer considers the same are equal, hash the same and sort the same.
/// Points are sorted by `x` and then by `y`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Point {
    pub x: NotNan<f64>,
    pub y: NotNan<f64>,
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x.into_inner(), self.y.into_inner())
    }
}

impl Point {
    /// Rounds `p` to the quantizer's precision.
    ///
    /// Returns `None` if either coordinate is not finite.
    pub fn quantized((x, y): (f64, f64), q: &Quantizer) -> Option<Self> {
        Some(Point {
            x: q.round(x)?,
            y: q.round(y)?,
        })
    }

    pub fn to_tuple(self) -> (f64, f64) {
        (self.x.into_inner(), self.y.into_inner())
    }

    pub fn to_vector(self) -> Vector {
        Vector {
            x: self.x.into_inner(),
            y: self.y.into_inner(),
        }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        p.to_tuple()
    }
}

impl std::ops::Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Self::Output {
        self.to_vector() - rhs.to_vector()
    }
}

/// A plain displacement, used for the arithmetic that doesn't need to be quantized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for Vector {
    fn from((x, y): (f64, f64)) -> Self {
        Vector { x, y }
    }
}

impl std::ops::Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Self) -> Self::Output {
        Vector {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, t: f64) -> Self::Output {
        Vector {
            x: self.x * t,
            y: self.y * t,
        }
    }
}

impl Vector {
    /// The z component of the 3d cross product.
    pub fn cross(self, other: Vector) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn dot(self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// The unsigned angle between two vectors, in degrees (between 0 and 180).
    ///
    /// Both vectors must be non-zero.
    pub fn angle_degrees(self, other: Vector) -> f64 {
        let cos = self.dot(other) / (self.length() * other.length());
        cos.clamp(-1.0, 1.0).acos().to_degrees()
    }
}

/// A straight edge between two quantized points.
///
/// Unlike most of the sweep-line literature, we keep the orientation that the
/// segment was created with: the face walker needs to know which way it is
/// going. Use [`Segment::same_edge`] to compare segments without their orientation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl std::fmt::Debug for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} -- {:?}", self.start, self.end)
    }
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Segment { start, end }
    }

    pub fn reversed(self) -> Self {
        Segment {
            start: self.end,
            end: self.start,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// The end points in sorted order: equal for two segments exactly when
    /// they are the same undirected edge.
    pub fn undirected_key(&self) -> (Point, Point) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Do we have the same end points as `other`, in either order?
    pub fn same_edge(&self, other: &Segment) -> bool {
        self.undirected_key() == other.undirected_key()
    }

    pub fn has_endpoint(&self, p: &Point) -> bool {
        &self.start == p || &self.end == p
    }

    pub fn direction(&self) -> Vector {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    /// The point where this segment crosses `other`, rounded by `q`.
    ///
    /// Segments that touch at an end point intersect there. Parallel (and
    /// nearly parallel) segments never intersect, even if they overlap.
    ///
    /// This is symmetric, bit for bit: we always solve with the smaller
    /// segment first.
    pub fn intersection(&self, other: &Segment, q: &Quantizer) -> Option<Point> {
        let (a, b) = if self <= other {
            (self, other)
        } else {
            (other, self)
        };
        let (x, y) = intersect_lines(
            a.start.to_vector(),
            a.end.to_vector(),
            b.start.to_vector(),
            b.end.to_vector(),
        )?;
        Point::quantized((x, y), q)
    }
}

/// Solves for the crossing of the segments `p0 -- p1` and `p2 -- p3`.
///
/// The returned point is computed along the first segment.
pub(crate) fn intersect_lines(p0: Vector, p1: Vector, p2: Vector, p3: Vector) -> Option<(f64, f64)> {
    let s10 = p1 - p0;
    let s32 = p3 - p2;
    let s20 = p2 - p0;

    let denom = s10.cross(s32);
    let scale = s10.length() * s32.length();
    if scale == 0.0 || denom.abs() <= PARALLEL_TOLERANCE * scale {
        return None;
    }

    // p0 + t * s10 == p2 + u * s32
    let t = s20.cross(s32) / denom;
    let u = s20.cross(s10) / denom;
    let range = -ENDPOINT_BIAS..=1.0 + ENDPOINT_BIAS;
    if !range.contains(&t) || !range.contains(&u) {
        return None;
    }

    let p = p0 + s10 * t;
    (p.x.is_finite() && p.y.is_finite()).then_some((p.x, p.y))
}

fn on_segment(p: Vector, a: Vector, b: Vector) -> bool {
    let ab = b - a;
    let ap = p - a;
    let len = ab.length();
    if len == 0.0 {
        return ap.length() == 0.0;
    }
    let along = ap.dot(ab);
    let slack = BOUNDARY_TOLERANCE * len;
    ab.cross(ap).abs() <= slack * len && along >= -slack * len && along <= (len + slack) * len
}

pub(crate) fn cyclic_pairs<T>(xs: &[T]) -> impl Iterator<Item = (&T, &T)> {
    xs.windows(2)
        .map(|pair| (&pair[0], &pair[1]))
        .chain(xs.last().zip(xs.first()))
}

/// Is `point` strictly inside the polygon with the given vertices?
///
/// This is the even-odd rule: we cast a horizontal ray to the right and count
/// the edges it crosses. An edge counts if `point.y` is in the half-open range
/// `[min_y, max_y)` of the edge, so a ray through a vertex is counted once.
/// Points on the boundary are outside, whichever edge they lie on.
pub fn point_in_polygon(point: (f64, f64), vertices: &[Point]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let p = Vector::from(point);

    if cyclic_pairs(vertices).any(|(a, b)| on_segment(p, a.to_vector(), b.to_vector())) {
        return false;
    }

    let mut inside = false;
    for (a, b) in cyclic_pairs(vertices) {
        let (a, b) = (a.to_vector(), b.to_vector());
        if (a.y <= p.y) != (b.y <= p.y) {
            // We just checked that a.y != b.y.
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Twice the signed area of a polygon; positive for counter-clockwise vertices.
pub(crate) fn double_signed_area(vertices: &[Point]) -> f64 {
    cyclic_pairs(vertices)
        .map(|(a, b)| a.to_vector().cross(b.to_vector()))
        .sum()
}
