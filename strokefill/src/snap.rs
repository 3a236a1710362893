//! Drawing polygons by clicking, with snapping to the points of existing strokes.
//!
//! This is the interactive companion of the fill: instead of finding a face
//! that's already there, the user builds one by clicking its corners. The host
//! feeds cursor positions (in whatever 2d space it draws in) to a
//! [`PolygonDraft`] and gets back what the next click would do.

use crate::segments::Polyline;

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// The points that a cursor can snap to.
///
/// This is a snapshot: if the strokes change, build a new one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnapTargets {
    points: Vec<(f64, f64)>,
}

impl SnapTargets {
    /// Every point of every stroke, in stroke order.
    pub fn from_polylines<'a>(polylines: impl IntoIterator<Item = &'a Polyline>) -> Self {
        SnapTargets {
            points: polylines
                .into_iter()
                .flat_map(|p| p.points.iter().copied())
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .collect(),
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The first target closer to `cursor` than `radius`.
    ///
    /// This isn't necessarily the closest one.
    pub fn find(&self, cursor: (f64, f64), radius: f64) -> Option<(f64, f64)> {
        self.points
            .iter()
            .copied()
            .find(|&p| distance(p, cursor) < radius)
    }
}

/// Moves `cursor` so that the line from `anchor` to it is horizontal or
/// vertical, whichever is closer.
pub fn constrain_to_axis(anchor: (f64, f64), cursor: (f64, f64)) -> (f64, f64) {
    let dx = anchor.0 - cursor.0;
    let dy = anchor.1 - cursor.1;
    if dx == 0.0 && dy == 0.0 {
        return cursor;
    }
    // Angle from the vertical, in [-90, 90].
    let tilt = dy.abs().atan2(dx).to_degrees() - 90.0;
    if tilt.abs() > 45.0 {
        (cursor.0, anchor.1)
    } else {
        (anchor.0, cursor.1)
    }
}

/// What clicking at the current cursor position would do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Hover {
    /// Close the polygon at its first point.
    Close,
    /// Add an existing stroke point.
    Snap((f64, f64)),
    /// Add the cursor position itself.
    Free((f64, f64)),
}

/// A polygon being drawn one click at a time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolygonDraft {
    points: Vec<(f64, f64)>,
    closed: bool,
}

impl PolygonDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recently placed point.
    pub fn last(&self) -> Option<(f64, f64)> {
        self.points.last().copied()
    }

    /// Is the cursor currently hovering over the first point?
    pub fn is_closing(&self) -> bool {
        self.closed
    }

    /// Constrains `cursor` to an axis through the last placed point, if any.
    pub fn constrain(&self, cursor: (f64, f64)) -> (f64, f64) {
        match self.last() {
            Some(anchor) => constrain_to_axis(anchor, cursor),
            None => cursor,
        }
    }

    /// Updates the draft for a cursor move.
    ///
    /// Coming back to the first point (once there are at least three points)
    /// takes priority over snapping to other strokes.
    pub fn hover(&mut self, cursor: (f64, f64), targets: &SnapTargets, radius: f64) -> Hover {
        if self.points.len() > 2 && distance(self.points[0], cursor) < radius {
            self.closed = true;
            return Hover::Close;
        }
        self.closed = false;
        match targets.find(cursor, radius) {
            Some(p) => Hover::Snap(p),
            None => Hover::Free(cursor),
        }
    }

    /// Applies a click.
    ///
    /// Clicking on the first point finishes the polygon, and returns it.
    pub fn click(&mut self, hover: Hover) -> Option<Polyline> {
        match hover {
            Hover::Close => {
                self.closed = true;
                self.finish()
            }
            Hover::Snap(p) | Hover::Free(p) => {
                self.points.push(p);
                None
            }
        }
    }

    /// Adds `p` unless it's already in the draft. Returns whether it was added.
    pub fn push_unique(&mut self, p: (f64, f64)) -> bool {
        if self.points.contains(&p) {
            false
        } else {
            self.points.push(p);
            true
        }
    }

    /// Turns the draft into a stroke and starts over.
    ///
    /// Returns `None` if there weren't enough points for a line.
    pub fn finish(&mut self) -> Option<Polyline> {
        let PolygonDraft { points, closed } = std::mem::take(self);
        if points.len() < 2 {
            tracing::debug!(points = points.len(), "discarding polygon draft");
            return None;
        }
        tracing::debug!(points = points.len(), closed, "finished polygon draft");
        Some(Polyline { points, closed })
    }
}
