//! Tracing faces through the split edge graph.

use ordered_float::NotNan;
use serde::Serialize;

use crate::{
    geom::{cyclic_pairs, double_signed_area, intersect_lines, point_in_polygon, Point, Segment, Vector},
    graph::PolyEdges,
    FaceWalkError,
};

/// Which way the walker turns at each node.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Winding {
    /// Take the sharpest right turn, keeping the traced face on the right.
    Clockwise,
    /// Take the sharpest left turn, keeping the traced face on the left.
    CounterClockwise,
}

/// A closed polygon found by the walker.
///
/// The vertices are in the order they were walked, starting from the start of
/// the edge that seeded the walk. The closing edge (from the last vertex back
/// to the first) is implicit.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Face {
    vertices: Vec<Point>,
}

impl std::fmt::Debug for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.vertices.iter()).finish()
    }
}

impl Face {
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.vertices.iter().map(|p| p.to_tuple())
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The edges of this face, including the closing one.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        cyclic_pairs(&self.vertices).map(|(a, b)| Segment::new(*a, *b))
    }

    /// Is `point` strictly inside this face?
    pub fn contains(&self, point: (f64, f64)) -> bool {
        point_in_polygon(point, &self.vertices)
    }

    /// Positive if the vertices run counter-clockwise (in a y-up coordinate system).
    pub fn signed_area(&self) -> f64 {
        double_signed_area(&self.vertices) / 2.0
    }

    pub fn winding(&self) -> Winding {
        if self.signed_area() >= 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        }
    }

    /// This face, with its vertices reversed if necessary so that they run counter-clockwise.
    pub fn to_counter_clockwise(&self) -> Face {
        let mut vertices = self.vertices.clone();
        if self.winding() == Winding::Clockwise {
            vertices.reverse();
        }
        Face { vertices }
    }
}

/// The angle used to rank `candidate` as the continuation of `incoming`.
///
/// This is the angle (in degrees) between the direction of `incoming` and the
/// vector pointing from the far end of `candidate` back to the shared node. A
/// candidate that turns the wrong way for `winding` gets `360 - angle`, so the
/// smallest value is the sharpest turn in the right direction.
pub fn turn_angle(incoming: &Segment, candidate: &Segment, winding: Winding) -> f64 {
    let v1 = incoming.end - incoming.start;
    let v2 = incoming.end - candidate.end;
    let cross = v1.cross(v2);
    let angle = v1.angle_degrees(v2);
    let wrong_way = match winding {
        Winding::Clockwise => cross < 0.0,
        Winding::CounterClockwise => cross >= 0.0,
    };
    if wrong_way {
        360.0 - angle
    } else {
        angle
    }
}

/// The planar edge graph, ready for face queries.
#[derive(Clone, Debug)]
pub struct Topology {
    edges: PolyEdges,
    trace_limit: usize,
}

impl Topology {
    /// `trace_limit` bounds the number of vertices in a traced face.
    pub fn new(edges: PolyEdges, trace_limit: usize) -> Self {
        Topology { edges, trace_limit }
    }

    pub fn edges(&self) -> &PolyEdges {
        &self.edges
    }

    pub fn trace_limit(&self) -> usize {
        self.trace_limit
    }

    /// The edges crossed by a vertical ray going up from `point`, closest first,
    /// along with their distance from `point`.
    pub fn crossed_by_up_ray(&self, point: (f64, f64)) -> Vec<(NotNan<f64>, Segment)> {
        let Some((_, max)) = self.edges.bounding_box() else {
            return Vec::new();
        };
        let origin = Vector::from(point);
        let top = Vector {
            x: origin.x,
            y: max.y.max(origin.y) + 1.0,
        };

        let mut ret: Vec<_> = self
            .edges
            .segments()
            .filter_map(|seg| {
                let (x, y) = intersect_lines(seg.start.to_vector(), seg.end.to_vector(), origin, top)?;
                let distance = NotNan::new((Vector { x, y } - origin).length()).ok()?;
                Some((distance, *seg))
            })
            .collect();
        ret.sort();
        ret
    }

    /// Among the edges leaving the end of `active` (other than `active` itself),
    /// the one making the sharpest turn in the direction of `winding`.
    ///
    /// Exact ties go to the smaller edge.
    fn next_edge(&self, active: &Segment, winding: Winding) -> Option<Segment> {
        self.edges
            .leaving(&active.end)
            .filter(|candidate| !candidate.same_edge(active))
            .filter_map(|candidate| {
                let angle = NotNan::new(turn_angle(active, &candidate, winding)).ok()?;
                Some((angle, candidate))
            })
            .min()
            .map(|(_, candidate)| candidate)
    }

    /// Walks the graph from `start`, always taking the sharpest turn in the
    /// direction of `winding`, until we get back to the start of `start`.
    ///
    /// Returns the visited nodes, or `None` if the walk ran into a dead end.
    /// Returns an error if the walk doesn't close within our trace limit, which
    /// can only happen if the graph isn't planar.
    pub fn trace(&self, start: Segment, winding: Winding) -> Result<Option<Vec<Point>>, FaceWalkError> {
        let mut vertices = vec![start.start];
        let mut active = start;

        loop {
            let Some(next) = self.next_edge(&active, winding) else {
                tracing::trace!(?active, "walk hit a dead end");
                return Ok(None);
            };
            tracing::trace!(?next, "walk step");
            active = next;
            vertices.push(active.start);

            if active.end == vertices[0] {
                return Ok(Some(vertices));
            }

            if vertices.len() >= self.trace_limit {
                tracing::warn!(?start, limit = self.trace_limit, "face walk did not close");
                return Err(FaceWalkError::TraceLimitExceeded {
                    start,
                    limit: self.trace_limit,
                });
            }
        }
    }

    /// The smallest face containing `point`, if there is one.
    ///
    /// We try the edges above `point`, closest first. For each, we pick the
    /// turning direction that keeps `point` on the inside and trace the face
    /// on that side of the edge, keeping it if it really contains `point`.
    pub fn face_containing(&self, point: (f64, f64)) -> Result<Option<Face>, FaceWalkError> {
        let query = Vector::from(point);
        for (distance, edge) in self.crossed_by_up_ray(point) {
            let ev = edge.end - edge.start;
            let cv = edge.end.to_vector() - query;
            let winding = if ev.cross(cv) >= 0.0 {
                Winding::Clockwise
            } else {
                Winding::CounterClockwise
            };
            tracing::debug!(?edge, %distance, ?winding, "trying candidate edge");

            if let Some(vertices) = self.trace(edge, winding)? {
                if point_in_polygon(point, &vertices) {
                    return Ok(Some(Face { vertices }));
                }
                tracing::debug!(len = vertices.len(), "traced face doesn't contain the query");
            }
        }
        Ok(None)
    }
}
