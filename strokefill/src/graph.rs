//! Splitting raw stroke edges into a planar graph.
//!
//! Strokes cross each other anywhere along their length, but a face can only
//! be traced through a graph whose edges meet at shared end points. So we
//! find every crossing along every raw edge and cut the edge there.

use std::collections::{HashMap, HashSet};

use ordered_float::NotNan;

use crate::{
    geom::{Point, Segment, Vector},
    num::Quantizer,
    segments::{EdgeIdx, RawEdges},
};

/// A place where some other raw edge crosses the edge we're looking at.
///
/// Crossings sort by their distance from the start of the edge, and then by
/// position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Crossing {
    pub distance: NotNan<f64>,
    pub point: Point,
}

/// All the crossings of the raw edge `idx` with the other raw edges, sorted
/// by distance from the start of `idx`.
///
/// Edges that share an end point with `idx` cross it there, so an edge of a
/// connected stroke typically has crossings at both of its ends.
pub fn intersection_record(raw: &RawEdges, idx: EdgeIdx, q: &Quantizer) -> Vec<Crossing> {
    let edge = raw.get(idx);
    let mut ret: Vec<_> = raw
        .indices()
        .filter(|&other| other != idx)
        .filter_map(|other| edge.intersection(raw.get(other), q))
        .filter_map(|point| {
            let distance = NotNan::new((point - edge.start).length()).ok()?;
            Some(Crossing { distance, point })
        })
        .collect();
    ret.sort();
    ret
}

/// The minimal edges that the face walker runs on.
///
/// Each undirected edge appears once. We also keep track of which edges touch
/// each node, since the walker asks that question at every step.
#[derive(Clone, Debug, Default)]
pub struct PolyEdges {
    segs: Vec<Segment>,
    seen: HashSet<(Point, Point)>,
    incident: HashMap<Point, Vec<usize>>,
}

impl PolyEdges {
    /// Splits every raw edge at its crossings.
    ///
    /// - A raw edge that nothing crosses can't bound a face, so it's dropped.
    /// - A raw edge with a single crossing is kept as it is.
    /// - Otherwise, we walk from the start of the edge through its crossings
    ///   in order, emitting a piece between each consecutive pair. Crossings that
    ///   coincide with the current position (because several edges cross at the
    ///   same point) are skipped. Nothing is emitted past the last crossing.
    pub fn from_raw(raw: &RawEdges, q: &Quantizer) -> Self {
        let mut ret = Self::default();
        let mut dropped = 0;
        for idx in raw.indices() {
            let edge = *raw.get(idx);
            let crossings = intersection_record(raw, idx, q);
            match crossings.as_slice() {
                [] => {
                    tracing::trace!(?idx, ?edge, "dropping edge that nothing crosses");
                    dropped += 1;
                }
                [_] => {
                    ret.insert(edge);
                }
                _ => {
                    let mut pos = edge.start;
                    for crossing in &crossings {
                        if crossing.point == pos {
                            continue;
                        }
                        ret.insert(Segment::new(pos, crossing.point));
                        pos = crossing.point;
                    }
                }
            }
        }
        tracing::debug!(
            raw = raw.len(),
            dropped,
            edges = ret.len(),
            "split raw edges at their crossings"
        );
        ret
    }

    /// Builds a graph straight from a collection of segments, without looking
    /// for crossings. Degenerate segments and duplicates are skipped.
    ///
    /// The face walker assumes that these segments only meet at their end points.
    pub fn from_segments(segs: impl IntoIterator<Item = Segment>) -> Self {
        let mut ret = Self::default();
        for seg in segs {
            ret.insert(seg);
        }
        ret
    }

    /// Adds a segment unless it's degenerate or already present (in either
    /// orientation). Returns true if it was added.
    pub fn insert(&mut self, seg: Segment) -> bool {
        if seg.is_degenerate() || !self.seen.insert(seg.undirected_key()) {
            return false;
        }
        let idx = self.segs.len();
        self.segs.push(seg);
        self.incident.entry(seg.start).or_default().push(idx);
        self.incident.entry(seg.end).or_default().push(idx);
        true
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segs.iter()
    }

    pub fn len(&self) -> usize {
        self.segs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    pub fn contains(&self, seg: &Segment) -> bool {
        self.seen.contains(&seg.undirected_key())
    }

    /// All the edges touching `node`, oriented so that they start there.
    pub fn leaving(&self, node: &Point) -> impl Iterator<Item = Segment> + '_ {
        let node = *node;
        self.incident
            .get(&node)
            .into_iter()
            .flatten()
            .map(move |&idx| {
                let seg = self.segs[idx];
                if seg.start == node {
                    seg
                } else {
                    seg.reversed()
                }
            })
    }

    /// The smallest and largest corners of the box containing all our edges.
    pub fn bounding_box(&self) -> Option<(Vector, Vector)> {
        let mut points = self.segs.iter().flat_map(|s| [s.start, s.end]);
        let first = points.next()?.to_vector();
        Some(points.fold((first, first), |(min, max), p| {
            let p = p.to_vector();
            (
                Vector {
                    x: min.x.min(p.x),
                    y: min.y.min(p.y),
                },
                Vector {
                    x: max.x.max(p.x),
                    y: max.y.max(p.y),
                },
            )
        }))
    }
}
