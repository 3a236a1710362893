use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    geom::{Point, Segment},
    num::Quantizer,
};

/// One stroke, as the host hands it to us: a sequence of model-space points,
/// optionally closed back onto its first point.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<(f64, f64)>,
    #[serde(default)]
    pub closed: bool,
}

impl Polyline {
    pub fn open(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Polyline {
            points: points.into_iter().collect(),
            closed: false,
        }
    }

    pub fn closed(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Polyline {
            points: points.into_iter().collect(),
            closed: true,
        }
    }
}

/// An index into a [`RawEdges`] arena.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct EdgeIdx(pub usize);

impl std::fmt::Debug for EdgeIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e_{}", self.0)
    }
}

/// The edges of all input strokes, before anything gets split.
///
/// Edges are kept in the order the strokes provided them, and each undirected
/// edge appears only once: overlapping strokes that retrace the same edge don't
/// produce duplicates.
#[derive(Debug, Clone, Default)]
pub struct RawEdges {
    segs: Vec<Segment>,
    seen: HashSet<(Point, Point)>,
}

impl RawEdges {
    pub fn from_polylines<'a>(
        polylines: impl IntoIterator<Item = &'a Polyline>,
        q: &Quantizer,
    ) -> Self {
        let mut ret = Self::default();
        for polyline in polylines {
            ret.add_points(polyline.points.iter().copied(), polyline.closed, q);
        }
        tracing::debug!(edges = ret.len(), "collected raw edges");
        ret
    }

    pub fn get(&self, idx: EdgeIdx) -> &Segment {
        &self.segs[idx.0]
    }

    pub fn indices(&self) -> impl Iterator<Item = EdgeIdx> {
        (0..self.segs.len()).map(EdgeIdx)
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

    /// Adds a segment, unless it's degenerate or we already have it (in either
    /// orientation). Returns true if it was added.
    pub fn push(&mut self, seg: Segment) -> bool {
        if seg.is_degenerate() || !self.seen.insert(seg.undirected_key()) {
            return false;
        }
        self.segs.push(seg);
        true
    }

    /// Adds the edges of a polyline. Points that can't be quantized (because
    /// they aren't finite) are skipped.
    pub fn add_points(
        &mut self,
        ps: impl IntoIterator<Item = (f64, f64)>,
        closed: bool,
        q: &Quantizer,
    ) {
        let ps: Vec<_> = ps
            .into_iter()
            .filter_map(|p| {
                let quantized = Point::quantized(p, q);
                if quantized.is_none() {
                    tracing::warn!(point = ?p, "skipping non-finite stroke point");
                }
                quantized
            })
            .collect();

        for pair in ps.windows(2) {
            self.push(Segment::new(pair[0], pair[1]));
        }
        if closed {
            if let Some((first, last)) = ps.first().zip(ps.last()) {
                self.push(Segment::new(*last, *first));
            }
        }
    }
}
