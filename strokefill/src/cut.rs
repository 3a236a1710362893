//! Knife cuts: adding points to strokes where a cut line crosses them.
//!
//! A cut doesn't remove anything. It gives each stroke a new vertex at every
//! place the cut crosses it, so that the stroke can be edited (or split) there
//! afterwards.

use serde::Serialize;

use crate::{
    geom::{Point, Segment},
    num::Quantizer,
    segments::Polyline,
};

/// A stroke after a cut.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CutStroke {
    pub polyline: Polyline,
    /// Indices (into `polyline.points`) of the points that the cut added, in
    /// increasing order.
    pub inserted: Vec<usize>,
}

impl CutStroke {
    fn unchanged(polyline: &Polyline) -> Self {
        CutStroke {
            polyline: polyline.clone(),
            inserted: Vec::new(),
        }
    }

    pub fn is_cut(&self) -> bool {
        !self.inserted.is_empty()
    }
}

fn cut_segment((a, b): ((f64, f64), (f64, f64)), q: &Quantizer) -> Option<Segment> {
    let (Some(a), Some(b)) = (Point::quantized(a, q), Point::quantized(b, q)) else {
        tracing::warn!(?a, ?b, "ignoring cut with non-finite end points");
        return None;
    };
    let seg = Segment::new(a, b);
    (!seg.is_degenerate()).then_some(seg)
}

/// Where `knife` crosses the stroke edge from `a` to `b`, if it crosses it
/// away from the edge's end points.
fn crossing(knife: &Segment, a: (f64, f64), b: (f64, f64), q: &Quantizer) -> Option<Point> {
    let edge = Segment::new(Point::quantized(a, q)?, Point::quantized(b, q)?);
    if edge.is_degenerate() {
        return None;
    }
    let point = knife.intersection(&edge, q)?;
    (!edge.has_endpoint(&point)).then_some(point)
}

/// Inserts a point into `polyline` wherever the segment `cut` crosses one of
/// its edges. The closing edge of a closed stroke is included, and a point
/// on it goes at the end.
///
/// A crossing that lands on an existing vertex (after rounding) doesn't add
/// anything, since the stroke already has a point there. Strokes with fewer
/// than two points are returned unchanged.
pub fn cut_polyline(polyline: &Polyline, cut: ((f64, f64), (f64, f64)), q: &Quantizer) -> CutStroke {
    let Some(knife) = cut_segment(cut, q) else {
        return CutStroke::unchanged(polyline);
    };
    cut_with(polyline, &knife, q)
}

fn cut_with(polyline: &Polyline, knife: &Segment, q: &Quantizer) -> CutStroke {
    let ps = &polyline.points;
    if ps.len() < 2 {
        return CutStroke::unchanged(polyline);
    }

    let mut points = Vec::with_capacity(ps.len() + 1);
    let mut inserted = Vec::new();
    for pair in ps.windows(2) {
        points.push(pair[0]);
        if let Some(p) = crossing(knife, pair[0], pair[1], q) {
            inserted.push(points.len());
            points.push(p.to_tuple());
        }
    }
    points.extend(ps.last().copied());

    // With only two points, the closing edge is the edge we already did.
    if polyline.closed && ps.len() > 2 {
        if let Some(p) = crossing(knife, ps[ps.len() - 1], ps[0], q) {
            inserted.push(points.len());
            points.push(p.to_tuple());
        }
    }

    if !inserted.is_empty() {
        tracing::debug!(added = inserted.len(), "cut stroke");
    }
    CutStroke {
        polyline: Polyline {
            points,
            closed: polyline.closed,
        },
        inserted,
    }
}

/// Cuts every stroke in `polylines` with the segment `cut`.
///
/// The result has one entry per input stroke, in the same order; strokes that
/// the cut misses come back unchanged.
pub fn cut_polylines(
    polylines: &[Polyline],
    cut: ((f64, f64), (f64, f64)),
    q: &Quantizer,
) -> Vec<CutStroke> {
    let Some(knife) = cut_segment(cut, q) else {
        return polylines.iter().map(CutStroke::unchanged).collect();
    };
    polylines.iter().map(|p| cut_with(p, &knife, q)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q() -> Quantizer {
        Quantizer::default()
    }

    #[test]
    fn open_stroke() {
        let stroke = Polyline::open([(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        let cut = cut_polyline(&stroke, ((1.0, -1.0), (1.0, 3.0)), &q());
        assert_eq!(cut.inserted, vec![1, 4]);
        assert_eq!(
            cut.polyline.points,
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 2.0), (1.0, 2.0), (0.0, 2.0)]
        );
        assert!(!cut.polyline.closed);
    }

    #[test]
    fn closing_edge_goes_last() {
        let stroke = Polyline::closed([(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        let cut = cut_polyline(&stroke, ((-1.0, 1.0), (1.0, 1.0)), &q());
        assert_eq!(cut.inserted, vec![4]);
        assert_eq!(cut.polyline.points.last(), Some(&(0.0, 1.0)));
        assert!(cut.polyline.closed);

        // The same cut misses the open version of the stroke.
        let open = Polyline::open(stroke.points.clone());
        assert!(!cut_polyline(&open, ((-1.0, 1.0), (1.0, 1.0)), &q()).is_cut());
    }

    #[test]
    fn short_strokes() {
        let dot = Polyline::closed([(1.0, 1.0)]);
        let cut = cut_polyline(&dot, ((0.0, 0.0), (2.0, 2.0)), &q());
        assert_eq!(cut, CutStroke::unchanged(&dot));

        // A closed two-point stroke only has one edge to cut.
        let line = Polyline::closed([(0.0, 0.0), (2.0, 0.0)]);
        let cut = cut_polyline(&line, ((1.0, -1.0), (1.0, 1.0)), &q());
        assert_eq!(cut.polyline.points, vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    }

    #[test]
    fn through_a_vertex() {
        let stroke = Polyline::open([(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        let cut = cut_polyline(&stroke, ((1.0, 2.0), (1.0, -1.0)), &q());
        assert!(!cut.is_cut());
        assert_eq!(cut.polyline, stroke);

        // The cut is rounded too, so this one also goes through (1, 1).
        let cut = cut_polyline(&stroke, ((1.00001, 2.0), (1.00001, -1.0)), &q());
        assert!(!cut.is_cut());
    }

    #[test]
    fn crossing_points_are_rounded() {
        let stroke = Polyline::open([(0.0, 0.0), (3.0, 0.0)]);
        let cut = cut_polyline(&stroke, ((1.0 / 3.0, -1.0), (1.0 / 3.0, 1.0)), &q());
        assert_eq!(cut.polyline.points[1], (0.3333, 0.0));
    }

    #[test]
    fn parallel_and_degenerate_cuts() {
        let stroke = Polyline::open([(0.0, 0.0), (3.0, 0.0)]);
        assert!(!cut_polyline(&stroke, ((0.0, 0.0), (3.0, 0.0)), &q()).is_cut());
        assert!(!cut_polyline(&stroke, ((1.0, 0.0), (1.0, 0.0)), &q()).is_cut());
        assert!(!cut_polyline(&stroke, ((f64::NAN, 0.0), (1.0, 1.0)), &q()).is_cut());
    }

    #[test]
    fn every_stroke_is_returned() {
        let strokes = [
            Polyline::open([(0.0, 0.0), (0.0, 2.0)]),
            Polyline::open([(5.0, 0.0), (5.0, 2.0)]),
            Polyline::open([(2.0, 0.0), (2.0, 2.0)]),
        ];
        let cuts = cut_polylines(&strokes, ((-1.0, 1.0), (3.0, 1.0)), &q());
        assert_eq!(cuts.len(), 3);
        assert_eq!(cuts[0].inserted, vec![1]);
        assert!(!cuts[1].is_cut());
        assert_eq!(cuts[2].polyline.points[1], (2.0, 1.0));
    }
}
