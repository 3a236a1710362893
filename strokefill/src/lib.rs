//! Geometry fill for stroke drawings.
//!
//! Given a pile of 2D polylines (the strokes of a drawing) and a click point,
//! this crate finds the smallest region enclosed by the strokes that contains
//! the click, so that it can be turned into a new, filled, closed stroke.
//!
//! The strokes don't need to be nicely connected: they can cross each other
//! anywhere. We first cut every edge at all of its crossings (see
//! [`PolyEdges::from_raw`]), which gives a planar graph. Then we look for edges
//! above the click and walk around the graph from them, always taking the
//! sharpest turn, until we get back to where we started (see [`Topology`]).
//!
//! ```
//! use strokefill::{find_enclosing_face, Polyline};
//!
//! let strokes = [
//!     Polyline::open([(0.0, 0.0), (4.0, 0.0)]),
//!     Polyline::open([(4.0, 0.0), (2.0, 4.0)]),
//!     Polyline::open([(2.0, 4.0), (0.0, 0.0)]),
//! ];
//! let face = find_enclosing_face(&strokes, (2.0, 1.0)).unwrap().unwrap();
//! assert_eq!(face.len(), 3);
//! assert!(find_enclosing_face(&strokes, (10.0, 10.0)).unwrap().is_none());
//! ```

use thiserror::Error;

mod config;
mod cut;
mod emit;
mod geom;
mod graph;
mod num;
mod segments;
mod snap;
mod topology;

pub use config::FillConfig;
pub use cut::{cut_polyline, cut_polylines, CutStroke};
pub use emit::{fill_at, srgb_to_linear, FaceSink, FillStroke, FillStyle};
pub use geom::{point_in_polygon, Point, Segment, Vector};
pub use graph::{intersection_record, Crossing, PolyEdges};
pub use num::{Quantizer, DEFAULT_PRECISION, MAX_PRECISION};
pub use segments::{EdgeIdx, Polyline, RawEdges};
pub use snap::{constrain_to_axis, Hover, PolygonDraft, SnapTargets};
pub use topology::{turn_angle, Face, Topology, Winding};

/// The face walk failed.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FaceWalkError {
    /// The walk didn't get back to its starting point within the trace limit.
    ///
    /// This normally doesn't happen for edge graphs built by
    /// [`PolyEdges::from_raw`]. It means that two edges cross somewhere other
    /// than at their end points, which can still happen there because a raw
    /// edge with exactly one crossing is kept whole.
    #[error("face walk from {start:?} did not close within {limit} vertices")]
    TraceLimitExceeded {
        /// The edge that the walk started from.
        start: Segment,
        /// The trace limit that was hit.
        limit: usize,
    },
}

/// A [`FillConfig`] was out of range.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Too many decimal digits for the coordinate keys to stay exact.
    #[error("precision of {0} decimal digits is out of range (at most {max})", max = MAX_PRECISION)]
    PrecisionOutOfRange(u32),
    /// The trace limit can't fit a triangle.
    #[error("trace limit of {0} is too small (at least 3)")]
    TraceLimitTooSmall(usize),
    /// The snap radius must be finite and positive.
    #[error("invalid snap radius {0}")]
    InvalidSnapRadius(f64),
}

/// Finds enclosing faces with a fixed configuration.
#[derive(Clone, Debug)]
pub struct FaceFinder {
    quantizer: Quantizer,
    trace_limit: usize,
}

impl Default for FaceFinder {
    fn default() -> Self {
        let config = FillConfig::default();
        Self {
            quantizer: Quantizer::default(),
            trace_limit: config.trace_limit,
        }
    }
}

impl FaceFinder {
    /// Checks `config` and builds a finder from it.
    pub fn new(config: &FillConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            quantizer: config.quantizer()?,
            trace_limit: config.trace_limit,
        })
    }

    /// The quantizer used for stroke coordinates.
    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    /// Builds the planar edge graph of a collection of strokes.
    pub fn topology(&self, polylines: &[Polyline]) -> Topology {
        let raw = RawEdges::from_polylines(polylines, &self.quantizer);
        Topology::new(PolyEdges::from_raw(&raw, &self.quantizer), self.trace_limit)
    }

    /// The smallest face enclosed by `polylines` that contains `query`.
    ///
    /// Returns `Ok(None)` if `query` isn't enclosed by anything (or is exactly on a stroke).
    pub fn find_enclosing_face(
        &self,
        polylines: &[Polyline],
        query: (f64, f64),
    ) -> Result<Option<Face>, FaceWalkError> {
        self.topology(polylines).face_containing(query)
    }
}

/// The smallest face enclosed by `polylines` that contains `query`, using the
/// default configuration.
pub fn find_enclosing_face(
    polylines: &[Polyline],
    query: (f64, f64),
) -> Result<Option<Face>, FaceWalkError> {
    FaceFinder::default().find_enclosing_face(polylines, query)
}
