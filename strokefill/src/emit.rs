//! Handing new strokes back to the host.

use serde::{Deserialize, Serialize};

use crate::{segments::Polyline, topology::Face, FaceFinder, FaceWalkError};

/// Converts one sRGB channel (between 0 and 1) to linear light.
pub fn srgb_to_linear(x: f32) -> f32 {
    const A: f32 = 0.055;
    if x <= 0.04045 {
        x * (1.0 / 12.92)
    } else {
        ((x + A) * (1.0 / (1.0 + A))).powf(2.4)
    }
}

fn linear_rgba([r, g, b]: [f32; 3]) -> [f32; 4] {
    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), 1.0]
}

/// Brush colours for new strokes, in sRGB.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FillStyle {
    pub fill: [f32; 3],
    pub line: [f32; 3],
}

impl Default for FillStyle {
    fn default() -> Self {
        FillStyle {
            fill: [1.0, 1.0, 1.0],
            line: [0.0, 0.0, 0.0],
        }
    }
}

impl FillStyle {
    /// A style with the given fill colour and a black outline.
    pub fn with_fill(fill: [f32; 3]) -> Self {
        FillStyle {
            fill,
            ..Default::default()
        }
    }
}

/// A stroke for the host to create. Colours are linear RGBA.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FillStroke {
    pub points: Vec<(f64, f64)>,
    pub cyclic: bool,
    pub fill_color: [f32; 4],
    pub line_color: [f32; 4],
}

impl FillStroke {
    pub fn from_face(face: &Face, style: &FillStyle) -> Self {
        FillStroke {
            points: face.points().collect(),
            cyclic: true,
            fill_color: linear_rgba(style.fill),
            line_color: linear_rgba(style.line),
        }
    }

    pub fn from_polyline(polyline: &Polyline, style: &FillStyle) -> Self {
        FillStroke {
            points: polyline.points.clone(),
            cyclic: polyline.closed,
            fill_color: linear_rgba(style.fill),
            line_color: linear_rgba(style.line),
        }
    }
}

/// The host side of a fill: something that turns a [`FillStroke`] into a real
/// stroke in the drawing.
///
/// Everything host-specific (which layer and frame the stroke goes on, undo
/// history, mapping back to 3d) happens behind this trait.
pub trait FaceSink {
    fn emit(&mut self, stroke: FillStroke);
}

impl FaceSink for Vec<FillStroke> {
    fn emit(&mut self, stroke: FillStroke) {
        self.push(stroke);
    }
}

/// Fills the face around `query`: if `polylines` enclose it, emits a closed
/// stroke along the boundary of the enclosing face.
///
/// Returns the face that was filled, if any.
pub fn fill_at<S: FaceSink + ?Sized>(
    sink: &mut S,
    finder: &FaceFinder,
    polylines: &[Polyline],
    query: (f64, f64),
    style: &FillStyle,
) -> Result<Option<Face>, FaceWalkError> {
    let face = finder.find_enclosing_face(polylines, query)?;
    match &face {
        Some(face) => {
            tracing::debug!(vertices = face.len(), "emitting fill stroke");
            sink.emit(FillStroke::from_face(face, style));
        }
        None => tracing::debug!(?query, "nothing to fill"),
    }
    Ok(face)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Polyline> {
        vec![Polyline::closed([(0.0, 0.0), (4.0, 0.0), (2.0, 4.0)])]
    }

    #[test]
    fn srgb_endpoints() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!((srgb_to_linear(0.04045) - 0.04045 / 12.92).abs() < 1e-9);
        assert!((srgb_to_linear(0.5) - 0.214_041).abs() < 1e-5);
        // Monotone across the switch between the linear and power segments.
        assert!(srgb_to_linear(0.0405) > srgb_to_linear(0.04045));
    }

    #[test]
    fn fills_inside() {
        let mut sink = Vec::new();
        let style = FillStyle::with_fill([1.0, 0.0, 0.0]);
        let face = fill_at(&mut sink, &FaceFinder::default(), &triangle(), (2.0, 1.0), &style)
            .unwrap()
            .unwrap();

        assert_eq!(sink.len(), 1);
        let stroke = &sink[0];
        assert!(stroke.cyclic);
        assert_eq!(stroke.points, face.points().collect::<Vec<_>>());
        assert_eq!(stroke.points.len(), 3);
        assert_eq!(stroke.line_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(stroke.fill_color[1], 0.0);
        assert!((stroke.fill_color[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn nothing_to_fill_outside() {
        let mut sink = Vec::new();
        let face = fill_at(
            &mut sink,
            &FaceFinder::default(),
            &triangle(),
            (10.0, 10.0),
            &FillStyle::default(),
        )
        .unwrap();
        assert_eq!(face, None);
        assert!(sink.is_empty());
    }

    #[test]
    fn open_polyline_stroke() {
        let polyline = Polyline::open([(0.0, 0.0), (1.0, 1.0)]);
        let stroke = FillStroke::from_polyline(&polyline, &FillStyle::default());
        assert!(!stroke.cyclic);
        assert_eq!(stroke.points, polyline.points);
    }
}
