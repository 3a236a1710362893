use assert_matches::assert_matches;
use proptest::{
    prelude::prop,
    proptest,
    strategy::{Just, Strategy},
};
use strokefill::{
    cut_polylines, fill_at, find_enclosing_face, ConfigError, Face, FaceFinder, FillConfig,
    FillStroke, FillStyle, Hover, PolygonDraft, Polyline, Quantizer, SnapTargets,
};

/// The vertices of a face, counter-clockwise and starting from the smallest one.
fn canonical(face: &Face) -> Vec<(f64, f64)> {
    let face = face.to_counter_clockwise();
    let mut vertices = face.vertices().to_vec();
    let first = vertices
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| **p)
        .map(|(i, _)| i)
        .unwrap();
    vertices.rotate_left(first);
    vertices.into_iter().map(|p| p.to_tuple()).collect()
}

fn triangle_strokes() -> Vec<Polyline> {
    vec![
        Polyline::open([(0.0, 0.0), (4.0, 0.0)]),
        Polyline::open([(4.0, 0.0), (2.0, 4.0)]),
        Polyline::open([(2.0, 4.0), (0.0, 0.0)]),
    ]
}

#[test]
fn separate_strokes_make_a_triangle() {
    let face = find_enclosing_face(&triangle_strokes(), (2.0, 1.0))
        .unwrap()
        .unwrap();
    assert_eq!(canonical(&face), vec![(0.0, 0.0), (4.0, 0.0), (2.0, 4.0)]);

    assert_eq!(find_enclosing_face(&triangle_strokes(), (10.0, 10.0)), Ok(None));
}

#[test]
fn empty_drawing() {
    assert_eq!(find_enclosing_face(&[], (0.0, 0.0)), Ok(None));
}

#[test]
fn overlapping_squares() {
    let strokes = [
        Polyline::closed([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
        Polyline::closed([(0.5, 0.5), (1.5, 0.5), (1.5, 1.5), (0.5, 1.5)]),
    ];

    let middle = find_enclosing_face(&strokes, (0.75, 0.75)).unwrap().unwrap();
    assert_eq!(
        canonical(&middle),
        vec![(0.5, 0.5), (1.0, 0.5), (1.0, 1.0), (0.5, 1.0)]
    );

    let corner = find_enclosing_face(&strokes, (0.25, 0.25)).unwrap().unwrap();
    assert_eq!(corner.len(), 6);
    assert!((corner.signed_area().abs() - 0.75).abs() < 1e-9);

    assert_eq!(find_enclosing_face(&strokes, (2.0, 2.0)), Ok(None));
}

#[test]
fn tic_tac_toe() {
    let strokes = [
        Polyline::open([(1.0, 0.0), (1.0, 3.0)]),
        Polyline::open([(2.0, 0.0), (2.0, 3.0)]),
        Polyline::open([(0.0, 1.0), (3.0, 1.0)]),
        Polyline::open([(0.0, 2.0), (3.0, 2.0)]),
    ];

    let center = find_enclosing_face(&strokes, (1.5, 1.5)).unwrap().unwrap();
    assert_eq!(
        canonical(&center),
        vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)]
    );

    // The outer cells are open on two sides.
    for q in [(0.5, 0.5), (1.5, 0.5), (2.5, 1.5), (1.5, 2.5)] {
        assert_eq!(find_enclosing_face(&strokes, q), Ok(None), "{q:?}");
    }
}

#[test]
fn pentagram_center() {
    let outer: Vec<_> = (0..5)
        .map(|i| {
            let angle = (90.0 + 72.0 * i as f64).to_radians();
            (10.0 * angle.cos(), 10.0 * angle.sin())
        })
        .collect();
    let star = Polyline::closed([0, 2, 4, 1, 3].map(|i| outer[i]));

    let face = find_enclosing_face(&[star.clone()], (0.0, 0.0))
        .unwrap()
        .unwrap();
    assert_eq!(face.len(), 5);
    assert!(face.contains((0.0, 0.0)));

    // One of the points of the star.
    let tip = find_enclosing_face(&[star], (0.5, 7.0)).unwrap().unwrap();
    assert_eq!(tip.len(), 3);
}

#[test]
fn precision_closes_gaps() {
    let strokes = [
        Polyline::open([(0.0, 0.0), (4.0, 0.0)]),
        Polyline::open([(4.02, 0.01), (2.0, 4.0)]),
        Polyline::open([(2.0, 4.0), (0.0, 0.0)]),
    ];
    assert_eq!(find_enclosing_face(&strokes, (2.0, 1.0)), Ok(None));

    let coarse = FaceFinder::new(&FillConfig {
        precision: 1,
        ..FillConfig::default()
    })
    .unwrap();
    let face = coarse.find_enclosing_face(&strokes, (2.0, 1.0)).unwrap().unwrap();
    assert_eq!(canonical(&face), vec![(0.0, 0.0), (4.0, 0.0), (2.0, 4.0)]);
}

#[test]
fn bad_config() {
    let config = FillConfig {
        precision: 13,
        ..FillConfig::default()
    };
    assert_matches!(FaceFinder::new(&config), Err(ConfigError::PrecisionOutOfRange(13)));

    let config = FillConfig {
        snap_radius: f64::NAN,
        ..FillConfig::default()
    };
    assert_matches!(FaceFinder::new(&config), Err(ConfigError::InvalidSnapRadius(_)));
}

#[test]
fn fill_into_sink() {
    let mut sink: Vec<FillStroke> = Vec::new();
    let style = FillStyle::with_fill([0.5, 0.5, 0.5]);
    let finder = FaceFinder::default();

    fill_at(&mut sink, &finder, &triangle_strokes(), (2.0, 1.0), &style).unwrap();
    fill_at(&mut sink, &finder, &triangle_strokes(), (-1.0, 1.0), &style).unwrap();

    assert_eq!(sink.len(), 1);
    assert!(sink[0].cyclic);
    assert_eq!(sink[0].points.len(), 3);
    assert_eq!(sink[0].fill_color[3], 1.0);
    assert!((sink[0].fill_color[0] - 0.214_041).abs() < 1e-5);
}

#[test]
fn drafted_polygon_can_be_filled() {
    let strokes = triangle_strokes();
    let targets = SnapTargets::from_polylines(&strokes);
    let mut draft = PolygonDraft::new();

    // Trace over the triangle's corners, a little off target.
    for cursor in [(0.3, -0.2), (4.5, 0.1), (2.2, 3.9)] {
        let hover = draft.hover(cursor, &targets, 1.0);
        assert_matches!(hover, Hover::Snap(_));
        assert_eq!(draft.click(hover), None);
    }
    let hover = draft.hover((0.1, 0.1), &targets, 1.0);
    assert_eq!(hover, Hover::Close);
    let polygon = draft.click(hover).unwrap();
    assert!(polygon.closed);
    assert_eq!(polygon.points, vec![(0.0, 0.0), (4.0, 0.0), (2.0, 4.0)]);

    let face = find_enclosing_face(&[polygon], (2.0, 1.0)).unwrap().unwrap();
    assert_eq!(canonical(&face), vec![(0.0, 0.0), (4.0, 0.0), (2.0, 4.0)]);
}

#[test]
fn cut_strokes_still_fill() {
    let strokes = [Polyline::closed([(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)])];
    let cuts = cut_polylines(&strokes, ((1.0, -1.0), (1.0, 3.0)), &Quantizer::default());
    assert_eq!(cuts[0].inserted, vec![1, 4]);

    let cut: Vec<_> = cuts.into_iter().map(|c| c.polyline).collect();
    let face = find_enclosing_face(&cut, (0.5, 0.5)).unwrap().unwrap();
    assert_eq!(
        canonical(&face),
        vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 2.0), (1.0, 2.0), (0.0, 2.0)]
    );
}

fn square_strokes(x: f64, y: f64, size: f64, rotation: usize) -> Vec<Polyline> {
    let mut corners = vec![(x, y), (x + size, y), (x + size, y + size), (x, y + size)];
    corners.rotate_left(rotation);
    vec![Polyline::closed(corners)]
}

proptest! {
    #[test]
    fn square_encloses_its_center(
        x in (-10_000i32..10_000).prop_map(|i| i as f64 / 100.0),
        y in (-10_000i32..10_000).prop_map(|i| i as f64 / 100.0),
        size in (10i32..5_000).prop_map(|i| i as f64 / 100.0),
        rotation in 0usize..4,
    ) {
        let strokes = square_strokes(x, y, size, rotation);
        let center = (x + size / 2.0, y + size / 2.0);
        let face = find_enclosing_face(&strokes, center).unwrap().unwrap();
        assert_eq!(face.len(), 4);
        assert!(face.contains(center));
        assert!((face.signed_area().abs() - size * size).abs() < 1e-6 * size * size + 1e-6);

        let outside = (x - 1.0, y + size / 2.0);
        assert_eq!(find_enclosing_face(&strokes, outside), Ok(None));
    }

    #[test]
    fn stroke_order_doesnt_matter(
        order in Just(vec![0usize, 1, 2]).prop_shuffle(),
        reverse in prop::array::uniform3(proptest::bool::ANY),
    ) {
        let strokes = triangle_strokes();
        let shuffled: Vec<_> = order
            .iter()
            .map(|&i| {
                let mut s = strokes[i].clone();
                if reverse[i] {
                    s.points.reverse();
                }
                s
            })
            .collect();
        let face = find_enclosing_face(&shuffled, (2.0, 1.0)).unwrap().unwrap();
        assert_eq!(canonical(&face), vec![(0.0, 0.0), (4.0, 0.0), (2.0, 4.0)]);
    }
}
