use std::path::PathBuf;

use clap::Parser;
use kurbo::DEFAULT_ACCURACY;
use strokefill::{fill_at, FaceFinder, FillConfig, FillStroke, FillStyle, Polyline};
use tracing_subscriber::EnvFilter;

/// Fills the region of an SVG drawing that surrounds a point.
#[derive(Parser)]
struct Args {
    input: PathBuf,
    output: PathBuf,

    #[arg(long, allow_negative_numbers = true)]
    x: f64,

    #[arg(long, allow_negative_numbers = true)]
    y: f64,

    #[arg(long)]
    precision: Option<u32>,

    #[arg(long)]
    trace_limit: Option<usize>,
}

fn svg_to_polylines(tree: &usvg::Tree) -> Vec<Polyline> {
    let mut ret = Vec::new();

    fn pt(p: usvg::tiny_skia_path::Point) -> kurbo::Point {
        kurbo::Point::new(p.x as f64, p.y as f64)
    }

    fn add_group(group: &usvg::Group, ret: &mut Vec<Polyline>) {
        for child in group.children() {
            match child {
                usvg::Node::Group(group) => add_group(group, ret),
                usvg::Node::Path(path) => {
                    let kurbo_els = path.data().segments().map(|seg| match seg {
                        usvg::tiny_skia_path::PathSegment::MoveTo(p) => {
                            kurbo::PathEl::MoveTo(pt(p))
                        }
                        usvg::tiny_skia_path::PathSegment::LineTo(p) => {
                            kurbo::PathEl::LineTo(pt(p))
                        }
                        usvg::tiny_skia_path::PathSegment::QuadTo(p0, p1) => {
                            kurbo::PathEl::QuadTo(pt(p0), pt(p1))
                        }
                        usvg::tiny_skia_path::PathSegment::CubicTo(p0, p1, p2) => {
                            kurbo::PathEl::CurveTo(pt(p0), pt(p1), pt(p2))
                        }
                        usvg::tiny_skia_path::PathSegment::Close => kurbo::PathEl::ClosePath,
                    });

                    let mut points = Vec::<(f64, f64)>::new();
                    kurbo::flatten(kurbo_els, DEFAULT_ACCURACY, |el| match el {
                        kurbo::PathEl::MoveTo(p) => {
                            if points.len() > 1 {
                                ret.push(Polyline::open(points.drain(..)));
                            }
                            points.clear();
                            points.push((p.x, p.y));
                        }
                        kurbo::PathEl::LineTo(p) => {
                            points.push((p.x, p.y));
                        }
                        kurbo::PathEl::ClosePath => {
                            let p = points.first().cloned();
                            ret.push(Polyline::closed(points.drain(..)));
                            if let Some(p) = p {
                                points.push(p);
                            }
                        }
                        kurbo::PathEl::QuadTo(..) | kurbo::PathEl::CurveTo(..) => unreachable!(),
                    });

                    if points.len() > 1 {
                        ret.push(Polyline::open(points.drain(..)));
                    }
                }
                _ => {}
            }
        }
    }

    add_group(tree.root(), &mut ret);
    ret
}

fn rgb([r, g, b]: [f32; 3]) -> String {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("rgb({},{},{})", c(r), c(g), c(b))
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = FillConfig::default();
    if let Some(precision) = args.precision {
        config.precision = precision;
    }
    if let Some(trace_limit) = args.trace_limit {
        config.trace_limit = trace_limit;
    }
    let finder = FaceFinder::new(&config)?;

    let input = std::fs::read_to_string(&args.input)?;
    let tree = usvg::Tree::from_str(&input, &usvg::Options::default())?;
    let polylines = svg_to_polylines(&tree);

    let style = FillStyle::with_fill([0.3, 0.6, 1.0]);
    let mut strokes: Vec<FillStroke> = Vec::new();
    let query = (args.x, args.y);
    let face = fill_at(&mut strokes, &finder, &polylines, query, &style)?;
    match &face {
        Some(face) => tracing::info!(vertices = face.len(), area = face.signed_area().abs(), "filled"),
        None => tracing::info!(?query, "the point isn't enclosed by anything"),
    }

    let top = finder.topology(&polylines);
    let Some((min, max)) = top.edges().bounding_box() else {
        anyhow::bail!("no strokes in {}", args.input.display());
    };
    let min_x = min.x.min(args.x);
    let min_y = min.y.min(args.y);
    let max_x = max.x.max(args.x);
    let max_y = max.y.max(args.y);
    let pad = 1.0;
    let stroke_width = (max_y - min_y).max(max_x - min_x) / 512.0;
    let dot_radius = stroke_width * 1.5;
    let mut document = svg::Document::new().set(
        "viewBox",
        (
            min_x - pad,
            min_y - pad,
            max_x - min_x + 2.0 * pad,
            max_y - min_y + 2.0 * pad,
        ),
    );

    for stroke in &strokes {
        let mut data = svg::node::element::path::Data::new();
        for (i, &p) in stroke.points.iter().enumerate() {
            data = if i == 0 { data.move_to(p) } else { data.line_to(p) };
        }
        if stroke.cyclic {
            data = data.close();
        }
        let path = svg::node::element::Path::new()
            .set("fill", rgb(style.fill))
            .set("fill-opacity", 0.5)
            .set("stroke", rgb(style.line))
            .set("stroke-width", stroke_width)
            .set("d", data);
        document = document.add(path);
    }

    for seg in top.edges().segments() {
        let (x0, y0) = seg.start.to_tuple();
        let (x1, y1) = seg.end.to_tuple();
        for (cx, cy) in [(x0, y0), (x1, y1)] {
            let c = svg::node::element::Circle::new()
                .set("r", dot_radius)
                .set("cy", cy)
                .set("cx", cx)
                .set("opacity", 0.5)
                .set("fill", "blue");
            document = document.add(c);
        }

        let data = svg::node::element::path::Data::new()
            .move_to((x0, y0))
            .line_to((x1, y1));
        let path = svg::node::element::Path::new()
            .set("stroke", "black")
            .set("stroke-width", stroke_width / 2.0)
            .set("stroke-opacity", "0.5")
            .set("d", data);
        document = document.add(path);
    }

    let c = svg::node::element::Circle::new()
        .set("r", dot_radius * 2.0)
        .set("cx", args.x)
        .set("cy", args.y)
        .set("fill", "red");
    document = document.add(c);

    svg::save(&args.output, &document)?;

    Ok(())
}
