use fitlab_core::{ErrorBounds, Figure, Marker, PlotStyle, Point, Rgb, Series};
use fitlab_render::render_figure;

fn sample_figure() -> Figure {
    let mut fig = Figure::new("smooth_fit_ff4", "Prop. Hamming distance", "proportion of f>0 genomes");
    fig.x_range = Some((-0.01, 0.5));
    let points = (0..10)
        .map(|i| {
            let y = 1.0 / (1.0 + i as f64);
            Point::with_err(i as f64 / 32.0, y, ErrorBounds::symmetric(y, 0.02))
        })
        .collect();
    fig.series.push(
        Series::line_with_markers(points, Rgb(171, 130, 255), Marker::Square).labelled("n=4"),
    );
    fig.series.push(Series::line(
        vec![Point::new(0.0, 1.0), Point::new(f64::NAN, 0.5), Point::new(0.3, 0.2)],
        Rgb(75, 0, 130),
    ));
    fig
}

#[test]
fn writes_svg_with_legend() {
    let dir = tempfile::tempdir().unwrap();
    let path = render_figure(&sample_figure(), &PlotStyle::default(), dir.path()).unwrap();
    assert_eq!(path, dir.path().join("smooth_fit_ff4.svg"));
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("n=4"));
    assert!(svg.contains("proportion of f&gt;0 genomes") || svg.contains("proportion of f>0 genomes"));
}

#[test]
fn every_marker_kind_renders() {
    let dir = tempfile::tempdir().unwrap();
    let mut fig = Figure::new("markers", "x", "y");
    fig.y_tick_divisor = Some(1e3);
    for (i, marker) in [
        Marker::None,
        Marker::Dot,
        Marker::Circle,
        Marker::Square,
        Marker::Triangle,
        Marker::Cross,
    ]
    .into_iter()
    .enumerate()
    {
        let y = 1000.0 * i as f64;
        fig.series.push(
            Series::scatter(vec![Point::new(0.1, y), Point::new(0.2, y + 500.0)], Rgb(0, 0, 205), marker)
                .labelled(format!("m{i}")),
        );
    }
    let path = render_figure(&fig, &PlotStyle::default(), &dir.path().join("nested")).unwrap();
    assert!(path.exists());
}

#[test]
fn empty_figure_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let fig = Figure::new("figS1", "log (generations)", "log (fitness increments)");
    let path = render_figure(&fig, &PlotStyle::default(), dir.path()).unwrap();
    assert!(std::fs::read_to_string(path).unwrap().contains("<svg"));
}
