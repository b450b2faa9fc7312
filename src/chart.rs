//! Rendering of a resolved [`Figure`] with plotters

use crate::color::{parse_color, ColorScale};
use crate::data::{DataSet, PlotType};
use crate::directives::{Scale, Ticks};
use crate::error::PlotError;
use crate::figure::{Figure, Frame};
use crate::style::{ArtistStyle, LineStyle, Marker};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use plotters::chart::SeriesAnno;
use plotters::coord::ranged1d::{AsRangedCoord, Ranged, ValueFormatter};
use plotters::coord::Shift;
use plotters::element::{Cross, DynElement, ErrorBar, IntoDynElement, TriangleMarker};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

/// Tick label size in points
const TICK_PT: f64 = 10.0;
/// Axis label size in points
const DESC_PT: f64 = 11.0;
/// Title size in points
const TITLE_PT: f64 = 12.0;
/// Legend label size in points
const LEGEND_PT: f64 = 10.0;
/// Default scatter marker radius in points
const SCATTER_RADIUS_PT: f64 = 3.0;

/// Image encodings the backends can write
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// PNG, BMP or JPEG through the bitmap backend
    Bitmap,
    /// SVG text
    Svg,
}

impl OutputFormat {
    /// Picks the backend from the file extension
    pub fn from_path(path: &Path) -> Result<Self, PlotError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "png" | "bmp" | "jpg" | "jpeg" => Ok(OutputFormat::Bitmap),
            "svg" => Ok(OutputFormat::Svg),
            _ => Err(PlotError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Draws `sets` as described by `fig` and writes the image to `out`
pub fn render(fig: &Figure, sets: &[DataSet], out: &Path) -> Result<()> {
    let size = fig.pixel_size();
    match OutputFormat::from_path(out)? {
        OutputFormat::Svg => {
            let root = SVGBackend::new(out, size).into_drawing_area();
            draw(&root, fig, sets)?;
            root.present()?;
        }
        OutputFormat::Bitmap => {
            let root = BitMapBackend::new(out, size).into_drawing_area();
            draw(&root, fig, sets)?;
            root.present().with_context(|| format!("writing {}", out.display()))?;
        }
    }
    info!("wrote {} ({}x{} px)", out.display(), size.0, size.1);
    Ok(())
}

/// Pixel sizes of the areas around the plot
struct Layout {
    margin: i32,
    x_area: i32,
    y_area: i32,
    y2_area: i32,
    caption: i32,
}

impl Layout {
    fn new(fig: &Figure, twin: bool) -> Self {
        let tick = fig.px(TICK_PT);
        let desc = fig.px(DESC_PT);
        let with_desc = |label: &Option<String>| if label.is_some() { desc * 1.6 } else { 0.0 };
        let y_area = |label: &Option<String>| (tick * 3.6 + with_desc(label)) as i32;
        Layout {
            margin: fig.px(6.0) as i32,
            x_area: (tick * 1.9 + with_desc(&fig.x_label)) as i32,
            y_area: y_area(&fig.y_label),
            y2_area: if twin { y_area(&fig.y2_label) } else { 0 },
            caption: match fig.title {
                Some(_) => (fig.px(title_pt(fig)) * 1.6) as i32,
                None => 0,
            },
        }
    }
}

fn title_pt(fig: &Figure) -> f64 {
    fig.title_args.num(&["fontsize", "size"]).unwrap_or(TITLE_PT)
}

fn font(fig: &Figure, pt: f64) -> TextStyle<'static> {
    font_in(fig, pt, fig.theme.text_color())
}

fn font_in(fig: &Figure, pt: f64, color: RGBColor) -> TextStyle<'static> {
    FontDesc::new(FontFamily::SansSerif, fig.px(pt), FontStyle::Normal).color(&color)
}

fn draw<DB>(root: &DrawingArea<DB, Shift>, fig: &Figure, sets: &[DataSet]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let frame = fig.frame(sets);
    debug!("frame {frame:?}");

    let (w, _) = root.dim_in_pixel();
    let colorbar = match (fig.plot_type, frame.color) {
        (PlotType::Xysc, Some(range)) => Some(range),
        _ => None,
    };
    let (main, bar) = match colorbar {
        Some(_) => {
            let (a, b) = root.split_horizontally((w as f64 * 0.84) as i32);
            (a, Some(b))
        }
        None => (root.clone(), None),
    };

    let layout = Layout::new(fig, frame.y2.is_some());
    let area = inner_area(&main, fig, &frame, &layout);

    let (x0, x1) = frame.x;
    let (y0, y1) = frame.y;
    match (fig.x_scale, fig.y_scale) {
        (Scale::Linear, Scale::Linear) => {
            draw_axes(&area, fig, sets, &frame, &layout, x0..x1, y0..y1)
        }
        (Scale::Log, Scale::Linear) => {
            draw_axes(&area, fig, sets, &frame, &layout, (x0..x1).log_scale(), y0..y1)
        }
        (Scale::Linear, Scale::Log) => {
            draw_axes(&area, fig, sets, &frame, &layout, x0..x1, (y0..y1).log_scale())
        }
        (Scale::Log, Scale::Log) => draw_axes(
            &area,
            fig,
            sets,
            &frame,
            &layout,
            (x0..x1).log_scale(),
            (y0..y1).log_scale(),
        ),
    }?;

    if let (Some(bar), Some(range)) = (bar, colorbar) {
        draw_colorbar(&bar, fig, range)?;
    }
    Ok(())
}

/// Shrinks `main` for `+adj` margins and the `+asp` box
fn inner_area<DB: DrawingBackend>(
    main: &DrawingArea<DB, Shift>,
    fig: &Figure,
    frame: &Frame,
    layout: &Layout,
) -> DrawingArea<DB, Shift> {
    let (w, h) = main.dim_in_pixel();
    let (w, h) = (w as f64, h as f64);
    let m = layout.margin as f64;
    let adj = |key: &str| fig.adjust.num(&[key]);
    let mut left = adj("left").map_or(0.0, |f| (f * w - layout.y_area as f64 - m).max(0.0));
    let mut right =
        adj("right").map_or(0.0, |f| ((1.0 - f) * w - layout.y2_area as f64 - m).max(0.0));
    let mut top =
        adj("top").map_or(0.0, |f| ((1.0 - f) * h - layout.caption as f64 - m).max(0.0));
    let mut bottom = adj("bottom").map_or(0.0, |f| (f * h - layout.x_area as f64 - m).max(0.0));

    if let Some(asp) = fig.aspect {
        let span = |(lo, hi): (f64, f64), scale: Scale| match scale {
            Scale::Log => (hi.log10() - lo.log10()).abs(),
            Scale::Linear => (hi - lo).abs(),
        };
        let plot_w = w - 2.0 * m - (layout.y_area + layout.y2_area) as f64 - left - right;
        let plot_h = h - 2.0 * m - (layout.x_area + layout.caption) as f64 - top - bottom;
        let ratio = asp * span(frame.y, fig.y_scale) / span(frame.x, fig.x_scale);
        if plot_w > 0.0 && plot_h > 0.0 && ratio.is_finite() && ratio > 0.0 {
            let want_h = plot_w * ratio;
            if want_h <= plot_h {
                top += (plot_h - want_h) / 2.0;
                bottom += (plot_h - want_h) / 2.0;
            } else {
                let want_w = plot_h / ratio;
                left += (plot_w - want_w) / 2.0;
                right += (plot_w - want_w) / 2.0;
            }
        }
    }
    main.margin(top as i32, bottom as i32, left as i32, right as i32)
}

/// Tick label text; scientific outside `10^lo..=10^hi`
pub fn format_tick(v: f64, sci: Option<(i32, i32)>) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let (lo, hi) = sci.unwrap_or((-5, 6));
    let exp = v.abs().log10().floor() as i32;
    if exp < lo || exp > hi {
        return format!("{v:.1e}");
    }
    let s = format!("{v:.6}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Integer tick positions inside `lo..=hi`, at most about eight of them
pub fn integer_ticks((lo, hi): (f64, f64)) -> Vec<f64> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let first = lo.ceil();
    let last = hi.floor();
    if last < first {
        return Vec::new();
    }
    let count = (last - first) as usize + 1;
    let step = count.div_ceil(8).max(1);
    (0..count).step_by(step).map(|k| first + k as f64).collect()
}

/// Explicit x ticks requested by `+xt`, `+xtl` or `+xti`; `None` leaves them to the mesh
pub fn x_tick_marks(fig: &Figure, frame: &Frame) -> Option<Vec<(f64, String)>> {
    let label = |i: usize, v: f64| {
        fig.x_tick_labels
            .as_ref()
            .and_then(|l| l.get(i).cloned())
            .unwrap_or_else(|| format_tick(v, fig.x_sci))
    };
    match (&fig.x_ticks, &fig.x_tick_labels) {
        (Some(Ticks::Hidden), _) => Some(Vec::new()),
        (Some(Ticks::At(at)), _) => {
            Some(at.iter().enumerate().map(|(i, &v)| (v, label(i, v))).collect())
        }
        (None, Some(labels)) => {
            Some(labels.iter().enumerate().map(|(i, l)| (i as f64, l.clone())).collect())
        }
        (None, None) if fig.integer_x_ticks => Some(
            integer_ticks(frame.x)
                .into_iter()
                .map(|v| (v, format!("{v:.0}")))
                .collect(),
        ),
        _ => None,
    }
}

fn y_tick_marks(fig: &Figure) -> Option<Vec<(f64, String)>> {
    match &fig.y_ticks {
        Some(Ticks::Hidden) => Some(Vec::new()),
        Some(Ticks::At(at)) => Some(at.iter().map(|&v| (v, format_tick(v, fig.y_sci))).collect()),
        None => None,
    }
}

/// Legend corner for `+lga loc=...` / `+lgb`
fn legend_position(fig: &Figure, plot_w: i32, plot_h: i32) -> SeriesLabelPosition {
    if let Some((fx, fy)) = fig.legend.anchor {
        return SeriesLabelPosition::Coordinate(
            (fx * plot_w as f64) as i32,
            ((1.0 - fy) * plot_h as f64) as i32,
        );
    }
    let loc = fig.legend.args.get("loc").map(|v| v.as_text()).unwrap_or_default();
    match loc.as_str() {
        "upper left" | "2" => SeriesLabelPosition::UpperLeft,
        "lower left" | "3" => SeriesLabelPosition::LowerLeft,
        "lower right" | "4" => SeriesLabelPosition::LowerRight,
        "right" | "center right" | "5" | "7" => SeriesLabelPosition::MiddleRight,
        "center left" | "6" => SeriesLabelPosition::MiddleLeft,
        "lower center" | "8" => SeriesLabelPosition::LowerMiddle,
        "upper center" | "9" => SeriesLabelPosition::UpperMiddle,
        "center" | "10" => SeriesLabelPosition::MiddleMiddle,
        _ => SeriesLabelPosition::UpperRight,
    }
}

fn draw_axes<'a, DB, XR, YR>(
    area: &'a DrawingArea<DB, Shift>,
    fig: &Figure,
    sets: &[DataSet],
    frame: &Frame,
    layout: &Layout,
    x_spec: XR,
    y_spec: YR,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    XR: AsRangedCoord<Value = f64> + Clone,
    YR: AsRangedCoord<Value = f64>,
    XR::CoordDescType: ValueFormatter<f64>,
    YR::CoordDescType: ValueFormatter<f64>,
{
    let theme = fig.theme;
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(layout.margin)
        .x_label_area_size(layout.x_area)
        .y_label_area_size(layout.y_area);
    if layout.y2_area > 0 {
        builder.right_y_label_area_size(layout.y2_area);
    }
    if let Some(title) = &fig.title {
        let color = match fig.title_args.get("color") {
            Some(c) => parse_color(&c.as_text())?,
            None => fig.theme.text_color(),
        };
        builder.caption(title, font_in(fig, title_pt(fig), color));
    }
    let mut chart = builder.build_cartesian_2d(x_spec.clone(), y_spec)?;

    if let Some(panel) = theme.panel() {
        chart.plotting_area().fill(&panel)?;
    }

    if let Some((a, b)) = fig.rect {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(a, frame.y.0), (b, frame.y.1)],
            RGBColor(0xF2, 0xDE, 0xDE).filled(),
        )))?;
    }

    let x_ticks = x_tick_marks(fig, frame);
    let y_ticks = y_tick_marks(fig);
    let tick_font = font(fig, TICK_PT);
    let x_fmt = |v: &f64| format_tick(*v, fig.x_sci);
    let y_fmt = |v: &f64| format_tick(*v, fig.y_sci);
    {
        let mut mesh = chart.configure_mesh();
        mesh.axis_style(theme.axis_color().stroke_width(1))
            .label_style(tick_font.clone())
            .axis_desc_style(font(fig, DESC_PT))
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt);
        if let Some(xl) = &fig.x_label {
            mesh.x_desc(xl.as_str());
        }
        if let Some(yl) = &fig.y_label {
            mesh.y_desc(yl.as_str());
        }
        if x_ticks.is_some() {
            mesh.x_labels(0);
        }
        if y_ticks.is_some() {
            mesh.y_labels(0);
        }
        match (&fig.grid, theme.panel()) {
            (Some(g), _) => {
                let color = parse_color(&g.color)?;
                mesh.bold_line_style(color.stroke_width(fig.px(g.width).round().max(1.0) as u32))
                    .light_line_style(TRANSPARENT);
            }
            (None, Some(_)) => {
                mesh.bold_line_style(WHITE.stroke_width(1)).light_line_style(TRANSPARENT);
            }
            (None, None) => {
                mesh.disable_mesh();
            }
        }
        mesh.draw()?;
    }

    for (i, line) in fig.lines.iter().enumerate() {
        let style = fig.segment_style(line, i)?;
        draw_curve(&mut chart, fig, &[line.from, line.to], &style)?;
    }

    let mut labeled = 0;
    for i in 0..sets.len() {
        labeled += draw_set(&mut chart, fig, frame, sets, i)?;
    }

    let base = area.get_base_pixel();
    let (px_x, px_y) = chart.plotting_area().get_pixel_range();
    let tick_len = fig.px(3.5) as i32;
    let axis = theme.axis_color().stroke_width(1);
    if let Some(ticks) = &x_ticks {
        let (x_lo, x_hi) = ordered(frame.x);
        let base_font = match fig.x_tick_args.num(&["fontsize", "size"]) {
            Some(pt) => font(fig, pt),
            None => tick_font.clone(),
        };
        let style = match fig.x_tick_args.num(&["rotation"]).map(|r| r.rem_euclid(360.0) as i32) {
            None | Some(0) => base_font.pos(Pos::new(HPos::Center, VPos::Top)),
            Some(90) => base_font
                .transform(FontTransform::Rotate270)
                .pos(Pos::new(HPos::Right, VPos::Center)),
            Some(270) => base_font
                .transform(FontTransform::Rotate90)
                .pos(Pos::new(HPos::Left, VPos::Center)),
            Some(r) => {
                warn!("+xarg rotation={r} is not supported, labels stay horizontal");
                base_font.pos(Pos::new(HPos::Center, VPos::Top))
            }
        };
        let bottom = px_y.end - base.1;
        for (v, text) in ticks.iter().filter(|(v, _)| *v >= x_lo && *v <= x_hi) {
            let x = chart.backend_coord(&(*v, frame.y.0)).0 - base.0;
            if let Some(g) = &fig.grid {
                let c = parse_color(&g.color)?;
                let top = px_y.start - base.1;
                area.draw(&PathElement::new(vec![(x, top), (x, bottom)], c.stroke_width(1)))?;
            }
            area.draw(&PathElement::new(vec![(x, bottom), (x, bottom + tick_len)], axis))?;
            area.draw(&Text::new(text.clone(), (x, bottom + tick_len + 2), style.clone()))?;
        }
    }
    if let Some(ticks) = &y_ticks {
        let (y_lo, y_hi) = ordered(frame.y);
        let style = tick_font.clone().pos(Pos::new(HPos::Right, VPos::Center));
        let left = px_x.start - base.0;
        for (v, text) in ticks.iter().filter(|(v, _)| *v >= y_lo && *v <= y_hi) {
            let y = chart.backend_coord(&(frame.x.0, *v)).1 - base.1;
            area.draw(&PathElement::new(vec![(left - tick_len, y), (left, y)], axis))?;
            area.draw(&Text::new(text.clone(), (left - tick_len - 2, y), style.clone()))?;
        }
    }

    if theme.boxed() {
        area.draw(&Rectangle::new(
            [(px_x.start - base.0, px_y.start - base.1), (px_x.end - base.0, px_y.end - base.1)],
            axis,
        ))?;
    }

    for ann in &fig.annotations {
        let x = px_x.start + ((px_x.end - px_x.start) as f64 * ann.fx) as i32 - base.0;
        let y = px_y.end - ((px_y.end - px_y.start) as f64 * ann.fy) as i32 - base.1;
        area.draw(&Text::new(
            ann.text.clone(),
            (x, y),
            tick_font.clone().pos(Pos::new(HPos::Left, VPos::Bottom)),
        ))?;
    }

    if fig.has_legend() && labeled > 0 {
        if fig.legend.args.get("ncol").is_some() {
            warn!("+lga ncol is not supported, the legend uses one column");
        }
        let frameon = fig.legend.args.get("frameon").and_then(|v| v.as_bool()).unwrap_or(false);
        let pt = fig.legend.font.num(&["size", "fontsize"]).unwrap_or(LEGEND_PT);
        let pos = legend_position(fig, px_x.end - px_x.start, px_y.end - px_y.start);
        let mut legend = chart.configure_series_labels();
        legend
            .position(pos)
            .label_font(font(fig, pt))
            .margin(fig.px(4.0) as i32)
            .legend_area_size(fig.px(16.0) as i32);
        if frameon {
            legend.background_style(WHITE.mix(0.8)).border_style(theme.axis_color());
        } else {
            legend.background_style(TRANSPARENT).border_style(TRANSPARENT);
        }
        legend.draw()?;
    }

    if let Some((lo, hi)) = frame.y2 {
        let mut twin = chart.set_secondary_coord(x_spec, lo..hi);
        let y2_fmt = |v: &f64| format_tick(*v, fig.y2_sci);
        let mut mesh = twin.configure_secondary_axes();
        mesh.label_style(tick_font.clone())
            .axis_desc_style(font(fig, DESC_PT))
            .y_label_formatter(&y2_fmt);
        if let Some(yl2) = &fig.y2_label {
            mesh.y_desc(yl2.as_str());
        }
        mesh.draw()?;
        for (i, set) in sets.iter().enumerate() {
            let style = fig.series_style(i)?;
            let dotted = stroke(fig, &style);
            let (on, off) = dash_pattern(fig, LineStyle::Dotted, style.line_width);
            let pts: Vec<(f64, f64)> = set.x.iter().copied().zip(set.y2.iter().copied()).collect();
            twin.draw_secondary_series(DashedLineSeries::new(pts, on, off, dotted))?;
        }
    }
    Ok(())
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn stroke(fig: &Figure, style: &ArtistStyle) -> ShapeStyle {
    style
        .color
        .mix(style.alpha)
        .stroke_width(fig.px(style.line_width).round().max(1.0) as u32)
}

fn fill(color: RGBColor, alpha: f64) -> ShapeStyle {
    color.mix(alpha).filled()
}

/// Dash length and gap in pixels
fn dash_pattern(fig: &Figure, line: LineStyle, width_pt: f64) -> (i32, i32) {
    let (on, off) = match line {
        LineStyle::Dashed => (3.7, 1.6),
        LineStyle::Dotted => (1.0, 1.65),
        LineStyle::DashDot => (6.4, 1.6),
        LineStyle::Solid | LineStyle::None => (1.0, 0.0),
    };
    let w = width_pt.max(0.5);
    ((fig.px(on * w).round() as i32).max(1), (fig.px(off * w).round() as i32).max(1))
}

/// What the legend shows next to a label
#[derive(Clone, Copy)]
enum Glyph {
    Line(ShapeStyle),
    Point(Marker, i32, ShapeStyle),
    Patch(ShapeStyle),
}

fn attach<'a, DB: DrawingBackend + 'a>(
    anno: &mut SeriesAnno<'a, DB>,
    label: Option<&str>,
    glyph: Glyph,
) -> usize {
    let Some(label) = label else { return 0 };
    anno.label(label);
    match glyph {
        Glyph::Line(s) => {
            anno.legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], s));
        }
        Glyph::Point(m, r, s) => {
            anno.legend(move |(x, y)| marker_element::<DB, (i32, i32)>(m, (x + 10, y), r, s));
        }
        Glyph::Patch(s) => {
            anno.legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], s));
        }
    }
    1
}

fn marker_element<'a, DB, C>(
    m: Marker,
    at: C,
    r: i32,
    style: ShapeStyle,
) -> DynElement<'a, DB, C>
where
    DB: DrawingBackend + 'a,
    C: Clone + 'static,
{
    match m {
        Marker::Circle => Circle::new(at, r, style).into_dyn(),
        Marker::Point => Circle::new(at, (r / 2).max(1), style).into_dyn(),
        Marker::Square => {
            (EmptyElement::at(at) + Rectangle::new([(-r, -r), (r, r)], style)).into_dyn()
        }
        Marker::Triangle => TriangleMarker::new(at, r, style).into_dyn(),
        Marker::Diamond => {
            let diamond = Polygon::new(vec![(0, -r), (r, 0), (0, r), (-r, 0)], style);
            (EmptyElement::at(at) + diamond).into_dyn()
        }
        Marker::Cross => Cross::new(at, r, style).into_dyn(),
    }
}

/// Line plus optional markers; returns 1 when a legend entry was added
fn draw_curve<'a, DB, X, Y>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<X, Y>>,
    fig: &Figure,
    pts: &[(f64, f64)],
    style: &ArtistStyle,
) -> Result<usize>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    let line = stroke(fig, style);
    let label = style.label.as_deref();
    let mut labeled = 0;
    match style.format.line {
        LineStyle::None => {}
        LineStyle::Solid => {
            let anno = chart.draw_series(LineSeries::new(pts.iter().copied(), line))?;
            labeled = attach(anno, label, Glyph::Line(line));
        }
        dashed => {
            let (on, off) = dash_pattern(fig, dashed, style.line_width);
            let dashes = DashedLineSeries::new(pts.iter().copied(), on, off, line);
            let anno = chart.draw_series(dashes)?;
            labeled = attach(anno, label, Glyph::Line(line));
        }
    }
    if let Some(m) = style.format.marker {
        let r = (fig.px(style.marker_size) / 2.0).round().max(1.0) as i32;
        let face = fill(style.fill_color(), style.alpha);
        let markers = pts.iter().map(|&p| marker_element::<DB, (f64, f64)>(m, p, r, face));
        let anno = chart.draw_series(markers)?;
        if labeled == 0 {
            labeled = attach(anno, label, Glyph::Point(m, r, face));
        }
    }
    Ok(labeled)
}

/// Shaded region between the two band edges, outlined by the edge color
fn draw_band<'a, DB, X, Y>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<X, Y>>,
    fig: &Figure,
    x: &[f64],
    band: &[(f64, f64)],
    style: &ArtistStyle,
) -> Result<usize>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    let lower: Vec<(f64, f64)> = x.iter().zip(band).map(|(&x, &(lo, _))| (x, lo)).collect();
    let upper: Vec<(f64, f64)> = x.iter().zip(band).map(|(&x, &(_, hi))| (x, hi)).collect();
    draw_fill_between(chart, fig, &upper, &lower, style)
}

fn draw_fill_between<'a, DB, X, Y>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<X, Y>>,
    fig: &Figure,
    upper: &[(f64, f64)],
    lower: &[(f64, f64)],
    style: &ArtistStyle,
) -> Result<usize>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    if upper.is_empty() {
        return Ok(0);
    }
    let face = fill(style.fill_color(), style.alpha);
    let outline: Vec<(f64, f64)> = upper.iter().chain(lower.iter().rev()).copied().collect();
    let anno = chart.draw_series(std::iter::once(Polygon::new(outline, face)))?;
    let labeled = attach(anno, style.label.as_deref(), Glyph::Patch(face));
    if let Some(edge) = style.edge {
        let width = fig.px(style.line_width).round().max(1.0) as u32;
        let edge = edge.mix(style.alpha).stroke_width(width);
        chart.draw_series(LineSeries::new(upper.iter().copied(), edge))?;
        chart.draw_series(LineSeries::new(lower.iter().copied(), edge))?;
    }
    Ok(labeled)
}

/// Draws input file `i` according to the plot type
fn draw_set<'a, DB, X, Y>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<X, Y>>,
    fig: &Figure,
    frame: &Frame,
    sets: &[DataSet],
    i: usize,
) -> Result<usize>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    let set = &sets[i];
    let style = fig.series_style(i)?;
    let pts = set.points();
    let dot = fig.px(SCATTER_RADIUS_PT).round().max(1.0) as i32;
    let mut labeled = 0;

    match fig.plot_type {
        PlotType::Xyc => {
            let colors = point_colors(&set.color)?;
            let anno = chart.draw_series(
                pts.iter()
                    .zip(&colors)
                    .map(|(&p, c)| Circle::new(p, dot, fill(*c, style.alpha))),
            )?;
            let first = colors.first().copied().unwrap_or(style.color);
            let glyph = Glyph::Point(Marker::Circle, dot, fill(first, 1.0));
            return Ok(attach(anno, style.label.as_deref(), glyph));
        }
        PlotType::XmMy => {
            labeled += draw_band(chart, fig, &set.x, &set.band, &fig.band_style()?)?;
            for (k, curve) in set.curves.iter().enumerate() {
                let cs = fig.curve_style(sets, i, k)?;
                let cpts: Vec<(f64, f64)> =
                    set.x.iter().copied().zip(curve.iter().copied()).collect();
                labeled += draw_curve(chart, fig, &cpts, &cs)?;
            }
            return Ok(labeled);
        }
        PlotType::XymM => {
            labeled += draw_band(chart, fig, &set.x, &set.band, &fig.band_style()?)?;
        }
        _ => {}
    }

    if fig.plot_type == PlotType::Xyci {
        let bar = stroke(fig, &style);
        let cap = fig.px(2.0).round() as u32;
        chart.draw_series(pts.iter().zip(&set.err).map(|(&(x, y), &(below, above))| {
            ErrorBar::new_vertical(x, y - below, y, y + above, bar, cap)
        }))?;
        labeled += draw_curve(chart, fig, &pts, &style)?;
    } else {
        if let Some(base) = fig.fill {
            let baseline: Vec<(f64, f64)> = set.x.iter().map(|&x| (x, base)).collect();
            let mut area = style.clone();
            area.label = None;
            area.edge = None;
            draw_fill_between(chart, fig, &pts, &baseline, &area)?;
        }
        labeled += draw_curve(chart, fig, &pts, &style)?;
    }

    match fig.plot_type {
        PlotType::Xys => {
            let face = fill(style.fill_color(), style.alpha);
            chart.draw_series(pts.iter().zip(&set.size).map(|(&p, &s)| {
                let r = fig.px(s.max(0.0).sqrt() / 2.0).round().max(1.0) as i32;
                Circle::new(p, r, face)
            }))?;
        }
        PlotType::Xysc => {
            let (lo, hi) = frame.color.unwrap_or((0.0, 1.0));
            let scale = ColorScale::new(lo, hi)?;
            chart.draw_series(
                pts.iter()
                    .zip(&set.size)
                    .map(|(&p, &s)| Circle::new(p, dot, fill(scale.at(s), style.alpha))),
            )?;
        }
        _ => {}
    }
    Ok(labeled)
}

/// Resolves an `xyc` color column: numbers go through the color scale,
/// anything else must be a color name or code
fn point_colors(raw: &[String]) -> Result<Vec<RGBColor>> {
    let numeric: Option<Vec<f64>> = raw.iter().map(|s| s.parse::<f64>().ok()).collect();
    match numeric {
        Some(values) => {
            let scale = ColorScale::spanning(&values)?;
            Ok(values.iter().map(|&v| scale.at(v)).collect())
        }
        None => raw
            .iter()
            .map(|s| parse_color(s).with_context(|| format!("color column value `{s}`")))
            .collect(),
    }
}

/// Vertical gradient strip with `%.0e` labels, beside the main plot
fn draw_colorbar<DB>(
    area: &DrawingArea<DB, Shift>,
    fig: &Figure,
    (lo, hi): (f64, f64),
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let scale = ColorScale::new(lo, hi)?;
    let (lo, hi) = (scale.lo, scale.hi);
    let (_, h) = area.dim_in_pixel();
    let pad = (h as f64 * 0.3) as i32;
    let strip = area.margin(pad, pad, fig.px(4.0) as i32, 0);
    let mut chart = ChartBuilder::on(&strip)
        .set_label_area_size(LabelAreaPosition::Right, fig.px(28.0) as i32)
        .build_cartesian_2d(0.0..1.0, lo..hi)?;
    let fmt = |v: &f64| format!("{v:.0e}");
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .y_label_formatter(&fmt)
        .label_style(font(fig, 7.0))
        .axis_style(fig.theme.axis_color().stroke_width(1))
        .draw()?;
    let steps = 64;
    chart.draw_series((0..steps).map(|k| {
        let a = lo + (hi - lo) * k as f64 / steps as f64;
        let b = lo + (hi - lo) * (k + 1) as f64 / steps as f64;
        Rectangle::new([(0.0, a), (1.0, b)], scale.at((a + b) / 2.0).filled())
    }))?;
    Ok(())
}
