//! Resolved figure description and the data frame it is drawn in

use crate::cli::Cli;
use crate::color::{parse_color, Palette};
use crate::data::{DataSet, PlotType};
use crate::directives::{
    parse_pair, parse_sci, Annotation, GridSpec, LineSpec, Limits, Scale, Ticks, YLimits,
};
use crate::error::{PlotError, Result};
use crate::style::{ArtistStyle, KwArgs, LineFormat};
use log::warn;
use plotters::style::RGBColor;

/// Overall look of the axes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    /// Compact, grey left/bottom spines, no grid
    Mine,
    /// Grey panel with a white grid
    Ggplot,
    /// Black boxed axes
    Classic,
}

impl Theme {
    /// Resolves `+sty`; unsupported names fall back to `Classic`
    pub fn parse(name: &str) -> Self {
        match name {
            "mine" => Theme::Mine,
            "ggplot" => Theme::Ggplot,
            "default" | "classic" => Theme::Classic,
            other => {
                warn!("style `{other}` is not available, using the default style");
                Theme::Classic
            }
        }
    }

    /// Figure size in inches when `+wh` is absent
    pub fn default_size(self) -> (f64, f64) {
        match self {
            Theme::Mine => (5.0, 3.5),
            Theme::Ggplot | Theme::Classic => (7.0, 5.0),
        }
    }

    /// Color of titles, labels and legend text
    pub fn text_color(self) -> RGBColor {
        match self {
            Theme::Mine | Theme::Ggplot => RGBColor(0x55, 0x55, 0x55),
            Theme::Classic => RGBColor(0, 0, 0),
        }
    }

    /// Color of the axis lines
    pub fn axis_color(self) -> RGBColor {
        match self {
            Theme::Mine | Theme::Ggplot => RGBColor(128, 128, 128),
            Theme::Classic => RGBColor(0, 0, 0),
        }
    }

    /// Plot panel fill, if any
    pub fn panel(self) -> Option<RGBColor> {
        match self {
            Theme::Ggplot => Some(RGBColor(0xE5, 0xE5, 0xE5)),
            _ => None,
        }
    }

    /// Whether the top and right spines are drawn
    pub fn boxed(self) -> bool {
        self == Theme::Classic
    }
}

/// Legend placement and font
#[derive(Clone, Debug, Default)]
pub struct LegendSpec {
    /// `+lgp`: font properties
    pub font: KwArgs,
    /// `+lga`: loc, frameon, ...
    pub args: KwArgs,
    /// `+lgb`: upper-left corner in axes fraction
    pub anchor: Option<(f64, f64)>,
}

/// Everything the renderer needs besides the data
#[derive(Clone, Debug)]
pub struct Figure {
    /// Row layout of every input
    pub plot_type: PlotType,
    /// Axes look
    pub theme: Theme,
    /// Size in inches
    pub size_in: (f64, f64),
    /// Pixels per inch
    pub dpi: f64,
    /// Color cycle
    pub palette: Palette,
    /// `+xr`
    pub xlim: Limits,
    /// `+yr`
    pub ylim: YLimits,
    /// `+xs`
    pub x_scale: Scale,
    /// `+ys`
    pub y_scale: Scale,
    /// `+fill` baseline
    pub fill: Option<f64>,
    /// `+asp`
    pub aspect: Option<f64>,
    /// `+pa`, one entry per file
    pub plot_args: Vec<KwArgs>,
    /// `+mMa`
    pub band_args: KwArgs,
    /// `+line`
    pub lines: Vec<LineSpec>,
    /// `+lb`
    pub labels: Vec<String>,
    /// `+lt`
    pub formats: Vec<LineFormat>,
    /// `+lc`
    pub line_colors: Vec<RGBColor>,
    /// `+xsci`
    pub x_sci: Option<(i32, i32)>,
    /// `+ysci`
    pub y_sci: Option<(i32, i32)>,
    /// `+ysci2`
    pub y2_sci: Option<(i32, i32)>,
    /// `+ann`
    pub annotations: Vec<Annotation>,
    /// `+xt`
    pub x_ticks: Option<Ticks>,
    /// `+yt`
    pub y_ticks: Option<Ticks>,
    /// `+xti`
    pub integer_x_ticks: bool,
    /// `+xtl`
    pub x_tick_labels: Option<Vec<String>>,
    /// `+xarg`
    pub x_tick_args: KwArgs,
    /// `+gr`
    pub grid: Option<GridSpec>,
    /// `+xl`
    pub x_label: Option<String>,
    /// `+yl`
    pub y_label: Option<String>,
    /// `+yl2`
    pub y2_label: Option<String>,
    /// `+title`
    pub title: Option<String>,
    /// `+ta`
    pub title_args: KwArgs,
    /// `+lgp`, `+lga`, `+lgb`
    pub legend: LegendSpec,
    /// `+rect`
    pub rect: Option<(f64, f64)>,
    /// `+adj`
    pub adjust: KwArgs,
}

fn kw(directive: &'static str, v: &Option<String>) -> Result<KwArgs> {
    v.as_deref().map(|s| KwArgs::parse(directive, s)).transpose().map(Option::unwrap_or_default)
}

fn scale(directive: &'static str, v: &Option<String>) -> Result<Scale> {
    v.as_deref().map(|s| Scale::parse(directive, s)).transpose().map(Option::unwrap_or_default)
}

impl Figure {
    /// Resolves and validates every drawing directive
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if !(cli.dpi.is_finite() && cli.dpi > 0.0) {
            return Err(PlotError::directive("dpi", &cli.dpi.to_string(), "must be > 0"));
        }
        let theme = Theme::parse(&cli.sty);
        let size_in = match &cli.wh {
            Some(s) => {
                let (w, h) = parse_pair("wh", s)?;
                if !(w > 0.0 && h > 0.0) {
                    return Err(PlotError::directive("wh", s, "width and height must be > 0"));
                }
                (w, h)
            }
            None => theme.default_size(),
        };
        if let Some(a) = cli.asp {
            if !(a.is_finite() && a > 0.0) {
                return Err(PlotError::directive("asp", &a.to_string(), "must be > 0"));
            }
        }
        let rect = cli.rect.as_deref().map(|s| parse_pair("rect", s)).transpose()?;
        let xlim = cli.xr.as_deref().map(|s| Limits::parse("xr", s)).transpose()?;

        Ok(Figure {
            plot_type: cli.plot_type,
            theme,
            size_in,
            dpi: cli.dpi,
            palette: Palette::parse(cli.cl.as_deref())?,
            xlim: xlim.unwrap_or_default(),
            ylim: cli.yr.as_deref().map(YLimits::parse).transpose()?.unwrap_or_default(),
            x_scale: scale("xs", &cli.xs)?,
            y_scale: scale("ys", &cli.ys)?,
            fill: cli.fill,
            aspect: cli.asp,
            plot_args: cli.pa.iter().map(|s| KwArgs::parse("pa", s)).collect::<Result<_>>()?,
            band_args: kw("mMa", &cli.band_args)?,
            lines: LineSpec::parse_all(&cli.line)?,
            labels: cli.lb.clone(),
            formats: cli.lt.iter().map(|s| LineFormat::parse(s)).collect::<Result<_>>()?,
            line_colors: cli.lc.iter().map(|s| parse_color(s)).collect::<Result<_>>()?,
            x_sci: cli.xsci.as_deref().map(|s| parse_sci("xsci", s)).transpose()?,
            y_sci: cli.ysci.as_deref().map(|s| parse_sci("ysci", s)).transpose()?,
            y2_sci: cli.ysci2.as_deref().map(|s| parse_sci("ysci2", s)).transpose()?,
            annotations: cli.ann.iter().map(|s| Annotation::parse(s)).collect::<Result<_>>()?,
            x_ticks: cli.xt.as_deref().map(|s| Ticks::parse("xt", s)).transpose()?,
            y_ticks: cli.yt.as_deref().map(|s| Ticks::parse("yt", s)).transpose()?,
            integer_x_ticks: cli.xti != 0,
            x_tick_labels: cli.xtl.as_ref().map(|s| s.split(';').map(str::to_string).collect()),
            x_tick_args: kw("xarg", &cli.xarg)?,
            grid: cli.gr.as_deref().map(GridSpec::parse).transpose()?,
            x_label: cli.xl.clone(),
            y_label: cli.yl.clone(),
            y2_label: cli.yl2.clone(),
            title: cli.title.clone(),
            title_args: kw("ta", &cli.ta)?,
            legend: LegendSpec {
                font: kw("lgp", &cli.lgp)?,
                args: kw("lga", &cli.lga)?,
                anchor: cli.lgb.as_deref().map(|s| parse_pair("lgb", s)).transpose()?,
            },
            rect,
            adjust: kw("adj", &cli.adj)?,
        })
    }

    /// Converts a length in points to pixels
    pub fn px(&self, pt: f64) -> f64 {
        pt * self.dpi / 72.0
    }

    /// Image size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.size_in.0 * self.dpi).round().max(1.0) as u32,
            (self.size_in.1 * self.dpi).round().max(1.0) as u32,
        )
    }

    /// Label text at position `i` of `+lb`, unless absent or `-`
    pub fn label_at(&self, i: usize) -> Option<String> {
        self.labels.get(i).filter(|l| !l.is_empty() && l.as_str() != "-").cloned()
    }

    /// A legend is drawn once any `+lb` is given
    pub fn has_legend(&self) -> bool {
        !self.labels.is_empty()
    }

    /// Style for the main series of file `i`.
    ///
    /// Precedence, lowest first: cycle color, `+lt`, `+pa` (per file, the
    /// last one repeating), `+lc`.
    pub fn series_style(&self, i: usize) -> Result<ArtistStyle> {
        let default_fmt = match self.plot_type {
            PlotType::Xyci => LineFormat::POINTS,
            _ => LineFormat::SOLID,
        };
        let fmt = self.formats.get(i).copied().unwrap_or(default_fmt);
        let mut style = ArtistStyle::new(self.palette.pick(i), fmt);
        if let Some(pa) = self.plot_args_for(i) {
            style.apply("pa", pa)?;
        }
        if let Some(c) = self.line_colors.get(i) {
            style.color = *c;
        }
        style.label = match self.plot_type {
            PlotType::XymM => self.label_at(1),
            _ => self.label_at(i),
        };
        Ok(style)
    }

    /// `+pa` entry for file `i`; the last one repeats for later files
    fn plot_args_for(&self, i: usize) -> Option<&KwArgs> {
        self.plot_args.get(i).or(self.plot_args.last())
    }

    /// Style of the `k`-th curve of `xmMy` file `file`.
    ///
    /// Without a `+lc` or `+pa` color, curves advance through the cycle
    /// across files, so no two curves share a cycle slot.
    pub fn curve_style(&self, sets: &[DataSet], file: usize, k: usize) -> Result<ArtistStyle> {
        let mut style = self.series_style(file)?;
        let pa_color = self
            .plot_args_for(file)
            .is_some_and(|pa| pa.get_any(&["color", "c"]).is_some());
        if self.line_colors.get(file).is_none() && !pa_color {
            let before: usize = sets.iter().take(file).map(|s| s.curves.len()).sum();
            style.color = self.palette.pick(before + k);
        }
        style.label = self.label_at(k + 1);
        Ok(style)
    }

    /// Style of the min/max band; `lb[0]` labels it
    pub fn band_style(&self) -> Result<ArtistStyle> {
        let mut style = ArtistStyle::new(RGBColor(0xff, 0xe0, 0xb2), LineFormat::SOLID);
        style.face = Some(RGBColor(0xff, 0xea, 0xcc));
        style.edge = Some(RGBColor(0xff, 0xe0, 0xb2));
        style.line_width = 1.0;
        style.apply("mMa", &self.band_args)?;
        if style.label.is_none() {
            style.label = self.label_at(0);
        }
        Ok(style)
    }

    /// Style of an extra `+line` segment, following the color cycle
    pub fn segment_style(&self, line: &LineSpec, i: usize) -> Result<ArtistStyle> {
        let mut style = ArtistStyle::new(self.palette.pick(i), LineFormat::SOLID);
        style.apply("line", &line.args)?;
        Ok(style)
    }

    /// Axis limits for the data, with explicit limits applied
    pub fn frame(&self, sets: &[DataSet]) -> Frame {
        let mut xs = Extent::default();
        let mut ys = Extent::default();
        let mut y_main = Extent::default();
        let mut y2 = Extent::default();
        let mut cs = Extent::default();
        let xlog = self.x_scale == Scale::Log;
        let ylog = self.y_scale == Scale::Log;

        for set in sets {
            xs.extend(&set.x, xlog);
            y_main.extend(&set.y, false);
            ys.extend(&set.y, ylog);
            for (y, (below, above)) in set.y.iter().zip(&set.err) {
                ys.push(y - below, ylog);
                ys.push(y + above, ylog);
            }
            for (lo, hi) in &set.band {
                ys.push(*lo, ylog);
                ys.push(*hi, ylog);
            }
            for curve in &set.curves {
                ys.extend(curve, ylog);
                y_main.extend(curve, false);
            }
            y2.extend(&set.y2, false);
            if self.plot_type == PlotType::Xysc {
                cs.extend(&set.size, false);
            }
        }
        if let Some(base) = self.fill {
            ys.push(base, ylog);
        }
        for l in &self.lines {
            xs.push(l.from.0, xlog);
            xs.push(l.to.0, xlog);
            ys.push(l.from.1, ylog);
            ys.push(l.to.1, ylog);
        }

        let mut x = xs.padded(xlog);
        if let Some(lo) = self.xlim.lo.filter(|v| !xlog || *v > 0.0) {
            x.0 = lo;
        }
        if let Some(hi) = self.xlim.hi.filter(|v| !xlog || *v > 0.0) {
            x.1 = hi;
        }
        let mut y = ys.padded(ylog);
        if let Some(b) = self.ylim.lo {
            let v = b.resolve(y_main.lo.unwrap_or(y.0));
            if !ylog || v > 0.0 {
                y.0 = v;
            }
        }
        if let Some(b) = self.ylim.hi {
            let v = b.resolve(y_main.hi.unwrap_or(y.1));
            if !ylog || v > 0.0 {
                y.1 = v;
            }
        }
        Frame {
            x: widen(x),
            y: widen(y),
            y2: (self.plot_type == PlotType::Xyy).then(|| widen(y2.padded(false))),
            color: cs.lo.zip(cs.hi),
        }
    }
}

/// Limits every axis is built with
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// x range
    pub x: (f64, f64),
    /// Primary y range
    pub y: (f64, f64),
    /// Twin y range for `xyy`
    pub y2: Option<(f64, f64)>,
    /// Colorbar range for `xysc`
    pub color: Option<(f64, f64)>,
}

#[derive(Default)]
struct Extent {
    lo: Option<f64>,
    hi: Option<f64>,
}

impl Extent {
    fn push(&mut self, v: f64, positive_only: bool) {
        if !v.is_finite() || (positive_only && v <= 0.0) {
            return;
        }
        self.lo = Some(self.lo.map_or(v, |lo| lo.min(v)));
        self.hi = Some(self.hi.map_or(v, |hi| hi.max(v)));
    }

    fn extend(&mut self, vs: &[f64], positive_only: bool) {
        for v in vs {
            self.push(*v, positive_only);
        }
    }

    /// Data range with a 5% margin on each side (in log space for log axes)
    fn padded(&self, log: bool) -> (f64, f64) {
        let (lo, hi) = match (self.lo, self.hi) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => return if log { (1.0, 10.0) } else { (0.0, 1.0) },
        };
        if log {
            let (a, b) = (lo.log10(), hi.log10());
            let pad = if b > a { 0.05 * (b - a) } else { 0.5 };
            (10f64.powf(a - pad), 10f64.powf(b + pad))
        } else {
            let pad = if hi > lo {
                0.05 * (hi - lo)
            } else {
                0.5_f64.max(lo.abs() * 0.05)
            };
            (lo - pad, hi + pad)
        }
    }
}

fn widen((lo, hi): (f64, f64)) -> (f64, f64) {
    if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}
