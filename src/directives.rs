//! Value mini-languages of the `+name value` directives

use crate::error::{PlotError, Result};
use crate::style::KwArgs;

fn number(directive: &'static str, whole: &str, part: &str) -> Result<f64> {
    let part = part.trim();
    part.parse::<f64>()
        .map_err(|_| PlotError::directive(directive, whole, format!("`{part}` is not a number")))
}

fn split_pair<'a>(directive: &'static str, text: &'a str) -> Result<(&'a str, &'a str)> {
    text.split_once(',')
        .ok_or_else(|| PlotError::directive(directive, text, "expected two comma-separated values"))
}

/// Axis limits where either end may be left open: `1,10`, `1,` or `,10`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Limits {
    /// Lower bound
    pub lo: Option<f64>,
    /// Upper bound
    pub hi: Option<f64>,
}

impl Limits {
    /// Parses an `+xr` style range
    pub fn parse(directive: &'static str, text: &str) -> Result<Self> {
        let (a, b) = split_pair(directive, text)?;
        let side = |s: &str| -> Result<Option<f64>> {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                number(directive, text, s).map(Some)
            }
        };
        Ok(Limits { lo: side(a)?, hi: side(b)? })
    }

    /// Whether `v` survives the row filter
    pub fn contains(&self, v: f64) -> bool {
        self.lo.map_or(true, |lo| v >= lo) && self.hi.map_or(true, |hi| v <= hi)
    }
}

/// One end of a `+yr` range
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bound {
    /// Absolute value
    Value(f64),
    /// Factor applied to the data extreme, written `1.1%`
    Relative(f64),
}

impl Bound {
    /// Resolves against the data extreme on this side
    pub fn resolve(self, extreme: f64) -> f64 {
        match self {
            Bound::Value(v) => v,
            Bound::Relative(k) => k * extreme,
        }
    }
}

/// `+yr` range whose ends may be relative to the data: `0,1.1%`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct YLimits {
    /// Lower bound
    pub lo: Option<Bound>,
    /// Upper bound
    pub hi: Option<Bound>,
}

impl YLimits {
    /// Parses a `+yr` value
    pub fn parse(text: &str) -> Result<Self> {
        let (a, b) = split_pair("yr", text)?;
        let side = |s: &str| -> Result<Option<Bound>> {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else if let Some(k) = s.strip_suffix('%') {
                number("yr", text, k).map(|k| Some(Bound::Relative(k)))
            } else {
                number("yr", text, s).map(|v| Some(Bound::Value(v)))
            }
        };
        Ok(YLimits { lo: side(a)?, hi: side(b)? })
    }
}

/// Parses `a,b` into two numbers (`+wh`, `+jr`, `+lgb`, `+rect`)
pub fn parse_pair(directive: &'static str, text: &str) -> Result<(f64, f64)> {
    let text = text.trim().trim_start_matches('(').trim_end_matches(')');
    let (a, b) = split_pair(directive, text)?;
    Ok((number(directive, text, a)?, number(directive, text, b)?))
}

/// Parses `+xsci -2,2` into integer exponent limits
pub fn parse_sci(directive: &'static str, text: &str) -> Result<(i32, i32)> {
    let (a, b) = parse_pair(directive, text)?;
    Ok((a.round() as i32, b.round() as i32))
}

/// Explicit tick request from `+xt` / `+yt`
#[derive(Clone, Debug, PartialEq)]
pub enum Ticks {
    /// `-`: no ticks at all
    Hidden,
    /// Ticks at the given positions
    At(Vec<f64>),
}

impl Ticks {
    /// Parses `-` or a comma list
    pub fn parse(directive: &'static str, text: &str) -> Result<Self> {
        if text.trim() == "-" {
            return Ok(Ticks::Hidden);
        }
        text.split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| number(directive, text, s))
            .collect::<Result<Vec<_>>>()
            .map(Ticks::At)
    }
}

/// Extra straight segment from `+line '0,0,1,1;color=red;lw=2'`
#[derive(Clone, Debug, PartialEq)]
pub struct LineSpec {
    /// Start point
    pub from: (f64, f64),
    /// End point
    pub to: (f64, f64),
    /// Style keywords after the coordinates
    pub args: KwArgs,
}

impl LineSpec {
    /// Parses one `+line` value
    pub fn parse(text: &str) -> Result<Self> {
        let (coords, rest) = text.split_once(';').unwrap_or((text, ""));
        let v = coords
            .split(',')
            .map(|s| number("line", text, s))
            .collect::<Result<Vec<_>>>()?;
        if v.len() != 4 {
            return Err(PlotError::directive("line", text, "expected x0,y0,x1,y1"));
        }
        Ok(LineSpec {
            from: (v[0], v[1]),
            to: (v[2], v[3]),
            args: KwArgs::parse_with("line", rest, ';')?,
        })
    }

    /// Parses every `+line`, dropping consecutive duplicates
    pub fn parse_all(items: &[String]) -> Result<Vec<Self>> {
        let mut prev: Option<&str> = None;
        let mut out = Vec::new();
        for item in items {
            if prev == Some(item.as_str()) {
                continue;
            }
            prev = Some(item);
            out.push(Self::parse(item)?);
        }
        Ok(out)
    }
}

/// Text placed at axes-fraction coordinates: `+ann 0.5,0.9:peak`
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    /// Horizontal position, 0 = left edge of the axes
    pub fx: f64,
    /// Vertical position, 0 = bottom edge of the axes
    pub fy: f64,
    /// Text to draw
    pub text: String,
}

impl Annotation {
    /// Parses `fx,fy:text`; the text may itself contain colons
    pub fn parse(text: &str) -> Result<Self> {
        let (coords, body) = text
            .split_once(':')
            .ok_or_else(|| PlotError::directive("ann", text, "expected x,y:text"))?;
        let (fx, fy) = parse_pair("ann", coords)?;
        Ok(Annotation { fx, fy, text: body.to_string() })
    }
}

/// `+gr '#eeeeee,1,--'`
#[derive(Clone, Debug, PartialEq)]
pub struct GridSpec {
    /// Grid line color text
    pub color: String,
    /// Grid line width in points
    pub width: f64,
    /// Line pattern text
    pub style: String,
}

impl GridSpec {
    /// Parses `color,width,style`; width and style are optional
    pub fn parse(text: &str) -> Result<Self> {
        let mut it = text.split(',');
        let color = it.next().unwrap_or_default().trim().to_string();
        if color.is_empty() {
            return Err(PlotError::directive("gr", text, "missing color"));
        }
        let width = match it.next() {
            Some(w) if !w.trim().is_empty() => number("gr", text, w)?,
            _ => 1.0,
        };
        let style = it.next().map(|s| s.trim().to_string()).unwrap_or_else(|| "-".into());
        Ok(GridSpec { color, width, style })
    }
}

/// Window shape for smoothing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Window {
    /// Moving average
    Flat,
    /// Hann window
    Hanning,
    /// Hamming window
    Hamming,
    /// Triangular window
    Bartlett,
    /// Blackman window
    Blackman,
}

impl std::str::FromStr for Window {
    type Err = PlotError;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "flat" => Ok(Window::Flat),
            "hanning" | "hann" => Ok(Window::Hanning),
            "hamming" => Ok(Window::Hamming),
            "bartlett" => Ok(Window::Bartlett),
            "blackman" => Ok(Window::Blackman),
            other => Err(PlotError::UnknownWindow(other.to_string())),
        }
    }
}

/// `+smooth 11` or `+smooth 11,flat`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmoothSpec {
    /// Window length in points
    pub len: usize,
    /// Window shape
    pub window: Window,
}

impl SmoothSpec {
    /// Parses the `+smooth` value; the window defaults to `hanning`
    pub fn parse(text: &str) -> Result<Self> {
        let (n, w) = text.split_once(',').unwrap_or((text, "hanning"));
        let len = n.trim().parse::<usize>().map_err(|_| {
            PlotError::directive("smooth", text, "window length must be a positive integer")
        })?;
        Ok(SmoothSpec { len, window: w.parse()? })
    }
}

/// `+norm` modes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Norm {
    /// Scale so the maximum equals the value
    Max(f64),
    /// Scale so the values add up to the value
    Sum(f64),
    /// Divide by the value
    By(f64),
    /// Scale to a density with the given total mass, using x spacing
    Density(f64),
}

impl Norm {
    /// Parses `max=1`, `sum=1`, `by=1093` or `dnsity=1`
    pub fn parse(text: &str) -> Result<Self> {
        let (mode, v) = text
            .split_once('=')
            .ok_or_else(|| PlotError::directive("norm", text, "expected mode=value"))?;
        let v = number("norm", text, v)?;
        match mode.trim() {
            "max" => Ok(Norm::Max(v)),
            "sum" => Ok(Norm::Sum(v)),
            "by" => Ok(Norm::By(v)),
            "dnsity" | "density" => Ok(Norm::Density(v)),
            _ => Err(PlotError::directive("norm", text, "mode is one of max, sum, by, dnsity")),
        }
    }
}

/// Axis scaling requested by `+xs` / `+ys`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scale {
    /// Linear axis
    #[default]
    Linear,
    /// Base-10 logarithmic axis
    Log,
}

impl Scale {
    /// Parses `log`, `linear` or `symlog`; the latter is drawn linear
    pub fn parse(directive: &'static str, text: &str) -> Result<Self> {
        match text.trim() {
            "log" => Ok(Scale::Log),
            "linear" => Ok(Scale::Linear),
            "symlog" => {
                log::warn!("+{directive} symlog is not supported, drawing a linear axis");
                Ok(Scale::Linear)
            }
            _ => Err(PlotError::directive(directive, text, "expected log, symlog or linear")),
        }
    }
}
