//! Color parsing, color cycles and the continuous color scale

use crate::error::{PlotError, Result};
use colorgrad::Gradient;
use plotters::style::RGBColor;

/// Cycle used when `+cl` is absent or `default`
pub const DEFAULT_CYCLE: &str = "#337ab7,#f0ad4e,#5cb85c,#5bc0de,#d9534f,grey,black";
/// Cycle selected by `+cl sanger`
pub const SANGER_CYCLE: &str = "#01579B,#FD8230,#1B5E20,#039BE5,#9C2222,grey,black";

/// Anchor colors of the viridis map, sampled at equal steps
const VIRIDIS: [&str; 9] = [
    "#440154", "#472d7b", "#3b528b", "#2c728e", "#21918c", "#28ae80", "#5ec962", "#addc30",
    "#fde725",
];

/// Parses a single color.
///
/// Accepts the one-letter shorthands (`r`, `k`, ...), grey levels written as
/// a number in `[0, 1]`, and anything `colorgrad` understands as HTML/CSS
/// (`#f0ad4e`, `#ccc`, `grey`, `orange`, ...).
pub fn parse_color(text: &str) -> Result<RGBColor> {
    let s = text.trim().trim_matches(|c| c == '"' || c == '\'');
    let short = match s {
        "b" => Some(RGBColor(0, 0, 255)),
        "g" => Some(RGBColor(0, 128, 0)),
        "r" => Some(RGBColor(255, 0, 0)),
        "c" => Some(RGBColor(0, 191, 191)),
        "m" => Some(RGBColor(191, 0, 191)),
        "y" => Some(RGBColor(191, 191, 0)),
        "k" => Some(RGBColor(0, 0, 0)),
        "w" => Some(RGBColor(255, 255, 255)),
        _ => None,
    };
    if let Some(c) = short {
        return Ok(c);
    }
    if let Ok(level) = s.parse::<f64>() {
        if (0.0..=1.0).contains(&level) {
            let v = (level * 255.0).round() as u8;
            return Ok(RGBColor(v, v, v));
        }
        return Err(PlotError::BadColor(text.to_string()));
    }
    let c = colorgrad::Color::from_html(s).map_err(|_| PlotError::BadColor(text.to_string()))?;
    let [r, g, b, _] = c.to_rgba8();
    Ok(RGBColor(r, g, b))
}

/// The color cycle series are drawn with
#[derive(Clone, Debug)]
pub struct Palette {
    colors: Vec<RGBColor>,
}

impl Palette {
    /// Resolves `+cl`: `None`/`default`, `sanger`, or an explicit comma list
    pub fn parse(spec: Option<&str>) -> Result<Self> {
        let list = match spec {
            None | Some("default") => DEFAULT_CYCLE,
            Some("sanger") => SANGER_CYCLE,
            Some(other) => other,
        };
        let colors = list
            .split(',')
            .filter(|c| !c.trim().is_empty())
            .map(parse_color)
            .collect::<Result<Vec<_>>>()?;
        if colors.is_empty() {
            return Err(PlotError::directive("cl", list, "empty color list"));
        }
        Ok(Palette { colors })
    }

    /// Color for the i-th series, wrapping around
    pub fn pick(&self, i: usize) -> RGBColor {
        self.colors[i % self.colors.len()]
    }
}

/// Maps a numeric range onto the viridis gradient
pub struct ColorScale {
    grad: colorgrad::LinearGradient,
    /// Lower end of the mapped range
    pub lo: f64,
    /// Upper end of the mapped range
    pub hi: f64,
}

impl ColorScale {
    /// Builds a scale covering `lo..=hi`; a flat range is widened by one unit
    pub fn new(lo: f64, hi: f64) -> Result<Self> {
        let (lo, hi) = if hi > lo {
            (lo, hi)
        } else {
            (lo - 0.5, lo + 0.5)
        };
        let grad = colorgrad::GradientBuilder::new()
            .html_colors(&VIRIDIS)
            .domain(&[lo as f32, hi as f32])
            .build::<colorgrad::LinearGradient>()
            .map_err(|e| PlotError::BadColor(format!("viridis over {lo}..{hi}: {e}")))?;
        Ok(ColorScale { grad, lo, hi })
    }

    /// Scale spanning the finite values of `values`
    pub fn spanning(values: &[f64]) -> Result<Self> {
        let (lo, hi) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if lo.is_finite() {
            Self::new(lo, hi)
        } else {
            Self::new(0.0, 1.0)
        }
    }

    /// Color for `v`, clamped to the ends of the scale
    pub fn at(&self, v: f64) -> RGBColor {
        let [r, g, b, _] = self.grad.at(v.clamp(self.lo, self.hi) as f32).to_rgba8();
        RGBColor(r, g, b)
    }
}
