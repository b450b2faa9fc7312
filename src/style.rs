//! Keyword-argument lists, line formats and per-artist styles

use crate::color::parse_color;
use crate::error::{PlotError, Result};
use log::debug;
use plotters::style::RGBColor;

/// A single `key=value` value after type sniffing
#[derive(Clone, Debug, PartialEq)]
pub enum KwValue {
    /// Anything that parses as `f64`
    Num(f64),
    /// `True` / `False`
    Bool(bool),
    /// Everything else, with surrounding quotes removed
    Str(String),
}

impl KwValue {
    /// Sniffs a raw value: number, then boolean, then string
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(v) = raw.parse::<f64>() {
            return KwValue::Num(v);
        }
        match raw {
            "True" | "true" => KwValue::Bool(true),
            "False" | "false" => KwValue::Bool(false),
            _ => KwValue::Str(unquote(raw).to_string()),
        }
    }

    /// Numeric view of the value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            KwValue::Num(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean view of the value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            KwValue::Bool(b) => Some(*b),
            KwValue::Num(v) => Some(*v != 0.0),
            KwValue::Str(_) => None,
        }
    }

    /// Text view; numbers are formatted back
    pub fn as_text(&self) -> String {
        match self {
            KwValue::Num(v) => v.to_string(),
            KwValue::Bool(b) => b.to_string(),
            KwValue::Str(s) => s.clone(),
        }
    }
}

fn unquote(s: &str) -> &str {
    let b = s.as_bytes();
    if b.len() >= 2 && (b[0] == b'"' || b[0] == b'\'') && b[b.len() - 1] == b[0] {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Ordered `key=value` list as written after `+pa`, `+lga`, `+mMa`, ...
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KwArgs {
    entries: Vec<(String, KwValue)>,
}

impl KwArgs {
    /// Parses a comma-separated list; commas inside quotes are kept
    pub fn parse(directive: &'static str, text: &str) -> Result<Self> {
        Self::parse_with(directive, text, ',')
    }

    /// Same as [`KwArgs::parse`] with a custom separator (`+line` uses `;`)
    pub fn parse_with(directive: &'static str, text: &str, sep: char) -> Result<Self> {
        let mut entries = Vec::new();
        for item in split_outside_quotes(text, sep) {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let (k, v) = item.split_once('=').ok_or_else(|| {
                PlotError::directive(directive, text, format!("`{item}` is not key=value"))
            })?;
            entries.push((k.trim().to_string(), KwValue::parse(v)));
        }
        Ok(KwArgs { entries })
    }

    /// Last value given for `key`
    pub fn get(&self, key: &str) -> Option<&KwValue> {
        self.entries.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// First key present among `keys`, e.g. `["fontsize", "size"]`
    pub fn get_any(&self, keys: &[&str]) -> Option<&KwValue> {
        keys.iter().find_map(|k| self.get(k))
    }

    /// Numeric value for the first matching key
    pub fn num(&self, keys: &[&str]) -> Option<f64> {
        self.get_any(keys).and_then(KwValue::as_f64)
    }

    /// Iterates entries in the order written
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KwValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn split_outside_quotes(text: &str, sep: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == sep => {
                out.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            None => {}
        }
    }
    out.push(&text[start..]);
    out
}

/// Stroke pattern of a line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    /// `-`
    Solid,
    /// `--`
    Dashed,
    /// `:`
    Dotted,
    /// `-.`
    DashDot,
    /// no line, markers only
    None,
}

impl LineStyle {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "-" | "solid" => Some(LineStyle::Solid),
            "--" | "dashed" => Some(LineStyle::Dashed),
            ":" | "dotted" => Some(LineStyle::Dotted),
            "-." | "dashdot" => Some(LineStyle::DashDot),
            "" | " " | "None" | "none" => Some(LineStyle::None),
            _ => None,
        }
    }
}

/// Point marker shapes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    /// `o`
    Circle,
    /// `.`
    Point,
    /// `s`
    Square,
    /// `^`
    Triangle,
    /// `D` / `d`
    Diamond,
    /// `x` / `+`
    Cross,
}

impl Marker {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'o' => Some(Marker::Circle),
            '.' => Some(Marker::Point),
            's' => Some(Marker::Square),
            '^' | 'v' | '<' | '>' => Some(Marker::Triangle),
            'D' | 'd' => Some(Marker::Diamond),
            'x' | '+' | 'X' | 'P' => Some(Marker::Cross),
            _ => None,
        }
    }

    /// Parses a `marker=` value
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }
}

/// A matplotlib-style format string such as `o-`, `--`, `s:` or `o`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineFormat {
    /// Stroke pattern
    pub line: LineStyle,
    /// Optional marker at every point
    pub marker: Option<Marker>,
}

impl LineFormat {
    /// Plain solid line
    pub const SOLID: LineFormat = LineFormat { line: LineStyle::Solid, marker: None };
    /// Markers only, the default for error bars
    pub const POINTS: LineFormat =
        LineFormat { line: LineStyle::None, marker: Some(Marker::Circle) };

    /// Parses a format string; a lone marker means "no line"
    pub fn parse(text: &str) -> Result<Self> {
        let mut marker = None;
        let mut rest = String::new();
        for c in text.chars() {
            // `-` and `.` belong to line styles when adjacent to another dash
            match Marker::from_char(c) {
                Some(m) if !(c == '.' && rest.ends_with('-')) => {
                    if marker.is_some() {
                        return Err(PlotError::directive("lt", text, "more than one marker"));
                    }
                    marker = Some(m);
                }
                _ => rest.push(c),
            }
        }
        let line = if rest.is_empty() {
            match marker {
                Some(_) => LineStyle::None,
                None => LineStyle::Solid,
            }
        } else {
            LineStyle::parse(&rest)
                .ok_or_else(|| PlotError::directive("lt", text, "expected one of -, --, :, -."))?
        };
        Ok(LineFormat { line, marker })
    }
}

/// Resolved look of one plotted artist
#[derive(Clone, Debug, PartialEq)]
pub struct ArtistStyle {
    /// Stroke color
    pub color: RGBColor,
    /// Line width in points
    pub line_width: f64,
    /// Line pattern and marker
    pub format: LineFormat,
    /// Marker size in points
    pub marker_size: f64,
    /// Opacity in `[0, 1]`
    pub alpha: f64,
    /// Fill color when different from `color`
    pub face: Option<RGBColor>,
    /// Outline color for filled shapes
    pub edge: Option<RGBColor>,
    /// Legend label
    pub label: Option<String>,
}

impl ArtistStyle {
    /// Default line style in a given color
    pub fn new(color: RGBColor, format: LineFormat) -> Self {
        ArtistStyle {
            color,
            line_width: 1.5,
            format,
            marker_size: 6.0,
            alpha: 1.0,
            face: None,
            edge: None,
            label: None,
        }
    }

    /// Applies matplotlib-named keyword arguments on top of this style.
    ///
    /// Keys with no meaning for the drawing backend (`zorder`, `clip_on`, ...)
    /// are skipped.
    pub fn apply(&mut self, directive: &'static str, kw: &KwArgs) -> Result<()> {
        for (key, value) in kw.iter() {
            let text = value.as_text();
            match key {
                "color" | "c" => self.color = parse_color(&text)?,
                "lw" | "linewidth" => self.line_width = num(directive, key, value)?,
                "ms" | "markersize" => self.marker_size = num(directive, key, value)?,
                "alpha" => self.alpha = num(directive, key, value)?.clamp(0.0, 1.0),
                "fc" | "facecolor" | "mfc" | "markerfacecolor" => {
                    self.face = Some(parse_color(&text)?)
                }
                "ec" | "edgecolor" | "mec" | "markeredgecolor" => {
                    self.edge = Some(parse_color(&text)?)
                }
                "label" => self.label = Some(text),
                "ls" | "linestyle" => {
                    self.format.line = LineStyle::parse(&text).ok_or_else(|| {
                        PlotError::directive(directive, &text, "unknown line style")
                    })?
                }
                "marker" => {
                    self.format.marker = Marker::parse(&text);
                    if self.format.marker.is_none() && text != "None" && !text.is_empty() {
                        return Err(PlotError::directive(directive, &text, "unknown marker"));
                    }
                }
                "fmt" => self.format = LineFormat::parse(&text)?,
                _ => debug!("+{directive}: ignoring `{key}`"),
            }
        }
        Ok(())
    }

    /// Color used to fill areas and markers
    pub fn fill_color(&self) -> RGBColor {
        self.face.unwrap_or(self.color)
    }
}

fn num(directive: &'static str, key: &str, v: &KwValue) -> Result<f64> {
    v.as_f64().ok_or_else(|| {
        PlotError::directive(directive, &v.as_text(), format!("`{key}` must be a number"))
    })
}
