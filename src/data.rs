//! Row parsing: delimited text to typed columns, selected by the `+type` tag

use crate::directives::Limits;
use crate::error::{PlotError, Result};
use crate::transform::jitter;
use rand::Rng;
use serde::Serialize;
use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;

/// Row layout and series kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PlotType {
    /// `x y`: a line
    #[serde(rename = "xy")]
    Xy,
    /// `y`: a line against the row index
    #[serde(rename = "y")]
    Y,
    /// `x`: a kernel density curve of the values
    #[serde(rename = "density")]
    Density,
    /// `x y lo hi`: error bars
    #[serde(rename = "xyci")]
    Xyci,
    /// `x y s`: line plus scatter sized by `s`
    #[serde(rename = "xys")]
    Xys,
    /// `x y c`: scatter colored by `c`
    #[serde(rename = "xyc")]
    Xyc,
    /// `x y s`: line plus scatter colored by `s`, with a colorbar
    #[serde(rename = "xysc")]
    Xysc,
    /// `x y y2`: `y2` on a twin axis
    #[serde(rename = "xyy")]
    Xyy,
    /// `x y m M`: band between `m` and `M` under the line `y`
    #[serde(rename = "xymM")]
    XymM,
    /// `x m M y1 ...`: band plus any number of curves
    #[serde(rename = "xmMy")]
    XmMy,
}

impl PlotType {
    /// Tag as written on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            PlotType::Xy => "xy",
            PlotType::Y => "y",
            PlotType::Density => "density",
            PlotType::Xyci => "xyci",
            PlotType::Xys => "xys",
            PlotType::Xyc => "xyc",
            PlotType::Xysc => "xysc",
            PlotType::Xyy => "xyy",
            PlotType::XymM => "xymM",
            PlotType::XmMy => "xmMy",
        }
    }

    /// Columns every row must carry
    pub fn min_columns(self) -> usize {
        match self {
            PlotType::Y | PlotType::Density => 1,
            PlotType::Xy => 2,
            PlotType::Xys | PlotType::Xyc | PlotType::Xysc | PlotType::Xyy => 3,
            PlotType::Xyci | PlotType::XymM | PlotType::XmMy => 4,
        }
    }

    /// Types whose rows are not subject to the `+xr` row filter
    pub fn keeps_all_rows(self) -> bool {
        matches!(self, PlotType::XymM | PlotType::XmMy)
    }
}

impl FromStr for PlotType {
    type Err = PlotError;
    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "xy" => PlotType::Xy,
            "y" => PlotType::Y,
            "density" => PlotType::Density,
            "xyci" => PlotType::Xyci,
            "xys" => PlotType::Xys,
            "xyc" => PlotType::Xyc,
            "xysc" => PlotType::Xysc,
            "xyy" => PlotType::Xyy,
            "xymM" => PlotType::XymM,
            "xmMy" => PlotType::XmMy,
            other => return Err(PlotError::UnknownType(other.to_string())),
        })
    }
}

/// Column separator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    /// A single tab, quoting off
    Tab,
    /// Any run of spaces or tabs
    Whitespace,
    /// Any other single byte
    Byte(u8),
}

impl FromStr for Delimiter {
    type Err = PlotError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tab" | "\\t" | "\t" => Ok(Delimiter::Tab),
            "ws" | "space" | "whitespace" => Ok(Delimiter::Whitespace),
            _ if s.len() == 1 => Ok(Delimiter::Byte(s.as_bytes()[0])),
            _ => Err(PlotError::directive("delim", s, "expected tab, ws or a single character")),
        }
    }
}

/// What the reader needs to know besides the bytes
#[derive(Clone, Copy, Debug)]
pub struct ReadOptions {
    /// Row layout
    pub plot_type: PlotType,
    /// Column separator
    pub delimiter: Delimiter,
    /// `+xr` row filter
    pub xlim: Limits,
    /// `+jr` widths for x and y
    pub jitter: (f64, f64),
}

/// Columns of one input file after parsing.
///
/// Vectors not used by the type tag stay empty. All populated vectors are
/// index-aligned with `x`.
#[derive(Clone, Debug, Default)]
pub struct DataSet {
    /// File name, `-` for stdin
    pub source: String,
    /// x values
    pub x: Vec<f64>,
    /// y values; empty for `xmMy`
    pub y: Vec<f64>,
    /// Twin-axis values (`xyy`)
    pub y2: Vec<f64>,
    /// Distances below and above `y` (`xyci`)
    pub err: Vec<(f64, f64)>,
    /// Marker size or color value (`xys`, `xysc`)
    pub size: Vec<f64>,
    /// Raw color column (`xyc`)
    pub color: Vec<String>,
    /// Lower and upper band edges (`xymM`, `xmMy`)
    pub band: Vec<(f64, f64)>,
    /// Extra curves, one vector per column (`xmMy`)
    pub curves: Vec<Vec<f64>>,
}

impl DataSet {
    /// Number of kept rows
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when no row survived
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// `(x, y)` pairs of the main series
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.y.iter().copied()).collect()
    }
}

struct Row {
    line: usize,
    fields: Vec<String>,
}

fn read_rows<R: Read>(reader: R, delimiter: Delimiter) -> Result<Vec<Row>> {
    let byte = match delimiter {
        Delimiter::Tab => b'\t',
        Delimiter::Byte(b) => b,
        Delimiter::Whitespace => {
            let mut rows = Vec::new();
            for (i, line) in BufReader::new(reader).lines().enumerate() {
                let line = line?;
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                rows.push(Row {
                    line: i + 1,
                    fields: trimmed.split_whitespace().map(str::to_string).collect(),
                });
            }
            return Ok(rows);
        }
    };
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(byte)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .from_reader(reader);
    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let line = rec.position().map(|p| p.line() as usize).unwrap_or(0);
        rows.push(Row {
            line,
            fields: rec.iter().map(str::to_string).collect(),
        });
    }
    Ok(rows)
}

struct Fields<'a> {
    source: &'a str,
    row: &'a Row,
}

impl Fields<'_> {
    fn num(&self, col: usize) -> Result<f64> {
        let raw = self.row.fields.get(col).map(String::as_str).unwrap_or("");
        raw.trim().parse::<f64>().map_err(|_| PlotError::BadNumber {
            source_name: self.source.to_string(),
            line: self.row.line,
            column: col + 1,
            value: raw.to_string(),
        })
    }

    fn require(&self, n: usize) -> Result<()> {
        if self.row.fields.len() < n {
            return Err(PlotError::MissingColumn {
                source_name: self.source.to_string(),
                line: self.row.line,
                expected: n,
                found: self.row.fields.len(),
            });
        }
        Ok(())
    }
}

/// Parses one input into a [`DataSet`] according to `opts`.
///
/// Rows starting with `#` are skipped. For every type except `xymM` and
/// `xmMy`, rows outside `opts.xlim` are dropped before jitter is applied.
pub fn read_data<R: Read, G: Rng>(
    reader: R,
    source: &str,
    opts: &ReadOptions,
    rng: &mut G,
) -> Result<DataSet> {
    let rows = read_rows(reader, opts.delimiter)?;
    let mut ds = DataSet { source: source.to_string(), ..Default::default() };
    let mut width: Option<usize> = None;

    for row in &rows {
        let f = Fields { source, row };
        f.require(opts.plot_type.min_columns())?;

        match opts.plot_type {
            PlotType::XymM => {
                ds.x.push(f.num(0)?);
                ds.y.push(f.num(1)?);
                ds.band.push((f.num(2)?, f.num(3)?));
                continue;
            }
            PlotType::XmMy => {
                let n = row.fields.len();
                let expected = *width.get_or_insert(n);
                if n != expected {
                    return Err(PlotError::RaggedRow {
                        source_name: source.to_string(),
                        line: row.line,
                        expected,
                        found: n,
                    });
                }
                if ds.curves.is_empty() {
                    ds.curves = vec![Vec::new(); n - 3];
                }
                ds.x.push(f.num(0)?);
                ds.band.push((f.num(1)?, f.num(2)?));
                for (j, curve) in ds.curves.iter_mut().enumerate() {
                    curve.push(f.num(3 + j)?);
                }
                continue;
            }
            _ => {}
        }

        let (x, y) = match opts.plot_type {
            PlotType::Y => (ds.x.len() as f64, f.num(0)?),
            PlotType::Density => (f.num(0)?, 0.0),
            _ => (f.num(0)?, f.num(1)?),
        };
        let err = match opts.plot_type {
            PlotType::Xyci => Some((y - f.num(2)?, f.num(3)? - y)),
            _ => None,
        };
        let aux = match opts.plot_type {
            PlotType::Xys | PlotType::Xysc | PlotType::Xyy => Some(f.num(2)?),
            _ => None,
        };

        if !opts.xlim.contains(x) {
            continue;
        }
        ds.x.push(jitter(x, opts.jitter.0, rng));
        ds.y.push(jitter(y, opts.jitter.1, rng));
        if let Some(e) = err {
            ds.err.push(e);
        }
        match opts.plot_type {
            PlotType::Xys | PlotType::Xysc => ds.size.extend(aux),
            PlotType::Xyy => ds.y2.extend(aux),
            PlotType::Xyc => ds.color.push(row.fields[2].trim().to_string()),
            _ => {}
        }
    }
    Ok(ds)
}
