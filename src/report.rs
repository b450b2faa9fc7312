//! Machine-readable output: per-set JSON summaries and TSV dumps

use crate::data::{DataSet, PlotType};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// Summary of one data set after all transforms
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    /// Input name
    pub source: String,
    /// Row layout
    pub plot_type: PlotType,
    /// Number of points
    pub points: usize,
    /// Smallest and largest x
    pub x_range: Option<(f64, f64)>,
    /// Smallest and largest y (curves included for `xmMy`)
    pub y_range: Option<(f64, f64)>,
    /// Mean of y
    pub y_mean: Option<f64>,
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

impl SeriesSummary {
    /// Summarizes `set`
    pub fn of(set: &DataSet, plot_type: PlotType) -> Self {
        let ys = || {
            set.y.iter().chain(set.curves.iter().flatten()).copied().filter(|v| v.is_finite())
        };
        let count = ys().count();
        SeriesSummary {
            source: set.source.clone(),
            plot_type,
            points: set.len(),
            x_range: range(set.x.iter().copied()),
            y_range: range(ys()),
            y_mean: (count > 0).then(|| ys().sum::<f64>() / count as f64),
        }
    }
}

/// Writes one JSON summary per line
pub fn write_stats<W: Write>(out: &mut W, sets: &[DataSet], plot_type: PlotType) -> Result<()> {
    for set in sets {
        let line = serde_json::to_string(&SeriesSummary::of(set, plot_type))?;
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[derive(Serialize)]
struct DumpRow<'a> {
    set: usize,
    x: f64,
    y: Option<f64>,
    extra: &'a str,
}

/// Writes every point as a tab-separated `set x y extra` row.
///
/// `extra` carries whatever the type adds besides y: the twin value, the
/// size or color column, the band edges, the error distances or the extra
/// curves, joined with commas.
pub fn dump_tsv<W: Write>(out: W, sets: &[DataSet]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b'\t').from_writer(out);
    for (i, set) in sets.iter().enumerate() {
        for j in 0..set.len() {
            let mut extra: Vec<String> = Vec::new();
            if let Some(v) = set.y2.get(j) {
                extra.push(v.to_string());
            }
            if let Some(v) = set.size.get(j) {
                extra.push(v.to_string());
            }
            if let Some(c) = set.color.get(j) {
                extra.push(c.clone());
            }
            if let Some((below, above)) = set.err.get(j) {
                extra.push(below.to_string());
                extra.push(above.to_string());
            }
            if let Some((lo, hi)) = set.band.get(j) {
                extra.push(lo.to_string());
                extra.push(hi.to_string());
            }
            extra.extend(set.curves.iter().filter_map(|c| c.get(j)).map(f64::to_string));
            let extra = extra.join(",");
            wtr.serialize(DumpRow {
                set: i,
                x: set.x[j],
                y: set.y.get(j).copied(),
                extra: &extra,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}
