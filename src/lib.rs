#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
//! Library entry for xyplot.
//!
//! Turns delimited numeric text into chart images. Rows are read according
//! to a type tag (`xy`, `xyci`, `xmMy`, ...), optionally filtered, jittered,
//! normalized and smoothed, then drawn with `plotters` under a figure
//! described by `+name value` directives.
//!
//! # Modules
//! - [`data`]: Row parsing per type tag
//! - [`transform`]: Jitter, smoothing, normalization, kernel density
//! - [`figure`]: Resolved figure description and axis frame
//! - [`chart`]: Rendering to PNG/SVG
//! - [`report`]: JSON summaries and TSV dumps

/// Command-line arguments and `+name` directive rewriting
pub mod cli;

/// Color names, cycles and the continuous color scale
pub mod color;

/// Row parsing: delimited text to typed columns
pub mod data;

/// Mini-languages of the individual directives
pub mod directives;

/// Error type for the library layers
pub mod error;

/// Figure description resolved from the command line
pub mod figure;

/// Keyword arguments, line formats and artist styles
pub mod style;

/// Numeric transforms applied after reading
pub mod transform;

/// Drawing with plotters
pub mod chart;

/// Machine-readable summaries and dumps
pub mod report;

pub use data::{DataSet, PlotType};
pub use error::{PlotError, Result};
pub use figure::Figure;
