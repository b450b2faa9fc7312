//! Error type shared by the parsing, transform and figure layers

use thiserror::Error;

/// Everything that can go wrong between reading rows and drawing them.
///
/// Rendering failures surface from `plotters` directly and are wrapped by
/// `anyhow` in [`crate::chart`]; this enum covers the parts we own.
#[derive(Debug, Error)]
pub enum PlotError {
    /// Reading an input or writing a side file failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Delimited reader or writer failure
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Summary serialization failure
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Unknown `+type` tag
    #[error("unknown plot type `{0}` (expected one of xy, y, density, xyci, xys, xyc, xysc, xyy, xymM, xmMy)")]
    UnknownType(String),

    /// A row had fewer columns than the type requires
    #[error("{source_name}:{line}: expected at least {expected} columns, found {found}")]
    MissingColumn {
        /// File name or `-` for stdin
        source_name: String,
        /// 1-based line number
        line: usize,
        /// Columns required by the type tag
        expected: usize,
        /// Columns present in the row
        found: usize,
    },

    /// A field could not be read as a number
    #[error("{source_name}:{line}: column {column} is not a number: `{value}`")]
    BadNumber {
        /// File name or `-` for stdin
        source_name: String,
        /// 1-based line number
        line: usize,
        /// 1-based column index
        column: usize,
        /// Raw field text
        value: String,
    },

    /// `xmMy` rows must agree on their width
    #[error("{source_name}:{line}: row has {found} columns but the first row had {expected}")]
    RaggedRow {
        /// File name or `-` for stdin
        source_name: String,
        /// 1-based line number
        line: usize,
        /// Width of the first row
        expected: usize,
        /// Width of this row
        found: usize,
    },

    /// A directive value did not match its mini-language
    #[error("bad value for +{directive}: `{value}` ({reason})")]
    BadDirective {
        /// Directive name without the `+`
        directive: &'static str,
        /// Raw value
        value: String,
        /// What was expected
        reason: String,
    },

    /// Color text that is neither a name, a hex code nor a grey level
    #[error("unrecognised color `{0}`")]
    BadColor(String),

    /// Smoothing window longer than the series
    #[error("smoothing window {window} is longer than the series ({len} points)")]
    WindowTooLong {
        /// Requested window length
        window: usize,
        /// Series length
        len: usize,
    },

    /// Unknown smoothing window name
    #[error("unknown smoothing window `{0}` (expected flat, hanning, hamming, bartlett or blackman)")]
    UnknownWindow(String),

    /// Kernel density needs spread in the data
    #[error("density estimate needs at least two distinct values (got {0} points)")]
    DegenerateDensity(usize),

    /// Normalization divisor came out as zero
    #[error("cannot normalize by `{0}`: divisor is zero")]
    ZeroDivisor(String),

    /// Output extension not handled by any backend
    #[error("unsupported output format `{0}` (use .png, .bmp, .jpg or .svg)")]
    UnsupportedFormat(String),
}

/// Shorthand used across the library
pub type Result<T> = std::result::Result<T, PlotError>;

impl PlotError {
    /// Builds a [`PlotError::BadDirective`]
    pub fn directive(directive: &'static str, value: &str, reason: impl Into<String>) -> Self {
        PlotError::BadDirective {
            directive,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
