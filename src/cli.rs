//! Command-line surface: clap arguments plus `+name` directive rewriting

use crate::data::{Delimiter, PlotType};
use clap::{ArgAction, CommandFactory, Parser};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;

/// Arguments as parsed by clap. Every directive is also reachable as `+name`.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "xyplot",
    version,
    about = "Plot delimited numeric text into a PNG or SVG image",
    after_help = concat!(
        "Directives may be written `+name value` as well as `--name value`, e.g.\n",
        "  cat x-y.txt | xyplot -o img.png +type xy +xr 1,10 +lb data",
    )
)]
pub struct Cli {
    /// Input files, one series each; stdin when absent or `-`
    pub files: Vec<PathBuf>,

    /// Image to write (.png, .bmp, .jpg or .svg)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Row layout: xy, y, density, xyci, xys, xyc, xysc, xyy, xymM, xmMy
    #[arg(long = "type", default_value = "xy")]
    pub plot_type: PlotType,

    /// Column separator: tab, ws or a single character
    #[arg(long, default_value = "tab")]
    pub delim: Delimiter,

    /// Theme: mine, ggplot, default, classic
    #[arg(long, default_value = "mine")]
    pub sty: String,

    /// Color cycle: default, sanger or a comma list
    #[arg(long, allow_hyphen_values = true)]
    pub cl: Option<String>,

    /// Jitter widths `jx,jy`
    #[arg(long, allow_hyphen_values = true)]
    pub jr: Option<String>,

    /// Seed for the jitter generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// x limits `a,b`; either end may be empty
    #[arg(long, allow_hyphen_values = true)]
    pub xr: Option<String>,

    /// y limits `a,b`; `1.1%` scales the data extreme
    #[arg(long, allow_hyphen_values = true)]
    pub yr: Option<String>,

    /// Normalization: max=v, sum=v, by=v, dnsity=v
    #[arg(long)]
    pub norm: Option<String>,

    /// Smoothing window `N[,flat|hanning|hamming|bartlett|blackman]`
    #[arg(long)]
    pub smooth: Option<String>,

    /// Fill below each line down to this baseline
    #[arg(long, allow_hyphen_values = true)]
    pub fill: Option<f64>,

    /// x axis scale: log, symlog, linear
    #[arg(long)]
    pub xs: Option<String>,

    /// y axis scale: log, symlog, linear
    #[arg(long)]
    pub ys: Option<String>,

    /// Figure size `w,h` in inches
    #[arg(long)]
    pub wh: Option<String>,

    /// Pixels per inch
    #[arg(long, default_value_t = 150.0)]
    pub dpi: f64,

    /// Data aspect ratio
    #[arg(long)]
    pub asp: Option<f64>,

    /// Plot keyword args, repeat for per-file settings
    #[arg(long, allow_hyphen_values = true)]
    pub pa: Vec<String>,

    /// Band keyword args for xymM / xmMy
    #[arg(long = "mMa", allow_hyphen_values = true)]
    pub band_args: Option<String>,

    /// Extra segment `x0,y0,x1,y1;key=value;...`
    #[arg(long, allow_hyphen_values = true)]
    pub line: Vec<String>,

    /// Series label, `-` for none
    #[arg(long, allow_hyphen_values = true)]
    pub lb: Vec<String>,

    /// Series line format such as `--`, `o-`, `:`
    #[arg(long, allow_hyphen_values = true)]
    pub lt: Vec<String>,

    /// Series color
    #[arg(long, allow_hyphen_values = true)]
    pub lc: Vec<String>,

    /// Scientific x tick labels outside 10^lo..10^hi
    #[arg(long, allow_hyphen_values = true)]
    pub xsci: Option<String>,

    /// Scientific y tick labels outside 10^lo..10^hi
    #[arg(long, allow_hyphen_values = true)]
    pub ysci: Option<String>,

    /// Scientific tick labels on the twin axis
    #[arg(long, allow_hyphen_values = true)]
    pub ysci2: Option<String>,

    /// Text at axes fraction `x,y:text`
    #[arg(long, allow_hyphen_values = true)]
    pub ann: Vec<String>,

    /// x ticks `v1,v2,...` or `-`
    #[arg(long, allow_hyphen_values = true)]
    pub xt: Option<String>,

    /// y ticks `v1,v2,...` or `-`
    #[arg(long, allow_hyphen_values = true)]
    pub yt: Option<String>,

    /// Integer-only x ticks when non-zero
    #[arg(long, default_value_t = 0)]
    pub xti: u8,

    /// x tick labels `l1;l2;...`
    #[arg(long, allow_hyphen_values = true)]
    pub xtl: Option<String>,

    /// x tick label keyword args (rotation, fontsize)
    #[arg(long, allow_hyphen_values = true)]
    pub xarg: Option<String>,

    /// Grid `color,width,style`
    #[arg(long, allow_hyphen_values = true)]
    pub gr: Option<String>,

    /// x axis label
    #[arg(long, allow_hyphen_values = true)]
    pub xl: Option<String>,

    /// y axis label
    #[arg(long, allow_hyphen_values = true)]
    pub yl: Option<String>,

    /// Twin y axis label
    #[arg(long, allow_hyphen_values = true)]
    pub yl2: Option<String>,

    /// Title
    #[arg(long, allow_hyphen_values = true)]
    pub title: Option<String>,

    /// Title keyword args (fontsize, color)
    #[arg(long, allow_hyphen_values = true)]
    pub ta: Option<String>,

    /// Legend font keyword args (size)
    #[arg(long, allow_hyphen_values = true)]
    pub lgp: Option<String>,

    /// Legend keyword args (loc, frameon, ncol)
    #[arg(long, allow_hyphen_values = true)]
    pub lga: Option<String>,

    /// Legend anchor in axes fraction `x,y`
    #[arg(long, allow_hyphen_values = true)]
    pub lgb: Option<String>,

    /// Shaded vertical band `x0,x1`
    #[arg(long, allow_hyphen_values = true)]
    pub rect: Option<String>,

    /// Subplot margins as figure fractions: left, right, top, bottom
    #[arg(long, allow_hyphen_values = true)]
    pub adj: Option<String>,

    /// Write the transformed series as TSV
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// Print a JSON summary of every data set
    #[arg(long, action = ArgAction::SetTrue)]
    pub stats: bool,

    /// Parse and transform only
    #[arg(long = "no-draw", action = ArgAction::SetFalse, default_value_t = true)]
    pub draw: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Rewrites `+name` into `--name` for every long option `Cli` knows.
///
/// Tokens that merely start with `+` (values like `+3` or unknown names) are
/// passed through untouched.
pub fn expand_directives<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let cmd = Cli::command();
    let known: HashSet<&str> = cmd.get_arguments().filter_map(|a| a.get_long()).collect();
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let name = arg
                .to_str()
                .and_then(|s| s.strip_prefix('+'))
                .filter(|n| known.contains(n))
                .map(str::to_owned);
            match name {
                Some(n) => OsString::from(format!("--{n}")),
                None => arg,
            }
        })
        .collect()
}

impl Cli {
    /// Parses the process arguments, accepting `+name` directives
    pub fn from_env() -> Self {
        Cli::parse_from(expand_directives(std::env::args_os()))
    }

    /// Fallible variant used by tests
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Cli::try_parse_from(expand_directives(args))
    }
}
