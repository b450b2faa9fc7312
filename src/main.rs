use xyplot::chart::render;
use xyplot::cli::Cli;
use xyplot::data::{read_data, ReadOptions};
use xyplot::directives::{parse_pair, Norm, SmoothSpec};
use xyplot::report::{dump_tsv, write_stats};
use xyplot::transform::apply_all;
use xyplot::{DataSet, Figure, PlotType};

use anyhow::{anyhow, Context, Result};
use env_logger::Env;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn validate_inputs(cli: &Cli) -> Result<()> {
    if cli.files.iter().filter(|p| is_stdin(p)).count() > 1 {
        return Err(anyhow!("stdin (`-`) can only be read once"));
    }
    Ok(())
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn main() -> Result<()> {
    let cli = Cli::from_env();
    init_logging(cli.verbose);
    validate_inputs(&cli)?;
    let fig = Figure::from_cli(&cli)?;

    let mut sets = read_inputs(&cli, &fig)?;
    run_transforms(&cli, &fig, &mut sets)?;

    if cli.stats {
        let stdout = io::stdout();
        write_stats(&mut stdout.lock(), &sets, fig.plot_type)?;
    }
    if let Some(path) = &cli.dump {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        dump_tsv(BufWriter::new(file), &sets)?;
        info!("dumped {} sets to {}", sets.len(), path.display());
    }
    if cli.draw {
        render(&fig, &sets, &cli.output)?;
    }
    Ok(())
}

fn read_inputs(cli: &Cli, fig: &Figure) -> Result<Vec<DataSet>> {
    let jitter = match &cli.jr {
        Some(s) => parse_pair("jr", s)?,
        None => (0.0, 0.0),
    };
    let opts = ReadOptions {
        plot_type: fig.plot_type,
        delimiter: cli.delim,
        xlim: fig.xlim,
        jitter,
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let files: Vec<PathBuf> = if cli.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        cli.files.clone()
    };
    let mut sets = Vec::with_capacity(files.len());
    for path in &files {
        let set = if is_stdin(path) {
            read_data(io::stdin().lock(), "-", &opts, &mut rng)?
        } else {
            let name = path.display().to_string();
            let file = File::open(path).with_context(|| format!("opening {name}"))?;
            read_data(file, &name, &opts, &mut rng)?
        };
        info!("{}: {} rows kept", set.source, set.len());
        sets.push(set);
    }
    Ok(sets)
}

fn run_transforms(cli: &Cli, fig: &Figure, sets: &mut [DataSet]) -> Result<()> {
    let norm = cli.norm.as_deref().map(Norm::parse).transpose()?;
    let smoothing = cli.smooth.as_deref().map(SmoothSpec::parse).transpose()?;
    let density = (fig.plot_type == PlotType::Density).then_some(fig.xlim);
    apply_all(sets, density, norm, smoothing)?;
    debug!("transforms done: norm={norm:?} smooth={smoothing:?}");
    Ok(())
}
