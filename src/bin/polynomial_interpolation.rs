//! Approximate `f(x) = x sin(x)` by polynomials of several degrees fitted with ridge regression
//! on the Vandermonde matrix of a few samples, and plot the fits against the ground truth.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ndarray::Array1;
use polyfit_ridge::{fit_degrees, plot::Figure, sampling::sorted_subset, Ridge};

/// Function to approximate by polynomial interpolation
fn ground_truth(x: f64) -> f64 {
    x * x.sin()
}

struct Config {
    samples: usize,
    points: usize,
    degrees: Vec<usize>,
    alpha: f64,
    seed: u64,
    output: PathBuf,
    verbosity: u8,
}

fn command() -> Command {
    Command::new("polynomial-interpolation")
        .about("Approximates x sin(x) with polynomials fitted by ridge regression on the Vandermonde matrix of a few samples.")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("samples")
                .long("samples")
                .help("Number of training points drawn from the grid")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("20"),
        )
        .arg(
            Arg::new("points")
                .long("points")
                .help("Number of evenly spaced grid points on [0, 10]")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("100"),
        )
        .arg(
            Arg::new("degrees")
                .long("degrees")
                .help("Comma separated polynomial degrees to fit")
                .value_name("DEGREES")
                .value_parser(value_parser!(usize))
                .value_delimiter(',')
                .num_args(1..)
                .default_values(["3", "4", "5"]),
        )
        .arg(
            Arg::new("alpha")
                .long("alpha")
                .help("Regularization strength of the ridge regression")
                .value_name("ALPHA")
                .value_parser(value_parser!(f64))
                .default_value("1.0"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for picking the training points")
                .value_name("SEED")
                .value_parser(value_parser!(u64))
                .default_value("0"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Path of the rendered SVG figure")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value("polynomial_interpolation.svg"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .help("Increase logging verbosity")
                .action(ArgAction::Count),
        )
}

fn configure(matches: &ArgMatches) -> Result<Config> {
    // every argument has a default, so these only fail on a programming error
    let get = |name: &str| {
        matches
            .get_one::<usize>(name)
            .copied()
            .with_context(|| format!("Missing argument {name}"))
    };
    Ok(Config {
        samples: get("samples")?,
        points: get("points")?,
        degrees: matches
            .get_many::<usize>("degrees")
            .context("Missing argument degrees")?
            .copied()
            .collect(),
        alpha: *matches
            .get_one::<f64>("alpha")
            .context("Missing argument alpha")?,
        seed: *matches
            .get_one::<u64>("seed")
            .context("Missing argument seed")?,
        output: matches
            .get_one::<PathBuf>("output")
            .context("Missing argument output")?
            .clone(),
        verbosity: matches.get_count("verbose"),
    })
}

fn run(config: &Config) -> Result<()> {
    anyhow::ensure!(config.points >= 2, "Need at least 2 grid points");
    anyhow::ensure!(config.samples > 0, "Need at least one training point");
    anyhow::ensure!(
        config.alpha >= 0.0 && config.alpha.is_finite(),
        "Alpha must be non-negative and finite"
    );

    // generate points used to plot
    let x_plot = Array1::linspace(0., 10., config.points);

    // generate points and keep a subset of them
    let x = sorted_subset(x_plot.view(), config.samples, config.seed);
    let y = x.mapv(ground_truth);
    log::info!("Training on {} of {} points", x.len(), x_plot.len());

    let mut figure = Figure::new("Polynomial interpolation");
    figure
        .plot(x_plot.view(), x_plot.mapv(ground_truth).view(), "ground truth")?
        .scatter(x.view(), y.view(), "training points")?;

    let fits = fit_degrees(x.view(), y.view(), &config.degrees, || {
        Ridge::new(config.alpha)
    })
    .context("Failed to fit polynomials")?;

    for fit in &fits {
        if let Some(poly) = fit.polynomial() {
            log::info!("degree {}: {:.4}", fit.degree(), poly);
        }
        let prediction = fit
            .predict(x_plot.view())
            .with_context(|| format!("Failed to evaluate the degree {} fit", fit.degree()))?;
        figure.plot(
            x_plot.view(),
            prediction.view(),
            &format!("degree {}", fit.degree()),
        )?;
    }

    figure
        .save_svg(&config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    log::info!("Wrote figure to {}", config.output.display());

    Ok(())
}

fn main() -> Result<()> {
    let config = configure(&command().get_matches())?;

    // Compute log filter level.
    let level = match config.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::builder()
        .format_timestamp(None)
        .filter_level(level)
        .init();

    run(&config)
}
