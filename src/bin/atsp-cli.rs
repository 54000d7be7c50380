#![deny(warnings)]

use atsp::io::MatrixReader;
use atsp::scenario::{DistanceModel, Scenario};
use atsp::solver::{SolveReport, TspSolver, DEFAULT_TIME_ALLOWANCE};
use itertools::Itertools;
use log::*;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use std::convert::TryFrom;
use std::fs::File;
use std::io::{stdin, BufReader};
use std::path::PathBuf;
use structopt::StructOpt;

#[cfg(feature = "jemallocator")]
#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(feature = "jemallocator")]
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "atsp-cli",
    about = "Solves the asymmetric travelling salesperson problem for a given cost matrix."
)]
struct Opt {
    /// Input file holding the cost matrix (city count, then one row per
    /// line; `inf` or `-` for a missing edge). `stdin` if not specified.
    #[structopt(short, long, parse(from_os_str))]
    input: Option<PathBuf>,

    /// Strategy. 'random', 'greedy', 'two-opt' or 'branch-and-bound'.
    #[structopt(short, long, default_value = "branch-and-bound")]
    strategy: String,

    /// Time budget in seconds.
    #[structopt(short, long, default_value = "60.0")]
    time_allowance: f64,

    /// Seed for the random components.
    #[structopt(long, default_value = "0")]
    seed: u64,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

#[derive(Debug, PartialEq)]
enum Strategy {
    Random,
    Greedy,
    TwoOpt,
    BranchAndBound,
}

impl TryFrom<&str> for Strategy {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "random" => Ok(Strategy::Random),
            "greedy" => Ok(Strategy::Greedy),
            "two-opt" => Ok(Strategy::TwoOpt),
            "branch-and-bound" => Ok(Strategy::BranchAndBound),
            _ => Err(format!("'{}' is an invalid strategy.", value)),
        }
    }
}

fn main() -> std::io::Result<()> {
    let opt = Opt::from_args();
    atsp::log::build_logger_for_verbosity(LevelFilter::Warn, opt.verbose);

    let strategy =
        Strategy::try_from(opt.strategy.as_str()).expect("Failed parsing 'strategy' parameter: ");
    if !(opt.time_allowance > 0.0) {
        panic!("Parameter time_allowance must be positive");
    }

    let scenario: Scenario = match &opt.input {
        Some(path) => {
            info!("Read file {:?}", path);
            let file = File::open(path)?;
            Scenario::try_from(MatrixReader(BufReader::new(file)))?
        }
        None => {
            let stdin = stdin();
            Scenario::try_from(MatrixReader(stdin.lock()))?
        }
    };

    info!(
        "Input scenario with n={}, strategy {:?}, budget {}s (default {}s)",
        scenario.order(),
        strategy,
        opt.time_allowance,
        DEFAULT_TIME_ALLOWANCE
    );

    let solver = TspSolver::new(scenario);
    let mut rng = Pcg64Mcg::seed_from_u64(opt.seed);

    let report = match strategy {
        Strategy::Random => solver.random_tour(opt.time_allowance, &mut rng),
        Strategy::Greedy => solver.nearest_neighbor(opt.time_allowance),
        Strategy::TwoOpt => solver.two_opt(opt.time_allowance, &mut rng),
        Strategy::BranchAndBound => solver.branch_and_bound(opt.time_allowance, &mut rng),
    };

    print_report(&report);
    Ok(())
}

fn print_report(report: &SolveReport) {
    println!("cost:   {}", report.cost);
    println!("time:   {:.3}s", report.time);
    println!("count:  {}", report.count);

    match &report.soln {
        Some(tour) => println!("tour:   {}", tour.order().iter().join(" ")),
        None => println!("tour:   none"),
    }

    if let (Some(max), Some(total), Some(pruned)) = (report.max, report.total, report.pruned) {
        println!("max:    {}", max);
        println!("total:  {}", total);
        println!("pruned: {}", pruned);
    }
}
