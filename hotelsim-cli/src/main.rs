mod feed;
mod layout;
mod play;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use hotelsim_core::{AssignmentStrategy, FrontDesk, RewardConfig, decode_code};
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use feed::{ParsedFeed, read_feed};
use layout::load_layout;
use report::RunReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Uniform pick among free rooms
    Random,
    /// Smokers on the edge, families apart from solo guests
    QuietZone,
    /// Room type chosen from the stay purpose
    StayPurpose,
    /// Fill next to occupied rooms first
    Sequential,
}

impl From<StrategyArg> for AssignmentStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Random => Self::Random,
            StrategyArg::QuietZone => Self::QuietZone,
            StrategyArg::StayPurpose => Self::StayPurpose,
            StrategyArg::Sequential => Self::Sequential,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "hotelsim", version)]
#[command(about = "Hotel room allocation simulator with checkout reward games")]
struct Args {
    /// Hotel layout (.hconfig): floor count, then rows of E/B/L/Z codes
    #[arg(long, required_unless_present_any = ["verify_code", "list_strategies"])]
    layout: Option<PathBuf>,

    /// Reservation feed, one CSV reservation per line
    #[arg(long)]
    reservations: Option<PathBuf>,

    /// Rewrite the feed so that only rejected lines remain
    #[arg(long, requires = "reservations")]
    consume: bool,

    /// Room assignment strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::Random)]
    strategy: StrategyArg,

    /// Seed for every random draw of the run
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Check every guest out with this rating (1-5) and play their ticket
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    checkout_rating: Option<u8>,

    /// Reward table (JSON) replacing the built-in one
    #[arg(long)]
    rewards: Option<PathBuf>,

    /// Decode a discount code and exit
    #[arg(long)]
    verify_code: Option<String>,

    /// List assignment strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if maybe_list_strategies(&args)? {
        return Ok(());
    }
    if let Some(code) = args.verify_code.as_deref() {
        return verify_code(&args, code);
    }

    if args.report == "console" && args.output.is_none() {
        announce_banner();
    }

    let report = run_simulation(&args)?;
    write_report(&args, &report)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut sink = ReportSink::open(args.output.as_deref())?;
    writeln!(sink, "Available strategies:")?;
    for strategy in AssignmentStrategy::ALL {
        writeln!(
            sink,
            "  {:14} - {}",
            strategy.as_str().replace('_', "-"),
            strategy.label()
        )?;
    }
    sink.finish()?;
    Ok(true)
}

fn verify_code(args: &Args, code: &str) -> Result<()> {
    let percent =
        decode_code(code.trim()).with_context(|| format!("code {code:?} is not valid"))?;
    let mut sink = ReportSink::open(args.output.as_deref())?;
    writeln!(sink, "{} grants a {percent}% discount", code.trim())?;
    sink.finish()
}

fn announce_banner() {
    println!("{}", "🏨 Hotel Allocation Simulator".bright_cyan().bold());
    println!("{}", "=============================".cyan());
}

fn load_rewards(args: &Args) -> Result<RewardConfig> {
    let Some(path) = args.rewards.as_ref() else {
        return Ok(RewardConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read reward table {}", path.display()))?;
    RewardConfig::load(&json).with_context(|| format!("invalid reward table {}", path.display()))
}

fn run_simulation(args: &Args) -> Result<RunReport> {
    let layout_path = args
        .layout
        .as_deref()
        .context("--layout is required to run the simulation")?;
    let plan = load_layout(layout_path)?;
    log::info!(
        "{} floors, {} rooms from {}",
        plan.floors,
        plan.room_count(),
        layout_path.display()
    );

    let mut desk = FrontDesk::new(plan.build(), args.seed)
        .with_strategy(args.strategy.into())
        .with_rewards(load_rewards(args)?);

    let feed = match args.reservations.as_deref() {
        Some(path) => read_feed(path, args.consume)?,
        None => ParsedFeed::default(),
    };
    log::info!(
        "{} reservations accepted, {} rejected",
        feed.reservations.len(),
        feed.rejected.len()
    );

    let mut report = RunReport::new(&desk, args.seed);
    report.record_rejected(&feed.rejected);

    let batch = desk
        .assign_all(feed.reservations)
        .context("assigning reservations")?;
    report.record_assignments(&desk, &batch.assigned);
    report.waiting = batch
        .waiting
        .iter()
        .map(hotelsim_core::Reservation::full_name)
        .collect();

    if let Some(rating) = args.checkout_rating {
        let rooms: Vec<String> = desk
            .assignments()
            .iter()
            .map(|request| request.room.clone())
            .collect();
        for room in rooms {
            let mut checkout = desk
                .checkout(&room, rating)
                .with_context(|| format!("checking out {room}"))?;
            let play = play::auto_play(
                &mut checkout.ticket,
                &desk.rewards().silver_words,
                &mut *desk.ticket_rng(),
            )?;
            report.record_checkout(&checkout, play);
        }
    }

    report.finish(&desk);
    Ok(report)
}

fn write_report(args: &Args, report: &RunReport) -> Result<()> {
    let mut sink = ReportSink::open(args.output.as_deref())?;
    match args.report.as_str() {
        "json" => report::generate_json_report(&mut sink, report)?,
        _ => report::generate_console_report(&mut sink, report)?,
    }
    sink.finish()
}

/// Where reports and listings go: a file named by `--output`, else stdout.
struct ReportSink {
    target: Box<dyn Write>,
    label: String,
}

impl ReportSink {
    fn open(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self {
                target: Box::new(BufWriter::new(stdout())),
                label: String::from("stdout"),
            });
        };
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self {
            target: Box::new(BufWriter::new(file)),
            label: path.display().to_string(),
        })
    }

    /// Flush buffered output; errors name the destination.
    fn finish(mut self) -> Result<()> {
        self.target
            .flush()
            .with_context(|| format!("failed to write {}", self.label))
    }
}

impl Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.target.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.target.flush()
    }
}
