use anyhow::Result;
use chrono::Local;
use clap::{Parser, ValueEnum};
use dough_core::ModeKind;
use std::{io, path::PathBuf};
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

mod profile;
mod render;
mod repl;
mod session;

use profile::Profile;
use render::Report;
use session::Session;

/// Recipe CLI enum mirrors dough-core (derive for Clap).
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ModeFlag {
    /// 24-hour dough with fixed salt and yeast
    Standard,
    /// Free hydration, salt and yeast, no timeline
    Custom,
    /// Poolish pre-ferment, yeast from the fermentation table
    Poolish,
}

impl From<ModeFlag> for ModeKind {
    fn from(m: ModeFlag) -> Self {
        match m {
            ModeFlag::Standard => ModeKind::Standard,
            ModeFlag::Custom => ModeKind::Custom,
            ModeFlag::Poolish => ModeKind::Poolish,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "dough",
    about = "Calculate pizza dough ingredients & fermentation timeline (24h, custom or poolish).",
    version
)]
struct Args {
    /// Recipe [default: standard]
    #[arg(long, value_enum)]
    mode: Option<ModeFlag>,

    /// Number of dough balls (1–20)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=20))]
    balls: Option<u32>,

    /// Dough ball weight in grams (100–500)
    #[arg(long)]
    ball_weight: Option<f64>,

    /// Hydration in % of flour (50–100)
    #[arg(long)]
    hydration: Option<f64>,

    /// Salt in % of flour (1–3, custom and poolish)
    #[arg(long)]
    salt: Option<f64>,

    /// Yeast in % of flour (0.1–2, custom only)
    #[arg(long)]
    yeast: Option<f64>,

    /// Share of the flour in the poolish, % (20–40)
    #[arg(long)]
    poolish: Option<f64>,

    /// Poolish fermentation hours (12–20), sets the yeast amount
    #[arg(long, value_parser = clap::value_parser!(u8).range(12..=20))]
    fermentation_hours: Option<u8>,

    /// Start time HH:MM (optional); defaults to now
    #[arg(long)]
    start: Option<String>,

    /// Load a profile JSON before applying CLI overrides
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Keep a session open and recalculate after every change
    #[arg(long, conflicts_with = "json")]
    interactive: bool,

    /// Verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl From<&Args> for Profile {
    fn from(a: &Args) -> Self {
        Profile {
            mode: a.mode.map(ModeKind::from),
            balls: a.balls,
            ball_weight: a.ball_weight,
            hydration: a.hydration,
            salt: a.salt,
            yeast: a.yeast,
            poolish: a.poolish,
            fermentation_hours: a.fermentation_hours,
            start: a.start.clone(),
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(verbose >= 2)
        .init();

    debug!("dough started with verbosity level: {}", verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // CLI wins over the profile, the profile over mode defaults.
    let file = match &args.profile {
        Some(path) => profile::load(path)?,
        None => Profile::default(),
    };
    let settings = Profile::from(&args).or(file);
    let inputs = settings.recipe_inputs()?;
    inputs.validate()?;

    let start = settings
        .start
        .unwrap_or_else(|| Local::now().format("%H:%M").to_string());

    if args.interactive {
        let mut session = Session::new(inputs, start);
        return repl::run(&mut session, io::stdin().lock(), &mut io::stdout().lock());
    }

    let report = Report::build(&inputs, &start);
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
        if inputs.mode.kind().has_schedule() {
            println!("\nNotes:");
            println!("• Times assume kneading (or mixing the poolish) at the start time.");
            println!("• Salt always goes into the final mix, never into a poolish.");
        }
    }
    Ok(())
}
