use anyhow::Context;
use clap::Parser;
use jigsudo_core::{generate_daily, DailyConfig, DailyGenerator, DailySeed};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Generate the Jigsudo daily puzzle file
#[derive(Debug, Parser)]
#[command(name = "generate-daily", version, about)]
struct Args {
    /// `YYYYMMDD` date or custom seed; defaults to tomorrow
    seed: Option<String>,

    /// Directory receiving `daily-<date>.json`
    #[arg(long, env = "JIGSUDO_PUZZLES_DIR", default_value = "public/puzzles")]
    out_dir: PathBuf,

    /// Top-level attempts before giving up
    #[arg(long)]
    max_attempts: Option<usize>,

    /// Placement budget per cover search (0 disables the limit)
    #[arg(long)]
    node_budget: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(&self) -> DailyConfig {
        let mut config = DailyConfig::default();
        if let Some(attempts) = self.max_attempts {
            config.max_attempts = attempts;
        }
        if let Some(budget) = self.node_budget {
            config.node_budget = (budget > 0).then_some(budget);
        }
        config
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> anyhow::Result<PathBuf> {
    let seed = DailySeed::from_arg(args.seed.as_deref());
    info!(seed = seed.value, label = %seed.label, "generating daily board");

    let mut generator = DailyGenerator::new(args.config());
    let (board, path) = generate_daily(&mut generator, &seed, &args.out_dir)
        .with_context(|| format!("failed to generate {}", seed.file_name()))?;
    info!(
        attempt = board.attempt,
        simon = ?board.simon_values,
        givens = board.game.puzzle.given_count(),
        "done"
    );
    Ok(path)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["generate-daily", "20250101"]).unwrap();
        assert_eq!(args.seed.as_deref(), Some("20250101"));
        assert_eq!(args.config(), DailyConfig::default());
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "generate-daily",
            "--out-dir",
            "/tmp/p",
            "--max-attempts",
            "5",
            "--node-budget",
            "0",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.out_dir, PathBuf::from("/tmp/p"));
        assert_eq!(args.verbose, 2);
        let config = args.config();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.node_budget, None);
    }
}
