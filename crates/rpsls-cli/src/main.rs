mod params;
mod play;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rpsls_engine::{FinishMode, MatchConfig, StrategyKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play Rock-Paper-Scissors-Lizard-Spock", long_about = None)]
struct Args {
    /// JSON match config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    name1: Option<String>,
    #[arg(long)]
    name2: Option<String>,

    #[arg(long, value_enum)]
    strategy1: Option<Kind>,
    #[arg(long, value_enum)]
    strategy2: Option<Kind>,

    /// Uniform: "Rock, Paper". Weighted: "{Rock: 2, Paper: 1}"
    #[arg(long)]
    params1: Option<String>,
    #[arg(long)]
    params2: Option<String>,

    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Rounds to play, or score to reach
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    target: Option<u32>,

    /// Score mode only: call the match after this many pointless rounds in a
    /// row when no side is manual (0 never calls it)
    #[arg(long, default_value_t = play::DEFAULT_MAX_DRAWS)]
    max_draws: u32,

    #[arg(long)]
    seed: Option<u64>,

    /// Emit one JSON object per round plus a final summary
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Manual,
    Uniform,
    Weighted,
    Mirror,
    Adaptive,
}

impl From<Kind> for StrategyKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Manual => StrategyKind::Manual,
            Kind::Uniform => StrategyKind::Uniform,
            Kind::Weighted => StrategyKind::Weighted,
            Kind::Mirror => StrategyKind::Mirror,
            Kind::Adaptive => StrategyKind::Adaptive,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Rounds,
    Score,
}

impl From<Mode> for FinishMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Rounds => FinishMode::ByRounds,
            Mode::Score => FinishMode::ByScore,
        }
    }
}

impl Args {
    fn resolve(&self) -> anyhow::Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                MatchConfig::from_json(&text)
                    .with_context(|| format!("loading {}", path.display()))?
            }
            None => MatchConfig::default(),
        };
        if config.target == 0 {
            let fallback = MatchConfig::default().target;
            warn!(fallback, "target must be positive, using the default");
            config.target = fallback;
        }

        if let Some(name) = &self.name1 {
            config.player1 = name.clone();
        }
        if let Some(name) = &self.name2 {
            config.player2 = name.clone();
        }
        if self.strategy1.is_some() || self.params1.is_some() {
            let kind = self.strategy1.map(StrategyKind::from).unwrap_or(config.strategy1.kind());
            config.strategy1 = params::spec_for(kind, self.params1.as_deref());
        }
        if self.strategy2.is_some() || self.params2.is_some() {
            let kind = self.strategy2.map(StrategyKind::from).unwrap_or(config.strategy2.kind());
            config.strategy2 = params::spec_for(kind, self.params2.as_deref());
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if let Some(target) = self.target {
            config.target = target;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }
}

fn log() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    log();
    let args = Args::parse();
    let config = args.resolve()?;
    let mut game = config.build().context("building match")?;
    info!(
        player1 = %config.player1,
        player2 = %config.player2,
        mode = ?config.mode,
        target = config.target,
        seed = config.seed,
        interactive = play::is_interactive(&game),
        "starting match"
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let options = play::Options {
        as_json: args.json,
        max_draws: args.max_draws,
    };
    let ending = play::run(
        &mut game,
        &config,
        &mut stdin.lock(),
        &mut stdout.lock(),
        options,
    )?;
    info!(?ending, "match over");
    Ok(())
}
