//! Interactive match loop

use std::io::{BufRead, Write};

use anyhow::Context;
use rpsls_engine::{FinishMode, Match, MatchConfig, Move, RandomStream, RoundResult, Strategy};
use serde_json::json;
use tracing::{debug, info};

/// Consecutive pointless rounds tolerated in score mode by default
pub const DEFAULT_MAX_DRAWS: u32 = 100;

/// How a session ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ending {
    Finished,
    /// Input closed or the user quit while a manual move was pending
    Abandoned,
    /// Score mode with automatic sides that stopped scoring
    Stalled,
}

/// Output and cut-off settings for [`run`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    pub as_json: bool,
    /// Consecutive rounds without points before a score-mode match between
    /// automatic sides is called; 0 disables the cut-off
    pub max_draws: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            as_json: false,
            max_draws: DEFAULT_MAX_DRAWS,
        }
    }
}

/// Drive `game` until the configured finish condition holds
pub fn run<R, I, O>(
    game: &mut Match<R>,
    config: &MatchConfig,
    input: &mut I,
    output: &mut O,
    options: Options,
) -> anyhow::Result<Ending>
where
    R: RandomStream,
    I: BufRead,
    O: Write,
{
    if !options.as_json {
        let (side1, side2) = (game.side1(), game.side2());
        writeln!(output, "{}: {}", side1.name, side1.strategy.describe())?;
        writeln!(output, "{}: {}", side2.name, side2.strategy.describe())?;
    }

    let can_stall = config.mode == FinishMode::ByScore && !is_interactive(game);
    let mut pointless = 0u32;

    while !config.is_finished(game) {
        for side in [1, 2] {
            let (name, strategy) = if side == 1 {
                (game.side1().name.clone(), game.strategy1_mut())
            } else {
                (game.side2().name.clone(), game.strategy2_mut())
            };
            if strategy.is_awaiting_input() {
                match prompt_move(&name, input, output)? {
                    Some(mv) => {
                        strategy.select(mv);
                    }
                    None => {
                        info!(player = %name, "input closed, abandoning match");
                        return Ok(Ending::Abandoned);
                    }
                }
            }
        }

        match game.play_round() {
            Some(result) => {
                report_round(game, &result, output, options.as_json)?;
                pointless = if result.points == (0, 0) { pointless + 1 } else { 0 };
            }
            None => debug!("round did not advance"),
        }

        if can_stall && options.max_draws > 0 && pointless >= options.max_draws {
            info!(rounds = pointless, "no points scored, calling the match");
            report_final(game, output, options.as_json, Ending::Stalled)?;
            return Ok(Ending::Stalled);
        }
    }

    report_final(game, output, options.as_json, Ending::Finished)?;
    Ok(Ending::Finished)
}

/// Ask for a move until one parses; `None` on end of input or "quit"
fn prompt_move<I: BufRead, O: Write>(
    name: &str,
    input: &mut I,
    output: &mut O,
) -> anyhow::Result<Option<Move>> {
    let names: Vec<_> = Move::ALL.iter().map(|m| m.name()).collect();
    loop {
        write!(output, "{} [{}]> ", name, names.join("/"))?;
        output.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("reading move")?;
        let line = line.trim();
        if read == 0 || line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            return Ok(None);
        }
        match line.parse::<Move>() {
            Ok(mv) => return Ok(Some(mv)),
            Err(e) => writeln!(output, "{}", e)?,
        }
    }
}

fn report_round<R: RandomStream, O: Write>(
    game: &Match<R>,
    result: &RoundResult,
    output: &mut O,
    as_json: bool,
) -> anyhow::Result<()> {
    if as_json {
        writeln!(output, "{}", serde_json::to_string(result)?)?;
        return Ok(());
    }
    writeln!(
        output,
        "Round {}: {} plays {}, {} plays {}. {}. Score {}-{}",
        result.round,
        game.side1().name,
        result.move1,
        game.side2().name,
        result.move2,
        result.summary(),
        result.score.0,
        result.score.1,
    )?;
    Ok(())
}

fn report_final<R: RandomStream, O: Write>(
    game: &Match<R>,
    output: &mut O,
    as_json: bool,
    ending: Ending,
) -> anyhow::Result<()> {
    let (score1, score2) = game.score();
    let stalled = ending == Ending::Stalled;
    if as_json {
        let summary = json!({
            "winner": game.winner(),
            "score": [score1, score2],
            "rounds": game.round(),
            "stalled": stalled,
        });
        writeln!(output, "{}", summary)?;
        return Ok(());
    }
    if stalled {
        writeln!(output, "No points scored in a row; stopping after {} rounds", game.round())?;
    }
    match game.winner() {
        Some(name) => writeln!(output, "{} wins {}-{}", name, score1, score2)?,
        None => writeln!(output, "Tie {}-{}", score1, score2)?,
    }
    Ok(())
}

/// True if either side will need the terminal
pub fn is_interactive<R: RandomStream>(game: &Match<R>) -> bool {
    let manual = |s: &Strategy| s.needs_external_input();
    manual(&game.side1().strategy) || manual(&game.side2().strategy)
}
