//! Parameter text parsing
//!
//! Turns user-typed strategy parameters into a validated [`StrategySpec`].
//! Text is only ever tokenized, never evaluated.

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Context};
use rpsls_engine::{Move, StrategyKind, StrategySpec};
use tracing::warn;

/// "Rock, Paper, Spock"
pub fn parse_move_list(text: &str) -> anyhow::Result<Vec<Move>> {
    let moves = text
        .split(',')
        .map(clean_name)
        .filter(|name| !name.is_empty())
        .map(|name| name.parse::<Move>().map_err(anyhow::Error::from))
        .collect::<anyhow::Result<Vec<_>>>()?;
    if moves.is_empty() {
        bail!("no moves listed");
    }
    Ok(moves)
}

/// "{Rock: 2, Paper: 1}"; braces are optional, `=` and `=>` also separate
pub fn parse_weights(text: &str) -> anyhow::Result<Vec<(Move, f64)>> {
    let body = text.trim();
    let body = body
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(body);

    let mut weights: Vec<(Move, f64)> = Vec::new();
    for entry in body.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, value) = split_entry(entry)
            .ok_or_else(|| anyhow!("expected 'Move: weight', got '{}'", entry))?;
        let mv = clean_name(name).parse::<Move>()?;
        let weight = value
            .trim()
            .parse::<f64>()
            .with_context(|| format!("invalid weight '{}' for {}", value.trim(), mv))?;
        if weights.iter().any(|(seen, _)| *seen == mv) {
            bail!("{} given more than once", mv);
        }
        weights.push((mv, weight));
    }
    if weights.is_empty() {
        bail!("no weights listed");
    }
    Ok(weights)
}

/// Build the spec for `kind` from optional parameter text
///
/// A missing or unusable parameter string falls back to all five moves at
/// equal weight, with a warning.
pub fn spec_for(kind: StrategyKind, params: Option<&str>) -> StrategySpec {
    let params = params.map(str::trim).filter(|p| !p.is_empty());
    match (kind, params) {
        (StrategyKind::Uniform, Some(text)) => {
            match parse_move_list(text).and_then(|moves| validated(uniform_spec(&moves))) {
                Ok(spec) => spec,
                Err(e) => {
                    warn!(error = %e, params = text, "invalid move list, using all moves");
                    uniform_spec(&Move::ALL)
                }
            }
        }
        (StrategyKind::Weighted, Some(text)) => {
            match parse_weights(text).and_then(|weights| validated(weighted_spec(&weights))) {
                Ok(spec) => spec,
                Err(e) => {
                    warn!(error = %e, params = text, "invalid weights, using equal weights");
                    even_weights()
                }
            }
        }
        (StrategyKind::Uniform, None) => uniform_spec(&Move::ALL),
        (StrategyKind::Weighted, None) => even_weights(),
        (StrategyKind::Manual, _) => StrategySpec::Manual,
        (StrategyKind::Mirror, _) => StrategySpec::Mirror,
        (StrategyKind::Adaptive, _) => StrategySpec::Adaptive,
    }
}

fn validated(spec: StrategySpec) -> anyhow::Result<StrategySpec> {
    spec.build()?;
    Ok(spec)
}

fn uniform_spec(moves: &[Move]) -> StrategySpec {
    StrategySpec::Uniform {
        moves: moves.iter().map(|m| m.name().to_string()).collect(),
    }
}

fn weighted_spec(weights: &[(Move, f64)]) -> StrategySpec {
    StrategySpec::Weighted {
        weights: weights
            .iter()
            .map(|(m, w)| (m.name().to_string(), *w))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn even_weights() -> StrategySpec {
    let weights: Vec<_> = Move::ALL.iter().map(|m| (*m, 1.0)).collect();
    weighted_spec(&weights)
}

fn split_entry(entry: &str) -> Option<(&str, &str)> {
    entry
        .split_once("=>")
        .or_else(|| entry.split_once('='))
        .or_else(|| entry.rsplit_once(':'))
}

/// Strip whitespace, quotes, and a leading symbol colon
fn clean_name(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches(':')
        .trim_matches(|c: char| c == '"' || c == '\'')
        .trim()
}
