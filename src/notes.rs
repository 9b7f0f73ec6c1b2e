use serde::{Deserialize, Serialize};

use crate::cards::{board_paired, concat_notation};
use crate::events::{ActionKind, Event, Street};
use crate::parser::ParseResult;
use crate::strength;

/// Deterministic per-street notes. The token grammar (positions, action
/// letters, sizing, class suffixes, "on"+board) is the wire format consumed
/// by the cross-hand aggregation layer and must stay stable.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StreetNotes {
    pub preflop: String,
    pub flop: String,
    pub turn: String,
    pub river: String,
}

impl StreetNotes {
    pub fn for_street(&self, street: Street) -> &str {
        match street {
            Street::Preflop => &self.preflop,
            Street::Flop => &self.flop,
            Street::Turn => &self.turn,
            Street::River => &self.river,
        }
    }
}

pub fn synthesize(result: &ParseResult) -> StreetNotes {
    // No resolved target, no notes. Opponent fragments only make sense
    // relative to a tracked player.
    if result.target.is_none() {
        return StreetNotes::default();
    }
    StreetNotes {
        preflop: street_note(result, Street::Preflop),
        flop: street_note(result, Street::Flop),
        turn: street_note(result, Street::Turn),
        river: street_note(result, Street::River),
    }
}

fn street_note(result: &ParseResult, street: Street) -> String {
    let (target_line, target_check_idx) = target_fragment(result, street);
    let mut fragments = Vec::new();
    if !target_line.is_empty() {
        fragments.push(target_line);
    }
    fragments.extend(opponent_fragments(result, street, target_check_idx));
    fragments.join(" / ")
}

fn precedence(kind: ActionKind) -> Option<u8> {
    match kind {
        ActionKind::Fold => Some(0),
        ActionKind::Check => Some(1),
        ActionKind::Call => Some(2),
        ActionKind::Bet => Some(3),
        ActionKind::Raise => Some(4),
        _ => None,
    }
}

/// The player's defining action this street: highest precedence wins, latest
/// occurrence among equals (a limp-reraise reads as the reraise).
fn primary_action<'a>(events: &'a [Event], player: &str) -> Option<(usize, &'a Event)> {
    let mut best: Option<(u8, usize)> = None;
    for (idx, ev) in events.iter().enumerate() {
        if ev.player != player {
            continue;
        }
        let Some(rank) = precedence(ev.kind) else {
            continue;
        };
        if best.is_none_or(|(top, _)| rank >= top) {
            best = Some((rank, idx));
        }
    }
    best.map(|(_, idx)| (idx, &events[idx]))
}

fn round_token(value: f64) -> String {
    format!("{}", value.round() as i64)
}

fn call_size(street: Street, ev: &Event) -> String {
    if street == Street::Preflop {
        return ev.amount_bb.map(round_token).unwrap_or_default();
    }
    match ev.amount {
        Some(amount) if ev.pot_before > 0.0 => round_token(amount / ev.pot_before * 100.0),
        _ => ev.amount_bb.map(round_token).unwrap_or_default(),
    }
}

fn aggressive_size(street: Street, ev: &Event) -> String {
    if street == Street::Preflop {
        ev.amount_bb.map(round_token).unwrap_or_default()
    } else {
        ev.pct_pot.map(round_token).unwrap_or_default()
    }
}

fn raise_size(street: Street, ev: &Event) -> String {
    if street == Street::Preflop {
        ev.to_amount_bb
            .or(ev.amount_bb)
            .map(round_token)
            .unwrap_or_default()
    } else {
        ev.pct_pot.map(round_token).unwrap_or_default()
    }
}

/// Raise multiple over the prior aggressor's sizing, e.g. the "(6x)" in
/// "R57 (6x)".
fn raise_multiple(events: &[Event], idx: usize, ev: &Event) -> Option<i64> {
    let to = ev.to_amount?;
    let prior = events[..idx]
        .iter()
        .rev()
        .find(|e| e.kind.is_aggressive() && e.player != ev.player)?;
    let prior_amount = prior.to_amount.or(prior.amount)?;
    if prior_amount <= 0.0 {
        return None;
    }
    let mult = (to / prior_amount).round() as i64;
    (mult >= 2).then_some(mult)
}

fn action_token(result: &ParseResult, street: Street, events: &[Event], idx: usize) -> String {
    let ev = &events[idx];
    match ev.kind {
        ActionKind::Fold => "f".to_string(),
        ActionKind::Check => "x".to_string(),
        ActionKind::Call => format!("c{}", call_size(street, ev)),
        ActionKind::Bet => {
            let continuation = street == Street::Flop
                && result.timeline.preflop_aggressor() == Some(ev.player.as_str());
            let letter = if continuation { "cb" } else { "b" };
            format!("{letter}{}", aggressive_size(street, ev))
        }
        ActionKind::Raise => {
            let mut token = format!("R{}", raise_size(street, ev));
            if street.is_postflop()
                && let Some(mult) = raise_multiple(events, idx, ev)
            {
                token.push_str(&format!(" ({mult}x)"));
            }
            token
        }
        _ => String::new(),
    }
}

fn target_fragment(result: &ParseResult, street: Street) -> (String, Option<usize>) {
    let Some(target) = &result.target else {
        return (String::new(), None);
    };
    let events = result.timeline.street(street);
    let Some((idx, ev)) = primary_action(events, &target.name) else {
        return (String::new(), None);
    };

    let mut parts = Vec::new();
    if street == Street::Preflop && result.straddled() {
        parts.push("strad".to_string());
    }
    parts.push(result.position_or_name(&target.name));
    parts.push(action_token(result, street, events, idx));

    if !target.cards.is_empty() {
        let holding = concat_notation(&target.cards);
        if street == Street::Preflop {
            parts.push(holding);
        } else {
            let class = target.classes.for_street(street);
            if class.is_empty() {
                parts.push(holding);
            } else {
                parts.push(format!("{holding}_{class}"));
            }
        }
    }
    if street.is_postflop() {
        let board = result.board.upto(street);
        if !board.is_empty() {
            parts.push(format!("on{}", concat_notation(&board)));
        }
    }

    // Slow-played nut straight: checked through a turn nobody attacked.
    if street == Street::Turn
        && ev.kind == ActionKind::Check
        && target.classes.turn == "nutstr"
        && !events.iter().any(|e| e.kind.is_aggressive())
        && events
            .iter()
            .enumerate()
            .any(|(i, e)| i > idx && e.kind == ActionKind::Check && e.player != target.name)
    {
        parts.push("[z]".to_string());
    }
    if street == Street::River
        && ev.kind == ActionKind::Check
        && board_paired(&result.board.full())
    {
        parts.push("[potctrl]".to_string());
    }
    // A reveal outside a formal showdown section is noteworthy; keep it on
    // the record.
    if street == Street::River
        && result.showdown.seen
        && !result.showdown.mandatory
        && result
            .timeline
            .shows
            .iter()
            .any(|show| show.player == target.name)
    {
        parts.push("showed".to_string());
    }

    let check_idx = (ev.kind == ActionKind::Check).then_some(idx);
    (parts.join(" "), check_idx)
}

fn opponent_fragments(
    result: &ParseResult,
    street: Street,
    target_check_idx: Option<usize>,
) -> Vec<String> {
    let events = result.timeline.street(street);
    let target_name = result.target.as_ref().map(|t| t.name.as_str());
    let board = result.board.upto(street);

    let mut order: Vec<&str> = Vec::new();
    for ev in events {
        if ev.kind.is_voluntary()
            && Some(ev.player.as_str()) != target_name
            && !order.contains(&ev.player.as_str())
        {
            order.push(&ev.player);
        }
    }

    let mut fragments = Vec::new();
    for opponent in order {
        let Some((idx, ev)) = primary_action(events, opponent) else {
            continue;
        };
        // Preflop folds are noise.
        if street == Street::Preflop && ev.kind == ActionKind::Fold {
            continue;
        }
        let mut token = if ev.kind == ActionKind::Check && checked_behind(events, target_check_idx, idx)
        {
            "xb".to_string()
        } else {
            action_token(result, street, events, idx)
        };
        if street.is_postflop()
            && let Some(show) = result
                .timeline
                .shows
                .iter()
                .find(|show| show.player == opponent)
        {
            let class = strength::classify(&show.cards, &board);
            if !class.is_empty() {
                token.push('_');
                token.push_str(&class);
            }
        }
        fragments.push(format!("{} {}", result.position_or_name(opponent), token));
    }
    fragments
}

/// A check right after the target's own check with no aggression in between.
fn checked_behind(events: &[Event], target_check_idx: Option<usize>, idx: usize) -> bool {
    let Some(target_idx) = target_check_idx else {
        return false;
    };
    idx > target_idx
        && events[target_idx + 1..idx]
            .iter()
            .all(|e| !e.kind.is_aggressive())
}
