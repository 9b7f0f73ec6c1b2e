use serde::{Deserialize, Serialize};

use crate::events::{ActionKind, Event, Street};
use crate::notes;
use crate::parser::ParseResult;

/// Tokens a note-taker prefixes a sizing with. Matched either as a separate
/// token ("cb 252") or glued to the amount ("cb252").
const ACTION_PREFIXES: &[&str] = &["c", "b", "r", "d", "cb", "bbb", "bb", "tp", "tpb", "xr"];

/// Hand-written notes as stored per hand, one field per street plus a
/// free-form presupposition line.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NoteFields {
    #[serde(default)]
    pub preflop: String,
    #[serde(default)]
    pub flop: String,
    #[serde(default)]
    pub turn: String,
    #[serde(default)]
    pub river: String,
    #[serde(default)]
    pub presupposition: String,
}

/// Rewrites raw chip amounts in hand-written notes into the units the
/// synthesizer uses: big blinds preflop, percent of pot postflop. Only
/// amounts from the target's own chip events are touched; without a resolved
/// target the text passes through unchanged.
pub fn normalize_units(fields: &NoteFields, result: &ParseResult) -> NoteFields {
    let Some(target) = &result.target else {
        return fields.clone();
    };
    NoteFields {
        preflop: normalize_field(&fields.preflop, result, Street::Preflop, &target.name),
        flop: normalize_field(&fields.flop, result, Street::Flop, &target.name),
        turn: normalize_field(&fields.turn, result, Street::Turn, &target.name),
        river: normalize_field(&fields.river, result, Street::River, &target.name),
        presupposition: fields.presupposition.clone(),
    }
}

fn normalize_field(text: &str, result: &ParseResult, street: Street, player: &str) -> String {
    let replacements = street_replacements(result.timeline.street(street), street, player);
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    for (idx, token) in tokens.iter().enumerate() {
        let previous = idx.checked_sub(1).map(|i| tokens[i].to_ascii_lowercase());
        out.push(normalize_token(token, previous.as_deref(), &replacements));
    }
    out.join(" ")
}

fn normalize_token(
    token: &str,
    previous: Option<&str>,
    replacements: &[(String, String)],
) -> String {
    if previous.is_some_and(|prev| ACTION_PREFIXES.contains(&prev)) {
        for (raw, unit) in replacements {
            if token == raw {
                return unit.clone();
            }
        }
    }
    let lower = token.to_ascii_lowercase();
    for (raw, unit) in replacements {
        for prefix in ACTION_PREFIXES {
            if lower == format!("{prefix}{raw}") {
                return format!("{prefix}{unit}");
            }
        }
    }
    token.to_string()
}

/// Raw-amount to unit pairs from one player's events on one street, longest
/// raw first so "960" is tried before "96".
fn street_replacements(events: &[Event], street: Street, player: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut push = |raw: Option<f64>, unit: Option<f64>| {
        if let (Some(raw), Some(unit)) = (raw, unit) {
            let raw = format_amount(raw);
            if !pairs.iter().any(|(r, _)| *r == raw) {
                pairs.push((raw, format!("{}", unit.round() as i64)));
            }
        }
    };
    for ev in events {
        if ev.player != player {
            continue;
        }
        if street == Street::Preflop {
            push(ev.amount, ev.amount_bb);
            push(ev.to_amount, ev.to_amount_bb);
        } else {
            let unit = if ev.kind == ActionKind::Call {
                ev.amount
                    .filter(|_| ev.pot_before > 0.0)
                    .map(|amount| amount / ev.pot_before * 100.0)
                    .or(ev.amount_bb)
            } else {
                ev.pct_pot.or(ev.amount_bb)
            };
            push(ev.amount, unit);
            push(ev.to_amount, ev.to_pct_pot.or(ev.to_amount_bb));
        }
    }
    pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    pairs
}

fn format_amount(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value}")
    }
}

/// Reconciles hand-written notes with the parsed hand: normalizes units,
/// strips artifacts, swaps in synthesized street lines where available, and
/// records a mandatory showdown as a single trailing "sd". Without a
/// resolved target the input passes through untouched.
pub fn merge(fields: &NoteFields, result: &ParseResult) -> NoteFields {
    if result.target.is_none() {
        return fields.clone();
    }
    let mut merged = normalize_units(fields, result);
    merged.preflop = strip_artifacts(&merged.preflop);
    merged.flop = strip_artifacts(&merged.flop);
    merged.turn = strip_artifacts(&merged.turn);
    merged.river = strip_artifacts(&merged.river);
    merged.presupposition = strip_artifacts(&merged.presupposition);

    if result.showdown.mandatory {
        merged.preflop = strip_show_tokens(&merged.preflop);
        merged.flop = strip_show_tokens(&merged.flop);
        merged.turn = strip_show_tokens(&merged.turn);
        merged.river = strip_show_tokens(&merged.river);
        merged.presupposition = strip_show_tokens(&merged.presupposition);
    }

    let synthesized = notes::synthesize(result);
    for street in Street::ALL {
        let line = synthesized.for_street(street);
        if line.is_empty() {
            continue;
        }
        let slot = match street {
            Street::Preflop => &mut merged.preflop,
            Street::Flop => &mut merged.flop,
            Street::Turn => &mut merged.turn,
            Street::River => &mut merged.river,
        };
        *slot = line.to_string();
    }

    if result.showdown.mandatory {
        append_showdown_marker(&mut merged);
    }
    merged
}

fn append_showdown_marker(fields: &mut NoteFields) {
    let slot = if fields.river.is_empty() {
        &mut fields.presupposition
    } else {
        &mut fields.river
    };
    if slot.split_whitespace().any(|token| token == "sd") {
        return;
    }
    if slot.is_empty() {
        *slot = "sd".to_string();
    } else {
        slot.push_str(" sd");
    }
}

/// Removes leftovers from earlier tooling passes: parenthesized big-blind
/// annotations and underscore-leading fragments, then collapses whitespace.
fn strip_artifacts(text: &str) -> String {
    let mut without_parens = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut group = String::new();
    for ch in text.chars() {
        match ch {
            '(' => {
                depth += 1;
                group.push(ch);
            }
            ')' if depth > 0 => {
                depth -= 1;
                group.push(ch);
                if depth == 0 {
                    if !group.contains("bb") {
                        without_parens.push_str(&group);
                    }
                    group.clear();
                }
            }
            _ if depth > 0 => group.push(ch),
            _ => without_parens.push(ch),
        }
    }
    without_parens.push_str(&group);

    without_parens
        .split_whitespace()
        .filter(|token| !token.starts_with('_'))
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_show_tokens(text: &str) -> String {
    text.split_whitespace()
        .filter(|token| {
            let lower = token.to_ascii_lowercase();
            lower != "show" && lower != "shows" && lower != "showed"
        })
        .collect::<Vec<_>>()
        .join(" ")
}
