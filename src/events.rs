use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::lines::Line;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub const ALL: [Street; 4] = [Street::Preflop, Street::Flop, Street::Turn, Street::River];

    pub fn is_postflop(self) -> bool {
        self != Street::Preflop
    }
}

impl Display for Street {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Ante,
    SmallBlind,
    BigBlind,
    Straddle,
    Check,
    Fold,
    Call,
    Bet,
    Raise,
    Show,
    Other,
}

impl ActionKind {
    pub fn is_post(self) -> bool {
        matches!(
            self,
            ActionKind::Ante | ActionKind::SmallBlind | ActionKind::BigBlind | ActionKind::Straddle
        )
    }

    pub fn is_voluntary(self) -> bool {
        matches!(
            self,
            ActionKind::Check
                | ActionKind::Fold
                | ActionKind::Call
                | ActionKind::Bet
                | ActionKind::Raise
        )
    }

    pub fn is_aggressive(self) -> bool {
        matches!(self, ActionKind::Bet | ActionKind::Raise)
    }
}

/// One timeline entry. Every numeric fact that can legitimately be absent in
/// the source text is an `Option`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub street: Street,
    pub player: String,
    pub kind: ActionKind,
    /// Stated chip amount; for raises this is the raise delta, not the total.
    pub amount: Option<f64>,
    /// Raise target total from a "raises X to Y" line.
    pub to_amount: Option<f64>,
    pub pot_before: f64,
    pub pot_after: f64,
    pub amount_bb: Option<f64>,
    pub pct_pot: Option<f64>,
    pub to_amount_bb: Option<f64>,
    pub to_pct_pot: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShowEvent {
    pub player: String,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct StartPots {
    pub preflop: f64,
    pub flop: Option<f64>,
    pub turn: Option<f64>,
    pub river: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Timeline {
    pub preflop: Vec<Event>,
    pub flop: Vec<Event>,
    pub turn: Vec<Event>,
    pub river: Vec<Event>,
    /// Reveals, both from a formal showdown section and voluntary ones.
    pub shows: Vec<ShowEvent>,
    pub start_pots: StartPots,
    pub final_pot: f64,
}

impl Timeline {
    pub fn street(&self, street: Street) -> &[Event] {
        match street {
            Street::Preflop => &self.preflop,
            Street::Flop => &self.flop,
            Street::Turn => &self.turn,
            Street::River => &self.river,
        }
    }

    fn street_mut(&mut self, street: Street) -> &mut Vec<Event> {
        match street {
            Street::Preflop => &mut self.preflop,
            Street::Flop => &mut self.flop,
            Street::Turn => &mut self.turn,
            Street::River => &mut self.river,
        }
    }

    pub fn all_events(&self) -> impl Iterator<Item = &Event> {
        self.preflop
            .iter()
            .chain(&self.flop)
            .chain(&self.turn)
            .chain(&self.river)
    }

    /// Last preflop aggressor, if any. A flop bet by this player is tagged as
    /// a continuation bet downstream.
    pub fn preflop_aggressor(&self) -> Option<&str> {
        self.preflop
            .iter()
            .rev()
            .find(|ev| ev.kind.is_aggressive())
            .map(|ev| ev.player.as_str())
    }

    pub fn straddled(&self) -> bool {
        self.preflop
            .iter()
            .any(|ev| ev.kind == ActionKind::Straddle)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// State machine over classified lines. Streets advance only on marker lines;
/// the pot accumulates monotonically; the per-round contribution map is
/// recreated at every street transition.
#[derive(Debug)]
pub struct PotTracker {
    street: Street,
    in_showdown: bool,
    pot: f64,
    round: HashMap<String, f64>,
    big_blind: Option<f64>,
    timeline: Timeline,
}

impl PotTracker {
    pub fn new(big_blind: Option<f64>) -> Self {
        Self {
            street: Street::Preflop,
            in_showdown: false,
            pot: 0.0,
            round: HashMap::new(),
            big_blind,
            timeline: Timeline::default(),
        }
    }

    pub fn observe(&mut self, line: &Line) {
        match line {
            Line::StreetMarker { street, .. } => self.advance(*street),
            Line::ShowdownMarker => self.in_showdown = true,
            Line::Action {
                player,
                kind,
                amount,
                to_amount,
                cards,
            } => self.apply_action(player, *kind, *amount, *to_amount, cards),
            _ => {}
        }
    }

    pub fn finish(mut self) -> Timeline {
        self.timeline.final_pot = self.pot;
        self.timeline
    }

    fn advance(&mut self, street: Street) {
        match street {
            Street::Flop => self.timeline.start_pots.flop = Some(self.pot),
            Street::Turn => self.timeline.start_pots.turn = Some(self.pot),
            Street::River => self.timeline.start_pots.river = Some(self.pot),
            Street::Preflop => {}
        }
        self.street = street;
        self.round = HashMap::new();
    }

    fn apply_action(
        &mut self,
        player: &str,
        kind: ActionKind,
        amount: Option<f64>,
        to_amount: Option<f64>,
        cards: &[Card],
    ) {
        if kind == ActionKind::Show {
            self.timeline.shows.push(ShowEvent {
                player: player.to_string(),
                cards: cards.to_vec(),
            });
            return;
        }
        if self.in_showdown {
            return;
        }

        let pot_before = self.pot;
        match kind {
            ActionKind::Ante => {
                if let Some(amount) = amount {
                    self.pot += amount;
                }
            }
            ActionKind::SmallBlind
            | ActionKind::BigBlind
            | ActionKind::Straddle
            | ActionKind::Call
            | ActionKind::Bet => {
                if let Some(amount) = amount {
                    self.pot += amount;
                    *self.round.entry(player.to_string()).or_insert(0.0) += amount;
                }
            }
            ActionKind::Raise => {
                if let Some(delta) = amount {
                    self.pot += delta;
                }
                let entry = self.round.entry(player.to_string()).or_insert(0.0);
                match to_amount {
                    Some(total) => *entry = total,
                    None => *entry += amount.unwrap_or(0.0),
                }
            }
            ActionKind::Check | ActionKind::Fold | ActionKind::Other => {}
            ActionKind::Show => unreachable!("handled above"),
        }
        let pot_after = self.pot;

        let carries_amount = !matches!(
            kind,
            ActionKind::Check | ActionKind::Fold | ActionKind::Other
        );
        let bb = self.big_blind.filter(|bb| *bb > 0.0);
        let amount_bb = match (carries_amount, amount, bb) {
            (true, Some(amount), Some(bb)) => Some(round2(amount / bb)),
            _ => None,
        };
        let (pct_pot, to_amount_bb, to_pct_pot) = if kind.is_aggressive() {
            let pct = amount
                .filter(|_| pot_before > 0.0)
                .map(|amount| round2(amount / pot_before * 100.0));
            let to_bb = match (to_amount, bb) {
                (Some(total), Some(bb)) => Some(round2(total / bb)),
                _ => None,
            };
            let to_pct = to_amount
                .filter(|_| pot_before > 0.0)
                .map(|total| round2(total / pot_before * 100.0));
            (pct, to_bb, to_pct)
        } else {
            (None, None, None)
        };

        let event = Event {
            street: self.street,
            player: player.to_string(),
            kind,
            amount: if carries_amount { amount } else { None },
            to_amount: if kind == ActionKind::Raise {
                to_amount
            } else {
                None
            },
            pot_before,
            pot_after,
            amount_bb,
            pct_pot,
            to_amount_bb,
            to_pct_pot,
        };
        self.timeline.street_mut(self.street).push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(player: &str, kind: ActionKind, amount: Option<f64>, to: Option<f64>) -> Line {
        Line::Action {
            player: player.to_string(),
            kind,
            amount,
            to_amount: to,
            cards: Vec::new(),
        }
    }

    #[test]
    fn antes_skip_round_contribution_but_grow_pot() {
        let mut tracker = PotTracker::new(Some(6.0));
        tracker.observe(&action("a", ActionKind::Ante, Some(6.0), None));
        tracker.observe(&action("b", ActionKind::SmallBlind, Some(3.0), None));
        tracker.observe(&action("c", ActionKind::BigBlind, Some(6.0), None));
        let timeline = tracker.finish();
        assert_eq!(timeline.final_pot, 15.0);
        assert_eq!(timeline.preflop[0].amount_bb, Some(1.0));
    }

    #[test]
    fn raise_pct_uses_delta_not_total() {
        let mut tracker = PotTracker::new(Some(6.0));
        tracker.observe(&action("sb", ActionKind::SmallBlind, Some(3.0), None));
        tracker.observe(&action("bb", ActionKind::BigBlind, Some(6.0), None));
        tracker.observe(&action("co", ActionKind::Raise, Some(12.0), Some(18.0)));
        let timeline = tracker.finish();
        let raise = &timeline.preflop[2];
        assert_eq!(raise.pot_before, 9.0);
        assert_eq!(raise.pct_pot, Some(round2(12.0 / 9.0 * 100.0)));
        assert_eq!(raise.to_amount_bb, Some(3.0));
    }

    #[test]
    fn street_markers_snapshot_start_pot_and_reset_round() {
        let mut tracker = PotTracker::new(Some(2.0));
        tracker.observe(&action("sb", ActionKind::SmallBlind, Some(1.0), None));
        tracker.observe(&action("bb", ActionKind::BigBlind, Some(2.0), None));
        tracker.observe(&action("sb", ActionKind::Call, Some(1.0), None));
        tracker.observe(&Line::StreetMarker {
            street: Street::Flop,
            cards: Vec::new(),
        });
        tracker.observe(&action("sb", ActionKind::Bet, Some(4.0), None));
        let timeline = tracker.finish();
        assert_eq!(timeline.start_pots.flop, Some(4.0));
        let bet = &timeline.flop[0];
        assert_eq!(bet.pct_pot, Some(100.0));
        assert_eq!(bet.pot_after, 8.0);
    }

    #[test]
    fn pot_is_monotone_and_unknown_amounts_stay_absent() {
        let mut tracker = PotTracker::new(None);
        tracker.observe(&action("a", ActionKind::Bet, None, None));
        tracker.observe(&action("b", ActionKind::Other, None, None));
        let timeline = tracker.finish();
        assert_eq!(timeline.final_pot, 0.0);
        assert_eq!(timeline.preflop.len(), 2);
        assert_eq!(timeline.preflop[0].amount_bb, None);
        assert_eq!(timeline.preflop[1].kind, ActionKind::Other);
        for ev in timeline.all_events() {
            assert!(ev.pot_after >= ev.pot_before);
        }
    }
}
