use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::events::{PotTracker, Street, Timeline};
use crate::lines::{self, Line};
use crate::{seats, strength, target};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Blinds {
    pub small_blind: Option<f64>,
    pub big_blind: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Board {
    pub flop: Vec<Card>,
    pub turn: Option<Card>,
    pub river: Option<Card>,
}

impl Board {
    /// Board subset visible on a street. Empty when the prefix is incomplete,
    /// so classification requested ahead of the board degrades to nothing.
    pub fn upto(&self, street: Street) -> Vec<Card> {
        let mut cards = Vec::with_capacity(5);
        if street == Street::Preflop || self.flop.len() != 3 {
            return cards;
        }
        cards.extend_from_slice(&self.flop);
        if street == Street::Flop {
            return cards;
        }
        let Some(turn) = self.turn else {
            return Vec::new();
        };
        cards.push(turn);
        if street == Street::Turn {
            return cards;
        }
        let Some(river) = self.river else {
            return Vec::new();
        };
        cards.push(river);
        cards
    }

    pub fn full(&self) -> Vec<Card> {
        self.upto(Street::River)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StreetClasses {
    pub flop: String,
    pub turn: String,
    pub river: String,
}

impl StreetClasses {
    pub fn for_street(&self, street: Street) -> &str {
        match street {
            Street::Preflop => "",
            Street::Flop => &self.flop,
            Street::Turn => &self.turn,
            Street::River => &self.river,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct ShowdownInfo {
    /// Any reveal occurred, formal or voluntary.
    pub seen: bool,
    /// A showdown section was present and at least one reveal occurred.
    pub mandatory: bool,
}

/// Resolved target or primary opponent: identity, table position and, when
/// the player revealed cards, their per-street classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSummary {
    pub name: String,
    pub position: Option<String>,
    pub cards: Vec<Card>,
    pub classes: StreetClasses,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    pub hand_id: Option<String>,
    pub variant: Option<String>,
    pub blinds: Blinds,
    pub board: Board,
    pub players: Vec<String>,
    pub seats: BTreeMap<u32, String>,
    pub button_seat: Option<u32>,
    pub positions: HashMap<String, String>,
    pub timeline: Timeline,
    pub total_pot: Option<f64>,
    pub showdown: ShowdownInfo,
    pub target: Option<PlayerSummary>,
    pub primary_opponent: Option<PlayerSummary>,
}

impl ParseResult {
    pub fn position_or_name(&self, player: &str) -> String {
        self.positions
            .get(player)
            .cloned()
            .unwrap_or_else(|| player.to_string())
    }

    pub fn straddled(&self) -> bool {
        self.timeline.straddled()
    }
}

/// Parses one hand history against one opponent identifier. Never fails:
/// malformed lines are dropped and absent facts stay `None`/empty.
pub fn parse(text: &str, opponent: &str) -> ParseResult {
    let classified: Vec<Line> = text.lines().filter_map(lines::classify).collect();
    let blinds = derive_blinds(&classified);

    let mut tracker = PotTracker::new(blinds.big_blind);
    let mut seats_map: BTreeMap<u32, String> = BTreeMap::new();
    let mut players: Vec<String> = Vec::new();
    let mut board = Board::default();
    let mut hand_id = None;
    let mut variant = None;
    let mut button_seat = None;
    let mut total_pot = None;
    let mut showdown_section = false;
    let mut in_summary = false;

    for line in &classified {
        match line {
            Line::Header {
                hand_id: id,
                variant: label,
                ..
            } => {
                if hand_id.is_none() && !id.is_empty() {
                    hand_id = Some(id.clone());
                }
                if variant.is_none() {
                    variant = label.clone();
                }
            }
            Line::Seat { number, player } => {
                if !in_summary {
                    seats_map.insert(*number, player.clone());
                    note_player(&mut players, player);
                }
            }
            Line::Button { seat } => button_seat = Some(*seat),
            Line::StreetMarker { street, cards } => {
                absorb_marker(&mut board, *street, cards);
                tracker.observe(line);
            }
            Line::ShowdownMarker => {
                showdown_section = true;
                tracker.observe(line);
            }
            Line::SummaryMarker => in_summary = true,
            Line::Action { player, .. } => {
                if !in_summary {
                    note_player(&mut players, player);
                    tracker.observe(line);
                }
            }
            Line::TotalPot { amount } => {
                if total_pot.is_none() {
                    total_pot = *amount;
                }
            }
            Line::HoleCardsMarker => {}
        }
    }

    let timeline = tracker.finish();
    let positions = seats::assign_positions(&seats_map, button_seat);
    let showdown = ShowdownInfo {
        seen: !timeline.shows.is_empty(),
        mandatory: showdown_section && !timeline.shows.is_empty(),
    };

    let target_name = target::resolve(opponent, &players).cloned();
    let target = target_name
        .as_ref()
        .map(|name| summarize(name, &positions, &timeline, &board));
    let primary_opponent = timeline
        .shows
        .iter()
        .find(|show| Some(&show.player) != target_name.as_ref())
        .map(|show| summarize(&show.player, &positions, &timeline, &board));

    ParseResult {
        hand_id,
        variant,
        blinds,
        board,
        players,
        seats: seats_map,
        button_seat,
        positions,
        timeline,
        total_pot,
        showdown,
        target,
        primary_opponent,
    }
}

fn note_player(players: &mut Vec<String>, name: &str) {
    if !players.iter().any(|p| p == name) {
        players.push(name.to_string());
    }
}

fn derive_blinds(classified: &[Line]) -> Blinds {
    let mut blinds = Blinds::default();
    for line in classified {
        if let Line::Header {
            small_blind,
            big_blind,
            ..
        } = line
        {
            blinds.small_blind = *small_blind;
            blinds.big_blind = *big_blind;
            break;
        }
    }
    for line in classified {
        if let Line::Action {
            kind,
            amount: Some(amount),
            ..
        } = line
        {
            match kind {
                crate::events::ActionKind::SmallBlind if blinds.small_blind.is_none() => {
                    blinds.small_blind = Some(*amount);
                }
                crate::events::ActionKind::BigBlind if blinds.big_blind.is_none() => {
                    blinds.big_blind = Some(*amount);
                }
                _ => {}
            }
        }
    }
    blinds
}

fn absorb_marker(board: &mut Board, street: Street, cards: &[Card]) {
    match street {
        Street::Preflop => {}
        Street::Flop => {
            if board.flop.len() < 3 {
                board.flop = cards.iter().copied().take(3).collect();
            }
        }
        Street::Turn => {
            if board.flop.is_empty() && cards.len() >= 4 {
                board.flop = cards[..3].to_vec();
            }
            if board.turn.is_none() {
                board.turn = if cards.len() >= 4 {
                    Some(cards[3])
                } else {
                    cards.last().copied()
                };
            }
        }
        Street::River => {
            if board.flop.is_empty() && cards.len() >= 5 {
                board.flop = cards[..3].to_vec();
            }
            if board.turn.is_none() && cards.len() >= 5 {
                board.turn = Some(cards[3]);
            }
            if board.river.is_none() {
                board.river = if cards.len() >= 5 {
                    Some(cards[4])
                } else {
                    cards.last().copied()
                };
            }
        }
    }
}

fn summarize(
    name: &str,
    positions: &HashMap<String, String>,
    timeline: &Timeline,
    board: &Board,
) -> PlayerSummary {
    let cards: Vec<Card> = timeline
        .shows
        .iter()
        .find(|show| show.player == name)
        .map(|show| show.cards.clone())
        .unwrap_or_default();
    let classes = StreetClasses {
        flop: strength::classify(&cards, &board.upto(Street::Flop)),
        turn: strength::classify(&cards, &board.upto(Street::Turn)),
        river: strength::classify(&cards, &board.upto(Street::River)),
    };
    PlayerSummary {
        name: name.to_string(),
        position: positions.get(name).cloned(),
        cards,
        classes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_prefixes_require_complete_earlier_streets() {
        let board = Board {
            flop: vec!["Kd".parse().unwrap(), "6h".parse().unwrap()],
            turn: Some("4d".parse().unwrap()),
            river: None,
        };
        assert!(board.upto(Street::Flop).is_empty());
        assert!(board.upto(Street::Turn).is_empty());

        let board = Board {
            flop: vec![
                "Kd".parse().unwrap(),
                "6h".parse().unwrap(),
                "5c".parse().unwrap(),
            ],
            turn: None,
            river: Some("7c".parse().unwrap()),
        };
        assert_eq!(board.upto(Street::Flop).len(), 3);
        assert!(board.upto(Street::Turn).is_empty());
        assert!(board.upto(Street::River).is_empty());
    }

    #[test]
    fn parse_of_empty_text_degrades_to_empty_result() {
        let result = parse("", "anyone");
        assert!(result.players.is_empty());
        assert!(result.target.is_none());
        assert_eq!(result.timeline.final_pot, 0.0);
        assert!(!result.showdown.seen);
    }
}
