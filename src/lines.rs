use crate::cards::Card;
use crate::events::{ActionKind, Street};

/// One recognized hand-history line. Anything else is dropped by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Header {
        hand_id: String,
        variant: Option<String>,
        small_blind: Option<f64>,
        big_blind: Option<f64>,
    },
    Seat {
        number: u32,
        player: String,
    },
    Button {
        seat: u32,
    },
    HoleCardsMarker,
    StreetMarker {
        street: Street,
        cards: Vec<Card>,
    },
    ShowdownMarker,
    SummaryMarker,
    Action {
        player: String,
        kind: ActionKind,
        amount: Option<f64>,
        to_amount: Option<f64>,
        cards: Vec<Card>,
    },
    TotalPot {
        amount: Option<f64>,
    },
}

/// Classifies one trimmed line of hand-history text. Unrecognized lines map
/// to `None`; the parser is tolerant, not validating.
pub fn classify(raw: &str) -> Option<Line> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    if line.contains("*** HOLE CARDS ***") {
        return Some(Line::HoleCardsMarker);
    }
    if line.contains("*** FLOP ***") {
        return Some(Line::StreetMarker {
            street: Street::Flop,
            cards: bracket_cards(line),
        });
    }
    if line.contains("*** TURN ***") {
        return Some(Line::StreetMarker {
            street: Street::Turn,
            cards: bracket_cards(line),
        });
    }
    if line.contains("*** RIVER ***") {
        return Some(Line::StreetMarker {
            street: Street::River,
            cards: bracket_cards(line),
        });
    }
    if line.contains("*** SHOW DOWN ***") || line.contains("*** SHOWDOWN ***") {
        return Some(Line::ShowdownMarker);
    }
    if line.contains("*** SUMMARY ***") {
        return Some(Line::SummaryMarker);
    }
    if line.contains("is the button")
        && let Some(rest) = line.split("Seat #").nth(1)
    {
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        if let Ok(seat) = digits.parse() {
            return Some(Line::Button { seat });
        }
    }
    if let Some(rest) = line.strip_prefix("Seat ")
        && let Some((number_part, name_part)) = rest.split_once(':')
        && let Ok(number) = number_part.trim().parse::<u32>()
    {
        let name_part = name_part.trim();
        let player = match name_part.rfind(" (") {
            Some(idx) => name_part[..idx].trim(),
            None => name_part,
        };
        if !player.is_empty() {
            return Some(Line::Seat {
                number,
                player: player.to_string(),
            });
        }
        return None;
    }
    if let Some(rest) = line.strip_prefix("Total pot") {
        return Some(Line::TotalPot {
            amount: first_money(rest),
        });
    }
    if line.contains("Hand #") {
        return Some(parse_header(line));
    }
    if let Some((player, rest)) = line.split_once(": ") {
        return parse_action(player.trim(), rest.trim());
    }
    None
}

fn parse_header(line: &str) -> Line {
    let after = line.split("Hand #").nth(1).unwrap_or("");
    let hand_id: String = after
        .chars()
        .take_while(|c| *c != ':' && !c.is_whitespace())
        .collect();
    let remainder = after
        .split_once(':')
        .map(|(_, rest)| rest.trim())
        .unwrap_or("");
    let variant = remainder
        .split('(')
        .next()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    // Blinds live in the first parenthesized a/b group, e.g. "($3/$6 USD)".
    let mut small_blind = None;
    let mut big_blind = None;
    for group in line.split('(').skip(1) {
        let Some(inner) = group.split(')').next() else {
            continue;
        };
        if let Some((small, big)) = inner.split_once('/') {
            let small = money_value(small);
            let big = money_value(big.split_whitespace().next().unwrap_or(big));
            if small.is_some() && big.is_some() {
                small_blind = small;
                big_blind = big;
                break;
            }
        }
    }
    Line::Header {
        hand_id,
        variant,
        small_blind,
        big_blind,
    }
}

fn parse_action(player: &str, rest: &str) -> Option<Line> {
    if player.is_empty() {
        return None;
    }
    let verbs: [(&str, ActionKind); 10] = [
        ("posts the ante", ActionKind::Ante),
        ("posts ante", ActionKind::Ante),
        ("posts small blind", ActionKind::SmallBlind),
        ("posts big blind", ActionKind::BigBlind),
        ("posts straddle", ActionKind::Straddle),
        ("posts a straddle", ActionKind::Straddle),
        ("checks", ActionKind::Check),
        ("folds", ActionKind::Fold),
        ("calls", ActionKind::Call),
        ("bets", ActionKind::Bet),
    ];
    for (verb, kind) in verbs {
        if let Some(tail) = rest.strip_prefix(verb) {
            return Some(Line::Action {
                player: player.to_string(),
                kind,
                amount: first_money(tail),
                to_amount: None,
                cards: Vec::new(),
            });
        }
    }
    if let Some(tail) = rest.strip_prefix("raises") {
        let amount = first_money(tail);
        let to_amount = tail.split(" to ").nth(1).and_then(first_money);
        return Some(Line::Action {
            player: player.to_string(),
            kind: ActionKind::Raise,
            amount,
            to_amount,
            cards: Vec::new(),
        });
    }
    if let Some(tail) = rest.strip_prefix("shows") {
        return Some(Line::Action {
            player: player.to_string(),
            kind: ActionKind::Show,
            amount: None,
            to_amount: None,
            cards: bracket_cards(tail),
        });
    }
    // Generic action-line shape with an unknown verb.
    Some(Line::Action {
        player: player.to_string(),
        kind: ActionKind::Other,
        amount: None,
        to_amount: None,
        cards: Vec::new(),
    })
}

/// Numeric value of one money token, stripping currency symbols and thousands
/// separators. Unparsable tokens resolve to `None` rather than erroring.
pub fn money_value(token: &str) -> Option<f64> {
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    cleaned.parse().ok()
}

/// First numeric token in the text, if any.
pub fn first_money(text: &str) -> Option<f64> {
    text.split_whitespace().find_map(money_value)
}

/// Every card token inside `[...]` groups, ignoring anything unparsable.
pub fn bracket_cards(text: &str) -> Vec<Card> {
    let mut cards = Vec::new();
    for group in text.split('[').skip(1) {
        let Some(inner) = group.split(']').next() else {
            continue;
        };
        for token in inner.split_whitespace() {
            if let Ok(card) = token.parse() {
                cards.push(card);
            }
        }
    }
    cards
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_seat_and_button_lines() {
        assert_eq!(
            classify("Seat 2: hero778899 (600 in chips)"),
            Some(Line::Seat {
                number: 2,
                player: "hero778899".to_string(),
            })
        );
        assert_eq!(
            classify("Table 'Dione' 6-max Seat #6 is the button"),
            Some(Line::Button { seat: 6 })
        );
    }

    #[test]
    fn classifies_street_markers_with_board_cards() {
        let flop = classify("*** FLOP *** [Kd 6h 5c]").unwrap();
        match flop {
            Line::StreetMarker { street, cards } => {
                assert_eq!(street, Street::Flop);
                assert_eq!(cards.len(), 3);
            }
            other => panic!("unexpected line {other:?}"),
        }
        let turn = classify("*** TURN *** [Kd 6h 5c] [4d]").unwrap();
        match turn {
            Line::StreetMarker { street, cards } => {
                assert_eq!(street, Street::Turn);
                assert_eq!(cards.len(), 4);
                assert_eq!(cards[3].notation(), "4d");
            }
            other => panic!("unexpected line {other:?}"),
        }
    }

    #[test]
    fn classifies_action_lines_and_amounts() {
        assert_eq!(
            classify("utg_uri: calls $1,250"),
            Some(Line::Action {
                player: "utg_uri".to_string(),
                kind: ActionKind::Call,
                amount: Some(1250.0),
                to_amount: None,
                cards: Vec::new(),
            })
        );
        assert_eq!(
            classify("hero778899: raises 90 to 96"),
            Some(Line::Action {
                player: "hero778899".to_string(),
                kind: ActionKind::Raise,
                amount: Some(90.0),
                to_amount: Some(96.0),
                cards: Vec::new(),
            })
        );
        // Unknown verb keeps the generic shape.
        assert_eq!(
            classify("hero778899: is sitting out"),
            Some(Line::Action {
                player: "hero778899".to_string(),
                kind: ActionKind::Other,
                amount: None,
                to_amount: None,
                cards: Vec::new(),
            })
        );
    }

    #[test]
    fn header_extracts_id_variant_and_blinds() {
        let line = "PokerStars Hand #2291044329: 5 Card Omaha No Limit ($3/$6 USD) - 2024/05/11";
        match classify(line).unwrap() {
            Line::Header {
                hand_id,
                variant,
                small_blind,
                big_blind,
            } => {
                assert_eq!(hand_id, "2291044329");
                assert_eq!(variant.as_deref(), Some("5 Card Omaha No Limit"));
                assert_eq!(small_blind, Some(3.0));
                assert_eq!(big_blind, Some(6.0));
            }
            other => panic!("unexpected line {other:?}"),
        }
    }

    #[test]
    fn unparsable_money_degrades_to_none() {
        assert_eq!(money_value("$--"), None);
        assert_eq!(money_value("1,250"), Some(1250.0));
        assert_eq!(
            classify("utg_uri: calls next time"),
            Some(Line::Action {
                player: "utg_uri".to_string(),
                kind: ActionKind::Call,
                amount: None,
                to_amount: None,
                cards: Vec::new(),
            })
        );
    }

    #[test]
    fn garbage_lines_are_dropped() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("Dealt to hero778899 [8h 7d 6s 3c 2d]"), None);
        assert_eq!(classify("Uncalled bet (120) returned to hero778899"), None);
    }
}
