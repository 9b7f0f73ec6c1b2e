use itertools::Itertools;

use crate::cards::{Card, Suit, board_paired, flush_prone, standard_deck};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

/// Category plus the straight top card, the only tie-break this variant's
/// classification needs. Field order drives the derived ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score {
    pub category: HandCategory,
    pub straight_high: u8,
}

fn suit_index(suit: Suit) -> usize {
    match suit {
        Suit::Clubs => 0,
        Suit::Diamonds => 1,
        Suit::Hearts => 2,
        Suit::Spades => 3,
    }
}

/// Scores exactly five cards. Ace plays both high and low for straights.
pub fn score_five(cards: &[Card; 5]) -> Score {
    let mut counts = [0u8; 15];
    let mut suits = [0u8; 4];
    for card in cards {
        counts[card.rank_value() as usize] += 1;
        suits[suit_index(card.suit)] += 1;
    }
    let is_flush = suits.contains(&5);

    let mut mask: u32 = 0;
    for rank_value in 2u8..=14 {
        if counts[rank_value as usize] > 0 {
            mask |= 1 << rank_value as u32;
            if rank_value == 14 {
                mask |= 1 << 1; // wheel support
            }
        }
    }
    let mut straight_high = 0u8;
    for high in (5u8..=14).rev() {
        let needed: u32 = (0..5u8).map(|i| 1 << (high - i) as u32).sum();
        if mask & needed == needed {
            straight_high = high;
            break;
        }
    }

    let mut pairs = 0u8;
    let mut trips = false;
    let mut quads = false;
    for count in counts {
        match count {
            2 => pairs += 1,
            3 => trips = true,
            4 => quads = true,
            _ => {}
        }
    }

    let category = if is_flush && straight_high > 0 {
        HandCategory::StraightFlush
    } else if quads {
        HandCategory::FourOfAKind
    } else if trips && pairs > 0 {
        HandCategory::FullHouse
    } else if is_flush {
        HandCategory::Flush
    } else if straight_high > 0 {
        HandCategory::Straight
    } else if trips {
        HandCategory::ThreeOfAKind
    } else if pairs == 2 {
        HandCategory::TwoPair
    } else if pairs == 1 {
        HandCategory::OnePair
    } else {
        HandCategory::HighCard
    };

    let straight_high = match category {
        HandCategory::Straight | HandCategory::StraightFlush => straight_high,
        _ => 0,
    };
    Score {
        category,
        straight_high,
    }
}

/// Best five-card hand built from exactly two hole cards and three board
/// cards, the combination rule of this variant. `None` when either side is
/// too short to form a legal hand.
pub fn best_hand(hole: &[Card], board: &[Card]) -> Option<Score> {
    if hole.len() < 2 || board.len() < 3 {
        return None;
    }
    let mut best: Option<Score> = None;
    for hole_pair in hole.iter().copied().combinations(2) {
        for board_trio in board.iter().copied().combinations(3) {
            let five = [
                hole_pair[0],
                hole_pair[1],
                board_trio[0],
                board_trio[1],
                board_trio[2],
            ];
            let score = score_five(&five);
            best = Some(match best {
                Some(current) => current.max(score),
                None => score,
            });
        }
    }
    best
}

pub fn category_token(category: HandCategory) -> &'static str {
    match category {
        HandCategory::HighCard => "air",
        HandCategory::OnePair => "p",
        HandCategory::TwoPair => "2p",
        HandCategory::ThreeOfAKind => "set",
        HandCategory::Straight => "str",
        HandCategory::Flush => "flush",
        HandCategory::FullHouse => "full",
        HandCategory::FourOfAKind => "quads",
        HandCategory::StraightFlush => "strflush",
    }
}

/// Highest straight top card any two undealt cards can make against this
/// board. The search reuses the same five-card scorer; with a full board and
/// dead cards it stays within C(47,2) evaluations.
pub fn max_straight_high(board: &[Card], dead: &[Card]) -> u8 {
    let deck: Vec<Card> = standard_deck()
        .into_iter()
        .filter(|c| !board.contains(c) && !dead.contains(c))
        .collect();
    let mut best = 0u8;
    for holding in deck.iter().copied().combinations(2) {
        if let Some(score) = best_hand(&holding, board)
            && matches!(
                score.category,
                HandCategory::Straight | HandCategory::StraightFlush
            )
        {
            best = best.max(score.straight_high);
        }
    }
    best
}

/// Compact classification token for one revealed player on one street. Empty
/// when the board subset or the holding is too short. A straight upgrades to
/// `nutstr` only on unpaired, flush-safe boards where no undealt holding
/// beats its top card.
pub fn classify(hole: &[Card], board: &[Card]) -> String {
    let Some(score) = best_hand(hole, board) else {
        return String::new();
    };
    if score.category == HandCategory::Straight
        && !board_paired(board)
        && !flush_prone(board)
        && score.straight_high >= max_straight_high(board, hole)
    {
        return "nutstr".to_string();
    }
    category_token(score.category).to_string()
}
