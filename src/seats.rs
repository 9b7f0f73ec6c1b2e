use std::collections::{BTreeMap, HashMap};

/// Position labels by seat count, button first, then clockwise. Seat counts
/// outside the table fall back to the 6-max labels.
fn labels_for(count: usize) -> &'static [&'static str] {
    match count {
        2 => &["BTN", "BB"],
        3 => &["BTN", "SB", "BB"],
        4 => &["BTN", "SB", "BB", "UTG"],
        5 => &["BTN", "SB", "BB", "UTG", "CO"],
        7 => &["BTN", "SB", "BB", "UTG", "MP", "HJ", "CO"],
        8 => &["BTN", "SB", "BB", "UTG", "MP", "LJ", "HJ", "CO"],
        9 => &["BTN", "SB", "BB", "UTG", "UTG1", "MP", "LJ", "HJ", "CO"],
        _ => &["BTN", "SB", "BB", "UTG", "HJ", "CO"],
    }
}

/// Maps each seated player to a table-relative position label. The seat
/// ordering is rotated so the button seat comes first; without a usable
/// button seat the lowest seat number stands in. Players with no seat record
/// are absent from the result.
pub fn assign_positions(
    seats: &BTreeMap<u32, String>,
    button_seat: Option<u32>,
) -> HashMap<String, String> {
    let ordered: Vec<(&u32, &String)> = seats.iter().collect();
    if ordered.is_empty() {
        return HashMap::new();
    }
    let pivot = button_seat
        .and_then(|button| ordered.iter().position(|(seat, _)| **seat == button))
        .unwrap_or(0);
    let labels = labels_for(ordered.len());

    let mut positions = HashMap::with_capacity(ordered.len());
    for offset in 0..ordered.len() {
        let (_, player) = ordered[(pivot + offset) % ordered.len()];
        let label = labels
            .get(offset)
            .map(|l| (*l).to_string())
            .unwrap_or_else(|| format!("P{offset}"));
        positions.insert(player.clone(), label);
    }
    positions
}
