use hand_notes::{NoteFields, merge, normalize_units, parse};

const SIX_MAX_HAND: &str = "\
PokerStars Hand #2291044329: 5 Card Omaha No Limit ($3/$6 USD) - 2024/05/11 21:03:11 ET
Table 'Dione' 6-max Seat #6 is the button
Seat 1: blindside_ben (600 in chips)
Seat 2: hero778899 (840 in chips)
Seat 3: utg_uri (612 in chips)
Seat 4: hj_harper (590 in chips)
Seat 5: co_cortez (655 in chips)
Seat 6: btn_bishop (720 in chips)
blindside_ben: posts the ante 6
hero778899: posts the ante 6
utg_uri: posts the ante 6
hj_harper: posts the ante 6
co_cortez: posts the ante 6
btn_bishop: posts the ante 6
blindside_ben: posts small blind 3
hero778899: posts big blind 6
*** HOLE CARDS ***
utg_uri: calls 6
hj_harper: calls 6
co_cortez: folds
btn_bishop: calls 6
blindside_ben: calls 3
hero778899: raises 90 to 96
utg_uri: folds
hj_harper: folds
btn_bishop: calls 90
blindside_ben: calls 90
*** FLOP *** [Kd 6h 5c]
hero778899: bets 252
btn_bishop: calls 252
blindside_ben: folds
*** TURN *** [Kd 6h 5c] [4d]
hero778899: checks
btn_bishop: checks
*** RIVER *** [Kd 6h 5c 4d] [7c]
hero778899: checks
btn_bishop: bets 420
hero778899: calls 420
*** SHOW DOWN ***
hero778899: shows [8h 7d 6s 3c 2d] (a straight, Four to Eight)
btn_bishop: shows [Ks Kc Qs Jh 9s] (three of a kind, Kings)
*** SUMMARY ***
Total pot 1680 | Rake 0
";

const VOLUNTARY_SHOW_HAND: &str = "\
PokerStars Hand #2291099555: 5 Card Omaha No Limit ($3/$6 USD) - 2024/05/13 22:12:45 ET
Table 'Metis' 6-max Seat #1 is the button
Seat 1: opp_owen (624 in chips)
Seat 2: hero9001 (588 in chips)
opp_owen: posts small blind 3
hero9001: posts big blind 6
*** HOLE CARDS ***
opp_owen: calls 3
hero9001: checks
*** FLOP *** [Qh 8c 3d]
hero9001: checks
opp_owen: checks
*** TURN *** [Qh 8c 3d] [Jh]
hero9001: checks
opp_owen: checks
*** RIVER *** [Qh 8c 3d Jh] [2s]
hero9001: checks
opp_owen: checks
hero9001: shows [As Kd 9h 4c 2c]
*** SUMMARY ***
Total pot 12 | Rake 0
";

fn fields(preflop: &str, flop: &str, turn: &str, river: &str) -> NoteFields {
    NoteFields {
        preflop: preflop.to_string(),
        flop: flop.to_string(),
        turn: turn.to_string(),
        river: river.to_string(),
        presupposition: String::new(),
    }
}

#[test]
fn raw_amounts_rewrite_into_street_units() {
    let result = parse(SIX_MAX_HAND, "778899");
    let raw = fields("r 96 loose", "cb 252", "", "c 420 station");
    let normalized = normalize_units(&raw, &result);

    // Preflop in big blinds, postflop in percent of pot.
    assert_eq!(normalized.preflop, "r 16 loose");
    assert_eq!(normalized.flop, "cb 75");
    assert_eq!(normalized.river, "c 33 station");
}

#[test]
fn unit_rewrite_uses_target_amounts_only() {
    let result = parse(SIX_MAX_HAND, "778899");
    let raw = fields("", "", "", "c 420");
    let normalized = normalize_units(&raw, &result);

    // 420 into the 1260 the target faced, not the bettor's share of the
    // smaller pot he fired into.
    assert_eq!(normalized.river, "c 33");
}

#[test]
fn glued_prefix_amounts_rewrite_too() {
    let result = parse(SIX_MAX_HAND, "778899");
    let raw = fields("r96", "cb252", "", "");
    let normalized = normalize_units(&raw, &result);

    assert_eq!(normalized.preflop, "r16");
    assert_eq!(normalized.flop, "cb75");
}

#[test]
fn amounts_without_an_action_prefix_stay_put() {
    let result = parse(SIX_MAX_HAND, "778899");
    let raw = fields("stack 96", "", "", "");
    let normalized = normalize_units(&raw, &result);

    assert_eq!(normalized.preflop, "stack 96");
}

#[test]
fn merge_replaces_streets_and_marks_mandatory_showdown() {
    let result = parse(SIX_MAX_HAND, "778899");
    let raw = fields("bb r 96 (16bb)", "cb 252 _tmp", "", "he showed it");
    let merged = merge(&raw, &result);

    assert_eq!(
        merged.preflop,
        "BB R16 8h7d6s3c2d / UTG c1 / HJ c1 / BTN c15 / SB c15"
    );
    assert_eq!(
        merged.river,
        "BB c33 8h7d6s3c2d_str onKd6h5c4d7c / BTN b50_set sd"
    );
    // Reveal wording is dropped once the showdown itself is recorded.
    assert!(!merged.river.contains("showed"));
}

#[test]
fn voluntary_reveal_keeps_showed_and_skips_sd() {
    let result = parse(VOLUNTARY_SHOW_HAND, "9001");
    assert!(result.showdown.seen);
    assert!(!result.showdown.mandatory);

    let merged = merge(&NoteFields::default(), &result);
    assert_eq!(
        merged.river,
        "BB x AsKd9h4c2c_p onQh8c3dJh2s showed / BTN xb"
    );
    assert!(!merged.river.ends_with("sd"));
}

#[test]
fn unresolved_target_passes_notes_through_unchanged() {
    let result = parse(SIX_MAX_HAND, "zz_totally_unknown");
    assert!(result.target.is_none());

    let raw = NoteFields {
        preflop: "limp pot".to_string(),
        flop: String::new(),
        turn: "b 40 (12bb) _x ok".to_string(),
        river: "he bet big and I called".to_string(),
        presupposition: "loose caller".to_string(),
    };
    let merged = merge(&raw, &result);
    assert_eq!(merged, raw);

    let normalized = normalize_units(&raw, &result);
    assert_eq!(normalized, raw);
}
