/// Lowercase alphanumeric identity form of an opponent identifier. Idempotent
/// by construction: a normalized string maps to itself.
pub fn extract_identity(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Longest run of four or more consecutive digits, the most reliable
/// correlation key since the source format embeds numeric account ids in
/// player names.
pub fn longest_digit_run(raw: &str) -> Option<String> {
    let mut best: Option<String> = None;
    let mut current = String::new();
    for c in raw.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_digit() {
            current.push(c);
        } else {
            if current.len() >= 4 && best.as_ref().is_none_or(|b| current.len() > b.len()) {
                best = Some(current.clone());
            }
            current.clear();
        }
    }
    best
}

/// Resolves an externally supplied opponent identifier against the players
/// seen in one hand. Priority: embedded digit run, exact identity match,
/// identity containment in either direction. Name comparison goes through
/// `extract_identity`, so case and punctuation never block a match. First
/// match wins; no match degrades to `None`.
pub fn resolve<'a>(identifier: &str, players: &'a [String]) -> Option<&'a String> {
    let identifier = identifier.trim();
    if identifier.is_empty() || players.is_empty() {
        return None;
    }

    if let Some(run) = longest_digit_run(identifier)
        && let Some(player) = players.iter().find(|p| p.contains(&run))
    {
        return Some(player);
    }

    let wanted = extract_identity(identifier);
    if wanted.is_empty() {
        return None;
    }
    if let Some(player) = players.iter().find(|p| extract_identity(p) == wanted) {
        return Some(player);
    }

    players.iter().find(|p| {
        let name = extract_identity(p);
        !name.is_empty() && (name.contains(&wanted) || wanted.contains(&name))
    })
}
