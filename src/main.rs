use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hand_notes::events::Street;
use hand_notes::{NoteFields, StreetNotes, merge, parse, synthesize};
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(
    name = "hand-notes",
    version,
    about = "Parse a hand history and synthesize per-street notes",
    author
)]
struct Cli {
    /// Hand history file ("-" reads stdin)
    history: PathBuf,

    /// Identifier of the player to take notes on (name fragment or number run)
    #[arg(long)]
    opponent: String,

    /// JSON file with hand-written notes to merge with the synthesized ones
    #[arg(long)]
    notes: Option<PathBuf>,

    /// Emit JSON instead of the text report
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Disable ANSI colors in CLI output
    #[arg(long = "no-color", default_value_t = false)]
    no_color: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
struct Report {
    hand_id: Option<String>,
    variant: Option<String>,
    target: Option<String>,
    position: Option<String>,
    notes: StreetNotes,
    #[serde(skip_serializing_if = "Option::is_none")]
    merged: Option<NoteFields>,
}

fn main() -> Result<()> {
    let _ = color_eyre::install();
    let cli = Cli::parse();

    let history = read_history(&cli.history)?;
    let result = parse(&history, &cli.opponent);
    let notes = synthesize(&result);

    let merged = match &cli.notes {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading notes file {}", path.display()))?;
            let fields: NoteFields =
                serde_json::from_str(&raw).context("parsing notes JSON")?;
            Some(merge(&fields, &result))
        }
        None => None,
    };

    let target_name = result.target.as_ref().map(|t| t.name.clone());
    let position = target_name
        .as_deref()
        .and_then(|name| result.positions.get(name).cloned());

    if cli.json {
        let report = Report {
            hand_id: result.hand_id.clone(),
            variant: result.variant.clone(),
            target: target_name,
            position,
            notes,
            merged,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(
        result.hand_id.as_deref(),
        target_name.as_deref(),
        position.as_deref(),
    );
    for street in Street::ALL {
        let line = notes.for_street(street);
        if line.is_empty() {
            continue;
        }
        print_street(street, line, cli.no_color);
    }
    if let Some(merged) = &merged {
        println!();
        println!("merged:");
        for (label, text) in [
            ("preflop", &merged.preflop),
            ("flop", &merged.flop),
            ("turn", &merged.turn),
            ("river", &merged.river),
            ("presup", &merged.presupposition),
        ] {
            if !text.is_empty() {
                println!("  {label:<7} {text}");
            }
        }
    }

    Ok(())
}

fn read_history(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading hand history from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(path).with_context(|| format!("reading hand history {}", path.display()))
}

fn print_report(hand_id: Option<&str>, target: Option<&str>, position: Option<&str>) {
    let id = hand_id.unwrap_or("unknown");
    match (target, position) {
        (Some(name), Some(pos)) => println!("hand {id}: notes on {name} ({pos})"),
        (Some(name), None) => println!("hand {id}: notes on {name}"),
        (None, _) => println!("hand {id}: target not found in this hand"),
    }
}

fn print_street(street: Street, line: &str, no_color: bool) {
    let label = format!("{street}");
    if no_color {
        println!("{label:<8} {line}");
    } else {
        println!("{:<8} {line}", label.cyan().bold());
    }
}
