pub mod cards;
pub mod enrich;
pub mod events;
pub mod lines;
pub mod notes;
pub mod parser;
pub mod seats;
pub mod strength;
pub mod target;

pub use enrich::{NoteFields, merge, normalize_units};
pub use notes::{StreetNotes, synthesize};
pub use parser::{ParseResult, parse};
