pub mod line;
pub mod resistance;

pub use line::{parse_day, ResistanceLine};
pub use resistance::{RemoveOutcome, ResistanceStore, DEFAULT_STORE_FILE};
