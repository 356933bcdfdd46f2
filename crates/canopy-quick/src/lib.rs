// ABOUTME: Quick search index and palette over the project tree and command list
// ABOUTME: Scoring sits behind the FuzzyMatcher trait with a nucleo implementation by default

pub mod commands;
pub mod fuzzy;
pub mod item;
pub mod matcher;
pub mod palette;

pub use commands::{CommandId, CommandOutcome, UnknownCommand};
pub use fuzzy::{FuzzyConfig, NucleoIndex, NucleoMatcher};
pub use item::{QuickItem, command_items, searchable_items};
pub use matcher::{FieldMatch, FuzzyMatcher, MatchField, QuickMatch, merge_spans};
pub use palette::{COMMAND_PREFIX, PaletteAction, PaletteKey, QuickPalette, QuickResult};
