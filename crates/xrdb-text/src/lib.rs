//! Text layer for the X resource database.
//!
//! Turns resource file text into `(specifier, value)` records and splits
//! specifiers and lookup paths into components. Nothing here knows about
//! the trie that stores the records.

mod records;
mod specifier;

pub use records::{decode_value, encode_value, parse_records, Record, Records};
pub use specifier::{join_specifier, split_path, split_specifier, Binding, SpecifierError};
