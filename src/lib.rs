//! xrdb - X resource manager database
//!
//! This crate implements the X resource database: values stored under
//! dotted and starred specifiers (`xterm*vt100.background`) and looked up
//! by concrete name/class paths using the X precedence rules.

pub mod config;
pub mod db;
pub mod options;

pub use config::{ConfigError, EffectiveResources, ResourceOrigin, ResourceSource};
pub use db::{Database, DatabaseError};
pub use options::{getopt, standard_options, OptionError, OptionSpec, OptionTable};
pub use xrdb_text::{decode_value, encode_value, parse_records, split_path, split_specifier, Record};
