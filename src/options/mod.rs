//! X-style command-line option handling.
//!
//! Maps option flags to resource insertions. Each flag in an
//! [`OptionTable`] has an [`OptionSpec`] saying how many arguments it
//! consumes and what, if anything, it stores in the database. The
//! application name is prepended to every specifier, so `-bg red` for
//! `xterm` stores `xterm*background: red`.

use std::collections::BTreeMap;

use crate::db::Database;

/// Flag -> option behaviour.
pub type OptionTable = BTreeMap<String, OptionSpec>;

/// How one option flag is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSpec {
    /// Store a fixed value: `-synchronous` -> `*synchronous: on`.
    NoArg { specifier: String, value: String },
    /// Store the flag itself as the value.
    IsArg { specifier: String },
    /// Store the next argument as the value.
    SepArg { specifier: String },
    /// The next argument is a resource line, e.g. `-xrm '*font: fixed'`.
    ResArg,
    /// Ignore the flag and the next argument.
    SkipArg,
    /// Ignore the flag and everything after it.
    SkipLine,
    /// Ignore the flag and the next `n` arguments.
    SkipNArgs(usize),
}

/// Option parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    #[error("missing argument to option {0}")]
    MissingArgument(String),
}

impl OptionSpec {
    pub fn no_arg(specifier: &str, value: &str) -> Self {
        OptionSpec::NoArg {
            specifier: specifier.to_string(),
            value: value.to_string(),
        }
    }

    pub fn is_arg(specifier: &str) -> Self {
        OptionSpec::IsArg {
            specifier: specifier.to_string(),
        }
    }

    pub fn sep_arg(specifier: &str) -> Self {
        OptionSpec::SepArg {
            specifier: specifier.to_string(),
        }
    }

    /// Handle the option at `args[0]`, returning the arguments left over.
    pub fn apply<'a>(
        &self,
        name: &str,
        db: &mut Database<String>,
        args: &'a [String],
    ) -> Result<&'a [String], OptionError> {
        let flag = match args.first() {
            Some(flag) => flag,
            None => return Ok(args),
        };
        let next = || {
            args.get(1)
                .ok_or_else(|| OptionError::MissingArgument(flag.clone()))
        };

        match self {
            OptionSpec::NoArg { specifier, value } => {
                db.insert(&format!("{}{}", name, specifier), value.clone());
                Ok(&args[1..])
            }
            OptionSpec::IsArg { specifier } => {
                db.insert(&format!("{}{}", name, specifier), flag.clone());
                Ok(&args[1..])
            }
            OptionSpec::SepArg { specifier } => {
                let value = next()?;
                db.insert(&format!("{}{}", name, specifier), value.clone());
                Ok(&args[2..])
            }
            OptionSpec::ResArg => {
                let line = next()?;
                db.insert_string(line);
                Ok(&args[2..])
            }
            OptionSpec::SkipArg => Ok(&args[args.len().min(2)..]),
            OptionSpec::SkipLine => Ok(&args[args.len()..]),
            OptionSpec::SkipNArgs(count) => {
                let consumed = count.saturating_add(1).min(args.len());
                Ok(&args[consumed..])
            }
        }
    }
}

/// Apply options from `args` until one is not in `table`.
///
/// Returns the remaining arguments, starting with the first one that is
/// not a known option.
pub fn getopt<'a>(
    name: &str,
    db: &mut Database<String>,
    args: &'a [String],
    table: &OptionTable,
) -> Result<&'a [String], OptionError> {
    let mut rest = args;

    while let Some(flag) = rest.first() {
        let spec = match table.get(flag) {
            Some(spec) => spec,
            None => break,
        };
        tracing::trace!(flag = %flag, "applying option");
        rest = spec.apply(name, db, rest)?;
    }

    Ok(rest)
}

/// The options every X program understands.
pub fn standard_options() -> OptionTable {
    let mut table = OptionTable::new();
    table.insert("-bg".to_string(), OptionSpec::sep_arg("*background"));
    table.insert("-background".to_string(), OptionSpec::sep_arg("*background"));
    table.insert("-fg".to_string(), OptionSpec::sep_arg("*foreground"));
    table.insert("-foreground".to_string(), OptionSpec::sep_arg("*foreground"));
    table.insert("-fn".to_string(), OptionSpec::sep_arg("*font"));
    table.insert("-font".to_string(), OptionSpec::sep_arg("*font"));
    table.insert("-name".to_string(), OptionSpec::sep_arg(".name"));
    table.insert("-title".to_string(), OptionSpec::sep_arg(".title"));
    table.insert("-synchronous".to_string(), OptionSpec::no_arg("*synchronous", "on"));
    table.insert("-xrm".to_string(), OptionSpec::ResArg);
    table
}
