//! Layered resource loading
//!
//! Builds the resource database a program actually sees by merging
//! sources in increasing precedence:
//! 1. Host/user resources ($XENVIRONMENT, else ~/.Xdefaults)
//! 2. Resource files given explicitly, in order
//! 3. Command-line resource lines (-xrm)

mod effective;

pub use effective::{
    default_host_path, load_file, load_reader, ConfigError, EffectiveResources, ResourceOrigin,
    ResourceSource,
};
