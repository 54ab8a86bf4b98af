//! Effective resource database with provenance
//!
//! The effective database is the merge of every contributing source,
//! plus a record of where each layer came from.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::db::Database;

/// Origin of a resource source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceOrigin {
    Host,
    File,
    Cli,
}

/// A contributing resource source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSource {
    /// Origin of this source
    pub origin: ResourceOrigin,

    /// File path (None for cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Number of records read from this source
    pub records: usize,
}

/// Merged resources from all layers
#[derive(Debug, Clone)]
pub struct EffectiveResources {
    /// The merged database
    pub database: Database<String>,

    /// Contributing sources in precedence order
    pub sources: Vec<ResourceSource>,
}

/// Host resource file: `$XENVIRONMENT` if set, else `~/.Xdefaults`
pub fn default_host_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("XENVIRONMENT") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".Xdefaults"))
}

/// Load a resource file into a fresh database
pub fn load_file(path: &Path) -> Result<Database<String>, ConfigError> {
    let (db, _) = load_counted(path)?;
    Ok(db)
}

/// Load resources from an already open stream
pub fn load_reader<R: Read>(mut reader: R) -> Result<Database<String>, ConfigError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| ConfigError::IoError(e.to_string()))?;
    let (db, _) = parse_bytes(bytes)?;
    Ok(db)
}

fn load_counted(path: &Path) -> Result<(Database<String>, usize), ConfigError> {
    let bytes = fs::read(path)
        .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
    parse_bytes(bytes)
}

fn parse_bytes(bytes: Vec<u8>) -> Result<(Database<String>, usize), ConfigError> {
    let contents = String::from_utf8(bytes)
        .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

    let mut db = Database::new();
    let records = db.insert_string(&contents);
    Ok((db, records))
}

impl EffectiveResources {
    /// Build effective resources from layers
    ///
    /// A missing host file is skipped; a missing explicit file is an error.
    pub fn build(
        host_path: Option<&Path>,
        files: &[PathBuf],
        xrm: &[String],
    ) -> Result<Self, ConfigError> {
        let mut database = Database::new();
        let mut sources = Vec::new();

        // Layer 1: Host resources
        if let Some(path) = host_path {
            if path.exists() {
                let (layer, records) = load_counted(path)?;
                database.update(&layer);
                sources.push(ResourceSource {
                    origin: ResourceOrigin::Host,
                    path: Some(path.to_string_lossy().to_string()),
                    records,
                });
            } else {
                tracing::debug!(path = %path.display(), "host resource file not found");
            }
        }

        // Layer 2: Explicit files
        for path in files {
            let (layer, records) = load_counted(path)?;
            database.update(&layer);
            sources.push(ResourceSource {
                origin: ResourceOrigin::File,
                path: Some(path.to_string_lossy().to_string()),
                records,
            });
        }

        // Layer 3: Command-line resource lines
        if !xrm.is_empty() {
            let mut layer = Database::new();
            let records = xrm.iter().map(|line| layer.insert_string(line)).sum();
            database.update(&layer);
            sources.push(ResourceSource {
                origin: ResourceOrigin::Cli,
                path: None,
                records,
            });
        }

        tracing::debug!(
            layers = sources.len(),
            entries = database.len(),
            "built effective resources"
        );

        Ok(Self { database, sources })
    }

    /// Serialize entries and sources to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let entries: serde_json::Map<String, serde_json::Value> = self
            .database
            .entries()
            .into_iter()
            .map(|(spec, value)| (spec, serde_json::Value::String(value.clone())))
            .collect();

        serde_json::to_string_pretty(&serde_json::json!({
            "sources": self.sources,
            "resources": entries,
        }))
    }
}

/// Resource loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
