//! Column Schema Resolver
//!
//! The schema is the ordered list of encoded columns the model was trained
//! on. It comes from the model itself when the artifact carries feature
//! names, otherwise from a JSON fallback file. The chosen path is reported
//! as a [`SchemaSource`] so callers can log or display it.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::inference::ModelStore;
use crate::logic::features::layout::{compute_columns_hash, is_encoded_column, ENCODED_LAYOUT};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("column schema is empty")]
    Empty,

    #[error("column schema lists {0:?} more than once")]
    Duplicate(String),

    #[error("failed to read schema file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("schema has {schema} columns but the model expects {model} inputs")]
    WidthMismatch { schema: usize, model: usize },
}

// ============================================================================
// COLUMN SCHEMA
// ============================================================================

/// Ordered, duplicate-free list of column names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    columns: Vec<String>,
    hash: u32,
}

impl ColumnSchema {
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(SchemaError::Duplicate(column.clone()));
            }
        }

        let hash = compute_columns_hash(&columns);
        Ok(Self { columns, hash })
    }

    /// Read a JSON array of column names
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let columns: Vec<String> = serde_json::from_str(&text).map_err(|source| SchemaError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Self::new(columns)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false; an empty schema cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// CRC32 of the ordered column names
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Columns the encoder can never fill (always 0)
    pub fn unknown_columns(&self) -> Vec<&str> {
        self.iter().filter(|c| !is_encoded_column(c)).collect()
    }

    /// Encoder columns the model will never see
    pub fn missing_columns(&self) -> Vec<&'static str> {
        ENCODED_LAYOUT
            .iter()
            .copied()
            .filter(|c| !self.contains(c))
            .collect()
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Where the resolved schema came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum SchemaSource {
    FromModel,
    FromFile(PathBuf),
}

impl fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaSource::FromModel => f.write_str("model"),
            SchemaSource::FromFile(path) => write!(f, "file {}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSchema {
    pub schema: ColumnSchema,
    pub source: SchemaSource,
}

/// Resolve the column schema: model introspection first, then `fallback`
///
/// Introspection problems only trigger the fallback. Errors reading or
/// parsing the fallback file are returned.
pub fn resolve(model: &dyn ModelStore, fallback: &Path) -> Result<ResolvedSchema, SchemaError> {
    if let Some(schema) = from_model(model) {
        return Ok(ResolvedSchema {
            schema,
            source: SchemaSource::FromModel,
        });
    }

    log::debug!("Reading column schema from {}", fallback.display());
    let schema = ColumnSchema::from_file(fallback)?;

    Ok(ResolvedSchema {
        schema,
        source: SchemaSource::FromFile(fallback.to_path_buf()),
    })
}

fn from_model(model: &dyn ModelStore) -> Option<ColumnSchema> {
    match model.feature_names() {
        Ok(Some(names)) if !names.is_empty() => match ColumnSchema::new(names) {
            Ok(schema) => Some(schema),
            Err(e) => {
                log::debug!("Model feature names rejected ({}), using fallback file", e);
                None
            }
        },
        Ok(_) => {
            log::debug!("Model carries no feature names, using fallback file");
            None
        }
        Err(e) => {
            log::debug!("Model introspection failed ({}), using fallback file", e);
            None
        }
    }
}

/// Reject a schema whose width differs from the model's known input width,
/// and warn about vocabulary drift
pub fn check_consistency(schema: &ColumnSchema, model: &dyn ModelStore) -> Result<(), SchemaError> {
    if let Some(width) = model.input_width() {
        if width != schema.len() {
            return Err(SchemaError::WidthMismatch {
                schema: schema.len(),
                model: width,
            });
        }
    }

    for column in schema.unknown_columns() {
        log::warn!("Schema column {:?} is never produced by the encoder; it will always be 0", column);
    }
    for column in schema.missing_columns() {
        log::warn!("Encoder column {:?} is not in the schema and will be dropped", column);
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
