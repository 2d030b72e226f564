use crate::normalizer::RawRecord;
use crate::sources::traits::RecordSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};

/// JSON array of flat database rows, e.g. an export of the `properties` table.
pub struct JsonRowsSource {
    path: PathBuf,
}

impl JsonRowsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Split a JSON array into row objects. Elements that are not objects are
/// logged and skipped.
pub fn parse_rows(value: Value) -> Result<Vec<RawRecord>> {
    let rows = match value {
        Value::Array(rows) => rows,
        other => anyhow::bail!("Expected a JSON array of rows, got {}", type_name(&other)),
    };

    let records = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match row {
            Value::Object(map) => Some(map),
            other => {
                warn!("Skipping row {}: expected an object, got {}", index, type_name(&other));
                None
            }
        })
        .collect();

    Ok(records)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl RecordSource for JsonRowsSource {
    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        info!("Reading database rows from {}", self.path.display());

        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let value: Value = serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON in {}", self.path.display()))?;

        parse_rows(value)
    }

    fn source_name(&self) -> &'static str {
        "JSON rows"
    }
}
