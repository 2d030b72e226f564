use crate::normalizer::RawRecord;
use crate::sources::traits::RecordSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Listing export in CSV form, one property per row.
///
/// Header padding such as a trailing space is kept and left for the
/// normalizer to resolve. The reader strips a leading BOM itself.
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse CSV text into raw records. Blank lines are skipped and malformed
/// rows are logged and dropped.
pub fn parse_records(text: &str) -> Result<Vec<RawRecord>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(::csv::Trim::Fields)
        .from_reader(text.as_bytes());

    let headers = reader
        .byte_headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect::<Vec<_>>();

    debug!("CSV headers: {:?}", headers);

    let mut records = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping malformed CSV row {}: {}", line + 1, e);
                continue;
            }
        };
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| (header.clone(), Value::String(cell.to_string())))
            .collect();
        records.push(record);
    }

    Ok(records)
}

#[async_trait]
impl RecordSource for CsvSource {
    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        info!("Reading listings from {}", self.path.display());

        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let records = parse_records(&text)?;

        info!("📊 Found {} records in CSV", records.len());
        Ok(records)
    }

    fn source_name(&self) -> &'static str {
        "CSV"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::Fields;
    use std::io::Write;

    const LISTING: &str = "\u{FEFF}type,property_id,address,district,price,occupation ,room type\n\
勞工舍宿,dorm-001,旺角西洋菜南街166號,旺角,3500,90%,shared room\n\
\n\
學生宿舍,dorm-002,彌敦道186號,佐敦,4200,85%,private room\n";

    #[test]
    fn test_header_padding_kept_and_bom_stripped() {
        let records = parse_records(LISTING).unwrap();
        assert_eq!(records.len(), 2);

        let first = Fields::new(&records[0]);
        assert_eq!(first.string(&["type"]).as_deref(), Some("勞工舍宿"));
        assert_eq!(first.string(&["occupation"]).as_deref(), Some("90%"));
        assert!(records[0].contains_key("occupation "));
        assert!(records[0].contains_key("type"));
        assert_eq!(records[0].get("room type"), Some(&Value::String("shared room".into())));
        assert_eq!(records[1].get("property_id"), Some(&Value::String("dorm-002".into())));
    }

    #[test]
    fn test_short_rows_keep_present_cells() {
        let records = parse_records("property_id,address,district\ndorm-009,灣仔道1號\n").unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].get("district").is_none());
    }

    #[tokio::test]
    async fn test_fetch_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LISTING.as_bytes()).unwrap();

        let source = CsvSource::new(file.path());
        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(source.source_name(), "CSV");
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let source = CsvSource::new("/nonexistent/listing.csv");
        assert!(source.fetch().await.is_err());
    }
}
