use crate::normalizer::RawRecord;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for everything that yields raw listing records.
/// CSV exports, database dumps and the live Supabase table all sit behind it.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every raw record, in source order
    async fn fetch(&self) -> Result<Vec<RawRecord>>;

    /// Get the name of the source
    fn source_name(&self) -> &'static str;
}
