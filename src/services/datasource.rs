use std::collections::HashMap;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::api::error::AppError;
use crate::config::ImportConfig;
use crate::models::{FormFragment, ImportOutcome, SourceInfo};

/// Raw submitted form values, filtered down to the fields a data source
/// declares via [`DataSource::submittable_fields`].
#[derive(Debug, Default, Clone)]
pub struct SubmittedValues(HashMap<String, serde_json::Value>);

impl SubmittedValues {
    /// Builds the accessor from a raw JSON form body, keeping only the
    /// fields the source accepts.
    pub fn from_form(body: serde_json::Value, fields: &[&str]) -> Self {
        let mut values = HashMap::new();
        if let serde_json::Value::Object(map) = body {
            for (key, value) in map {
                if fields.contains(&key.as_str()) {
                    values.insert(key, value);
                }
            }
        }
        Self(values)
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }

    /// Checkbox-style lookup: absent or non-true values read as false.
    pub fn bool(&self, key: &str) -> bool {
        self.0.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }
}

/// Capability interface for bulk-import data sources.
///
/// Each implementation is one way of getting rows into a job-scoped staging
/// table; the platform picks a variant by name at import time.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Descriptive metadata for source selection.
    fn info(&self) -> SourceInfo;

    /// Field names this source accepts from raw submitted form data.
    fn submittable_fields(&self) -> &'static [&'static str];

    /// Render the source's configuration form fragment.
    fn build_form(&self, config: &ImportConfig) -> FormFragment;

    /// Load the selected data into a staging table owned by `job_id` and
    /// write the result metadata onto the job record.
    async fn initialize(
        &self,
        db: &SqlitePool,
        config: &ImportConfig,
        job_id: &str,
        values: &SubmittedValues,
    ) -> Result<ImportOutcome, AppError>;
}

/// All data sources the platform can offer.
pub fn registry() -> Vec<Arc<dyn DataSource>> {
    vec![Arc::new(super::upload_source::UploadDataSource)]
}

pub fn find(sources: &[Arc<dyn DataSource>], name: &str) -> Option<Arc<dyn DataSource>> {
    sources.iter().find(|s| s.info().name == name).cloned()
}
