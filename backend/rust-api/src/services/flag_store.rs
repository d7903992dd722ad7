use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;

use crate::error::QuizError;
use crate::models::{Flag, FlagRecord};
use crate::services::flag_client::FlagSource;
use crate::services::question_generator::OPTIONS_PER_QUESTION;

/// Turns a territory code into a displayable image reference
pub trait ImageResolver: Send + Sync {
    fn image_for(&self, code: &str) -> String;
}

/// Resolves images against a flagcdn-style `<base>/<code>.png` layout
#[derive(Debug, Clone)]
pub struct FlagCdnResolver {
    base_url: String,
}

impl FlagCdnResolver {
    pub const DEFAULT_BASE_URL: &'static str = "https://flagcdn.com/w320";

    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }
}

impl Default for FlagCdnResolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

impl ImageResolver for FlagCdnResolver {
    fn image_for(&self, code: &str) -> String {
        format!("{}/{}.png", self.base_url, code.to_lowercase())
    }
}

/// Immutable in-memory dataset, loaded once at startup
#[derive(Debug, Clone)]
pub struct FlagStore {
    flags: Vec<Flag>,
}

impl FlagStore {
    pub fn load(path: impl AsRef<Path>, resolver: &dyn ImageResolver) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read flags dataset {}", path.display()))?;
        let records: Vec<FlagRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse flags dataset {}", path.display()))?;

        let store = Self::from_records(records, resolver)?;
        tracing::info!("Loaded {} flags from {}", store.len(), path.display());
        Ok(store)
    }

    /// Validates the records and derives every image up front.
    pub fn from_records(records: Vec<FlagRecord>, resolver: &dyn ImageResolver) -> Result<Self> {
        if records.is_empty() {
            bail!("Flags dataset is empty");
        }

        let mut names = HashSet::new();
        let mut codes = HashSet::new();
        for (index, record) in records.iter().enumerate() {
            let name = record.name.trim();
            let code = record.code.trim();
            if name.is_empty() || code.is_empty() {
                bail!("Flag #{} has an empty name or code", index);
            }
            if !names.insert(name.to_string()) {
                bail!("Duplicate flag name: {}", name);
            }
            if !codes.insert(code.to_lowercase()) {
                bail!("Duplicate flag code: {}", code);
            }
        }

        if records.len() < OPTIONS_PER_QUESTION {
            tracing::warn!(
                "Only {} flags loaded, questions need at least {}",
                records.len(),
                OPTIONS_PER_QUESTION
            );
        }

        let flags = records
            .into_iter()
            .map(|record| {
                let record = FlagRecord {
                    name: record.name.trim().to_string(),
                    code: record.code.trim().to_string(),
                };
                let image = resolver.image_for(&record.code);
                Flag::new(record, image)
            })
            .collect();

        Ok(Self { flags })
    }

    pub fn list_flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[async_trait]
impl FlagSource for FlagStore {
    async fn list_flags(&self) -> Result<Vec<Flag>, QuizError> {
        Ok(self.flags.clone())
    }
}
