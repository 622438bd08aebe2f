use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::mock::MockCatalog;
use super::MonsterSource;
use crate::domain::{MonsterFullResponse, MonsterRecord, Partition};
use crate::error::{CatalogError, Result};

/// On-disk catalog: monster documents plus the ids of owned monsters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    pub monsters: Vec<MonsterFullResponse>,
    #[serde(default)]
    pub owned: Vec<u64>,
}

impl CatalogFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!(
                "Failed to read catalog file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// A monster document together with its filterable projection.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub record: MonsterRecord,
    pub detail: MonsterFullResponse,
}

/// Immutable in-memory catalog ordered by display number.
#[derive(Debug, Default)]
pub struct InMemorySource {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<u64, usize>,
}

impl InMemorySource {
    pub fn new(documents: Vec<MonsterFullResponse>, owned: &HashSet<u64>) -> Self {
        let mut entries: Vec<CatalogEntry> = documents
            .into_iter()
            .filter_map(|detail| match MonsterRecord::try_from(&detail) {
                Ok(record) => Some(CatalogEntry {
                    record: record.owned(owned.contains(&detail.id)),
                    detail,
                }),
                Err(e) => {
                    warn!(id = detail.id, error = %e, "Skipping monster with unusable data");
                    None
                }
            })
            .collect();
        entries.sort_by_key(|e| (e.record.number, e.record.id));

        let by_id = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.record.id, index))
            .collect();

        debug!(monsters = entries.len(), "Built in-memory catalog");
        Self { entries, by_id }
    }

    pub fn from_catalog_file(file: CatalogFile) -> Self {
        let owned: HashSet<u64> = file.owned.iter().copied().collect();
        Self::new(file.monsters, &owned)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_catalog_file(CatalogFile::load(path)?))
    }

    pub fn mock(catalog: &MockCatalog) -> Result<Self> {
        Ok(Self::from_catalog_file(catalog.generate()?))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, id: u64) -> Option<&CatalogEntry> {
        self.by_id.get(&id).map(|&index| &self.entries[index])
    }

    pub fn records(&self) -> impl Iterator<Item = &MonsterRecord> {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl MonsterSource for InMemorySource {
    fn name(&self) -> &'static str {
        "in_memory"
    }

    async fn documents(&self) -> Result<Vec<MonsterFullResponse>> {
        Ok(self.entries.iter().map(|e| e.detail.clone()).collect())
    }

    async fn owned_ids(&self) -> Result<HashSet<u64>> {
        Ok(self
            .records()
            .filter(|r| r.owned)
            .map(|r| r.id)
            .collect())
    }

    async fn detail(&self, id: u64) -> Result<Option<MonsterFullResponse>> {
        Ok(self.get(id).map(|e| e.detail.clone()))
    }

    async fn collection(&self, partition: Partition) -> Result<Vec<MonsterRecord>> {
        Ok(self
            .records()
            .filter(|r| partition == Partition::All || r.owned)
            .cloned()
            .collect())
    }
}
