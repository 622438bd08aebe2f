//! Collection providers for the catalog engine.
//!
//! Every provider (generated mock data, a JSON catalog file, the remote
//! listing API) sits behind [`MonsterSource`], so the engine, the session and
//! the server never know where records come from.

pub mod in_memory;
pub mod mock;
pub mod remote;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{Config, SourceKind};
use crate::domain::{MonsterFullResponse, MonsterRecord, Partition};
use crate::error::Result;

pub use in_memory::{CatalogEntry, CatalogFile, InMemorySource};
pub use mock::MockCatalog;
pub use remote::RemoteSource;

/// Source of monster documents and the records derived from them.
#[async_trait]
pub trait MonsterSource: Send + Sync {
    /// Short identifier used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Every monster document, ordered by display number.
    async fn documents(&self) -> Result<Vec<MonsterFullResponse>>;

    /// Ids of the monsters in the owned partition.
    async fn owned_ids(&self) -> Result<HashSet<u64>>;

    async fn detail(&self, id: u64) -> Result<Option<MonsterFullResponse>>;

    /// Filterable records for `partition`; the owned partition only yields
    /// owned records.
    async fn collection(&self, partition: Partition) -> Result<Vec<MonsterRecord>> {
        let documents = self.documents().await?;
        let owned = self.owned_ids().await?;
        let records = to_records(&documents, &owned);
        Ok(match partition {
            Partition::All => records,
            Partition::Owned => records.into_iter().filter(|r| r.owned).collect(),
        })
    }
}

/// Converts documents into records, dropping (and logging) unusable ones.
pub fn to_records(documents: &[MonsterFullResponse], owned: &HashSet<u64>) -> Vec<MonsterRecord> {
    documents
        .iter()
        .filter_map(|doc| match MonsterRecord::try_from(doc) {
            Ok(record) => Some(record.owned(owned.contains(&doc.id))),
            Err(e) => {
                warn!(id = doc.id, error = %e, "Skipping monster with unusable data");
                None
            }
        })
        .collect()
}

/// Opens the provider selected by `config.catalog.source`.
pub fn open_source(config: &Config) -> Result<Arc<dyn MonsterSource>> {
    let source: Arc<dyn MonsterSource> = match config.catalog.source {
        SourceKind::Mock => Arc::new(InMemorySource::mock(&MockCatalog::from_config(
            &config.catalog,
        ))?),
        SourceKind::File => Arc::new(InMemorySource::load(&config.catalog.file)?),
        SourceKind::Remote => Arc::new(RemoteSource::new(&config.remote)?),
    };
    info!(source = source.name(), "Catalog source opened");
    Ok(source)
}

/// Materializes any source into an in-memory catalog the server can query.
pub async fn load_catalog(source: &dyn MonsterSource) -> Result<InMemorySource> {
    let documents = source.documents().await?;
    let owned = source.owned_ids().await?;
    let catalog = InMemorySource::new(documents, &owned);
    info!(
        source = source.name(),
        monsters = catalog.len(),
        owned = owned.len(),
        "Catalog loaded"
    );
    Ok(catalog)
}
