//! In-memory inventory store
//!
//! Keeps each user's raw garment records behind an async lock. Used by the
//! HTTP tests and for running the service without a database.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::RawGarmentRecord,
    services::providers::{InventoryFilter, InventoryStore},
};

#[derive(Clone, Default)]
pub struct InMemoryInventoryStore {
    inner: Arc<RwLock<HashMap<Uuid, Vec<RawGarmentRecord>>>>,
}

impl InMemoryInventoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a garment to a user's wardrobe
    pub async fn insert(&self, user_id: Uuid, record: RawGarmentRecord) {
        let mut inner = self.inner.write().await;
        inner.entry(user_id).or_default().push(record);
    }

    /// Replaces a user's whole wardrobe
    pub async fn replace(&self, user_id: Uuid, records: Vec<RawGarmentRecord>) {
        let mut inner = self.inner.write().await;
        inner.insert(user_id, records);
    }
}

#[async_trait::async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn list_garments(
        &self,
        user_id: Uuid,
        filter: &InventoryFilter,
    ) -> AppResult<Vec<RawGarmentRecord>> {
        let inner = self.inner.read().await;
        let records: Vec<RawGarmentRecord> = inner
            .get(&user_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| filter.is_empty() || filter.matches(record))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(
            user_id = %user_id,
            results = records.len(),
            store = self.name(),
            "Inventory listed"
        );

        Ok(records)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
