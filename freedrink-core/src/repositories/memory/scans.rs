// File: freedrink-core/src/repositories/memory/scans.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use freedrink_common::error::Error;
use freedrink_common::models::scan::ScanEvent;
use freedrink_common::traits::repository_traits::ScanRepository;

use super::MemoryStore;

#[derive(Clone)]
pub struct MemoryScanRepository {
    store: MemoryStore,
}

impl MemoryScanRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ScanRepository for MemoryScanRepository {
    async fn insert_scan(&self, scan: &ScanEvent) -> Result<(), Error> {
        self.store.scans.insert(scan.scan_id, scan.clone());
        Ok(())
    }

    async fn list_scans_in_window(
        &self,
        campaign_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ScanEvent>, Error> {
        let mut list: Vec<ScanEvent> = self
            .store
            .scans
            .iter()
            .filter(|entry| {
                let s = entry.value();
                s.campaign_id == campaign_id && s.scanned_at >= start && s.scanned_at <= end
            })
            .map(|entry| entry.value().clone())
            .collect();
        list.sort_by_key(|s| s.scanned_at);
        Ok(list)
    }
}
