use async_trait::async_trait;
use std::error::Error;
use tokio::sync::Mutex;

use rentra_domain::repository::{RentalSnapshot, SnapshotRepository};

/// Snapshot repository that keeps the latest snapshot in memory.
/// Default implementation for embedding and tests; production
/// deployments supply their own `SnapshotRepository` over real
/// storage.
pub struct InMemorySnapshotRepository {
    inner: Mutex<Option<RentalSnapshot>>,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }
}

impl Default for InMemorySnapshotRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotRepository for InMemorySnapshotRepository {
    async fn save(
        &self,
        snapshot: &RentalSnapshot,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.inner.lock().await = Some(snapshot.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<RentalSnapshot>, Box<dyn Error + Send + Sync>> {
        Ok(self.inner.lock().await.clone())
    }
}
