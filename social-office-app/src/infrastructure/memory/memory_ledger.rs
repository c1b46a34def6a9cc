use crate::domain::{
    ItemQuery, ItemStatus, ItemView, VotableItem, VoteDirection, VoteLedger, VoteResult,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local ledger shared between request handlers.
///
/// Every mutation holds the write guard for its whole read-compute-write, so
/// concurrent toggles on one item serialize.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    inner: Arc<RwLock<VoteLedger>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = VotableItem>) -> Self {
        let mut ledger = VoteLedger::new();
        for item in items {
            ledger.insert(item);
        }
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    pub async fn create(&self, mut item: VotableItem) -> VotableItem {
        if item.created_at.is_none() {
            item.created_at = Some(chrono::Utc::now());
        }
        self.inner.write().await.insert(item.clone());
        item
    }

    pub async fn find(&self, voter_id: Option<Uuid>, item_id: Uuid) -> Option<ItemView> {
        self.inner.read().await.view(voter_id, item_id)
    }

    pub async fn list(&self, voter_id: Option<Uuid>, query: &ItemQuery) -> Vec<ItemView> {
        self.inner.read().await.query(voter_id, query)
    }

    pub async fn toggle(
        &self,
        voter_id: Uuid,
        item_id: Uuid,
        direction: VoteDirection,
    ) -> Option<VoteResult> {
        self.inner.write().await.toggle(voter_id, item_id, direction)
    }

    pub async fn set_status(&self, item_id: Uuid, status: ItemStatus) -> Option<VotableItem> {
        self.inner
            .write()
            .await
            .set_status(item_id, status)
            .cloned()
    }

    pub async fn remove(&self, item_id: Uuid) -> Option<VotableItem> {
        self.inner.write().await.remove(item_id)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ItemKind, VoteChoice, VoteTally};

    #[tokio::test]
    async fn test_create_stamps_time() {
        let ledger = MemoryLedger::new();
        let item = ledger
            .create(VotableItem::new(ItemKind::Idea, "Plant swap".into(), String::new()))
            .await;
        assert!(item.created_at.is_some());
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_voters_tally_exactly() {
        let ledger = MemoryLedger::new();
        let item = ledger
            .create(VotableItem::new(ItemKind::Request, "Quiet room".into(), String::new()))
            .await;

        let mut handles = Vec::new();
        for n in 0..64 {
            let ledger = ledger.clone();
            let item_id = item.id;
            handles.push(tokio::spawn(async move {
                let voter = Uuid::new_v4();
                let direction = if n % 4 == 0 {
                    VoteDirection::Down
                } else {
                    VoteDirection::Up
                };
                ledger.toggle(voter, item_id, direction).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }

        let view = ledger.find(None, item.id).await.unwrap();
        assert_eq!(view.item.tally, VoteTally::new(48, 16));
        assert_eq!(view.my_choice, VoteChoice::None);
    }

    #[tokio::test]
    async fn test_missing_item() {
        let ledger = MemoryLedger::new();
        let id = Uuid::new_v4();
        assert!(ledger.toggle(Uuid::new_v4(), id, VoteDirection::Up).await.is_none());
        assert!(ledger.set_status(id, ItemStatus::Approved).await.is_none());
        assert!(ledger.remove(id).await.is_none());
    }
}
