use crate::domain::{
    ItemQuery, ItemStatus, ItemView, NewItem, VotableItem, VoteDirection, VoteResult,
};
use crate::infrastructure::db::{ItemRepository, VoteRepository};
use crate::infrastructure::memory::MemoryLedger;
use crate::infrastructure::security::InputSanitizer;
use sea_orm::{DatabaseConnection, DbErr};
use social_office_errors::AppError;
use uuid::Uuid;

pub enum LedgerBackend {
    Memory(MemoryLedger),
    Database {
        items: ItemRepository,
        votes: VoteRepository,
    },
}

pub struct VoteService {
    backend: LedgerBackend,
}

impl VoteService {
    pub fn new_memory(ledger: MemoryLedger) -> Self {
        Self {
            backend: LedgerBackend::Memory(ledger),
        }
    }

    pub fn new_database(db: DatabaseConnection) -> Self {
        Self {
            backend: LedgerBackend::Database {
                items: ItemRepository::new(db.clone()),
                votes: VoteRepository::new(db),
            },
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            LedgerBackend::Memory(_) => "memory",
            LedgerBackend::Database { .. } => "postgres",
        }
    }

    pub async fn submit(&self, submission: NewItem) -> Result<VotableItem, AppError> {
        let submission = InputSanitizer::validate_submission(submission).inspect_err(|e| {
            tracing::warn!("Rejected submission: {}", e);
        })?;
        let item = VotableItem::from(submission);

        let created = match &self.backend {
            LedgerBackend::Memory(ledger) => ledger.create(item).await,
            LedgerBackend::Database { items, .. } => items.create(&item).await.map_err(db_error)?,
        };

        tracing::info!(item_id = %created.id, kind = created.kind.as_str(), "Item submitted");
        Ok(created)
    }

    pub async fn get(&self, voter_id: Option<Uuid>, item_id: Uuid) -> Result<ItemView, AppError> {
        let view = match &self.backend {
            LedgerBackend::Memory(ledger) => ledger.find(voter_id, item_id).await,
            LedgerBackend::Database { items, .. } => items
                .find_with_choice(item_id, voter_id)
                .await
                .map_err(db_error)?,
        };
        view.ok_or(AppError::NotFound)
    }

    pub async fn list(
        &self,
        voter_id: Option<Uuid>,
        query: &ItemQuery,
    ) -> Result<Vec<ItemView>, AppError> {
        match &self.backend {
            LedgerBackend::Memory(ledger) => Ok(ledger.list(voter_id, query).await),
            LedgerBackend::Database { items, .. } => {
                items.list(query, voter_id).await.map_err(db_error)
            }
        }
    }

    pub async fn toggle(
        &self,
        voter_id: Uuid,
        item_id: Uuid,
        direction: VoteDirection,
    ) -> Result<VoteResult, AppError> {
        let result = match &self.backend {
            LedgerBackend::Memory(ledger) => ledger.toggle(voter_id, item_id, direction).await,
            LedgerBackend::Database { votes, .. } => votes
                .toggle(voter_id, item_id, direction)
                .await
                .map_err(db_error)?,
        }
        .ok_or(AppError::NotFound)?;

        tracing::debug!(
            %voter_id,
            %item_id,
            %direction,
            choice = ?result.choice,
            up = result.up,
            down = result.down,
            "Vote toggled"
        );
        Ok(result)
    }

    pub async fn set_status(
        &self,
        item_id: Uuid,
        status: ItemStatus,
    ) -> Result<VotableItem, AppError> {
        let updated = match &self.backend {
            LedgerBackend::Memory(ledger) => ledger.set_status(item_id, status).await,
            LedgerBackend::Database { items, .. } => items
                .update_status(item_id, status)
                .await
                .map_err(db_error)?,
        }
        .ok_or(AppError::NotFound)?;

        tracing::info!(%item_id, status = status.as_str(), "Item triaged");
        Ok(updated)
    }

    pub async fn remove(&self, item_id: Uuid) -> Result<(), AppError> {
        let removed = match &self.backend {
            LedgerBackend::Memory(ledger) => ledger.remove(item_id).await.is_some(),
            LedgerBackend::Database { items, .. } => items.delete(item_id).await.map_err(db_error)?,
        };

        if !removed {
            return Err(AppError::NotFound);
        }
        tracing::info!(%item_id, "Item removed");
        Ok(())
    }
}

fn db_error(err: DbErr) -> AppError {
    tracing::error!("Database error: {}", err);
    AppError::Database(err.to_string())
}
