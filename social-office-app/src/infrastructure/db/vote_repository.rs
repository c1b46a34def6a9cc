use super::entities::{item, vote, Item, Vote};
use super::item_repository::{from_column, parse_direction, to_column};
use crate::domain::{toggle_vote, VoteChoice, VoteDirection, VoteResult, VoteTally};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, TransactionTrait};
use uuid::Uuid;

#[derive(Clone)]
pub struct VoteRepository {
    db: DatabaseConnection,
}

impl VoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Toggle a vote inside one transaction and return the new state.
    ///
    /// The item row is locked `FOR UPDATE` first, so two voters pressing at
    /// once are applied one after the other. `None` means the item is gone.
    pub async fn toggle(
        &self,
        voter_id: Uuid,
        item_id: Uuid,
        direction: VoteDirection,
    ) -> Result<Option<VoteResult>, DbErr> {
        let txn = self.db.begin().await?;

        let Some(item_row) = Item::find_by_id(item_id)
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            txn.rollback().await?;
            return Ok(None);
        };

        let prior_row = Vote::find_by_id((voter_id, item_id)).one(&txn).await?;
        let prior: VoteChoice = prior_row
            .as_ref()
            .map(|v| parse_direction(&v.direction))
            .transpose()?
            .into();

        let tally = VoteTally::new(from_column(item_row.up_count), from_column(item_row.down_count));
        let (tally, choice) = toggle_vote(tally, prior, direction);

        match (prior_row, choice.direction()) {
            (Some(row), None) => {
                row.delete(&txn).await?;
            }
            (Some(row), Some(active)) => {
                let mut row: vote::ActiveModel = row.into();
                row.direction = Set(active.as_str().to_string());
                row.updated_at = Set(Some(chrono::Utc::now()));
                row.update(&txn).await?;
            }
            (None, Some(active)) => {
                vote::ActiveModel {
                    voter_id: Set(voter_id),
                    item_id: Set(item_id),
                    direction: Set(active.as_str().to_string()),
                    updated_at: Set(Some(chrono::Utc::now())),
                }
                .insert(&txn)
                .await?;
            }
            (None, None) => {}
        }

        let mut item_active: item::ActiveModel = item_row.into();
        item_active.up_count = Set(to_column(tally.up));
        item_active.down_count = Set(to_column(tally.down));
        item_active.update(&txn).await?;

        txn.commit().await?;

        Ok(Some(VoteResult::new(tally, choice)))
    }
}
