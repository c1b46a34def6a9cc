use super::entities::{item, vote, Item, Vote};
use crate::domain::{
    sort_items, ItemQuery, ItemStatus, ItemView, VotableItem, VoteChoice, VoteDirection, VoteTally,
};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone)]
pub struct ItemRepository {
    db: DatabaseConnection,
}

impl ItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, item_data: &VotableItem) -> Result<VotableItem, DbErr> {
        let active = item::ActiveModel {
            id: Set(item_data.id),
            kind: Set(item_data.kind.as_str().to_string()),
            title: Set(item_data.title.clone()),
            description: Set(item_data.description.clone()),
            status: Set(item_data.status.as_str().to_string()),
            up_count: Set(to_column(item_data.tally.up)),
            down_count: Set(to_column(item_data.tally.down)),
            created_at: Set(Some(item_data.created_at.unwrap_or_else(chrono::Utc::now))),
        };
        let model = active.insert(&self.db).await?;
        to_domain(model)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<VotableItem>, DbErr> {
        Item::find_by_id(id)
            .one(&self.db)
            .await?
            .map(to_domain)
            .transpose()
    }

    pub async fn find_with_choice(
        &self,
        id: Uuid,
        voter_id: Option<Uuid>,
    ) -> Result<Option<ItemView>, DbErr> {
        let Some(item) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let my_choice = match voter_id {
            Some(voter) => Vote::find_by_id((voter, id))
                .one(&self.db)
                .await?
                .map(|v| parse_direction(&v.direction))
                .transpose()?
                .into(),
            None => VoteChoice::None,
        };

        Ok(Some(ItemView { item, my_choice }))
    }

    pub async fn list(
        &self,
        query: &ItemQuery,
        voter_id: Option<Uuid>,
    ) -> Result<Vec<ItemView>, DbErr> {
        let mut select = Item::find();
        if let Some(kind) = query.kind {
            select = select.filter(item::Column::Kind.eq(kind.as_str()));
        }
        if let Some(status) = query.status {
            select = select.filter(item::Column::Status.eq(status.as_str()));
        }

        let mut items = select
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_domain)
            .collect::<Result<Vec<_>, _>>()?;
        sort_items(&mut items, query.sort);
        if let Some(limit) = query.limit {
            items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        let choices = match voter_id {
            Some(voter) => self.choices_of(voter).await?,
            None => HashMap::new(),
        };

        Ok(items
            .into_iter()
            .map(|item| ItemView {
                my_choice: choices.get(&item.id).copied().into(),
                item,
            })
            .collect())
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: ItemStatus,
    ) -> Result<Option<VotableItem>, DbErr> {
        let Some(model) = Item::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: item::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        let updated = active.update(&self.db).await?;
        to_domain(updated).map(Some)
    }

    /// Votes on the item go with it through the foreign key cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = Item::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn choices_of(&self, voter_id: Uuid) -> Result<HashMap<Uuid, VoteDirection>, DbErr> {
        Vote::find()
            .filter(vote::Column::VoterId.eq(voter_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|v| parse_direction(&v.direction).map(|direction| (v.item_id, direction)))
            .collect()
    }
}

pub(super) fn to_domain(model: item::Model) -> Result<VotableItem, DbErr> {
    let kind = model
        .kind
        .parse()
        .map_err(|e: social_office_errors::AppError| DbErr::Custom(e.to_string()))?;
    let status = model
        .status
        .parse()
        .map_err(|e: social_office_errors::AppError| DbErr::Custom(e.to_string()))?;

    Ok(VotableItem {
        id: model.id,
        kind,
        title: model.title,
        description: model.description,
        status,
        tally: VoteTally::new(from_column(model.up_count), from_column(model.down_count)),
        created_at: model.created_at,
    })
}

pub(super) fn parse_direction(raw: &str) -> Result<VoteDirection, DbErr> {
    raw.parse()
        .map_err(|e: social_office_errors::AppError| DbErr::Custom(e.to_string()))
}

pub(super) fn to_column(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

pub(super) fn from_column(count: i32) -> u32 {
    u32::try_from(count).unwrap_or(0)
}
