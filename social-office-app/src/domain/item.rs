use super::vote::{VoteChoice, VoteTally};
use serde::{Deserialize, Serialize};
use social_office_errors::AppError;
use std::cmp::Reverse;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Request,
    Idea,
    EventRequest,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Idea => "idea",
            Self::EventRequest => "event_request",
        }
    }
}

impl FromStr for ItemKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "request" => Ok(Self::Request),
            "idea" => Ok(Self::Idea),
            "event_request" => Ok(Self::EventRequest),
            other => Err(AppError::InvalidInput(format!("Unknown item kind: {other}"))),
        }
    }
}

/// Admin triage state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for ItemStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(AppError::InvalidInput(format!("Unknown item status: {other}"))),
        }
    }
}

/// A submission as sent by a client, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub kind: ItemKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotableItem {
    pub id: uuid::Uuid,
    pub kind: ItemKind,
    pub title: String,
    pub description: String,
    pub status: ItemStatus,
    #[serde(flatten)]
    pub tally: VoteTally,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl VotableItem {
    pub fn new(kind: ItemKind, title: String, description: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            kind,
            title,
            description,
            status: ItemStatus::Pending,
            tally: VoteTally::default(),
            created_at: None,
        }
    }

    pub fn with_tally(mut self, tally: VoteTally) -> Self {
        self.tally = tally;
        self
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_created_at(mut self, created_at: chrono::DateTime<chrono::Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

impl From<NewItem> for VotableItem {
    fn from(new: NewItem) -> Self {
        Self::new(new.kind, new.title, new.description)
    }
}

/// Item with the requesting voter's current choice, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: VotableItem,
    pub my_choice: VoteChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    MostUpvoted,
    TopScore,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuery {
    pub kind: Option<ItemKind>,
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub sort: SortOrder,
    pub limit: Option<u64>,
}

impl ItemQuery {
    pub fn matches(&self, item: &VotableItem) -> bool {
        self.kind.map_or(true, |kind| kind == item.kind)
            && self.status.map_or(true, |status| status == item.status)
    }
}

/// Orders items for listing. Ties fall back to newest first, then id, so
/// the order is stable across backends.
pub fn sort_items(items: &mut [VotableItem], order: SortOrder) {
    match order {
        SortOrder::Newest => {
            items.sort_by_key(|item| (Reverse(item.created_at), item.id));
        }
        SortOrder::MostUpvoted => {
            items.sort_by_key(|item| (Reverse(item.tally.up), Reverse(item.created_at), item.id));
        }
        SortOrder::TopScore => {
            items.sort_by_key(|item| (Reverse(item.tally.score()), Reverse(item.created_at), item.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn item(title: &str, up: u32, down: u32, age_mins: i64) -> VotableItem {
        VotableItem::new(ItemKind::Idea, title.to_string(), String::new())
            .with_tally(VoteTally::new(up, down))
            .with_created_at(Utc::now() - Duration::minutes(age_mins))
    }

    fn titles(items: &[VotableItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_new_item_starts_at_zero_and_pending() {
        let item = VotableItem::new(ItemKind::Request, "Standing desks".into(), String::new());
        assert_eq!(item.tally, VoteTally::default());
        assert_eq!(item.status, ItemStatus::Pending);
    }

    #[test]
    fn test_sort_orders() {
        let mut items = vec![
            item("old-popular", 9, 8, 30),
            item("fresh", 0, 0, 1),
            item("liked", 5, 0, 10),
        ];

        sort_items(&mut items, SortOrder::Newest);
        assert_eq!(titles(&items), ["fresh", "liked", "old-popular"]);

        sort_items(&mut items, SortOrder::MostUpvoted);
        assert_eq!(titles(&items), ["old-popular", "liked", "fresh"]);

        sort_items(&mut items, SortOrder::TopScore);
        assert_eq!(titles(&items), ["liked", "old-popular", "fresh"]);
    }

    #[test]
    fn test_query_filters_kind_and_status() {
        let idea = item("idea", 0, 0, 0);
        let approved_request = VotableItem::new(ItemKind::Request, "req".into(), String::new())
            .with_status(ItemStatus::Approved);

        let query = ItemQuery {
            kind: Some(ItemKind::Request),
            ..Default::default()
        };
        assert!(!query.matches(&idea));
        assert!(query.matches(&approved_request));

        let query = ItemQuery {
            status: Some(ItemStatus::Pending),
            ..Default::default()
        };
        assert!(query.matches(&idea));
        assert!(!query.matches(&approved_request));
    }

    #[test]
    fn test_item_json_shape() {
        let item = item("Board games night", 2, 1, 0);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "idea");
        assert_eq!(json["up"], 2);
        assert_eq!(json["down"], 1);
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("event_request".parse::<ItemKind>().unwrap(), ItemKind::EventRequest);
        assert!("meeting".parse::<ItemKind>().is_err());
        assert_eq!("rejected".parse::<ItemStatus>().unwrap(), ItemStatus::Rejected);
    }
}
