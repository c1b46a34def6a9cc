use crate::domain::{ItemKind, ItemStatus, VotableItem, VoteTally};
use chrono::{Duration, Utc};

/// Sample submissions for local runs without a database.
pub fn demo_items() -> Vec<VotableItem> {
    let now = Utc::now();
    vec![
        VotableItem::new(
            ItemKind::EventRequest,
            "Quarterly board game night".to_string(),
            "Bring a game, we provide pizza.".to_string(),
        )
        .with_tally(VoteTally::new(5, 2))
        .with_status(ItemStatus::Approved)
        .with_created_at(now - Duration::days(6)),
        VotableItem::new(
            ItemKind::Request,
            "Standing desks on the third floor".to_string(),
            String::new(),
        )
        .with_tally(VoteTally::new(12, 1))
        .with_created_at(now - Duration::days(3)),
        VotableItem::new(
            ItemKind::Idea,
            "Monthly lunch-and-learn".to_string(),
            "Anyone can host a 30 minute talk.".to_string(),
        )
        .with_tally(VoteTally::new(8, 0))
        .with_created_at(now - Duration::days(1)),
        VotableItem::new(
            ItemKind::Idea,
            "Office plant adoption program".to_string(),
            String::new(),
        )
        .with_created_at(now - Duration::hours(2)),
    ]
}
