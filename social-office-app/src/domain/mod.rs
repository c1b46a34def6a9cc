mod item;
mod ledger;
mod vote;

pub use item::{sort_items, ItemKind, ItemQuery, ItemStatus, ItemView, NewItem, SortOrder, VotableItem};
pub use ledger::VoteLedger;
pub use vote::{toggle_vote, VoteChoice, VoteDirection, VoteResult, VoteTally};
