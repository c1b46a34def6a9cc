use super::item::{sort_items, ItemQuery, ItemStatus, ItemView, VotableItem};
use super::vote::{toggle_vote, VoteChoice, VoteDirection, VoteResult};
use std::collections::HashMap;
use uuid::Uuid;

/// Items keyed by id, plus each voter's active direction per item.
///
/// A voter with no entry in `choices` for an item is in the `None` state.
#[derive(Debug, Default)]
pub struct VoteLedger {
    items: HashMap<Uuid, VotableItem>,
    choices: HashMap<(Uuid, Uuid), VoteDirection>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: VotableItem) {
        self.items.insert(item.id, item);
    }

    pub fn get(&self, item_id: Uuid) -> Option<&VotableItem> {
        self.items.get(&item_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn choice(&self, voter_id: Uuid, item_id: Uuid) -> VoteChoice {
        self.choices.get(&(voter_id, item_id)).copied().into()
    }

    /// Returns `None` when the item does not exist.
    pub fn toggle(
        &mut self,
        voter_id: Uuid,
        item_id: Uuid,
        direction: VoteDirection,
    ) -> Option<VoteResult> {
        let item = self.items.get_mut(&item_id)?;
        let key = (voter_id, item_id);
        let prior: VoteChoice = self.choices.get(&key).copied().into();

        let (tally, choice) = toggle_vote(item.tally, prior, direction);
        item.tally = tally;
        match choice.direction() {
            Some(active) => self.choices.insert(key, active),
            None => self.choices.remove(&key),
        };

        Some(VoteResult::new(tally, choice))
    }

    pub fn set_status(&mut self, item_id: Uuid, status: ItemStatus) -> Option<&VotableItem> {
        let item = self.items.get_mut(&item_id)?;
        item.status = status;
        Some(item)
    }

    /// Removes the item together with every choice recorded against it.
    pub fn remove(&mut self, item_id: Uuid) -> Option<VotableItem> {
        let removed = self.items.remove(&item_id)?;
        self.choices.retain(|(_, id), _| *id != item_id);
        Some(removed)
    }

    pub fn view(&self, voter_id: Option<Uuid>, item_id: Uuid) -> Option<ItemView> {
        let item = self.items.get(&item_id)?.clone();
        let my_choice = self.choice_for(voter_id, item_id);
        Some(ItemView { item, my_choice })
    }

    pub fn query(&self, voter_id: Option<Uuid>, query: &ItemQuery) -> Vec<ItemView> {
        let mut matching: Vec<VotableItem> = self
            .items
            .values()
            .filter(|item| query.matches(item))
            .cloned()
            .collect();
        sort_items(&mut matching, query.sort);
        if let Some(limit) = query.limit {
            matching.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        matching
            .into_iter()
            .map(|item| ItemView {
                my_choice: self.choice_for(voter_id, item.id),
                item,
            })
            .collect()
    }

    fn choice_for(&self, voter_id: Option<Uuid>, item_id: Uuid) -> VoteChoice {
        voter_id
            .map(|voter| self.choice(voter, item_id))
            .unwrap_or_default()
    }
}
