mod vote_service;

pub use vote_service::{LedgerBackend, VoteService};
