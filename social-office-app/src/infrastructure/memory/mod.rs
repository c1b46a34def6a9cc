mod demo_data;
mod memory_ledger;

pub use demo_data::demo_items;
pub use memory_ledger::MemoryLedger;
