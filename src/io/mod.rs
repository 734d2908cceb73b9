//! IO modules - storage and operator input
//!
//! This module contains all external IO operations:
//! - `storage` - Spot and ticket storage traits
//! - `memory` - In-memory garage store implementing both traits
//! - `ledger` - JSONL ledger of closed tickets (ticket store decorator)
//! - `input` - Operator input source (console)

pub mod input;
pub mod ledger;
pub mod memory;
pub mod storage;

// Re-export commonly used types
pub use input::{ConsoleInput, InputSource};
pub use ledger::LedgerTicketStore;
pub use memory::MemoryStore;
pub use storage::{SpotStore, TicketStore};
