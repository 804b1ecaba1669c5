pub mod error;
pub mod ledger;
pub mod memory_store;
pub mod pg_store;
pub mod rules;
pub mod store;
pub mod sync;

pub use error::CardError;
pub use ledger::CardLedger;
pub use memory_store::MemoryCardStore;
pub use pg_store::PgCardStore;
pub use store::{CardSession, CardStore};
pub use sync::{SyncFailure, SyncReport};
