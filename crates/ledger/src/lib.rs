mod db;
mod mem;
mod mergeiter;
mod overlay;
mod types;

pub use db::{genesis_hash, Entry, LedgerDB, LedgerError};
pub use mem::MemStore;
pub use mergeiter::MergeIter;
pub use overlay::Overlay;
pub use types::{ChangeItem, KVStore};

pub use crypto_common::Output;
pub use sha2::Sha256;
