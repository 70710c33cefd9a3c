//! Metered storage for ArbOS state.
//!
//! State is a flat map of 32-byte words. [`Storage`] handles address one
//! sub-space of it and charge every read and write through a shared
//! [`Burner`].
pub use crate::backend::{MemoryState, StateBackend};
pub use crate::burn::{Burner, GasBurner};
pub use crate::config::StorageCostConfig;
pub use crate::errors::StorageError;
pub use crate::storage::{
    u256_to_word, u64_to_word, word_to_u256, Storage, StorageBackedBigUint, StorageBackedUint32,
    StorageBackedUint64, StorageSlot,
};
pub use crate::vector::SubStorageVector;
pub use primitive_types::{H256, U256};

mod backend;
mod burn;
mod config;
mod errors;
mod storage;
pub mod test_utils;
mod vector;
