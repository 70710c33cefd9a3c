use crate::backend::{MemoryState, StateBackend};
use crate::burn::Burner;
use crate::{StorageCostConfig, StorageError};
use primitive_types::{H256, U256};
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Index of the last byte of a key, which is kept unhashed so that up to 256
/// consecutive offsets share one hashed page.
const KEY_PAGE_BOUNDARY: usize = 31;

pub fn u256_to_word(value: U256) -> H256 {
    let mut word = H256::zero();
    value.to_big_endian(word.as_bytes_mut());
    word
}

pub fn word_to_u256(word: &H256) -> U256 {
    U256::from_big_endian(word.as_bytes())
}

pub fn u64_to_word(value: u64) -> H256 {
    u256_to_word(U256::from(value))
}

fn map_key(storage_key: &[u8], key: &H256) -> H256 {
    let key = key.as_bytes();
    let digest = Sha256::new()
        .chain_update(storage_key)
        .chain_update(&key[..KEY_PAGE_BOUNDARY])
        .finalize();
    let mut mapped = H256::zero();
    let bytes = mapped.as_bytes_mut();
    bytes[..KEY_PAGE_BOUNDARY].copy_from_slice(&digest[..KEY_PAGE_BOUNDARY]);
    bytes[KEY_PAGE_BOUNDARY] = key[KEY_PAGE_BOUNDARY];
    mapped
}

/// Handle to one sub-space of the state, metering every access.
///
/// Handles are cheap to clone. All handles opened from the same root share
/// the backend and the burner.
#[derive(Clone)]
pub struct Storage {
    backend: Rc<RefCell<dyn StateBackend>>,
    burner: Rc<dyn Burner>,
    costs: StorageCostConfig,
    storage_key: Rc<[u8]>,
}

impl Storage {
    /// Opens the root space of `backend`.
    pub fn new(
        backend: Rc<RefCell<dyn StateBackend>>,
        burner: Rc<dyn Burner>,
        costs: StorageCostConfig,
    ) -> Self {
        Self { backend, burner, costs, storage_key: Rc::from(Vec::new()) }
    }

    /// Opens the root space of a fresh in-memory backend.
    pub fn new_memory_backed(burner: Rc<dyn Burner>, costs: StorageCostConfig) -> Self {
        Self::new(Rc::new(RefCell::new(MemoryState::new())), burner, costs)
    }

    pub fn burner(&self) -> &Rc<dyn Burner> {
        &self.burner
    }

    pub fn costs(&self) -> &StorageCostConfig {
        &self.costs
    }

    pub fn storage_key(&self) -> &[u8] {
        &self.storage_key
    }

    /// Opens the child space identified by `id`. Opening is free; only
    /// accesses are charged.
    pub fn open_sub_storage(&self, id: &[u8]) -> Storage {
        let storage_key: Vec<u8> =
            Sha256::new().chain_update(&self.storage_key).chain_update(id).finalize().to_vec();
        Storage {
            backend: self.backend.clone(),
            burner: self.burner.clone(),
            costs: self.costs,
            storage_key: Rc::from(storage_key),
        }
    }

    pub fn get(&self, key: &H256) -> Result<H256, StorageError> {
        self.read_mapped(&map_key(&self.storage_key, key))
    }

    pub fn set(&self, key: &H256, value: H256) -> Result<(), StorageError> {
        self.write_mapped(map_key(&self.storage_key, key), value)
    }

    pub fn get_by_u64(&self, offset: u64) -> Result<H256, StorageError> {
        self.get(&u64_to_word(offset))
    }

    pub fn set_by_u64(&self, offset: u64, value: H256) -> Result<(), StorageError> {
        self.set(&u64_to_word(offset), value)
    }

    pub fn clear_by_u64(&self, offset: u64) -> Result<(), StorageError> {
        self.set_by_u64(offset, H256::zero())
    }

    pub fn new_slot(&self, offset: u64) -> StorageSlot {
        StorageSlot {
            storage: self.clone(),
            slot: map_key(&self.storage_key, &u64_to_word(offset)),
        }
    }

    pub fn open_uint64(&self, offset: u64) -> StorageBackedUint64 {
        StorageBackedUint64 { slot: self.new_slot(offset) }
    }

    pub fn open_uint32(&self, offset: u64) -> StorageBackedUint32 {
        StorageBackedUint32 { slot: self.new_slot(offset) }
    }

    pub fn open_big_uint(&self, offset: u64) -> StorageBackedBigUint {
        StorageBackedBigUint { slot: self.new_slot(offset) }
    }

    fn read_mapped(&self, mapped: &H256) -> Result<H256, StorageError> {
        self.burner.burn(self.costs.read_cost)?;
        Ok(self.backend.borrow().get(mapped))
    }

    fn write_mapped(&self, mapped: H256, value: H256) -> Result<(), StorageError> {
        if self.burner.read_only() {
            return Err(StorageError::WriteProtection);
        }
        self.burner.burn(self.costs.write_cost_of(value.is_zero()))?;
        self.backend.borrow_mut().set(mapped, value);
        Ok(())
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("storage_key", &self.storage_key)
            .field("costs", &self.costs)
            .finish_non_exhaustive()
    }
}

/// A single pre-mapped word of a [`Storage`].
#[derive(Clone, Debug)]
pub struct StorageSlot {
    storage: Storage,
    slot: H256,
}

impl StorageSlot {
    pub fn get(&self) -> Result<H256, StorageError> {
        self.storage.read_mapped(&self.slot)
    }

    pub fn set(&self, value: H256) -> Result<(), StorageError> {
        self.storage.write_mapped(self.slot, value)
    }

    fn get_u256(&self) -> Result<U256, StorageError> {
        Ok(word_to_u256(&self.get()?))
    }

    fn inconsistent(&self, expected: &str, found: U256) -> StorageError {
        StorageError::InconsistentState(format!(
            "expected {expected} in slot {:?}, found {found}",
            self.slot
        ))
    }
}

#[derive(Clone, Debug)]
pub struct StorageBackedUint64 {
    slot: StorageSlot,
}

impl StorageBackedUint64 {
    pub fn get(&self) -> Result<u64, StorageError> {
        let value = self.slot.get_u256()?;
        if value > U256::from(u64::MAX) {
            return Err(self.slot.inconsistent("u64", value));
        }
        Ok(value.low_u64())
    }

    pub fn set(&self, value: u64) -> Result<(), StorageError> {
        self.slot.set(u64_to_word(value))
    }

    /// Adds one and returns the new value.
    ///
    /// Panics on overflow: counters stored this way never get near `u64::MAX`.
    pub fn increment(&self) -> Result<u64, StorageError> {
        let old = self.get()?;
        let Some(new) = old.checked_add(1) else {
            panic!("overflow in StorageBackedUint64::increment");
        };
        self.set(new)?;
        Ok(new)
    }

    /// Subtracts one and returns the new value. Panics on underflow.
    pub fn decrement(&self) -> Result<u64, StorageError> {
        let old = self.get()?;
        let Some(new) = old.checked_sub(1) else {
            panic!("underflow in StorageBackedUint64::decrement");
        };
        self.set(new)?;
        Ok(new)
    }
}

#[derive(Clone, Debug)]
pub struct StorageBackedUint32 {
    slot: StorageSlot,
}

impl StorageBackedUint32 {
    pub fn get(&self) -> Result<u32, StorageError> {
        let value = self.slot.get_u256()?;
        if value > U256::from(u32::MAX) {
            return Err(self.slot.inconsistent("u32", value));
        }
        Ok(value.low_u32())
    }

    pub fn set(&self, value: u32) -> Result<(), StorageError> {
        self.slot.set(u64_to_word(value.into()))
    }
}

/// Unsigned 256-bit value occupying a whole slot.
#[derive(Clone, Debug)]
pub struct StorageBackedBigUint {
    slot: StorageSlot,
}

impl StorageBackedBigUint {
    pub fn get(&self) -> Result<U256, StorageError> {
        self.slot.get_u256()
    }

    pub fn set(&self, value: U256) -> Result<(), StorageError> {
        self.slot.set(u256_to_word(value))
    }
}
