use crate::{Storage, StorageBackedUint64, StorageError};

/// Growable vector of child storages.
///
/// The length lives at offset 0 of the owning storage and element `i` is the
/// child space opened with `i` in big-endian. Elements are only appended or
/// removed at the tail.
#[derive(Clone, Debug)]
pub struct SubStorageVector {
    storage: Storage,
    length: StorageBackedUint64,
}

impl SubStorageVector {
    pub fn open(storage: Storage) -> Self {
        let length = storage.open_uint64(0);
        Self { storage, length }
    }

    pub fn length(&self) -> Result<u64, StorageError> {
        self.length.get()
    }

    /// Appends a new element and returns its (possibly non-empty) storage.
    pub fn push(&self) -> Result<Storage, StorageError> {
        let index = self.length.get()?;
        let element = self.at(index);
        self.length.set(index.saturating_add(1))?;
        Ok(element)
    }

    /// Removes the last element and returns its storage. The element's
    /// contents are left untouched.
    pub fn pop(&self) -> Result<Storage, StorageError> {
        let length = self.length.get()?;
        let Some(index) = length.checked_sub(1) else {
            return Err(StorageError::EmptyVector);
        };
        self.length.set(index)?;
        Ok(self.at(index))
    }

    /// Storage of element `index`. Not bounds-checked and not charged.
    pub fn at(&self, index: u64) -> Storage {
        self.storage.open_sub_storage(&index.to_be_bytes())
    }
}
