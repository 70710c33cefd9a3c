use arbos_store::{Storage, StorageError, SubStorageVector};
use std::marker::PhantomData;

/// A record whose fields live in its own storage space.
pub trait StorageBackedRecord {
    fn open(storage: Storage) -> Self;

    /// Zeroes every field.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Persisted, ordered vector of constraints.
pub struct ConstraintVector<T> {
    inner: SubStorageVector,
    _marker: PhantomData<fn() -> T>,
}

impl<T: StorageBackedRecord> ConstraintVector<T> {
    pub fn open(storage: Storage) -> Self {
        Self { inner: SubStorageVector::open(storage), _marker: PhantomData }
    }

    pub fn length(&self) -> Result<u64, StorageError> {
        self.inner.length()
    }

    /// Appends an element. Its fields must be initialized by the caller.
    pub fn push(&self) -> Result<T, StorageError> {
        Ok(T::open(self.inner.push()?))
    }

    pub fn pop(&self) -> Result<T, StorageError> {
        Ok(T::open(self.inner.pop()?))
    }

    /// Element `index`, which is not checked against the length.
    pub fn at(&self, index: u64) -> T {
        T::open(self.inner.at(index))
    }

    /// Pops and clears every element.
    pub fn clear(&self) -> Result<(), StorageError> {
        for _ in 0..self.length()? {
            self.pop()?.clear()?;
        }
        Ok(())
    }
}
