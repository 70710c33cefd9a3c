//! Gas metering for storage accesses.
use crate::StorageError;
use arbos_primitives_core::types::Gas;
use std::cell::Cell;

/// Capability through which every storage access is charged.
///
/// All methods take `&self`: a burner is shared between every storage handle
/// opened from the same root.
pub trait Burner {
    /// Charges `amount` gas, or fails without charging anything.
    fn burn(&self, amount: Gas) -> Result<(), StorageError>;

    /// Total gas charged so far.
    fn burned(&self) -> Gas;

    /// Reports an error that indicates a bug elsewhere. Execution continues.
    fn restrict(&self, err: &dyn std::error::Error);

    /// Whether writes must be rejected.
    fn read_only(&self) -> bool;
}

/// Counts burned gas, optionally against a limit.
#[derive(Debug, Default)]
pub struct GasBurner {
    burned: Cell<Gas>,
    limit: Option<Gas>,
    read_only: bool,
}

impl GasBurner {
    /// Unlimited, writable burner used for system operations.
    pub fn system() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Gas) -> Self {
        Self { limit: Some(limit), ..Self::default() }
    }

    pub fn read_only() -> Self {
        Self { read_only: true, ..Self::default() }
    }

    pub fn read_only_with_limit(limit: Gas) -> Self {
        Self { limit: Some(limit), read_only: true, ..Self::default() }
    }

    /// Gas left before the limit is hit, `None` when unlimited.
    pub fn remaining(&self) -> Option<Gas> {
        self.limit.map(|limit| limit.saturating_sub(self.burned.get()))
    }
}

impl Burner for GasBurner {
    fn burn(&self, amount: Gas) -> Result<(), StorageError> {
        let new_burned = self.burned.get().checked_add(amount).ok_or(StorageError::OutOfGas)?;
        if let Some(limit) = self.limit {
            if new_burned > limit {
                tracing::debug!(target: "store", amount, burned = self.burned.get(), limit, "out of gas");
                return Err(StorageError::OutOfGas);
            }
        }
        self.burned.set(new_burned);
        Ok(())
    }

    fn burned(&self) -> Gas {
        self.burned.get()
    }

    fn restrict(&self, err: &dyn std::error::Error) {
        tracing::error!(target: "store", %err, "restricted error");
    }

    fn read_only(&self) -> bool {
        self.read_only
    }
}
