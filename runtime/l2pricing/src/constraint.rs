use crate::vector::StorageBackedRecord;
use arbos_primitives_core::types::Gas;
use arbos_store::{Storage, StorageBackedUint64, StorageError};

const TARGET_OFFSET: u64 = 0;
const ADJUSTMENT_WINDOW_OFFSET: u64 = 1;
const BACKLOG_OFFSET: u64 = 2;

/// Plain-data view of a [`GasConstraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GasConstraintParams {
    /// Gas per second the constraint aims for.
    pub target: Gas,
    /// Seconds over which a doubled demand raises the price by a factor of e.
    pub adjustment_window: u64,
    #[serde(default)]
    pub backlog: Gas,
}

/// Single-dimensional gas constraint stored in its own sub-space.
pub struct GasConstraint {
    target: StorageBackedUint64,
    adjustment_window: StorageBackedUint64,
    backlog: StorageBackedUint64,
}

impl GasConstraint {
    pub fn target(&self) -> Result<Gas, StorageError> {
        self.target.get()
    }

    pub fn set_target(&self, target: Gas) -> Result<(), StorageError> {
        self.target.set(target)
    }

    pub fn adjustment_window(&self) -> Result<u64, StorageError> {
        self.adjustment_window.get()
    }

    pub fn set_adjustment_window(&self, window: u64) -> Result<(), StorageError> {
        self.adjustment_window.set(window)
    }

    pub fn backlog(&self) -> Result<Gas, StorageError> {
        self.backlog.get()
    }

    pub fn set_backlog(&self, backlog: Gas) -> Result<(), StorageError> {
        self.backlog.set(backlog)
    }

    pub fn params(&self) -> Result<GasConstraintParams, StorageError> {
        Ok(GasConstraintParams {
            target: self.target()?,
            adjustment_window: self.adjustment_window()?,
            backlog: self.backlog()?,
        })
    }

    pub(crate) fn init(&self, params: &GasConstraintParams) -> Result<(), StorageError> {
        self.set_target(params.target)?;
        self.set_adjustment_window(params.adjustment_window)?;
        self.set_backlog(params.backlog)
    }
}

impl StorageBackedRecord for GasConstraint {
    fn open(storage: Storage) -> Self {
        Self {
            target: storage.open_uint64(TARGET_OFFSET),
            adjustment_window: storage.open_uint64(ADJUSTMENT_WINDOW_OFFSET),
            backlog: storage.open_uint64(BACKLOG_OFFSET),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.set_target(0)?;
        self.set_adjustment_window(0)?;
        self.set_backlog(0)
    }
}
