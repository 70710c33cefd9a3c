use crate::config::PricingConfig;
use crate::constraint::{GasConstraint, GasConstraintParams};
use crate::fees::MultiGasFees;
use crate::multi_constraint::{MultiGasConstraint, MultiGasConstraintParams};
use crate::vector::ConstraintVector;
use crate::PricingError;
use arbos_primitives_core::multigas::ResourceKind;
use arbos_primitives_core::types::{ArbosVersion, Gas, Wei};
use arbos_primitives_core::version::{GAS_CONSTRAINTS_MAX_NUM, MULTI_GAS_CONSTRAINTS_MAX_NUM};
use arbos_store::{Storage, StorageBackedBigUint, StorageBackedUint64, StorageError};
use enum_map::EnumMap;

const SPEED_LIMIT_PER_SECOND_OFFSET: u64 = 0;
const PER_BLOCK_GAS_LIMIT_OFFSET: u64 = 1;
const BASE_FEE_WEI_OFFSET: u64 = 2;
const MIN_BASE_FEE_WEI_OFFSET: u64 = 3;
const GAS_BACKLOG_OFFSET: u64 = 4;
const PRICING_INERTIA_OFFSET: u64 = 5;
const BACKLOG_TOLERANCE_OFFSET: u64 = 6;
const PER_TX_GAS_LIMIT_OFFSET: u64 = 7;

const GAS_CONSTRAINTS_KEY: &[u8] = &[0];
const MULTI_GAS_CONSTRAINTS_KEY: &[u8] = &[1];
const MULTI_GAS_BASE_FEES_KEY: &[u8] = &[2];

/// Persisted L2 pricing state.
///
/// All fields live in one storage space and every accessor is metered. The
/// ArbOS version is not persisted here; it is supplied by the caller and
/// decides which pricing models are legal.
pub struct PricingState {
    pub(crate) storage: Storage,
    speed_limit_per_second: StorageBackedUint64,
    per_block_gas_limit: StorageBackedUint64,
    base_fee_wei: StorageBackedBigUint,
    min_base_fee_wei: StorageBackedBigUint,
    gas_backlog: StorageBackedUint64,
    pricing_inertia: StorageBackedUint64,
    backlog_tolerance: StorageBackedUint64,
    per_tx_gas_limit: StorageBackedUint64,
    pub(crate) gas_constraints: ConstraintVector<GasConstraint>,
    pub(crate) multi_gas_constraints: ConstraintVector<MultiGasConstraint>,
    pub(crate) multi_gas_fees: MultiGasFees,
    pub(crate) arbos_version: ArbosVersion,
}

impl PricingState {
    /// Writes the genesis parameters. Both constraint vectors start empty.
    pub fn initialize(storage: &Storage, config: &PricingConfig) -> Result<(), StorageError> {
        storage.open_uint64(SPEED_LIMIT_PER_SECOND_OFFSET).set(config.speed_limit_per_second)?;
        storage.open_uint64(PER_BLOCK_GAS_LIMIT_OFFSET).set(config.per_block_gas_limit)?;
        storage.open_uint64(PER_TX_GAS_LIMIT_OFFSET).set(config.per_tx_gas_limit)?;
        storage.open_big_uint(BASE_FEE_WEI_OFFSET).set(config.initial_base_fee_wei.into())?;
        storage.open_big_uint(MIN_BASE_FEE_WEI_OFFSET).set(config.min_base_fee_wei.into())?;
        storage.open_uint64(GAS_BACKLOG_OFFSET).set(0)?;
        storage.open_uint64(PRICING_INERTIA_OFFSET).set(config.pricing_inertia)?;
        storage.open_uint64(BACKLOG_TOLERANCE_OFFSET).set(config.backlog_tolerance)?;
        tracing::debug!(target: "l2pricing", ?config, "initialized pricing state");
        Ok(())
    }

    pub fn open(storage: Storage, arbos_version: ArbosVersion) -> Self {
        Self {
            speed_limit_per_second: storage.open_uint64(SPEED_LIMIT_PER_SECOND_OFFSET),
            per_block_gas_limit: storage.open_uint64(PER_BLOCK_GAS_LIMIT_OFFSET),
            base_fee_wei: storage.open_big_uint(BASE_FEE_WEI_OFFSET),
            min_base_fee_wei: storage.open_big_uint(MIN_BASE_FEE_WEI_OFFSET),
            gas_backlog: storage.open_uint64(GAS_BACKLOG_OFFSET),
            pricing_inertia: storage.open_uint64(PRICING_INERTIA_OFFSET),
            backlog_tolerance: storage.open_uint64(BACKLOG_TOLERANCE_OFFSET),
            per_tx_gas_limit: storage.open_uint64(PER_TX_GAS_LIMIT_OFFSET),
            gas_constraints: ConstraintVector::open(storage.open_sub_storage(GAS_CONSTRAINTS_KEY)),
            multi_gas_constraints: ConstraintVector::open(
                storage.open_sub_storage(MULTI_GAS_CONSTRAINTS_KEY),
            ),
            multi_gas_fees: MultiGasFees::open(&storage.open_sub_storage(MULTI_GAS_BASE_FEES_KEY)),
            arbos_version,
            storage,
        }
    }

    pub fn arbos_version(&self) -> ArbosVersion {
        self.arbos_version
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn speed_limit_per_second(&self) -> Result<Gas, StorageError> {
        self.speed_limit_per_second.get()
    }

    pub fn set_speed_limit_per_second(&self, limit: Gas) -> Result<(), StorageError> {
        self.speed_limit_per_second.set(limit)
    }

    pub fn per_block_gas_limit(&self) -> Result<Gas, StorageError> {
        self.per_block_gas_limit.get()
    }

    pub fn set_per_block_gas_limit(&self, limit: Gas) -> Result<(), StorageError> {
        self.per_block_gas_limit.set(limit)
    }

    pub fn per_tx_gas_limit(&self) -> Result<Gas, StorageError> {
        self.per_tx_gas_limit.get()
    }

    pub fn set_per_tx_gas_limit(&self, limit: Gas) -> Result<(), StorageError> {
        self.per_tx_gas_limit.set(limit)
    }

    pub fn base_fee_wei(&self) -> Result<Wei, StorageError> {
        self.base_fee_wei.get()
    }

    pub fn set_base_fee_wei(&self, fee: Wei) -> Result<(), StorageError> {
        self.base_fee_wei.set(fee)
    }

    pub fn min_base_fee_wei(&self) -> Result<Wei, StorageError> {
        self.min_base_fee_wei.get()
    }

    /// Sets the base fee floor, raising the current base fee if it is below
    /// the new floor.
    pub fn set_min_base_fee_wei(&self, fee: Wei) -> Result<(), StorageError> {
        self.min_base_fee_wei.set(fee)?;
        if self.base_fee_wei()? < fee {
            self.set_base_fee_wei(fee)?;
        }
        Ok(())
    }

    /// Backlog of the legacy model.
    pub fn gas_backlog(&self) -> Result<Gas, StorageError> {
        self.gas_backlog.get()
    }

    pub fn set_gas_backlog(&self, backlog: Gas) -> Result<(), StorageError> {
        self.gas_backlog.set(backlog)
    }

    pub fn pricing_inertia(&self) -> Result<u64, StorageError> {
        self.pricing_inertia.get()
    }

    pub fn set_pricing_inertia(&self, inertia: u64) -> Result<(), StorageError> {
        self.pricing_inertia.set(inertia)
    }

    pub fn backlog_tolerance(&self) -> Result<u64, StorageError> {
        self.backlog_tolerance.get()
    }

    pub fn set_backlog_tolerance(&self, tolerance: u64) -> Result<(), StorageError> {
        self.backlog_tolerance.set(tolerance)
    }

    /// Appends a single-gas constraint.
    pub fn add_gas_constraint(
        &self,
        target: Gas,
        adjustment_window: u64,
        backlog: Gas,
    ) -> Result<(), PricingError> {
        if target == 0 {
            return Err(PricingError::InvalidConstraint("target must be positive"));
        }
        if adjustment_window == 0 {
            return Err(PricingError::InvalidConstraint("adjustment window must be positive"));
        }
        let constraint = self.gas_constraints.push()?;
        constraint.init(&GasConstraintParams { target, adjustment_window, backlog })?;
        let length = self.gas_constraints.length()?;
        if length > GAS_CONSTRAINTS_MAX_NUM {
            tracing::warn!(
                target: "l2pricing",
                length,
                max = GAS_CONSTRAINTS_MAX_NUM,
                "too many gas constraints"
            );
        }
        Ok(())
    }

    pub fn gas_constraints_length(&self) -> Result<u64, StorageError> {
        self.gas_constraints.length()
    }

    pub fn open_gas_constraint_at(&self, index: u64) -> GasConstraint {
        self.gas_constraints.at(index)
    }

    pub fn clear_gas_constraints(&self) -> Result<(), StorageError> {
        self.gas_constraints.clear()
    }

    pub fn gas_constraints(&self) -> Result<Vec<GasConstraintParams>, StorageError> {
        (0..self.gas_constraints_length()?)
            .map(|index| self.open_gas_constraint_at(index).params())
            .collect()
    }

    /// Appends a multi-gas constraint. Kinds missing from `weights` are not
    /// counted by it.
    pub fn add_multi_gas_constraint(
        &self,
        target: Gas,
        adjustment_window: u32,
        backlog: Gas,
        weights: &std::collections::BTreeMap<ResourceKind, u64>,
    ) -> Result<(), PricingError> {
        if target == 0 {
            return Err(PricingError::InvalidConstraint("target must be positive"));
        }
        if adjustment_window == 0 {
            return Err(PricingError::InvalidConstraint("adjustment window must be positive"));
        }
        for kind in weights.keys() {
            kind.validate()?;
        }
        let constraint = self.multi_gas_constraints.push()?;
        constraint.init(&MultiGasConstraintParams {
            target,
            adjustment_window,
            backlog,
            weights: weights.clone(),
        })?;
        let length = self.multi_gas_constraints.length()?;
        if length > MULTI_GAS_CONSTRAINTS_MAX_NUM {
            tracing::warn!(
                target: "l2pricing",
                length,
                max = MULTI_GAS_CONSTRAINTS_MAX_NUM,
                "too many multi-gas constraints"
            );
        }
        Ok(())
    }

    pub fn multi_gas_constraints_length(&self) -> Result<u64, StorageError> {
        self.multi_gas_constraints.length()
    }

    pub fn open_multi_gas_constraint_at(&self, index: u64) -> MultiGasConstraint {
        self.multi_gas_constraints.at(index)
    }

    pub fn clear_multi_gas_constraints(&self) -> Result<(), StorageError> {
        self.multi_gas_constraints.clear()
    }

    pub fn multi_gas_constraints(&self) -> Result<Vec<MultiGasConstraintParams>, StorageError> {
        (0..self.multi_gas_constraints_length()?)
            .map(|index| self.open_multi_gas_constraint_at(index).params())
            .collect()
    }

    pub fn multi_gas_fees(&self) -> &MultiGasFees {
        &self.multi_gas_fees
    }

    pub fn current_multi_gas_base_fees(&self) -> Result<EnumMap<ResourceKind, Wei>, StorageError> {
        self.multi_gas_fees.current_base_fees()
    }

    pub fn next_multi_gas_base_fees(&self) -> Result<EnumMap<ResourceKind, Wei>, StorageError> {
        self.multi_gas_fees.next_base_fees()
    }

    /// Copies the per-resource fees computed by the last pricing update into
    /// the fees charged for the coming block.
    pub fn commit_multi_gas_fees(&self) -> Result<(), StorageError> {
        self.multi_gas_fees.commit_next_to_current()
    }
}
