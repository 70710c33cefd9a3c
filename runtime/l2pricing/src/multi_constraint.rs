use crate::vector::StorageBackedRecord;
use crate::PricingError;
use arbos_primitives_core::multigas::{MultiGas, ResourceKind};
use arbos_primitives_core::types::{Gas, Weight, WeightedGas};
use arbos_store::{Storage, StorageBackedUint32, StorageBackedUint64, StorageError};
use enum_map::EnumMap;
use std::collections::BTreeMap;

const TARGET_OFFSET: u64 = 0;
const ADJUSTMENT_WINDOW_OFFSET: u64 = 1;
const BACKLOG_OFFSET: u64 = 2;
const MAX_WEIGHT_OFFSET: u64 = 3;
/// Weights occupy one slot per resource kind, `Unknown` included.
const WEIGHTS_OFFSET: u64 = 4;

/// Plain-data view of a [`MultiGasConstraint`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MultiGasConstraintParams {
    pub target: Gas,
    pub adjustment_window: u32,
    #[serde(default)]
    pub backlog: Gas,
    /// Non-zero weights only.
    pub weights: BTreeMap<ResourceKind, Weight>,
}

/// Constraint on a weighted sum of resources.
///
/// The backlog grows by `Σ usage[k] * weight[k]` over the kinds with non-zero
/// weight. The largest weight is stored alongside the weights and normalizes
/// the pricing exponent.
pub struct MultiGasConstraint {
    target: StorageBackedUint64,
    adjustment_window: StorageBackedUint32,
    backlog: StorageBackedUint64,
    max_weight: StorageBackedUint64,
    weights: EnumMap<ResourceKind, StorageBackedUint64>,
}

impl MultiGasConstraint {
    pub fn target(&self) -> Result<Gas, StorageError> {
        self.target.get()
    }

    pub fn set_target(&self, target: Gas) -> Result<(), StorageError> {
        self.target.set(target)
    }

    pub fn adjustment_window(&self) -> Result<u32, StorageError> {
        self.adjustment_window.get()
    }

    pub fn set_adjustment_window(&self, window: u32) -> Result<(), StorageError> {
        self.adjustment_window.set(window)
    }

    pub fn backlog(&self) -> Result<Gas, StorageError> {
        self.backlog.get()
    }

    pub fn set_backlog(&self, backlog: Gas) -> Result<(), StorageError> {
        self.backlog.set(backlog)
    }

    pub fn max_weight(&self) -> Result<Weight, StorageError> {
        self.max_weight.get()
    }

    pub fn resource_weight(&self, kind: ResourceKind) -> Result<Weight, PricingError> {
        Ok(self.weights[kind.validate()?].get()?)
    }

    /// Replaces every weight. Kinds missing from `weights` get weight zero.
    pub fn set_resource_weights(
        &self,
        weights: &BTreeMap<ResourceKind, Weight>,
    ) -> Result<(), PricingError> {
        for kind in weights.keys() {
            kind.validate()?;
        }
        let mut max_weight = 0;
        for kind in ResourceKind::known() {
            let weight = weights.get(&kind).copied().unwrap_or(0);
            self.weights[kind].set(weight)?;
            max_weight = max_weight.max(weight);
        }
        self.max_weight.set(max_weight)?;
        Ok(())
    }

    /// Kinds with a non-zero weight, in id order.
    pub fn resources_with_weights(&self) -> Result<Vec<(ResourceKind, Weight)>, StorageError> {
        let mut result = Vec::new();
        for kind in ResourceKind::known() {
            let weight = self.weights[kind].get()?;
            if weight != 0 {
                result.push((kind, weight));
            }
        }
        Ok(result)
    }

    pub fn used_resources(&self) -> Result<Vec<ResourceKind>, StorageError> {
        Ok(self.resources_with_weights()?.into_iter().map(|(kind, _)| kind).collect())
    }

    /// Weighted amount of `usage` counted by this constraint, saturating.
    pub fn weighted_usage(&self, usage: &MultiGas) -> Result<WeightedGas, StorageError> {
        let mut total: WeightedGas = 0;
        for (kind, weight) in self.resources_with_weights()? {
            total = total.saturating_add(usage.get(kind).saturating_mul(weight));
        }
        Ok(total)
    }

    pub fn grow_backlog(&self, usage: &MultiGas) -> Result<(), StorageError> {
        let weighted = self.weighted_usage(usage)?;
        let backlog = self.backlog()?;
        self.set_backlog(backlog.saturating_add(weighted))
    }

    pub fn shrink_backlog(&self, usage: &MultiGas) -> Result<(), StorageError> {
        let weighted = self.weighted_usage(usage)?;
        let backlog = self.backlog()?;
        self.set_backlog(backlog.saturating_sub(weighted))
    }

    pub fn params(&self) -> Result<MultiGasConstraintParams, StorageError> {
        Ok(MultiGasConstraintParams {
            target: self.target()?,
            adjustment_window: self.adjustment_window()?,
            backlog: self.backlog()?,
            weights: self.resources_with_weights()?.into_iter().collect(),
        })
    }

    pub(crate) fn init(&self, params: &MultiGasConstraintParams) -> Result<(), PricingError> {
        self.set_target(params.target)?;
        self.set_adjustment_window(params.adjustment_window)?;
        self.set_backlog(params.backlog)?;
        self.set_resource_weights(&params.weights)
    }
}

impl StorageBackedRecord for MultiGasConstraint {
    fn open(storage: Storage) -> Self {
        Self {
            target: storage.open_uint64(TARGET_OFFSET),
            adjustment_window: storage.open_uint32(ADJUSTMENT_WINDOW_OFFSET),
            backlog: storage.open_uint64(BACKLOG_OFFSET),
            max_weight: storage.open_uint64(MAX_WEIGHT_OFFSET),
            weights: EnumMap::from_fn(|kind: ResourceKind| {
                storage.open_uint64(WEIGHTS_OFFSET + u64::from(kind.id()))
            }),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.set_target(0)?;
        self.set_adjustment_window(0)?;
        self.set_backlog(0)?;
        self.max_weight.set(0)?;
        for kind in ResourceKind::known() {
            self.weights[kind].set(0)?;
        }
        Ok(())
    }
}
