//! Multi-dimensional gas: the amount of each chain resource consumed by one
//! unit of work (a transaction or an accounting period).
//!
//! Resource kinds are a closed set. Amounts are kept in a dense array indexed
//! by kind so that iteration order and storage layout never depend on which
//! resources happen to be in use.
use crate::types::Gas;
use enum_map::EnumMap;
use std::fmt;
use strum::IntoEnumIterator;

/// One dimension of chain resource consumption.
///
/// The discriminants are part of the persisted layout and of the external
/// interface (resource ids are passed around as `u8`), do not reorder.
#[derive(
    Copy,
    Clone,
    Hash,
    PartialEq,
    Eq,
    Debug,
    PartialOrd,
    Ord,
    enum_map::Enum,
    strum::EnumIter,
    strum::EnumCount,
    strum::Display,
    strum::EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
#[repr(u8)]
pub enum ResourceKind {
    /// Sentinel, never valid as an argument and skipped by every iteration.
    Unknown = 0,
    Computation = 1,
    HistoryGrowth = 2,
    StorageAccess = 3,
    StorageGrowth = 4,
    L1Calldata = 5,
    L2Calldata = 6,
    WasmComputation = 7,
}

/// Number of resource kinds, including [`ResourceKind::Unknown`].
pub const NUM_RESOURCE_KIND: usize = <ResourceKind as strum::EnumCount>::COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid resource kind: {0}")]
pub struct InvalidResourceKind(pub u8);

impl ResourceKind {
    /// All valid resource kinds, in id order. [`ResourceKind::Unknown`] is excluded.
    pub fn known() -> impl Iterator<Item = ResourceKind> {
        ResourceKind::iter().filter(|kind| *kind != ResourceKind::Unknown)
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Returns `self` if it may be used as an argument, i.e. it is not the
    /// `Unknown` sentinel.
    pub fn validate(self) -> Result<Self, InvalidResourceKind> {
        if self == ResourceKind::Unknown {
            return Err(InvalidResourceKind(self.id()));
        }
        Ok(self)
    }
}

impl TryFrom<u8> for ResourceKind {
    type Error = InvalidResourceKind;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        let kind = match id {
            1 => ResourceKind::Computation,
            2 => ResourceKind::HistoryGrowth,
            3 => ResourceKind::StorageAccess,
            4 => ResourceKind::StorageGrowth,
            5 => ResourceKind::L1Calldata,
            6 => ResourceKind::L2Calldata,
            7 => ResourceKind::WasmComputation,
            _ => return Err(InvalidResourceKind(id)),
        };
        Ok(kind)
    }
}

/// Gas used by one unit of work, split by resource kind.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiGas {
    gas: EnumMap<ResourceKind, Gas>,
}

impl MultiGas {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Usage of a single resource.
    pub fn of(kind: ResourceKind, amount: Gas) -> Self {
        let mut multi_gas = Self::zero();
        multi_gas.gas[kind] = amount;
        multi_gas
    }

    /// Builds a usage vector from `(kind, amount)` pairs. Repeated kinds are
    /// summed, saturating.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ResourceKind, Gas)>) -> Self {
        let mut multi_gas = Self::zero();
        for (kind, amount) in pairs {
            multi_gas.saturating_increment(kind, amount);
        }
        multi_gas
    }

    pub fn get(&self, kind: ResourceKind) -> Gas {
        self.gas[kind]
    }

    pub fn set(&mut self, kind: ResourceKind, amount: Gas) {
        self.gas[kind] = amount;
    }

    pub fn saturating_increment(&mut self, kind: ResourceKind, amount: Gas) {
        self.gas[kind] = self.gas[kind].saturating_add(amount);
    }

    pub fn saturating_add(mut self, rhs: Self) -> Self {
        for (kind, amount) in rhs.gas {
            self.saturating_increment(kind, amount);
        }
        self
    }

    /// Total gas over every dimension, saturating.
    pub fn single_gas(&self) -> Gas {
        self.gas.values().fold(0, |total, amount| total.saturating_add(*amount))
    }

    pub fn is_zero(&self) -> bool {
        self.gas.values().all(|amount| *amount == 0)
    }

    /// Iterates over the valid resource kinds and their amounts, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, Gas)> + '_ {
        ResourceKind::known().map(move |kind| (kind, self.gas[kind]))
    }
}

impl fmt::Debug for MultiGas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.gas.iter().filter(|(_, amount)| **amount != 0))
            .finish()
    }
}
