use arbos_primitives_core::multigas::{ResourceKind, NUM_RESOURCE_KIND};
use arbos_primitives_core::types::Wei;
use arbos_store::{Storage, StorageBackedBigUint, StorageError};
use enum_map::EnumMap;

const NEXT_BASE_FEES_OFFSET: u64 = 0;
const CURRENT_BASE_FEES_OFFSET: u64 = NUM_RESOURCE_KIND as u64;

/// Per-resource base fees.
///
/// Pricing updates write the `next` fees, which only take effect once
/// [`MultiGasFees::commit_next_to_current`] copies them over the `current`
/// ones at the start of a block.
pub struct MultiGasFees {
    next: EnumMap<ResourceKind, StorageBackedBigUint>,
    current: EnumMap<ResourceKind, StorageBackedBigUint>,
}

impl MultiGasFees {
    pub fn open(storage: &Storage) -> Self {
        let open_fees = |offset: u64| {
            EnumMap::from_fn(|kind: ResourceKind| {
                storage.open_big_uint(offset + u64::from(kind.id()))
            })
        };
        Self { next: open_fees(NEXT_BASE_FEES_OFFSET), current: open_fees(CURRENT_BASE_FEES_OFFSET) }
    }

    pub fn current_base_fee(&self, kind: ResourceKind) -> Result<Wei, StorageError> {
        self.current[kind].get()
    }

    pub fn next_base_fee(&self, kind: ResourceKind) -> Result<Wei, StorageError> {
        self.next[kind].get()
    }

    pub fn set_next_base_fee(&self, kind: ResourceKind, fee: Wei) -> Result<(), StorageError> {
        self.next[kind].set(fee)
    }

    /// Makes the `next` fees current. Applying it twice in a row is a no-op.
    pub fn commit_next_to_current(&self) -> Result<(), StorageError> {
        for kind in ResourceKind::known() {
            let fee = self.next[kind].get()?;
            self.current[kind].set(fee)?;
        }
        Ok(())
    }

    pub fn current_base_fees(&self) -> Result<EnumMap<ResourceKind, Wei>, StorageError> {
        Self::snapshot(&self.current)
    }

    pub fn next_base_fees(&self) -> Result<EnumMap<ResourceKind, Wei>, StorageError> {
        Self::snapshot(&self.next)
    }

    fn snapshot(
        slots: &EnumMap<ResourceKind, StorageBackedBigUint>,
    ) -> Result<EnumMap<ResourceKind, Wei>, StorageError> {
        let mut fees = EnumMap::default();
        for kind in ResourceKind::known() {
            fees[kind] = slots[kind].get()?;
        }
        Ok(fees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbos_store::test_utils::create_test_storage;

    #[test]
    fn test_commit() {
        let storage = create_test_storage();
        let fees = MultiGasFees::open(&storage);
        fees.set_next_base_fee(ResourceKind::StorageGrowth, Wei::from(7u64)).unwrap();
        assert_eq!(fees.current_base_fee(ResourceKind::StorageGrowth).unwrap(), Wei::zero());

        fees.commit_next_to_current().unwrap();
        let committed = fees.current_base_fees().unwrap();
        assert_eq!(committed[ResourceKind::StorageGrowth], Wei::from(7u64));
        assert_eq!(committed, fees.next_base_fees().unwrap());

        fees.commit_next_to_current().unwrap();
        assert_eq!(fees.current_base_fees().unwrap(), committed);

        // Current fees of kind k live at offset N + k.
        let raw = storage.open_big_uint(8 + 4).get().unwrap();
        assert_eq!(raw, Wei::from(7u64));
    }
}
