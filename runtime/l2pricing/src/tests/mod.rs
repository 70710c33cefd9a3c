use crate::test_utils::create_pricing_state;
use crate::{PricingConfig, PricingState};
use arbos_primitives_core::types::ArbosVersion;
use arbos_store::{GasBurner, MemoryState, StateBackend, Storage, StorageCostConfig};
use std::cell::RefCell;
use std::rc::Rc;

mod metering;
mod multi_gas;

/// Backlogs `{0, 1e6, 1e7, 1e8, 1e9, 1e10} x {1..9}`.
fn sample_backlogs() -> Vec<u64> {
    let mut backlogs = vec![0];
    for magnitude in [1_000_000u64, 10_000_000, 100_000_000, 1_000_000_000, 10_000_000_000] {
        backlogs.extend((1..=9).map(|digit| digit * magnitude));
    }
    backlogs
}

/// Genesis state written through an unlimited burner, then reopened through
/// `burner` on the same backend.
fn open_with_burner(burner: GasBurner, arbos_version: ArbosVersion) -> PricingState {
    let backend: Rc<RefCell<dyn StateBackend>> = Rc::new(RefCell::new(MemoryState::new()));
    let genesis =
        Storage::new(backend.clone(), Rc::new(GasBurner::system()), StorageCostConfig::default());
    PricingState::initialize(&genesis, &PricingConfig::default()).unwrap();
    PricingState::open(
        Storage::new(backend, Rc::new(burner), StorageCostConfig::default()),
        arbos_version,
    )
}

#[test]
fn test_sample_backlogs() {
    let backlogs = sample_backlogs();
    assert_eq!(backlogs.len(), 1 + 5 * 9);
    assert_eq!(backlogs[1], 1_000_000);
    assert_eq!(backlogs.last(), Some(&90_000_000_000));
    // Sanity check of the shared helper.
    assert_eq!(create_pricing_state(0).arbos_version(), 0);
}
