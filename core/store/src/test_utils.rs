use crate::{GasBurner, Storage, StorageCostConfig};
use std::rc::Rc;

/// Memory-backed root storage with an unlimited burner and default costs.
pub fn create_test_storage() -> Storage {
    Storage::new_memory_backed(Rc::new(GasBurner::system()), StorageCostConfig::default())
}

/// Memory-backed root storage that charges nothing.
pub fn create_free_storage() -> Storage {
    Storage::new_memory_backed(Rc::new(GasBurner::system()), StorageCostConfig::free())
}
