use arbos_primitives_core::types::Gas;

/// Gas charged for storage accesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StorageCostConfig {
    /// Cost of reading one word.
    pub read_cost: Gas,
    /// Cost of writing a non-zero word.
    pub write_cost: Gas,
    /// Cost of writing the zero word, i.e. clearing a slot.
    pub write_zero_cost: Gas,
}

impl StorageCostConfig {
    /// Costs that never charge anything. Useful for inspection tooling.
    pub const fn free() -> Self {
        Self { read_cost: 0, write_cost: 0, write_zero_cost: 0 }
    }

    pub fn write_cost_of(&self, is_zero: bool) -> Gas {
        if is_zero {
            self.write_zero_cost
        } else {
            self.write_cost
        }
    }
}

impl Default for StorageCostConfig {
    fn default() -> Self {
        Self { read_cost: 800, write_cost: 20_000, write_zero_cost: 5_000 }
    }
}
