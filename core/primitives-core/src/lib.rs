pub use primitive_types;

pub mod arith;
pub mod multigas;
pub mod types;
pub mod version;

pub use enum_map;
pub use strum;
