//! Pool-aware collections

pub mod int_array_map;
pub mod ref_set;

pub use int_array_map::IntObjectArrayMap;
pub use ref_set::RefSet;
