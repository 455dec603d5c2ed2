// Adapters layer: concrete implementations for external systems (filesystem, CSV).

pub mod dataset;
pub mod storage;

pub use dataset::read_dataset;
pub use storage::LocalStorage;
