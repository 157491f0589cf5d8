// Adapters layer: concrete implementations for external systems (files, tabular formats).

pub mod local_storage;
pub mod tabular;

pub use local_storage::LocalStorage;
