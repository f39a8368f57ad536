//! Redirect store implementations.

pub mod memory;
pub mod mysql;

pub use detour_core::{ReadStore, RedirectStore, StorageError, WriteMode};
pub use memory::InMemoryRedirectStore;
pub use mysql::MySqlRedirectStore;
