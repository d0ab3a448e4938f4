//! Record storage implementations

mod memory;

pub use memory::InMemoryRecordStore;
