//! Records store adapters.
//!
//! Both adapters implement the user, reservation and meeting room ports:
//! one over HTTP against the external records service, one in memory.

mod dto;
mod http_store;
mod memory_store;

pub use http_store::HttpRecordStore;
pub use memory_store::InMemoryRecordStore;
