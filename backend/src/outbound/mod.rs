//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **records**: the external records service (reqwest) and an in-memory
//!   stand-in used for development and tests.
//!
//! Adapters are thin translators between domain types and wire shapes. They
//! contain no business logic.

pub mod records;
