//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route. Currently only
//! trace-id correlation.

pub mod trace;

pub use trace::Trace;
