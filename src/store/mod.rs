//! Event storage for Easel
//!
//! The store keeps every room's draw commands in memory for the process
//! lifetime. There is no persistence; a restart starts from empty logs.

pub mod event_log;

pub use event_log::EventLogStore;
