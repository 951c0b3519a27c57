//! Fluent builders for protocol types.

pub mod realtime;
