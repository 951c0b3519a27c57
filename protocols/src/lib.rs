//! Wire types for the realtime dialogue protocol.
//!
//! [`realtime`] holds the event and entity schema; [`builders`] holds fluent
//! constructors for server events and responses.

pub mod builders;
pub mod realtime;
