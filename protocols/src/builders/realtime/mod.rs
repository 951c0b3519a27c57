//! Test and fixture builders for realtime payloads.

pub mod response;
pub mod server_event;

pub use response::RealtimeResponseBuilder;
pub use server_event::{
    ContentEventBuilder, ItemEventBuilder, ResponseEventBuilder, ServerEventBuilder,
};
