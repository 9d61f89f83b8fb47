//! Music-discovery API access.
//!
//! `MusicApi` is the seam the rest of the app talks to; `EchoNestClient` is
//! the HTTP implementation. Requests run on a background worker thread and
//! come back to the event loop as `ApiReply` messages.

mod client;
mod model;
mod similar;
mod worker;

pub use client::*;
pub use model::*;
pub use similar::*;
pub use worker::*;

#[cfg(test)]
mod tests;
