//! Pacing for content admission.
//!
//! `DecayScheduler` produces the lengthening delay sequence between ticks and
//! `TickTimer` holds the single pending tick deadline for an event loop.

mod decay;
mod timer;

pub use decay::*;
pub use timer::*;

#[cfg(test)]
mod tests;
