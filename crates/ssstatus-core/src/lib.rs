//! Core ssstatus library (reflow, scroll state, stores, locking).

pub mod config;
pub mod controller;
pub mod interrupt;
pub mod lock;
pub mod logging;
pub mod reflow;
pub mod scroll;
pub mod store;
