//! Core traits and types shared by the VM65 emulator crates.
//!
//! The CPU, the peripheral chips and the machine all meet at two seams:
//! the [`Bus`] trait (how a component touches the 64KB address space) and
//! the [`Signals`] block (the global processor control lines). Everything
//! else lives in the component crates.

mod bus;
mod signal;

pub use bus::{Bus, SimpleBus};
pub use signal::{Line, Signals};
