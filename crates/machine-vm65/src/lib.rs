//! VM65: a 65C02 homebrew computer.
//!
//! One 64KB address space shared by the CPU, three memory-mapped 6522
//! interface adapters and a DMA storage controller, driven by a
//! two-thread scheduling harness (CPU loop + render loop). The CPU core,
//! the VIA model and the storage controller live in their own crates;
//! this crate wires them to the board's memory map, models the video
//! counters and the keyboard report queue, and provides the `vm65`
//! runner binary.

mod keyboard;
mod memory;
mod system;
mod video;

pub use keyboard::{Key, KeyReporter};
pub use memory::{
    ROM_BASE, ROM_SIZE, SystemBus, VIA1, VIA1_BASE, VIA2, VIA2_BASE, VIA3, VIA3_BASE, VIDEO_BASE,
};
pub use system::{Frontend, Trace, Vm65, run_tick};
pub use video::VideoUnit;

pub use drive_ssd::Ssd;
pub use mos_via_6522::Via6522;
pub use wdc_65c02::Cpu;
