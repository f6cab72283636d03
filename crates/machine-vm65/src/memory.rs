//! VM65 memory map and bus implementation.
//!
//! Memory map:
//! - `$0000-$3FCF`: RAM
//! - `$3FD0-$3FDF`: VIA 3 (storage protocol, stage 2)
//! - `$3FE0-$3FEF`: VIA 2 (storage protocol stages 0/1, transfer-complete
//!   interrupt)
//! - `$3FF0-$3FFF`: VIA 1 (keyboard, soft reset)
//! - `$4000-$7FFF`: RAM, video-reserved space
//! - `$8000-$BFFF`: RAM
//! - `$C000-$FFFF`: ROM (16KB image, holds the vectors)
//!
//! A decoded access tests the three VIA windows in fixed priority order;
//! a hit goes to the chip's register file and never touches flat memory.
//! Writes that land on VIA 2 or VIA 3 additionally feed the storage
//! controller's latch protocol through the chips' port pins — a coupling
//! specific to those two sockets, not general bus behavior.

use std::sync::Arc;
use std::sync::mpsc::Sender;

use drive_ssd::{Direction, Ssd};
use emu_core::{Bus, Signals};
use mos_via_6522::Via6522;

/// VIA 1 activation window base (keyboard).
pub const VIA1_BASE: u16 = 0x3FF0;
/// VIA 2 activation window base (storage companion).
pub const VIA2_BASE: u16 = 0x3FE0;
/// VIA 3 activation window base (storage protocol stage 2).
pub const VIA3_BASE: u16 = 0x3FD0;
/// First address of the video-reserved space.
pub const VIDEO_BASE: u16 = 0x4000;
/// First address of the ROM image.
pub const ROM_BASE: u16 = 0xC000;
/// ROM image size in bytes.
pub const ROM_SIZE: usize = 0x4000;

/// Index of VIA 1 in [`SystemBus::vias`].
pub const VIA1: usize = 0;
/// Index of VIA 2 in [`SystemBus::vias`].
pub const VIA2: usize = 1;
/// Index of VIA 3 in [`SystemBus::vias`].
pub const VIA3: usize = 2;

/// The machine context: flat memory, the three VIAs, the storage
/// controller and the shared signal block.
pub struct SystemBus {
    /// The 64KB address space.
    pub mem: Box<[u8; 0x10000]>,
    /// The peripheral interface chips, in decode priority order.
    pub vias: [Via6522; 3],
    /// The storage controller.
    pub ssd: Ssd,
    /// The global signal lines.
    pub signals: Arc<Signals>,
    /// When set, a completed stage-2 commit is handed to the DMA worker
    /// instead of executing on the caller's context.
    dma_kick: Option<Sender<()>>,
}

impl SystemBus {
    /// Build the machine from a ROM image (at least [`ROM_SIZE`] bytes;
    /// extra bytes are ignored) and a loaded storage controller.
    pub fn new(rom: &[u8], ssd: Ssd, signals: Arc<Signals>) -> Result<Self, String> {
        if rom.len() < ROM_SIZE {
            return Err(format!(
                "ROM image is too small: {} bytes, expected {ROM_SIZE}",
                rom.len()
            ));
        }
        let mut mem = Box::new([0u8; 0x10000]);
        mem[usize::from(ROM_BASE)..].copy_from_slice(&rom[..ROM_SIZE]);
        Ok(Self {
            mem,
            vias: [
                Via6522::new(VIA1_BASE),
                Via6522::new(VIA2_BASE),
                Via6522::new(VIA3_BASE),
            ],
            ssd,
            signals,
            dma_kick: None,
        })
    }

    /// Zero the non-ROM part of memory, as the reset sequence does. The
    /// clear stops one byte short of the ROM boundary ($BFFF survives), a
    /// board quirk kept as-is.
    pub fn clear_ram(&mut self) {
        self.mem[..0xBFFF].fill(0);
    }

    /// Run a programmed storage transfer: copy, raise the companion
    /// chip's control line and republish IRQ. Returns the direction that
    /// ran, or `None` when the controller was not fully programmed.
    /// Persisting the image after a receive is the caller's step.
    pub fn run_transfer(&mut self) -> Option<Direction> {
        let Self { mem, vias, ssd, .. } = self;
        let direction = ssd.execute(&mut mem[..])?;
        vias[VIA2].assert_ca1();
        self.sync_interrupts();
        Some(direction)
    }

    pub(crate) fn set_dma_kick(&mut self, kick: Sender<()>) {
        self.dma_kick = Some(kick);
    }

    /// Dropping the sender closes the channel and ends the DMA worker.
    pub(crate) fn clear_dma_kick(&mut self) {
        self.dma_kick = None;
    }

    // Transfer triggered on the caller's context: execute and persist
    // inline. A persistence failure is reported, not fatal — the store
    // and the on-disk image diverge until the next successful rewrite.
    fn run_transfer_sync(&mut self) {
        if self.run_transfer() == Some(Direction::Receive) {
            if let Err(err) = self.ssd.persist() {
                eprintln!("error: {err}");
            }
        }
    }
}

impl Bus for SystemBus {
    fn read(&mut self, address: u16) -> u8 {
        for via in &mut self.vias {
            if via.contains(address) {
                return via.read((address & 0x0F) as u8);
            }
        }
        self.mem[usize::from(address)]
    }

    fn write(&mut self, address: u16, value: u8) {
        let reg = (address & 0x0F) as u8;
        if self.vias[VIA1].contains(address) {
            self.vias[VIA1].write(reg, value);
        } else if self.vias[VIA2].contains(address) {
            self.vias[VIA2].write(reg, value);
            // VIA 2's ports carry the first two protocol stages.
            let pa = self.vias[VIA2].take_port_a();
            if pa != 0 {
                if self.ssd.latch(pa, 0) {
                    self.run_transfer_sync();
                }
            } else {
                let pb = self.vias[VIA2].take_port_b();
                if pb != 0 && self.ssd.latch(pb, 1) {
                    self.run_transfer_sync();
                }
            }
        } else if self.vias[VIA3].contains(address) {
            self.vias[VIA3].write(reg, value);
            // VIA 3's port A carries stage 2. The commit that completes
            // the program runs off the CPU's context so the image
            // rewrite never stalls instruction fetch.
            let pa = self.vias[VIA3].take_port_a();
            if pa != 0 && self.ssd.latch(pa, 2) {
                let kicked = match &self.dma_kick {
                    Some(kick) => kick.send(()).is_ok(),
                    None => false,
                };
                if !kicked {
                    self.run_transfer_sync();
                }
            }
        } else {
            self.mem[usize::from(address)] = value;
        }
    }

    fn peek(&self, address: u16) -> u8 {
        self.mem[usize::from(address)]
    }

    fn poke(&mut self, address: u16, value: u8) {
        self.mem[usize::from(address)] = value;
    }

    /// IRQ is the open-drain AND of the chips' active-low outputs: the
    /// line sits high only while every chip reports no pending interrupt.
    fn sync_interrupts(&mut self) {
        let level = self.vias.iter().all(Via6522::irq_line);
        self.signals.irq.set_level(level);
    }
}
