//! The machine and its scheduling harness.
//!
//! Two long-lived loops share the machine context: the CPU loop on a
//! dedicated thread and the render loop on the caller's thread. The CPU
//! loop approximates the real clock rate by coarse batching — credit
//! `CLOCK_RATE / 20` cycles, execute instructions until the budget goes
//! negative, sleep ~50 ms — rather than per-instruction pacing. The
//! render loop owns the video counters and the keyboard queue and drives
//! the out-of-scope windowing collaborator through [`Frontend`].
//!
//! The context lives behind a mutex, locked per instruction by the CPU
//! loop and briefly by everyone else. Storage transfers committed through
//! VIA 3 are handed to a dedicated DMA worker over a channel; because the
//! worker completes a transfer under the same lock before the latches
//! clear, at most one transfer is ever in flight and later commits are
//! ignored, by construction.
//!
//! Shutdown is cooperative: the render loop exiting drops the `running`
//! flag, the CPU loop observes it at its next instruction boundary, and
//! the harness joins the CPU thread after the render loop, then closes
//! the DMA channel.

use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use drive_ssd::{Direction, Ssd};
use emu_core::Signals;
use wdc_65c02::{CLOCK_RATE, Cpu};

use crate::keyboard::KeyReporter;
use crate::memory::{SystemBus, VIA1};
use crate::video::VideoUnit;

/// Diagnostics toggles, mirroring the runner's flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trace {
    /// Print every executed instruction.
    pub verbose: bool,
    /// Report achieved emulation speed once per simulated second.
    pub clock_test: bool,
}

/// The rendering/input collaborator's side of the harness.
///
/// The machine pulls one pixel per iteration from the video counters and
/// hands it over; the collaborator translates the data register through
/// its palette and presents it. Key events flow the other way, already
/// translated to hardware codes.
pub trait Frontend {
    /// Pump the host event queue, feeding key events into `keys`.
    /// Returning false ends the session.
    fn poll(&mut self, keys: &mut KeyReporter) -> bool;

    /// Present one pixel: position registers, data register, color mode.
    fn present_pixel(&mut self, hr: u8, vr: u8, pxd: u8, cmr: bool);

    /// Both position registers rolled over: a frame is complete.
    fn frame_complete(&mut self);

    /// The machine was reset; clear the surface.
    fn clear(&mut self);
}

/// The VM65 machine.
pub struct Vm65 {
    machine: Arc<Mutex<SystemBus>>,
    signals: Arc<Signals>,
    /// Video counter unit, owned by the render loop.
    pub video: VideoUnit,
    /// Keyboard report queue, owned by the render loop.
    pub keys: KeyReporter,
    cpu_thread: Option<JoinHandle<()>>,
    dma_thread: Option<JoinHandle<()>>,
    trace: Trace,
}

impl Vm65 {
    /// Build the machine from a ROM image and a storage image path.
    /// Either file being missing or undersized is fatal to the caller;
    /// nothing is spawned yet.
    pub fn new(rom: &[u8], storage_path: impl Into<PathBuf>) -> Result<Self, String> {
        let ssd = Ssd::load(storage_path)?;
        let signals = Arc::new(Signals::new());
        let bus = SystemBus::new(rom, ssd, Arc::clone(&signals))?;
        Ok(Self {
            machine: Arc::new(Mutex::new(bus)),
            signals: Arc::clone(&signals),
            video: VideoUnit::new(),
            keys: KeyReporter::new(),
            cpu_thread: None,
            dma_thread: None,
            trace: Trace::default(),
        })
    }

    pub fn set_trace(&mut self, trace: Trace) {
        self.trace = trace;
    }

    #[must_use]
    pub fn signals(&self) -> &Arc<Signals> {
        &self.signals
    }

    #[must_use]
    pub fn machine(&self) -> &Arc<Mutex<SystemBus>> {
        &self.machine
    }

    /// Spawn the CPU loop and the DMA worker. RESET is asserted at
    /// power-on, so the CPU's first act is its reset sequence.
    pub fn power_on(&mut self) {
        let (kick, transfers) = mpsc::channel();
        if let Ok(mut m) = self.machine.lock() {
            m.set_dma_kick(kick);
        }
        self.dma_thread = Some(self.spawn_dma_worker(transfers));
        self.cpu_thread = Some(self.spawn_cpu_loop());
    }

    /// Run the render loop until the frontend quits, then shut down.
    pub fn run<F: Frontend>(&mut self, frontend: &mut F) {
        self.video.reset();
        loop {
            if !frontend.poll(&mut self.keys) {
                break;
            }
            {
                let Ok(mut m) = self.machine.lock() else { break };
                self.keys.pump(&mut m);
                self.video.fetch_pixel(&m.mem[..]);
            }
            frontend.present_pixel(self.video.hr, self.video.vr, self.video.pxd, self.video.cmr);
            self.video.advance();
            {
                let Ok(mut m) = self.machine.lock() else { break };
                // Hard reset (the line) or soft reset (VIA 1 port B
                // bit 0, written by software) both rewind the video unit.
                let soft_reset = m.vias[VIA1].port_b() & 0x01 != 0;
                if self.signals.reset.is_asserted() || soft_reset {
                    self.video.reset();
                    m.vias[VIA1].take_port_b();
                    frontend.clear();
                }
            }
            if self.video.frame_done() {
                frontend.frame_complete();
            }
        }
        self.shutdown();
    }

    /// Cooperative shutdown: drop the running flag, join the CPU loop,
    /// close the DMA channel, join the worker.
    pub fn shutdown(&mut self) {
        self.signals.halt();
        if let Some(handle) = self.cpu_thread.take() {
            let _ = handle.join();
        }
        if let Ok(mut m) = self.machine.lock() {
            m.clear_dma_kick();
        }
        if let Some(handle) = self.dma_thread.take() {
            let _ = handle.join();
        }
    }

    fn spawn_cpu_loop(&self) -> JoinHandle<()> {
        let machine = Arc::clone(&self.machine);
        let signals = Arc::clone(&self.signals);
        let trace = self.trace;
        thread::spawn(move || {
            let mut cpu = Cpu::new();
            let mut clock_cycles: i64 = 0;
            let mut clock_start = Instant::now();
            while signals.is_running() {
                while signals.ready.is_asserted() {
                    cpu.cycles += CLOCK_RATE / 20;
                    if trace.clock_test {
                        clock_cycles += CLOCK_RATE / 20;
                        if clock_cycles >= CLOCK_RATE {
                            println!(
                                "cpu speed: {:.1} MHz -- executed in {} ms",
                                CLOCK_RATE as f64 / 1_000_000.0,
                                clock_start.elapsed().as_millis()
                            );
                            clock_cycles = 0;
                            clock_start = Instant::now();
                        }
                    }
                    while cpu.cycles >= 0 {
                        let Ok(mut m) = machine.lock() else { return };
                        if signals.reset.is_asserted() {
                            cpu.reset(&*m, &signals);
                            m.clear_ram();
                            if trace.verbose {
                                println!(" ---- reset ----");
                            }
                        }
                        let at = cpu.pc;
                        cpu.fetch(&*m);
                        cpu.execute(&mut *m);
                        let _ = cpu.check_interrupts(&mut *m, &signals);
                        if trace.verbose {
                            println!(
                                "pc: {at:04x}    ir: {:02x}    x: {:02x}    y: {:02x}    a: {:02x}    sr: {:02x}    sp: {:02x}    addr: {:04x}",
                                cpu.ir, cpu.x, cpu.y, cpu.a, cpu.sr, cpu.sp, cpu.addr
                            );
                        }
                        drop(m);
                        if !signals.is_running() {
                            break;
                        }
                    }
                    spin_sleep::sleep(Duration::from_millis(50));
                    if !signals.is_running() {
                        break;
                    }
                }
                if !signals.is_running() {
                    break;
                }
                // READY deasserted: idle until it returns.
                spin_sleep::sleep(Duration::from_millis(50));
            }
        })
    }

    // The DMA worker serializes transfers: it executes under the machine
    // lock, then persists the image snapshot after releasing it, so a
    // slow disk never stalls instruction fetch.
    fn spawn_dma_worker(&self, transfers: mpsc::Receiver<()>) -> JoinHandle<()> {
        let machine = Arc::clone(&self.machine);
        thread::spawn(move || {
            while transfers.recv().is_ok() {
                let snapshot = {
                    let Ok(mut m) = machine.lock() else { return };
                    match m.run_transfer() {
                        Some(Direction::Receive) => {
                            Some((m.ssd.image().to_vec(), m.ssd.path().to_path_buf()))
                        }
                        _ => None,
                    }
                };
                if let Some((image, path)) = snapshot {
                    if let Err(err) = fs::write(&path, &image) {
                        eprintln!(
                            "error: couldn't write the storage image {}: {err}",
                            path.display()
                        );
                    }
                }
            }
        })
    }
}

/// One scheduler tick, synchronously: credit the cycle budget and
/// execute instructions (honoring RESET) until it goes negative. The
/// threaded CPU loop does the same with per-instruction locking; this
/// form exists for single-owner embedding and tests.
pub fn run_tick(cpu: &mut Cpu, machine: &mut SystemBus, signals: &Signals) {
    cpu.cycles += CLOCK_RATE / 20;
    while cpu.cycles >= 0 {
        if signals.reset.is_asserted() {
            cpu.reset(&*machine, signals);
            machine.clear_ram();
        }
        cpu.fetch(&*machine);
        cpu.execute(machine);
        let _ = cpu.check_interrupts(machine, signals);
    }
}
