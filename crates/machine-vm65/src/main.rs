//! VM65 emulator runner.
//!
//! Loads the ROM and storage images (both fatal on failure, before any
//! thread starts), powers the machine on and runs the render-side loop.
//! The shipped frontend is headless: it drains the video and keyboard
//! hooks without presenting anything. A windowing collaborator plugs in
//! by implementing [`Frontend`].

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use machine_vm65::{Frontend, KeyReporter, Trace, Vm65};

/// VM65, a 65C02 homebrew computer emulator.
#[derive(Parser, Debug)]
#[command(name = "vm65")]
#[command(about = "A 65C02 homebrew computer emulator", long_about = None)]
struct Args {
    /// Path to the 16KB ROM image
    #[arg(long)]
    rom: PathBuf,

    /// Path to the 4MB storage image (.img)
    #[arg(long)]
    storage: PathBuf,

    /// Trace every executed instruction
    #[arg(short, long)]
    verbose: bool,

    /// Report achieved emulation speed once per simulated second
    #[arg(long)]
    clock_test: bool,
}

/// Stand-in for the windowing collaborator.
struct HeadlessFrontend;

impl Frontend for HeadlessFrontend {
    fn poll(&mut self, _keys: &mut KeyReporter) -> bool {
        true
    }

    fn present_pixel(&mut self, _hr: u8, _vr: u8, _pxd: u8, _cmr: bool) {}

    fn frame_complete(&mut self) {}

    fn clear(&mut self) {}
}

fn main() {
    let args = Args::parse();
    if args.verbose && args.clock_test {
        eprintln!("verbose and clock-test cannot be enabled at the same time");
        process::exit(1);
    }

    let rom = match fs::read(&args.rom) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("couldn't read the ROM file {}: {err}", args.rom.display());
            process::exit(1);
        }
    };

    let mut vm = match Vm65::new(&rom, &args.storage) {
        Ok(vm) => vm,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };
    vm.set_trace(Trace {
        verbose: args.verbose,
        clock_test: args.clock_test,
    });

    vm.power_on();
    vm.run(&mut HeadlessFrontend);
}
