//! System-level tests: the bus decode, the storage latch protocol as the
//! ROM drives it, the keyboard handshake and the scheduling tick.

use std::sync::Arc;

use drive_ssd::{STORAGE_SIZE, Ssd};
use emu_core::{Bus, Signals};
use machine_vm65::{
    Cpu, Key, KeyReporter, ROM_SIZE, SystemBus, VIA1_BASE, VIA2, VIA2_BASE, VIA3_BASE, run_tick,
};

/// Build a machine around a blank ROM carrying `program` at $C000 and a
/// reset vector pointing at it.
fn machine(name: &str, program: &[u8]) -> (SystemBus, Arc<Signals>) {
    let mut rom = vec![0u8; ROM_SIZE];
    rom[..program.len()].copy_from_slice(program);
    // Vectors live at the top of the image: $FFFC/$FFFD -> $C000.
    rom[0x3FFC] = 0x00;
    rom[0x3FFD] = 0xC0;

    let image = std::env::temp_dir().join(format!("vm65-system-test-{name}.img"));
    std::fs::write(&image, vec![0u8; STORAGE_SIZE]).expect("write storage image");
    let ssd = Ssd::load(&image).expect("load storage image");

    let signals = Arc::new(Signals::new());
    let bus = SystemBus::new(&rom, ssd, Arc::clone(&signals)).expect("build machine");
    (bus, signals)
}

/// Program VIA 2 as the storage companion: CA1 edge interrupt-generating,
/// CA1 cause enabled, both ports as outputs for the protocol stages.
fn configure_storage_vias(m: &mut SystemBus) {
    m.write(VIA2_BASE + 0xC, 0x01);
    m.write(VIA2_BASE + 0xE, 0x82);
    m.write(VIA2_BASE + 0x3, 0xFF); // DDRA
    m.write(VIA2_BASE + 0x2, 0xFF); // DDRB
    m.write(VIA3_BASE + 0x3, 0xFF); // VIA 3 DDRA
}

/// Feed one 3-byte protocol sequence through the VIA ports the way the
/// ROM does: stage 0 on VIA 2 port A, stage 1 on VIA 2 port B, stage 2
/// on VIA 3 port A.
fn protocol_sequence(m: &mut SystemBus, byte0: u8, byte1: u8, byte2: u8) {
    m.write(VIA2_BASE + 0x1, byte0);
    m.write(VIA2_BASE + 0x0, byte1);
    m.write(VIA3_BASE + 0x1, byte2);
}

#[test]
fn reset_tick_scenario() {
    // LDA #$42 / STA $0200 / BRA self
    let (mut m, signals) = machine(
        "reset-tick",
        &[0xA9, 0x42, 0x8D, 0x00, 0x02, 0x80, 0xFE],
    );
    // Garbage that the reset clear must wipe (and the quirk byte it
    // must not).
    m.poke(0x1234, 0x77);
    m.poke(0xBFFF, 0x55);

    let mut cpu = Cpu::new();
    assert!(signals.reset.is_asserted(), "power-on starts in reset");

    run_tick(&mut cpu, &mut m, &signals);

    assert!(!signals.reset.is_asserted());
    assert_eq!(m.peek(0x0200), 0x42, "the stored value reached the bus");
    assert_eq!(m.peek(0x1234), 0x00, "reset cleared non-ROM memory");
    assert_eq!(m.peek(0xBFFF), 0x55, "the last pre-ROM byte survives");
    assert_eq!(cpu.pc, 0xC005, "PC parked on the branch");
    assert!(
        cpu.cycles < 0 && cpu.cycles >= -3,
        "budget drained just past zero, got {}",
        cpu.cycles
    );

    // Each further tick credits exactly CLOCK_RATE / 20 and the loop
    // burns it back down to just below zero.
    for _ in 0..3 {
        run_tick(&mut cpu, &mut m, &signals);
        assert!(cpu.cycles < 0 && cpu.cycles >= -3);
        assert_eq!(cpu.pc, 0xC005);
    }
}

#[test]
fn storage_receive_scenario() {
    let (mut m, signals) = machine("dma-receive", &[0x80, 0xFE]);
    configure_storage_vias(&mut m);
    for i in 0..5u16 {
        m.poke(i, 0x60 + i as u8);
    }

    // Two empty commits program DSR=0 and AR=0; the third commits OR=5
    // with the direction bit clear: receive.
    protocol_sequence(&mut m, 0x00, 0x00, 0x80);
    protocol_sequence(&mut m, 0x00, 0x00, 0x80);
    assert!(!signals.irq.is_asserted(), "no transfer ran yet");
    protocol_sequence(&mut m, 0x05, 0x00, 0x80);

    assert_eq!(&m.ssd.image()[..5], &[0x60, 0x61, 0x62, 0x63, 0x64]);
    // The companion chip's control line fired and the shared IRQ line
    // went active.
    assert_ne!(m.vias[VIA2].ifr() & mos_via_6522::IFR_CA1, 0);
    assert!(!m.vias[VIA2].irq_line());
    assert!(signals.irq.is_asserted());
}

#[test]
fn storage_send_returns_received_bytes() {
    let (mut m, _signals) = machine("dma-roundtrip", &[0x80, 0xFE]);
    configure_storage_vias(&mut m);
    for i in 0..5u16 {
        m.poke(i, 0xA0 + i as u8);
    }

    // Receive 5 bytes from RAM $0000 into store offset 0.
    protocol_sequence(&mut m, 0x00, 0x00, 0x80);
    protocol_sequence(&mut m, 0x00, 0x00, 0x80);
    protocol_sequence(&mut m, 0x05, 0x00, 0x80);

    // Send them back to RAM $0300 (direction bit set on the last stage).
    protocol_sequence(&mut m, 0x00, 0x03, 0x80);
    protocol_sequence(&mut m, 0x00, 0x00, 0x80);
    protocol_sequence(&mut m, 0x05, 0x00, 0xC0);

    let copied: Vec<u8> = (0x0300..0x0305).map(|a| m.peek(a)).collect();
    assert_eq!(copied, vec![0xA0, 0xA1, 0xA2, 0xA3, 0xA4]);
}

#[test]
fn incomplete_programming_never_transfers() {
    let (mut m, signals) = machine("dma-incomplete", &[0x80, 0xFE]);
    configure_storage_vias(&mut m);
    m.poke(0, 0x99);

    protocol_sequence(&mut m, 0x00, 0x00, 0x80);
    protocol_sequence(&mut m, 0x05, 0x00, 0x80);
    // Only two commits: the controller stays unready.
    assert!(!m.ssd.ready());
    assert_eq!(m.ssd.image()[0], 0x00);
    assert!(!signals.irq.is_asserted());
}

#[test]
fn keyboard_report_handshake() {
    let (mut m, signals) = machine("keyboard", &[0x80, 0xFE]);
    // VIA 1 as the ROM configures it: CA1 edge, CA1 cause enabled.
    m.write(VIA1_BASE + 0xC, 0x01);
    m.write(VIA1_BASE + 0xE, 0x82);

    let mut keys = KeyReporter::new();
    keys.key_down(Key::Code(0x04));

    let mut delivered = Vec::new();
    for _ in 0..8 {
        keys.pump(&mut m);
        assert!(signals.irq.is_asserted(), "report byte raises IRQ");
        // The ROM's handler reads the port (clearing the cause) and its
        // RTI republishes the line.
        delivered.push(m.read(VIA1_BASE + 0x1));
        m.sync_interrupts();
        assert!(!signals.irq.is_asserted());
    }

    assert_eq!(delivered, vec![0, 0, 0x04, 0, 0, 0, 0, 0]);
    // The report is spent; further pumps are no-ops.
    keys.pump(&mut m);
    assert!(!signals.irq.is_asserted());
}

#[test]
fn cpu_vectors_to_keyboard_irq() {
    let (mut m, signals) = machine("keyboard-irq", &[0x80, 0xFE]);
    m.write(VIA1_BASE + 0xC, 0x01);
    m.write(VIA1_BASE + 0xE, 0x82);
    // IRQ vector -> $D000.
    m.poke(0xFFFE, 0x00);
    m.poke(0xFFFF, 0xD0);

    let mut keys = KeyReporter::new();
    keys.key_down(Key::Code(0x1D));
    keys.pump(&mut m);
    assert!(signals.irq.is_asserted());

    let mut cpu = Cpu::new();
    cpu.reset(&m, &signals);
    // Reset leaves interrupts disabled; the ROM's init ends with CLI.
    cpu.sr &= !wdc_65c02::flags::I;
    assert!(cpu.check_interrupts(&mut m, &signals).is_some());
    assert_eq!(cpu.pc, 0xD000);
}
