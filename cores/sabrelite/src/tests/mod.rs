// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use common::{
    common::{
        diagnostics::Severity,
        options::{GlobalProperty, SystemConfig, DEFAULT_RAM_SIZE},
        width::Width,
    },
    NANOSECONDS_PER_SECOND,
};
use mytest::{MytestState, PropertyError, EVT_OUT_OF_RANGE, EVT_UNALIGNED, SENTINEL};

use crate::{addr::*, BoardError, Sabrelite, EVT_UNASSIGNED};

fn board() -> Box<Sabrelite> {
    Sabrelite::new(&SystemConfig::default()).unwrap()
}

fn board_with(globals: &[&str]) -> Result<Box<Sabrelite>, BoardError> {
    let config = SystemConfig {
        globals: globals
            .iter()
            .map(|g| GlobalProperty::parse(g).unwrap())
            .collect(),
        ..SystemConfig::default()
    };
    Sabrelite::new(&config)
}

fn read_reg(sb: &Sabrelite) -> u64 {
    sb.read(MYTEST_ADDR, Width::Word)
}

fn write_reg(sb: &mut Sabrelite, value: u64) {
    sb.write(MYTEST_ADDR, value, Width::Word);
}

#[test]
fn test_board_starts_idle() {
    let sb = board();
    assert_eq!(read_reg(&sb), 0);
    assert!(sb.raised_irqs().is_empty());
    assert_eq!(sb.now(), 0);
    assert_eq!(sb.mytest.state(), MytestState::Idle);
}

#[test]
fn test_irq_after_half_second() {
    let mut sb = board();
    write_reg(&mut sb, 1);
    assert_eq!(read_reg(&sb), SENTINEL as u64);

    sb.advance_delta(0.499);
    assert!(!sb.irq_level(MYTEST_IRQ));

    sb.advance_delta(0.001);
    assert_eq!(sb.now(), NANOSECONDS_PER_SECOND / 2);
    assert!(sb.irq_level(MYTEST_IRQ));
    assert_eq!(sb.raised_irqs(), vec![MYTEST_IRQ]);
    assert_eq!(read_reg(&sb), SENTINEL as u64);
    assert_eq!(sb.pending_events(), 0);
}

#[test]
fn test_irq_fires_inside_long_advance() {
    let mut sb = board();
    write_reg(&mut sb, 1);
    sb.advance_delta(3.0);
    assert!(sb.irq_level(MYTEST_IRQ));
    assert_eq!(sb.now(), 3 * NANOSECONDS_PER_SECOND);
}

#[test]
fn test_rearm_moves_deadline() {
    let mut sb = board();
    write_reg(&mut sb, 1);
    sb.advance_delta(0.2);
    write_reg(&mut sb, 1);

    sb.advance_to(NANOSECONDS_PER_SECOND / 2);
    assert!(!sb.irq_level(MYTEST_IRQ));
    sb.advance_to(700_000_000);
    assert!(sb.irq_level(MYTEST_IRQ));
}

#[test]
fn test_clear_cancels_and_deasserts() {
    let mut sb = board();
    write_reg(&mut sb, 1);
    sb.advance_delta(0.3);
    write_reg(&mut sb, 0);
    sb.advance_delta(1.0);
    assert!(!sb.irq_level(MYTEST_IRQ));

    write_reg(&mut sb, 1);
    sb.advance_delta(0.5);
    assert!(sb.irq_level(MYTEST_IRQ));
    write_reg(&mut sb, 0);
    assert!(!sb.irq_level(MYTEST_IRQ));
    assert_eq!(read_reg(&sb), 0);
}

#[test]
fn test_counter_through_bus() {
    let mut sb = board();
    write_reg(&mut sb, 5);
    assert_eq!(read_reg(&sb), 6);
    write_reg(&mut sb, 0xFFFF_FFFF);
    assert_eq!(read_reg(&sb), 0);
    assert!(!sb.irq_level(MYTEST_IRQ));
}

#[test]
fn test_narrow_write_is_truncated() {
    let mut sb = board();
    // 0x101 as a byte is 1
    sb.write(MYTEST_ADDR, 0x101, Width::Byte);
    assert_eq!(read_reg(&sb), SENTINEL as u64);
}

#[test]
fn test_device_guest_errors() {
    let mut sb = board();
    write_reg(&mut sb, 7);
    assert_eq!(sb.read(MYTEST_ADDR + 2, Width::Halfword), 0);
    sb.write(MYTEST_ADDR + 1, 0, Width::Byte);
    assert_eq!(read_reg(&sb), 8);

    let diagnostics = &sb.c.diagnostics;
    assert_eq!(diagnostics.count(EVT_UNALIGNED), 2);
    assert_eq!(diagnostics.count(EVT_OUT_OF_RANGE), 0);
}

#[test]
fn test_unassigned_access() {
    let mut sb = board();
    assert_eq!(sb.read(0x0, Width::Word), 0);
    sb.write(MYTEST_ADDR + 4, 1, Width::Word);
    assert_eq!(sb.read(MYTEST_ADDR + 4, Width::Word), 0);
    assert_eq!(sb.c.diagnostics.count(EVT_UNASSIGNED), 3);
    assert_eq!(sb.c.diagnostics.count(EVT_OUT_OF_RANGE), 0);
}

#[test]
fn test_ram_access() {
    let mut sb = board();
    sb.write(MMDC_ADDR + 0x100, 0xDEAD_BEEF, Width::Word);
    assert_eq!(sb.read(MMDC_ADDR + 0x100, Width::Word), 0xDEAD_BEEF);
    assert_eq!(sb.read(MMDC_ADDR + 0x100, Width::Byte), 0xEF);
    // RAM ends right below the device
    sb.write(MYTEST_ADDR - 4, 2, Width::Word);
    assert_eq!(sb.read(MYTEST_ADDR - 4, Width::Word), 2);
    assert_eq!(sb.c.diagnostics.count(EVT_UNASSIGNED), 0);
    assert_eq!(read_reg(&sb), 0);
}

#[test]
fn test_ram_too_large() {
    let config = SystemConfig {
        ram_size: MMDC_SIZE + 1,
        ..SystemConfig::default()
    };
    assert!(matches!(
        Sabrelite::new(&config),
        Err(BoardError::RamTooLarge { .. })
    ));

    let config = SystemConfig {
        ram_size: DEFAULT_RAM_SIZE + 0x1000,
        ..SystemConfig::default()
    };
    assert!(matches!(
        Sabrelite::new(&config),
        Err(BoardError::RamOverlapsDevice { .. })
    ));
}

#[test]
fn test_global_sets_reset_value() {
    let mut sb = board_with(&["mytest.data=0x2A"]).unwrap();
    assert_eq!(read_reg(&sb), 0x2A);
    assert_eq!(sb.mytest.state(), MytestState::Idle);

    write_reg(&mut sb, 100);
    sb.reset();
    assert_eq!(read_reg(&sb), 0x2A);
}

#[test]
fn test_invalid_globals() {
    assert!(matches!(
        board_with(&["mytest.data1=2"]),
        Err(BoardError::Property(PropertyError::Unknown(_)))
    ));
    assert!(matches!(
        board_with(&["mytest.data=lots"]),
        Err(BoardError::Property(PropertyError::InvalidValue { .. }))
    ));
    assert!(matches!(
        board_with(&["uart.baud=9600"]),
        Err(BoardError::UnknownDriver(driver)) if driver == "uart"
    ));
}

#[test]
fn test_reset_clears_everything() {
    let mut sb = board();
    write_reg(&mut sb, 1);
    sb.advance_delta(0.5);
    write_reg(&mut sb, 1);
    assert!(sb.irq_level(MYTEST_IRQ));

    sb.reset();
    assert_eq!(read_reg(&sb), 0);
    assert!(!sb.irq_level(MYTEST_IRQ));
    assert_eq!(sb.pending_events(), 0);

    sb.advance_delta(2.0);
    assert!(!sb.irq_level(MYTEST_IRQ));
}

#[test]
fn test_reset_keeps_ram_and_clock() {
    let mut sb = board();
    sb.write(MMDC_ADDR, 0x55, Width::Byte);
    sb.advance_delta(1.0);
    sb.reset();
    assert_eq!(sb.read(MMDC_ADDR, Width::Byte), 0x55);
    assert_eq!(sb.now(), NANOSECONDS_PER_SECOND);
}

#[test]
fn test_method_has_no_effect() {
    let mut sb = board();
    write_reg(&mut sb, 1);
    sb.mytest_method();
    assert_eq!(read_reg(&sb), SENTINEL as u64);
    assert_eq!(sb.pending_events(), 1);
}

#[test]
fn test_negative_advance_is_ignored() {
    let mut sb = board();
    sb.advance_delta(1.0);
    sb.advance_delta(-0.5);
    sb.advance_to(0);
    assert_eq!(sb.now(), NANOSECONDS_PER_SECOND);
}

#[test]
fn test_request_at_end_of_time() {
    let mut sb = board();
    sb.advance_delta(1e10);
    sb.advance_delta(1e10);
    assert_eq!(sb.now(), u64::MAX);

    write_reg(&mut sb, 1);
    assert_eq!(read_reg(&sb), SENTINEL as u64);
    sb.advance_delta(1.0);
    assert!(sb.irq_level(MYTEST_IRQ));
    assert_eq!(sb.pending_events(), 0);
}

#[test]
fn test_advance_to_far_future() {
    let mut sb = board();
    sb.advance_to(u64::MAX - 10);
    assert_eq!(sb.now(), u64::MAX - 10);
}

#[test]
fn test_counter_states_through_bus() {
    let mut sb = board_with(&["mytest.data=0x2A"]).unwrap();
    write_reg(&mut sb, 0x29);
    assert_eq!(read_reg(&sb), 0x2A);
    assert_eq!(sb.mytest.state(), MytestState::Counting);

    write_reg(&mut sb, 0xFFFF_FFFF);
    assert_eq!(read_reg(&sb), 0);
    assert_eq!(sb.mytest.state(), MytestState::Counting);

    write_reg(&mut sb, 0);
    assert_eq!(sb.mytest.state(), MytestState::Idle);
}

#[test]
fn test_diagnostic_level_filters() {
    let config = SystemConfig {
        diagnostic_level: Severity::None,
        ..SystemConfig::default()
    };
    let sb = Sabrelite::new(&config).unwrap();
    sb.read(0, Width::Word);
    sb.read(MYTEST_ADDR + 1, Width::Byte);
    assert_eq!(sb.c.diagnostics.count(EVT_UNASSIGNED), 0);
    assert_eq!(sb.c.diagnostics.count(EVT_UNALIGNED), 0);
}

#[cfg(feature = "serde")]
#[test]
fn test_savestate_keeps_pending_irq() {
    let mut sb = board_with(&["mytest.data=3"]).unwrap();
    sb.write(MMDC_ADDR, 0x1234, Width::Halfword);
    write_reg(&mut sb, 1);
    sb.advance_delta(0.25);
    let state = sb.save_state().unwrap();

    sb.advance_delta(1.0);
    write_reg(&mut sb, 0);
    sb.write(MMDC_ADDR, 0, Width::Halfword);

    sb.load_state(&state).unwrap();
    assert_eq!(sb.now(), NANOSECONDS_PER_SECOND / 4);
    assert_eq!(read_reg(&sb), SENTINEL as u64);
    assert_eq!(sb.read(MMDC_ADDR, Width::Halfword), 0x1234);
    assert!(!sb.irq_level(MYTEST_IRQ));

    sb.advance_delta(0.25);
    assert!(sb.irq_level(MYTEST_IRQ));
    assert!(sb.mytest.irq().is_connected());

    // Props come from the state and diagnostics stay shared
    sb.reset();
    assert_eq!(read_reg(&sb), 3);
    sb.read(0, Width::Word);
    assert_eq!(sb.c.diagnostics.count(EVT_UNASSIGNED), 1);
}

#[cfg(feature = "serde")]
#[test]
fn test_savestate_keeps_asserted_irq() {
    let mut sb = board();
    write_reg(&mut sb, 1);
    sb.advance_delta(0.5);
    let state = sb.save_state().unwrap();
    write_reg(&mut sb, 0);

    sb.load_state(&state).unwrap();
    assert!(sb.irq_level(MYTEST_IRQ));
    write_reg(&mut sb, 0);
    assert!(!sb.irq_level(MYTEST_IRQ));
}

#[cfg(feature = "serde")]
#[test]
fn test_load_garbage_state() {
    let mut sb = board();
    assert!(matches!(
        sb.load_state(&[0xFF, 0x00]),
        Err(BoardError::State(_))
    ));
}
